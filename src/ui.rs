// UI layer: console prompts and progress output built on `dialoguer`,
// `indicatif` and `crossterm`. Nothing here talks to the network.

use anyhow::Result;
use crossterm::style::{style, Stylize};
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Line printed between the pipeline's sections.
pub const SEPARATOR: &str = "================================";

/// Ask whether to submit the generation for `seed`. Only an explicit "y"
/// proceeds; the default answer is no.
pub fn confirm_generation(seed: &str) -> Result<bool> {
    let answer = Confirm::new()
        .with_prompt(format!("Generate seed {seed} on Biorand?"))
        .default(false)
        .interact()?;
    Ok(answer)
}

/// Block until the user hits Enter so a double-clicked console window stays
/// open long enough to read the outcome. Errors (e.g. no TTY) are ignored.
pub fn pause() {
    let _ = Input::<String>::new()
        .with_prompt("Press Enter to continue...")
        .allow_empty(true)
        .interact_text();
}

/// Ticking spinner with a message, used while waiting on the service.
pub fn spinner(msg: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

pub fn heading(text: &str) {
    println!();
    println!("{}", style(text).bold());
}

pub fn success(text: &str) {
    println!("{}", style(text).green());
}

pub fn failure(text: &str) {
    eprintln!("{}", style(text).red());
}
