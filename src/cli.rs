// Command-line arguments. Everything has a default so a bare double-click
// run behaves like the original tool.

use crate::download::DEFAULT_DOWNLOADS_DIR;
use crate::pipeline::RunOptions;
use crate::poll::{ErrorReset, PollSettings};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "biorand-reseed",
    version,
    about = "Generate a fresh BioRand RE4R seed and install it"
)]
pub struct Args {
    /// Config file with `RE4InstallPath` and `BiorandToken`.
    /// Defaults to ./reseed-config.json, then the user config directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Where downloaded seed zips are kept.
    #[arg(long, default_value = DEFAULT_DOWNLOADS_DIR)]
    pub downloads_dir: PathBuf,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Exit without waiting for Enter.
    #[arg(long)]
    pub no_pause: bool,

    /// Reset the poll error counter on every attempt, as the first release
    /// did. This effectively disables the consecutive-error limit.
    #[arg(long)]
    pub legacy_error_reset: bool,

    /// Log debug output to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn run_options(&self) -> RunOptions {
        let error_reset = if self.legacy_error_reset {
            ErrorReset::EveryAttempt
        } else {
            ErrorReset::OnSuccess
        };
        RunOptions {
            config_path: self.config.clone(),
            downloads_dir: self.downloads_dir.clone(),
            assume_yes: self.yes,
            poll: PollSettings {
                error_reset,
                ..PollSettings::default()
            },
            api_url: None,
        }
    }
}
