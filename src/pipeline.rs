// Orchestration: runs the reseed steps top to bottom and stops at the first
// failure. Each step gets a context line so the printed error says where it
// broke.

use crate::api::{ApiClient, RANDO_PROFILE_ID};
use crate::config::{resolve_config_path, Config};
use crate::download::download_archive;
use crate::extract::extract_archive;
use crate::poll::{wait_for_download_url, PollSettings};
use crate::seed::generate_seed;
use crate::ui;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub downloads_dir: PathBuf,
    pub assume_yes: bool,
    pub poll: PollSettings,
    /// API root; `None` means `BIORAND_API_URL` or the production service.
    pub api_url: Option<String>,
}

/// How a run ended when no error occurred.
#[derive(Debug)]
pub enum Outcome {
    Completed {
        seed: String,
        zip_path: PathBuf,
        entries: usize,
    },
    /// The user declined the confirmation prompt.
    Aborted,
}

pub fn run(opts: &RunOptions) -> Result<Outcome> {
    println!("Generating new seed...");

    let config_path = resolve_config_path(opts.config_path.as_deref());
    let config = Config::load(&config_path).context("Error getting configuration")?;
    info!(config = %config_path.display(), "configuration loaded");

    println!("RE4 path: {}", config.install_path);
    println!("Profile ID: {}", RANDO_PROFILE_ID);

    let api = match &opts.api_url {
        Some(url) => ApiClient::new(url.as_str(), config.token.as_str())?,
        None => ApiClient::from_env(config.token.as_str())?,
    };

    ui::heading("Getting randomizer profile...");
    let spinner = ui::spinner("Contacting Biorand...");
    let profile = api.fetch_profile(RANDO_PROFILE_ID);
    spinner.finish_and_clear();
    let profile = profile.context("Error getting profile information")?;
    println!("Profile name: {}", profile.name);
    println!("Profile description: {}", profile.description);
    println!("{}", ui::SEPARATOR);

    let seed = generate_seed();
    println!("Generated the following seed: {seed}");

    if !opts.assume_yes && !ui::confirm_generation(&seed)? {
        println!("Reseeding aborted.");
        return Ok(Outcome::Aborted);
    }

    ui::heading("Generating new seed on Biorand...");
    let job = api
        .generate(&seed, &profile)
        .context("Error generating Biorand seed")?;
    info!(job = job.id, version = %job.version, status = job.status, "generation submitted");

    let spinner = ui::spinner("Waiting for Biorand...");
    let download_url = wait_for_download_url(&api, &job, &opts.poll, std::thread::sleep, &spinner);
    spinner.finish_and_clear();
    let download_url = download_url.context("Seed generation did not finish")?;
    println!("Seed is done generating.");

    ui::heading("Downloading seed zip...");
    let zip_path = download_archive(api.http(), &seed, &download_url, &opts.downloads_dir)
        .context("Error downloading seed zip")?;
    println!("Seed zip successfully downloaded to {}", zip_path.display());

    ui::heading(&format!("Unzipping seed zip to {}...", config.install_path));
    let entries = extract_archive(&zip_path, Path::new(&config.install_path))
        .context("Failed to unzip seed")?;

    ui::success("Reseeding completed. Enjoy!");
    Ok(Outcome::Completed {
        seed,
        zip_path,
        entries,
    })
}
