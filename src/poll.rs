// Status poller: queries a generation job once per interval until it is
// done, fails, or one of the attempt/error ceilings is reached.

use crate::api::{GenerateResponse, QueryResponse, SeedStatus};
use crate::error::{ReseedError, Result};
use indicatif::ProgressBar;
use std::time::Duration;
use tracing::{debug, warn};

/// Anything that can report the state of a generation job.
pub trait StatusSource {
    fn query_status(&self, job: &GenerateResponse) -> Result<QueryResponse>;
}

/// When the consecutive-error counter goes back to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorReset {
    /// Reset only after a query succeeds.
    #[default]
    OnSuccess,
    /// Reset right after the threshold check on every attempt, whether the
    /// query failed or not. This is how the first release of the tool
    /// behaved; it means the error threshold can never be reached.
    EveryAttempt,
}

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub max_consecutive_errors: u32,
    pub interval: Duration,
    pub error_reset: ErrorReset,
}

impl Default for PollSettings {
    fn default() -> Self {
        PollSettings {
            max_attempts: 180,
            max_consecutive_errors: 3,
            interval: Duration::from_secs(1),
            error_reset: ErrorReset::OnSuccess,
        }
    }
}

/// Poll `job` until it reaches a terminal state and return its download URL.
///
/// `sleep` is called between attempts; production passes
/// `std::thread::sleep`. `progress` receives a human-readable message per
/// state change (pass `ProgressBar::hidden()` when nothing should render).
pub fn wait_for_download_url<S, F>(
    source: &S,
    job: &GenerateResponse,
    settings: &PollSettings,
    mut sleep: F,
    progress: &ProgressBar,
) -> Result<String>
where
    S: StatusSource + ?Sized,
    F: FnMut(Duration),
{
    let mut attempts: u32 = 0;
    let mut errors: u32 = 0;

    loop {
        attempts += 1;
        if attempts >= settings.max_attempts {
            return Err(ReseedError::PollTimeout { attempts });
        }

        let response = match source.query_status(job) {
            Ok(response) => response,
            Err(err) => {
                errors += 1;
                warn!(
                    job = job.id,
                    "error querying Biorand API ({}/{}): {}",
                    errors, settings.max_consecutive_errors, err
                );
                progress.set_message(format!(
                    "Error querying Biorand API ({}/{})",
                    errors, settings.max_consecutive_errors
                ));
                if errors > settings.max_consecutive_errors {
                    return Err(ReseedError::PollErrorThreshold {
                        errors,
                        last: Box::new(err),
                    });
                }
                if settings.error_reset == ErrorReset::EveryAttempt {
                    errors = 0;
                }
                sleep(settings.interval);
                continue;
            }
        };
        errors = 0;

        let status = response.seed_status();
        debug!(job = job.id, attempt = attempts, ?status, "poll");
        match status {
            SeedStatus::Queued => progress.set_message("Seed is queued for generation."),
            SeedStatus::Generating => progress.set_message("Seed is being generated."),
            SeedStatus::Done => {
                progress.set_message("Seed is done generating.");
                return response
                    .download_url
                    .filter(|u| !u.is_empty())
                    .ok_or(ReseedError::MissingDownloadUrl);
            }
            SeedStatus::Unknown(code) => return Err(ReseedError::UnknownStatus(code)),
        }

        sleep(settings.interval);
    }
}
