// Error taxonomy shared by every step of the reseed pipeline. Library
// functions return `ReseedError`; the binary wraps them in `anyhow` with
// step-level context.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a reseed run.
#[derive(Error, Debug)]
pub enum ReseedError {
    /// The configuration file was read but a required field is empty.
    #[error("{0}")]
    Config(String),

    #[error("error reading config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Connection-level failure (DNS, TLS, reset, ...).
    #[error("error calling {endpoint} API: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status code.
    #[error("response from {endpoint} API doesn't indicate success: {status}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("error decoding {endpoint} API response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error(
        "couldn't find profile with ID {0} in Profile API response. \
         Make sure you bookmark it with your account"
    )]
    ProfileNotFound(i64),

    #[error("seed status unknown ({0})")]
    UnknownStatus(i32),

    #[error("seed generation timed out after {attempts} attempts")]
    PollTimeout { attempts: u32 },

    #[error("error count threshold reached ({errors} consecutive failures): {last}")]
    PollErrorThreshold {
        errors: u32,
        #[source]
        last: Box<ReseedError>,
    },

    #[error("seed is done generating but no download URL was returned")]
    MissingDownloadUrl,

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading zip archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// A zip entry whose name would land outside the destination directory.
    #[error("refusing to extract unsafe zip entry {0:?}")]
    UnsafeEntry(String),
}

impl ReseedError {
    /// Shorthand for wrapping an `io::Error` with a human-readable context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ReseedError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReseedError>;
