// API client module: a small blocking HTTP client for the BioRand RE4R
// service. Every call except the archive download carries the user's
// bearer token.

use crate::error::{ReseedError, Result};
use crate::poll::StatusSource;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Production API root. Override with `BIORAND_API_URL`.
pub const DEFAULT_API_URL: &str = "https://api-re4r.biorand.net";

/// Profile bookmarked by the user that every run generates from
/// (7rayD's Balanced Combat Randomizer).
pub const RANDO_PROFILE_ID: i64 = 7;

/// Blocking API client holding the reqwest client, the API root and the
/// bearer token used for authenticated calls.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

/// A randomizer profile as listed by `GET /profile`. `config` is opaque to
/// us and echoed back untouched when generating.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config_id: Option<i64>,
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

/// Body of `POST /rando/generate`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest<'a> {
    pub profile_id: i64,
    pub seed: &'a str,
    pub config: &'a serde_json::Map<String, serde_json::Value>,
}

/// The job handle returned when a generation is submitted. `status` here is
/// informational; the poller is the authority on job state.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GenerateResponse {
    pub id: i64,
    #[serde(default)]
    pub version: String,
    pub status: i32,
}

/// Result of `GET /rando/{id}`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub status: i32,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl QueryResponse {
    pub fn seed_status(&self) -> SeedStatus {
        SeedStatus::from(self.status)
    }
}

/// Job states as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStatus {
    Queued,
    Generating,
    Done,
    Unknown(i32),
}

impl From<i32> for SeedStatus {
    fn from(code: i32) -> Self {
        match code {
            1 => SeedStatus::Queued,
            2 => SeedStatus::Generating,
            3 => SeedStatus::Done,
            other => SeedStatus::Unknown(other),
        }
    }
}

/// Return the first profile whose id matches `profile_id`.
pub fn select_profile(profiles: Vec<Profile>, profile_id: i64) -> Result<Profile> {
    profiles
        .into_iter()
        .find(|p| p.id == profile_id)
        .ok_or(ReseedError::ProfileNotFound(profile_id))
}

impl ApiClient {
    /// Create a client for `base_url` authenticating with `token`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| ReseedError::Transport {
                endpoint: "HTTP client",
                source,
            })?;
        Ok(ApiClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Create a client using `BIORAND_API_URL` or the production API root.
    pub fn from_env(token: impl Into<String>) -> Result<Self> {
        let base_url =
            std::env::var("BIORAND_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        Self::new(base_url, token)
    }

    /// The underlying HTTP client, used for unauthenticated downloads.
    pub fn http(&self) -> &Client {
        &self.client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.token)
    }

    /// List the user's profiles and pick the one with `profile_id`.
    pub fn fetch_profile(&self, profile_id: i64) -> Result<Profile> {
        let url = format!("{}/profile", self.base_url);
        debug!(%url, "fetching profiles");
        let res = send("Profile", self.authed(self.client.get(&url)))?;
        let profiles: Vec<Profile> = res
            .json()
            .map_err(|source| ReseedError::Decode {
                endpoint: "Profile",
                source,
            })?;
        debug!(count = profiles.len(), "profiles received");
        select_profile(profiles, profile_id)
    }

    /// Submit a generation job for `seed` using `profile`'s configuration.
    pub fn generate(&self, seed: &str, profile: &Profile) -> Result<GenerateResponse> {
        let url = format!("{}/rando/generate", self.base_url);
        let body = GenerateRequest {
            profile_id: profile.id,
            seed,
            config: &profile.config,
        };
        debug!(%url, seed, profile_id = profile.id, "submitting generation");
        let res = send("Generate", self.authed(self.client.post(&url)).json(&body))?;
        res.json().map_err(|source| ReseedError::Decode {
            endpoint: "Generate",
            source,
        })
    }

    /// Ask for the current state of a generation job.
    pub fn query(&self, job_id: i64) -> Result<QueryResponse> {
        let url = format!("{}/rando/{}", self.base_url, job_id);
        let res = send("Query Generate", self.authed(self.client.get(&url)))?;
        res.json().map_err(|source| ReseedError::Decode {
            endpoint: "Query Generate",
            source,
        })
    }
}

impl StatusSource for ApiClient {
    fn query_status(&self, job: &GenerateResponse) -> Result<QueryResponse> {
        self.query(job.id)
    }
}

/// Send a request and turn transport failures and non-2xx answers into
/// `ReseedError`s tagged with `endpoint`.
pub(crate) fn send(endpoint: &'static str, req: RequestBuilder) -> Result<Response> {
    let res = req
        .send()
        .map_err(|source| ReseedError::Transport { endpoint, source })?;
    let status = res.status();
    if !status.is_success() {
        debug!(endpoint, status = status.as_u16(), "request failed");
        return Err(ReseedError::Status {
            endpoint,
            status: status.as_u16(),
        });
    }
    Ok(res)
}
