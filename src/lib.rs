// Library root
// -----------
// The binary (`main.rs`) parses arguments and hands off to `pipeline::run`.
//
// Module responsibilities:
// - `config`: loads and validates `reseed-config.json`.
// - `seed`: mints the 6-digit seed.
// - `api`: blocking client for the Biorand profile/generate/query endpoints.
// - `poll`: waits for a generation job to finish.
// - `download`: saves the finished seed zip.
// - `extract`: unpacks the zip over the game directory.
// - `ui`: prompts, spinners and colored output.
// - `pipeline`: runs the steps above in order.
pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod poll;
pub mod seed;
pub mod ui;

pub use error::{ReseedError, Result};
