// Archive extractor: unpacks a seed zip over the game installation,
// recreating the archive's directory layout and overwriting existing files.

use crate::error::{ReseedError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Extract every entry of `zip_path` under `dest`, in archive order, and
/// return how many entries were processed.
///
/// Existing files are truncated and rewritten. Extraction stops at the
/// first I/O error and whatever was already written stays on disk.
pub fn extract_archive(zip_path: &Path, dest: &Path) -> Result<usize> {
    let archive_err = |source| ReseedError::Archive {
        path: zip_path.to_path_buf(),
        source,
    };

    let file = File::open(zip_path).map_err(|e| {
        ReseedError::io(format!("error opening zip file {}", zip_path.display()), e)
    })?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(archive_err)?;

    let pb = ProgressBar::new(archive.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} Unzipping {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(archive_err)?;
        let name = entry.name().to_string();
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| ReseedError::UnsafeEntry(name.clone()))?;
        let out_path = dest.join(relative);

        pb.set_message(name.clone());
        debug!(entry = %name, "unzipping");

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| {
                ReseedError::io(format!("error creating directory {}", out_path.display()), e)
            })?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    ReseedError::io("error creating directories while unzipping", e)
                })?;
            }
            let out = File::create(&out_path).map_err(|e| {
                ReseedError::io(format!("error creating {}", out_path.display()), e)
            })?;
            let mut out = BufWriter::new(out);
            io::copy(&mut entry, &mut out)
                .and_then(|_| out.flush())
                .map_err(|e| ReseedError::io("error writing unzipped file", e))?;
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(archive.len())
}
