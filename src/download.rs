// Archive downloader: fetches the finished seed zip from the signed URL the
// service hands back and stores it under `biorand-seeds/<seed>/`.

use crate::api::send;
use crate::error::{ReseedError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_DISPOSITION;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Root directory, relative to the working directory, for downloaded zips.
pub const DEFAULT_DOWNLOADS_DIR: &str = "biorand-seeds";

/// File name used when the server does not suggest one.
pub fn default_file_name(seed: &str) -> String {
    format!("biorand-re4r-{seed}.zip")
}

/// Decide the archive's file name from an optional `Content-Disposition`
/// header value, falling back to the seed-derived default.
pub fn resolve_file_name(content_disposition: Option<&str>, seed: &str) -> String {
    content_disposition
        .and_then(file_name_from_disposition)
        .unwrap_or_else(|| default_file_name(seed))
}

/// Extract the `filename` (or RFC 5987 `filename*`) parameter from a
/// `Content-Disposition` value. Only the last path component is returned so
/// a hostile header can't point outside the download directory.
pub fn file_name_from_disposition(value: &str) -> Option<String> {
    let (kind, rest) = match value.split_once(';') {
        Some((kind, rest)) => (kind.trim(), rest),
        None => (value.trim(), ""),
    };
    if kind.is_empty() || kind.contains(char::is_whitespace) || kind.contains('=') {
        return None;
    }

    let params = parse_params(rest)?;
    let extended = params
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("filename*"))
        .and_then(|(_, v)| decode_ext_value(v));
    let plain = params
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("filename"))
        .and_then(|(_, v)| sanitize(v));

    extended.and_then(|name| sanitize(&name)).or(plain)
}

/// Split `; key=value; key="quoted"` pairs. Returns `None` on malformed input.
fn parse_params(input: &str) -> Option<Vec<(String, String)>> {
    let mut out = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while matches!(chars.peek(), Some(c) if c.is_whitespace() || *c == ';') {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(&c) = chars.peek() {
            if c == '=' || c == ';' {
                break;
            }
            key.push(c);
            chars.next();
        }
        if chars.next() != Some('=') {
            return None;
        }
        let key = key.trim().to_string();
        if key.is_empty() {
            return None;
        }

        while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
            chars.next();
        }
        let mut val = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => val.push(chars.next()?),
                    '"' => {
                        closed = true;
                        break;
                    }
                    _ => val.push(c),
                }
            }
            if !closed {
                return None;
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == ';' {
                    break;
                }
                val.push(c);
                chars.next();
            }
            val = val.trim().to_string();
        }
        out.push((key, val));
    }
    Some(out)
}

/// Decode `charset'lang'percent-encoded` (RFC 5987). Only UTF-8 and ASCII
/// charsets are understood.
fn decode_ext_value(value: &str) -> Option<String> {
    let mut parts = value.splitn(3, '\'');
    let charset = parts.next()?;
    let _lang = parts.next()?;
    let encoded = parts.next()?;
    if !charset.eq_ignore_ascii_case("utf-8") && !charset.eq_ignore_ascii_case("us-ascii") {
        return None;
    }

    let bytes = urlencoding::decode_binary(encoded.as_bytes());
    String::from_utf8(bytes.into_owned()).ok()
}

fn sanitize(name: &str) -> Option<String> {
    let normalized = name.replace('\\', "/");
    let last = normalized.rsplit('/').next()?.trim();
    if last.is_empty() || last == "." || last == ".." {
        return None;
    }
    Some(last.to_string())
}

/// Download `url` (no bearer token; the URL is pre-signed) into
/// `<downloads_dir>/<seed>/<file name>` and return the written path.
pub fn download_archive(
    client: &Client,
    seed: &str,
    url: &str,
    downloads_dir: &Path,
) -> Result<PathBuf> {
    debug!(%url, "downloading seed zip");
    let res = send("Download", client.get(url))?;

    let disposition = res
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok());
    let file_name = resolve_file_name(disposition, seed);

    let target_dir = downloads_dir.join(seed);
    fs::create_dir_all(&target_dir).map_err(|e| {
        ReseedError::io(
            format!("failed to create biorand seed folder {}", target_dir.display()),
            e,
        )
    })?;
    let full_path = target_dir.join(&file_name);

    let file = File::create(&full_path).map_err(|e| {
        ReseedError::io(
            format!("error creating file to download to {}", full_path.display()),
            e,
        )
    })?;
    let mut out = BufWriter::new(file);

    let pb = match res.content_length() {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::with_template("{bar:40} {bytes}/{total_bytes} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner} {bytes} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        }
    };
    pb.set_message(file_name.clone());

    let mut body = pb.wrap_read(res);
    io::copy(&mut body, &mut out).map_err(|e| ReseedError::io("error saving seed file", e))?;
    out.flush()
        .map_err(|e| ReseedError::io("error saving seed file", e))?;
    pb.finish_and_clear();

    debug!(path = %full_path.display(), "seed zip written");
    Ok(full_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_filename_is_used() {
        assert_eq!(
            resolve_file_name(Some(r#"attachment; filename="foo.zip""#), "123456"),
            "foo.zip"
        );
    }

    #[test]
    fn missing_header_falls_back_to_seed_name() {
        assert_eq!(resolve_file_name(None, "123456"), "biorand-re4r-123456.zip");
    }

    #[test]
    fn unquoted_filename_token() {
        assert_eq!(
            file_name_from_disposition("attachment; filename=bar.zip").as_deref(),
            Some("bar.zip")
        );
    }

    #[test]
    fn extended_filename_takes_precedence() {
        let v = r#"attachment; filename="plain.zip"; filename*=UTF-8''seed%20one.zip"#;
        assert_eq!(file_name_from_disposition(v).as_deref(), Some("seed one.zip"));
    }

    #[test]
    fn empty_extended_filename_falls_back_to_plain() {
        assert_eq!(
            resolve_file_name(Some(r#"attachment; filename="foo.zip"; filename*=UTF-8''"#), "123456"),
            "foo.zip"
        );
        assert_eq!(
            resolve_file_name(Some(r#"attachment; filename="foo.zip"; filename*=UTF-8''%FF"#), "123456"),
            "foo.zip"
        );
    }

    #[test]
    fn quoted_semicolon_and_escape() {
        let v = r#"attachment; filename="a;b \"c\".zip""#;
        assert_eq!(file_name_from_disposition(v).as_deref(), Some(r#"a;b "c".zip"#));
    }

    #[test]
    fn path_components_are_stripped() {
        assert_eq!(
            file_name_from_disposition(r#"attachment; filename="../../evil.zip""#).as_deref(),
            Some("evil.zip")
        );
        assert_eq!(
            file_name_from_disposition(r#"attachment; filename="C:\\tmp\\x.zip""#).as_deref(),
            Some("x.zip")
        );
    }

    #[test]
    fn unparseable_header_falls_back() {
        assert_eq!(
            resolve_file_name(Some(r#"attachment; filename="unterminated"#), "000111"),
            "biorand-re4r-000111.zip"
        );
        assert_eq!(resolve_file_name(Some(""), "000111"), "biorand-re4r-000111.zip");
        assert_eq!(
            resolve_file_name(Some("attachment"), "000111"),
            "biorand-re4r-000111.zip"
        );
    }
}
