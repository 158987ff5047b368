//! Naming and writing the downloaded archive.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use subgrab_core::ArchiveType;

const FALLBACK_STEM: &str = "subtitle";
const MAX_STEM_CHARS: usize = 150;

/// Turns a candidate display name into a file stem safe on common filesystems.
///
/// Path separators and reserved characters become `_`, control characters are
/// dropped, and runs of `_` collapse.
pub(crate) fn sanitize_file_stem(name: &str) -> String {
    let mut sanitized = String::new();
    let mut previous_underscore = false;

    for ch in name.trim().chars() {
        let mapped = match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => continue,
            c => c,
        };

        if mapped == '_' {
            if !previous_underscore {
                sanitized.push('_');
                previous_underscore = true;
            }
        } else {
            sanitized.push(mapped);
            previous_underscore = false;
        }
    }

    let mut stem: String = sanitized
        .trim_matches(|c: char| c == '.' || c == '_' || c.is_whitespace())
        .chars()
        .take(MAX_STEM_CHARS)
        .collect();
    stem.truncate(stem.trim_end().len());
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

/// File name for an archive: the sanitized stem plus the archive extension,
/// or the bare stem when the type is unknown.
pub(crate) fn archive_file_name(display_name: &str, archive: ArchiveType) -> String {
    let stem = sanitize_file_stem(display_name);
    if archive.is_known() {
        format!("{stem}.{}", archive.extension())
    } else {
        stem
    }
}

/// Writes `payload` to `dir/file_name`, creating `dir` if needed.
pub(crate) async fn write_archive(dir: &Path, file_name: &str, payload: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output directory '{}'", dir.display()))?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, payload)
        .await
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    Ok(path)
}
