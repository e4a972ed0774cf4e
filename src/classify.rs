use crate::constants::{CHECKSUM_FAILURE_MARKER, PATCH_MARKERS};
use crate::error::CleanError;
use crate::model::{FileRecord, RecordKind, Version, base_name};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

// Shortest name, then one or more digit groups each closed by `.`, `-` or `_`.
static NAME_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)[-_]((?:\d+[.\-_])+)").expect("name/version pattern is valid")
});

/// Stats `path` and classifies it by its file name.
pub fn classify(path: &Path) -> Result<FileRecord, CleanError> {
    let size = fs::metadata(path)
        .map_err(|source| CleanError::UnstatableFile {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    Ok(FileRecord::new(
        path.to_path_buf(),
        size,
        classify_name(&base_name(path)),
    ))
}

/// Pure part of [`classify`]; the first matching rule wins.
pub fn classify_name(name: &str) -> RecordKind {
    if name.contains(CHECKSUM_FAILURE_MARKER) {
        return RecordKind::Temporary;
    }
    if PATCH_MARKERS.iter().any(|m| name.contains(m)) {
        return RecordKind::Patch;
    }

    split_name_version(name).map_or(RecordKind::Unrecognized, |(name, version)| {
        RecordKind::Versioned { name, version }
    })
}

/// Splits `foo-1.2.tar.gz` into `("foo", 1.2)`.
pub fn split_name_version(name: &str) -> Option<(String, Version)> {
    let caps = NAME_VERSION.captures(name)?;
    let package = caps.get(1)?.as_str();
    let raw = caps.get(2)?.as_str().replace(['-', '_'], ".");
    let version = Version::parse(raw.trim_end_matches('.'))?;
    Some((package.to_string(), version))
}
