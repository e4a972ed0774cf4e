use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::{PATCHES, TEMPORARY_FILES, UNRECOGNIZED_FILES};

/// Dot separated sequence of numeric components, e.g. `1.2.10`.
///
/// Components compare numerically from the left. When one version is a strict
/// prefix of the other, the shorter one is the lesser (`1.2 < 1.2.0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    parts: Vec<u64>,
}

impl Version {
    /// Parses a normalized version string. Empty or non-numeric components
    /// are rejected; components too large for `u64` saturate.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }
        let mut parts = Vec::new();
        for part in s.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            parts.push(part.parse::<u64>().unwrap_or(u64::MAX));
        }
        Some(Self { parts })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.parts.iter().zip(&other.parts) {
            match a.cmp(b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        self.parts.len().cmp(&other.parts.len())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    /// Archive whose name carries a version; competes for survivor.
    Versioned { name: String, version: Version },
    /// Leftover of a download that failed its checksum.
    Temporary,
    Patch,
    /// Name without a recognizable version.
    Unrecognized,
}

impl RecordKind {
    pub fn package_key(&self) -> &str {
        match self {
            Self::Versioned { name, .. } => name,
            Self::Temporary => TEMPORARY_FILES,
            Self::Patch => PATCHES,
            Self::Unrecognized => UNRECOGNIZED_FILES,
        }
    }
}

/// One file found under the distfiles root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
    pub kind: RecordKind,
    forced_delete: bool,
}

impl FileRecord {
    pub fn new(path: PathBuf, size: u64, kind: RecordKind) -> Self {
        Self {
            path,
            size,
            kind,
            forced_delete: false,
        }
    }

    pub fn package_key(&self) -> &str {
        self.kind.package_key()
    }

    pub fn version(&self) -> Option<&Version> {
        match &self.kind {
            RecordKind::Versioned { version, .. } => Some(version),
            _ => None,
        }
    }

    /// True when the file is obsolete regardless of any version comparison.
    pub fn marked_for_deletion(&self) -> bool {
        self.forced_delete || !matches!(self.kind, RecordKind::Versioned { .. })
    }

    /// Flags a versioned record as obsolete without comparing it.
    #[allow(dead_code)]
    pub fn mark_for_deletion(&mut self) {
        self.forced_delete = true;
    }
}

pub fn base_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

/// What happened to one `clean` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing obsolete was found.
    Empty,
    /// The operator declined; nothing was touched.
    Aborted,
    Cleaned { removed: usize, failed: usize },
}

impl Outcome {
    pub fn is_success(self) -> bool {
        !matches!(self, Self::Cleaned { failed, .. } if failed > 0)
    }
}
