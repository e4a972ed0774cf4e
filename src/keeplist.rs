use crate::constants::KEEP_LIST;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Path prefixes the distfile cleanup must never touch.
#[derive(Debug, Default)]
pub struct KeepList {
    rules: Vec<PathBuf>,
}

impl KeepList {
    pub fn new(rules: Vec<PathBuf>) -> Self {
        Self { rules }
    }

    /// Loads `kmu/keep.txt` from the user's config directory.
    /// A missing or unreadable file yields an empty list.
    pub fn load() -> Self {
        dirs::config_dir()
            .map(|dir| Self::load_from(&dir.join(KEEP_LIST)))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        let mut rules = Vec::new();

        match fs::File::open(path) {
            Ok(file) => {
                for line in BufReader::new(file).lines().map_while(Result::ok) {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() && !trimmed.starts_with('#') {
                        rules.push(PathBuf::from(trimmed));
                    }
                }
                log::debug!("loaded {} keep rules from {}", rules.len(), path.display());
            }
            Err(e) => log::debug!("no keep list at {}: {e}", path.display()),
        }

        Self { rules }
    }

    /// True if `path` equals a rule or lies beneath one.
    pub fn is_kept(&self, path: &Path) -> bool {
        self.rules.iter().any(|rule| path.starts_with(rule))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
