//! Line oriented portage config files (`package.use`, `package.mask`, ...).

use crate::constants::BACKUP_SUFFIX;
use crate::error::RecordError;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How the lines of a file are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// Each line is an opaque entry.
    Plain,
    /// `atom flag -flag ...`; entries for the same atom are merged.
    Use,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseFlag {
    pub name: String,
    pub enabled: bool,
}

impl UseFlag {
    /// `-foo` disables, `foo` and `+foo` enable.
    pub fn parse(word: &str) -> Self {
        if let Some(name) = word.strip_prefix('-') {
            Self {
                name: name.to_string(),
                enabled: false,
            }
        } else {
            Self {
                name: word.strip_prefix('+').unwrap_or(word).to_string(),
                enabled: true,
            }
        }
    }
}

impl fmt::Display for UseFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.enabled {
            f.write_str("-")?;
        }
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseRecord {
    pub atom: String,
    pub flags: Vec<UseFlag>,
}

impl UseRecord {
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let atom = words.next()?.to_string();
        let mut record = Self {
            atom,
            flags: Vec::new(),
        };
        record.merge(words);
        Some(record)
    }

    /// A flag already present is replaced in place, sign included.
    pub fn merge<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) {
        for word in words {
            let flag = UseFlag::parse(word);
            match self.flags.iter_mut().find(|f| f.name == flag.name) {
                Some(existing) => *existing = flag,
                None => self.flags.push(flag),
            }
        }
    }
}

impl fmt::Display for UseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.atom)?;
        for flag in &self.flags {
            write!(f, " {flag}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Comment(String),
    Plain(String),
    Use(UseRecord),
}

impl Line {
    fn parse(line: &str, flavor: Flavor) -> Self {
        if line.starts_with('#') {
            return Self::Comment(line.to_string());
        }
        match flavor {
            Flavor::Use => UseRecord::parse(line)
                .map_or_else(|| Self::Plain(line.to_string()), Self::Use),
            Flavor::Plain => Self::Plain(line.to_string()),
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment(s) | Self::Plain(s) => f.write_str(s),
            Self::Use(record) => write!(f, "{record}"),
        }
    }
}

/// One config file held in memory.
///
/// Portage accepts both `package.use` as a file and `package.use/` as a
/// directory of files. When the parent of `path` turns out to be a plain
/// file, its lines are loaded instead and the next [`RecordFile::save`]
/// migrates it into the directory layout.
#[derive(Debug)]
pub struct RecordFile {
    path: PathBuf,
    flavor: Flavor,
    lines: Vec<Line>,
    legacy: Option<PathBuf>,
}

impl RecordFile {
    pub fn load(path: &Path, flavor: Flavor) -> Result<Self, RecordError> {
        let legacy = path.parent().filter(|p| p.is_file()).map(Path::to_path_buf);
        let source = legacy.as_deref().unwrap_or(path);

        let text = match fs::read_to_string(source) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(source_err) => {
                return Err(RecordError::Io {
                    path: source.to_path_buf(),
                    source: source_err,
                });
            }
        };

        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| Line::parse(l, flavor))
            .collect();

        if let Some(legacy) = &legacy {
            log::debug!("{} is a file, reading legacy layout", legacy.display());
        }

        Ok(Self {
            path: path.to_path_buf(),
            flavor,
            lines,
            legacy,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Appends a plain entry. Returns false if an identical entry exists.
    pub fn add_plain(&mut self, entry: &str) -> bool {
        let entry = entry.trim();
        if self.lines.iter().any(|l| l.to_string() == entry) {
            return false;
        }
        self.lines.push(Line::parse(entry, self.flavor));
        true
    }

    /// Merges `flags` into the entry for `atom`, creating it if needed.
    pub fn merge_use<'a>(
        &mut self,
        atom: &str,
        flags: impl IntoIterator<Item = &'a str>,
    ) -> &UseRecord {
        let pos = self
            .lines
            .iter()
            .position(|l| matches!(l, Line::Use(r) if r.atom == atom));

        let pos = pos.unwrap_or_else(|| {
            self.lines.push(Line::Use(UseRecord {
                atom: atom.to_string(),
                flags: Vec::new(),
            }));
            self.lines.len() - 1
        });

        match &mut self.lines[pos] {
            Line::Use(record) => {
                record.merge(flags);
                record
            }
            _ => unreachable!("position matched a use record"),
        }
    }

    /// Entries (not comments) containing any of `patterns`.
    pub fn matching(&self, patterns: &[String]) -> Vec<String> {
        self.lines
            .iter()
            .filter(|l| !l.is_comment())
            .map(ToString::to_string)
            .filter(|text| patterns.iter().any(|p| text.contains(p.as_str())))
            .collect()
    }

    /// Drops every entry containing any of `patterns`; returns what went.
    pub fn remove_matching(&mut self, patterns: &[String]) -> Vec<String> {
        let mut removed = Vec::new();
        self.lines.retain(|line| {
            let text = line.to_string();
            let hit = !line.is_comment() && patterns.iter().any(|p| text.contains(p.as_str()));
            if hit {
                removed.push(text);
            }
            !hit
        });
        removed
    }

    pub fn render(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(&line.to_string());
            text.push('\n');
        }
        text
    }

    /// Writes all lines back, migrating a legacy single-file layout first.
    pub fn save(&mut self) -> Result<(), RecordError> {
        let backup = match self.legacy.take() {
            Some(legacy) => {
                let mut name = legacy.clone().into_os_string();
                name.push(BACKUP_SUFFIX);
                let backup = PathBuf::from(name);
                fs::rename(&legacy, &backup).map_err(|source| RecordError::Io {
                    path: legacy.clone(),
                    source,
                })?;
                Some((legacy, backup))
            }
            None => None,
        };

        match self.write() {
            Ok(()) => {
                if let Some((_, backup)) = backup
                    && let Err(e) = fs::remove_file(&backup)
                {
                    log::warn!("could not remove {}: {e}", backup.display());
                }
                Ok(())
            }
            Err(e) => {
                if let Some((legacy, backup)) = backup {
                    if let Some(dir) = self.path.parent() {
                        let _ = fs::remove_dir_all(dir);
                    }
                    if let Err(restore) = fs::rename(&backup, &legacy) {
                        log::error!("could not restore {}: {restore}", legacy.display());
                    }
                    self.legacy = Some(legacy);
                }
                Err(e)
            }
        }
    }

    fn write(&self) -> Result<(), RecordError> {
        let to_err = |source: io::Error| RecordError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(to_err)?;
        }
        fs::write(&self.path, self.render()).map_err(to_err)
    }
}
