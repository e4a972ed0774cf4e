//! Guesses the full `category/name` atom for a bare package name.

use crate::constants::{DISTFILES_NAME, MAX_SUGGESTIONS};
use crate::ui;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Use the word as typed.
    Unchanged,
    Resolved(String),
    /// Nothing usable was picked; the command should stop.
    Stop,
}

/// Every `category/entry` in the tree whose entry name contains `word`,
/// ignoring case. Sorted.
pub fn find_candidates(portage_dir: &Path, word: &str) -> Vec<String> {
    let needle = word.to_lowercase();
    let mut found = Vec::new();

    let categories = match fs::read_dir(portage_dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("cannot list {}: {e}", portage_dir.display());
            return found;
        }
    };

    for category in categories.filter_map(Result::ok) {
        let cat_name = category.file_name().to_string_lossy().into_owned();
        if cat_name == DISTFILES_NAME || cat_name.starts_with('.') || !category.path().is_dir() {
            continue;
        }
        let Ok(entries) = fs::read_dir(category.path()) else {
            continue;
        };
        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.to_lowercase().contains(&needle) {
                found.push(format!("{cat_name}/{name}"));
            }
        }
    }

    found.sort();
    found
}

/// Resolves `word` against the tree, asking the operator when it is not an
/// existing path under `portage_dir`.
pub fn resolve(
    portage_dir: &Path,
    word: &str,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> io::Result<Resolution> {
    if portage_dir.join(word).exists() {
        return Ok(Resolution::Unchanged);
    }

    let candidates = find_candidates(portage_dir, word);
    match candidates.len() {
        0 => Ok(Resolution::Unchanged),
        1 => {
            let question = format!("No entry for {word}, do you mean: {}?", candidates[0]);
            if ui::confirm(input, out, &question)? {
                Ok(Resolution::Resolved(candidates[0].clone()))
            } else {
                writeln!(out, "Please enter a valid record and retry.")?;
                Ok(Resolution::Stop)
            }
        }
        n if n > MAX_SUGGESTIONS => {
            writeln!(
                out,
                "Too many entries containing {word}, please help me to narrow down ...\n\t{}",
                candidates.join("\n\t")
            )?;
            Ok(Resolution::Stop)
        }
        n => match ui::select(input, out, "Multiple possible records, please select one...", &candidates)? {
            Some(i) => Ok(Resolution::Resolved(candidates[i].clone())),
            None => {
                writeln!(out, "Wrong input, value should be 0 ~ {}", n - 1)?;
                Ok(Resolution::Stop)
            }
        },
    }
}
