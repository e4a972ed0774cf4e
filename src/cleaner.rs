use crate::error::CleanError;
use crate::group::PackageGroup;
use crate::model::Outcome;
use crate::scanner::scan_distfiles;
use crate::settings::{RemovalMode, Settings};
use crate::ui;
use anyhow::Result;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Deletes one file. Implementations must not panic on failure.
pub trait Remover {
    fn remove(&self, path: &Path) -> Result<(), CleanError>;
}

/// Permanent removal.
pub struct Unlink;

impl Remover for Unlink {
    fn remove(&self, path: &Path) -> Result<(), CleanError> {
        fs::remove_file(path).map_err(|e| CleanError::DeletionFailure {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Moves files to the desktop trash instead.
pub struct MoveToTrash;

impl Remover for MoveToTrash {
    fn remove(&self, path: &Path) -> Result<(), CleanError> {
        trash::delete(path).map_err(|e| CleanError::DeletionFailure {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

pub fn remover_for(mode: RemovalMode) -> Box<dyn Remover> {
    match mode {
        RemovalMode::Unlink => Box::new(Unlink),
        RemovalMode::Trash => Box::new(MoveToTrash),
    }
}

/// Everything a confirmed run would delete, grouped per package.
#[derive(Debug, Default)]
pub struct CleanupPlan {
    groups: Vec<PackageGroup>,
    files: Vec<PathBuf>,
    total_size: u64,
}

impl CleanupPlan {
    /// Keeps only groups that have something to delete, in scan order.
    pub fn from_groups(groups: Vec<PackageGroup>) -> Self {
        let mut plan = Self::default();
        for group in groups {
            let (files, size) = group.finalize();
            if files.is_empty() {
                continue;
            }
            plan.files.extend(files);
            plan.total_size += size;
            plan.groups.push(group);
        }
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn groups(&self) -> &[PackageGroup] {
        &self.groups
    }

    pub fn write_summary(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for (index, group) in self.groups.iter().enumerate() {
            if let Some(summary) = group.summary(index) {
                writeln!(out, "{summary}")?;
            }
        }
        Ok(())
    }
}

/// Removes every file, carrying on past failures.
/// Returns the number removed and the failures.
pub fn remove_all(files: &[PathBuf], remover: &dyn Remover) -> (usize, Vec<CleanError>) {
    let mut removed = 0;
    let mut failures = Vec::new();

    for path in files {
        match remover.remove(path) {
            Ok(()) => {
                log::debug!("removed {}", path.display());
                removed += 1;
            }
            Err(e) => {
                log::warn!("{e}");
                failures.push(e);
            }
        }
    }

    (removed, failures)
}

/// Walks `root` and works out what would be deleted.
pub fn plan(
    settings: &Settings,
    root: &Path,
    progress_cb: Option<&dyn Fn()>,
) -> Result<CleanupPlan, CleanError> {
    let groups = scan_distfiles(root, &settings.keep, progress_cb)?;
    Ok(CleanupPlan::from_groups(groups))
}

/// Shows the plan, asks once, then deletes.
pub fn execute(
    settings: &Settings,
    plan: &CleanupPlan,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<Outcome> {
    if plan.is_empty() {
        ui::success(out, "No old package detected.")?;
        return Ok(Outcome::Empty);
    }

    plan.write_summary(out)?;

    let question = format!(
        "Going to delete {} files, {} of disk space will be freed.",
        plan.files().len(),
        ui::format_size(plan.total_size())
    );
    if !ui::confirm(input, out, &question)? {
        ui::warn(out, "Operation aborted.")?;
        return Ok(Outcome::Aborted);
    }

    let remover = remover_for(settings.removal);
    let (removed, failures) = remove_all(plan.files(), remover.as_ref());

    if failures.is_empty() {
        ui::success(out, "Finished cleaning packages.")?;
    } else {
        for failure in &failures {
            ui::error(out, &failure.to_string())?;
        }
        ui::error(
            out,
            &format!(
                "Removed {removed} files, failed to remove {} files.",
                failures.len()
            ),
        )?;
    }

    Ok(Outcome::Cleaned {
        removed,
        failed: failures.len(),
    })
}
