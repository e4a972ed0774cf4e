use crate::classify::classify;
use crate::error::CleanError;
use crate::group::PackageGroup;
use crate::keeplist::KeepList;
use jwalk::WalkDir;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Walks `root` and folds every regular file into its package group.
///
/// Groups come back in the order their first file was discovered. Entries
/// that cannot be read or stat'ed are skipped with a warning; only an
/// unreadable root is an error.
pub fn scan_distfiles(
    root: &Path,
    keep: &KeepList,
    progress_cb: Option<&dyn Fn()>,
) -> Result<Vec<PackageGroup>, CleanError> {
    let files = list_files(root)?;

    let mut groups: Vec<PackageGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for path in files {
        if let Some(cb) = progress_cb {
            cb();
        }

        if keep.is_kept(&path) {
            log::debug!("keeping {} (keep list)", path.display());
            continue;
        }

        let record = match classify(&path) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("{e}, skipping");
                continue;
            }
        };
        log::trace!("{} -> {:?}", path.display(), record.kind);

        let key = record.package_key();
        let slot = match index.get(key) {
            Some(&i) => i,
            None => {
                index.insert(key.to_string(), groups.len());
                groups.push(PackageGroup::new(key));
                groups.len() - 1
            }
        };
        groups[slot].add_record(record);
    }

    log::debug!("scanned {} into {} groups", root.display(), groups.len());
    Ok(groups)
}

/// Every regular file beneath `root`, sorted by name within each directory.
/// Symlinks are not followed.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>, CleanError> {
    fs::read_dir(root).map_err(|source| CleanError::UnreadableDirectory {
        path: root.to_path_buf(),
        source,
    })?;

    let walker = WalkDir::new(root)
        .skip_hidden(false)
        .sort(true)
        .parallelism(jwalk::Parallelism::Serial);

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.path()),
            Ok(_) => {}
            Err(e) => log::warn!("skipping unreadable entry: {e}"),
        }
    }
    Ok(files)
}
