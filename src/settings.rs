use crate::constants::{DISTFILES_DIR, PORTAGE_DIR};
use crate::keeplist::KeepList;
use std::path::{Path, PathBuf};

/// How confirmed distfiles are disposed of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemovalMode {
    #[default]
    Unlink,
    Trash,
}

/// Everything a command needs to know about the host, built once in `main`.
#[derive(Debug)]
pub struct Settings {
    /// Gentoo Prefix root; `/` when unset.
    pub eprefix: Option<PathBuf>,
    pub distdir: PathBuf,
    pub portage_dir: PathBuf,
    pub removal: RemovalMode,
    pub keep: KeepList,
}

impl Settings {
    pub fn new(eprefix: Option<PathBuf>, distdir: Option<PathBuf>) -> Self {
        let eprefix = eprefix.filter(|p| !p.as_os_str().is_empty());
        let root = eprefix.clone().unwrap_or_else(|| PathBuf::from("/"));
        Self {
            distdir: distdir.unwrap_or_else(|| root.join(DISTFILES_DIR)),
            portage_dir: root.join(PORTAGE_DIR),
            eprefix,
            removal: RemovalMode::default(),
            keep: KeepList::default(),
        }
    }

    #[must_use]
    pub fn with_removal(mut self, removal: RemovalMode) -> Self {
        self.removal = removal;
        self
    }

    #[must_use]
    pub fn with_keep(mut self, keep: KeepList) -> Self {
        self.keep = keep;
        self
    }

    /// Resolves a path relative to the system root (or `EPREFIX`).
    pub fn system_path(&self, relative: &str) -> PathBuf {
        self.eprefix
            .as_deref()
            .unwrap_or_else(|| Path::new("/"))
            .join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_root() {
        let settings = Settings::new(None, None);
        assert_eq!(settings.distdir, PathBuf::from("/usr/portage/distfiles"));
        assert_eq!(settings.portage_dir, PathBuf::from("/usr/portage"));
        assert_eq!(
            settings.system_path("etc/portage/package.use/use"),
            PathBuf::from("/etc/portage/package.use/use")
        );
        assert_eq!(settings.removal, RemovalMode::Unlink);
    }

    #[test]
    fn eprefix_prefixes_everything() {
        let settings = Settings::new(Some(PathBuf::from("/opt/gentoo")), None);
        assert_eq!(
            settings.distdir,
            PathBuf::from("/opt/gentoo/usr/portage/distfiles")
        );
        assert_eq!(
            settings.system_path("etc/portage/package.mask/mask"),
            PathBuf::from("/opt/gentoo/etc/portage/package.mask/mask")
        );
    }

    #[test]
    fn explicit_distdir_and_empty_prefix() {
        let settings = Settings::new(Some(PathBuf::new()), Some(PathBuf::from("/var/cache/distfiles")));
        assert!(settings.eprefix.is_none());
        assert_eq!(settings.distdir, PathBuf::from("/var/cache/distfiles"));
    }
}
