pub const KEYWORDS_FILE: &str = "etc/portage/package.keywords/keywords";
pub const MASK_FILE: &str = "etc/portage/package.mask/mask";
pub const USE_FILE: &str = "etc/portage/package.use/use";
pub const UNMASK_FILE: &str = "etc/portage/package.unmask/unmask";

pub const PORTAGE_DIR: &str = "usr/portage";
pub const DISTFILES_DIR: &str = "usr/portage/distfiles";
pub const DISTFILES_NAME: &str = "distfiles";

pub const KEEP_LIST: &str = "kmu/keep.txt";

pub const CHECKSUM_FAILURE_MARKER: &str = "_checksum_failure_";
pub const PATCH_MARKERS: [&str; 2] = ["patch", "diff"];

pub const TEMPORARY_FILES: &str = "Temporary Files";
pub const PATCHES: &str = "Patches";
pub const UNRECOGNIZED_FILES: &str = "Unrecognized Files.";

pub const KEYWORD_ANY: &str = "**";
pub const LINGUAS_PREFIX: &str = "linguas_";
pub const BACKUP_SUFFIX: &str = ".bakup";

/// More candidates than this and the resolver asks for a narrower name.
pub const MAX_SUGGESTIONS: usize = 9;
