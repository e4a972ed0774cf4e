pub mod records;
pub mod resolve;

use crate::constants::{
    DISTFILES_DIR, KEYWORD_ANY, KEYWORDS_FILE, LINGUAS_PREFIX, MASK_FILE, UNMASK_FILE, USE_FILE,
};
use crate::error::RecordError;
use crate::settings::Settings;
use crate::ui;
use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use records::{Flavor, RecordFile};
use resolve::{Resolution, resolve};
use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// What a command operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Object {
    /// Accepted keywords (package.keywords)
    #[value(name = "k", alias = "keyword")]
    Keyword,
    /// Masked packages (package.mask)
    #[value(name = "m", alias = "mask")]
    Mask,
    /// USE flags (package.use)
    #[value(name = "u", alias = "use")]
    Use,
    /// LINGUAS entries of package.use
    #[value(name = "uL", alias = "linguas")]
    Linguas,
    /// Unmasked packages (package.unmask)
    #[value(name = "U", alias = "unmask")]
    Unmask,
    /// Downloaded distfiles
    #[value(name = "p", alias = "distfiles")]
    Distfiles,
}

impl Object {
    pub fn name(self) -> &'static str {
        match self {
            Self::Keyword => "Keyword",
            Self::Mask => "Mask",
            Self::Use => "Use",
            Self::Linguas => "Linguas",
            Self::Unmask => "Unmask",
            Self::Distfiles => "Distfiles",
        }
    }

    fn relative_path(self) -> &'static str {
        match self {
            Self::Keyword => KEYWORDS_FILE,
            Self::Mask => MASK_FILE,
            Self::Use | Self::Linguas => USE_FILE,
            Self::Unmask => UNMASK_FILE,
            Self::Distfiles => DISTFILES_DIR,
        }
    }

    fn flavor(self) -> Flavor {
        match self {
            Self::Use | Self::Linguas => Flavor::Use,
            _ => Flavor::Plain,
        }
    }

    pub fn path(self, settings: &Settings) -> PathBuf {
        match self {
            Self::Distfiles => settings.distdir.clone(),
            _ => settings.system_path(self.relative_path()),
        }
    }

    fn load(self, settings: &Settings) -> Result<RecordFile> {
        if self == Self::Distfiles {
            bail!("distfiles can only be cleaned, use --clean");
        }
        let path = self.path(settings);
        RecordFile::load(&path, self.flavor())
            .with_context(|| format!("failed to load {} entries", self.name()))
    }
}

/// A single quoted argument carries the whole entry.
fn split_args(args: &[String]) -> Vec<String> {
    match args {
        [single] => single.split_whitespace().map(String::from).collect(),
        _ => args.iter().map(|a| a.trim().to_string()).collect(),
    }
}

fn linguas_flag(word: &str) -> String {
    match word.strip_prefix('-') {
        Some(lang) => format!("-{LINGUAS_PREFIX}{lang}"),
        None => format!("{LINGUAS_PREFIX}{word}"),
    }
}

pub fn add(
    settings: &Settings,
    object: Object,
    args: &[String],
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let mut words = split_args(args);
    if words.is_empty() {
        return Err(RecordError::MissingArgs { action: "Adding" }.into());
    }

    let mut file = object.load(settings)?;

    match resolve(&settings.portage_dir, &words[0], input, out)? {
        Resolution::Unchanged => {}
        Resolution::Resolved(atom) => {
            log::info!("resolved {} to {atom}", words[0]);
            words[0] = atom;
        }
        Resolution::Stop => return Ok(()),
    }

    let saved = match object {
        Object::Use => file
            .merge_use(&words[0], words[1..].iter().map(String::as_str))
            .to_string(),
        Object::Linguas => {
            let flags: Vec<String> = words[1..].iter().map(|w| linguas_flag(w)).collect();
            log::debug!("linguas for {}: {flags:?}", words[0]);
            file.merge_use(&words[0], flags.iter().map(String::as_str))
                .to_string()
        }
        _ => {
            if object == Object::Keyword && words.len() == 1 {
                words.push(KEYWORD_ANY.to_string());
            }
            let entry = words.join(" ");
            writeln!(out, "Adding {} {entry} to {}", object.name(), file.path().display())?;
            if !file.add_plain(&entry) {
                ui::warn(out, &format!("{entry} is already present."))?;
                return Ok(());
            }
            entry
        }
    };

    file.save()?;
    ui::success(out, &format!("Record saved:\n\t{saved}"))?;
    Ok(())
}

pub fn list(settings: &Settings, object: Object, args: &[String], out: &mut dyn Write) -> Result<()> {
    let file = object.load(settings)?;
    if file.is_empty() {
        return Err(RecordError::Empty {
            path: file.path().to_path_buf(),
        }
        .into());
    }

    let filter = if args.is_empty() {
        "all items".to_string()
    } else {
        args.join(" ")
    };
    writeln!(out, "Listing {} contains: {filter}\n", file.path().display())?;

    let candidates: Vec<String> = if args.is_empty() {
        file.lines().iter().map(ToString::to_string).collect()
    } else {
        file.matching(args)
    };

    let mut seen = HashSet::new();
    let entries: Vec<String> = candidates
        .into_iter()
        .filter(|e| object != Object::Linguas || e.contains("linguas"))
        .filter(|e| seen.insert(e.clone()))
        .collect();

    if entries.is_empty() {
        writeln!(out, "No entry found.")?;
        return Ok(());
    }

    writeln!(out, "Total {} entries found, as follows\n", entries.len())?;
    for entry in &entries {
        writeln!(out, "\t{entry}")?;
    }
    Ok(())
}

pub fn delete(
    settings: &Settings,
    object: Object,
    args: &[String],
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let words = split_args(args);
    if words.is_empty() {
        return Err(RecordError::MissingArgs { action: "Deleting" }.into());
    }

    let mut file = object.load(settings)?;
    let matches = file.matching(&words);

    if matches.is_empty() {
        ui::warn(out, &format!("No entry matches {}.", words.join(" ")))?;
        return Ok(());
    }
    if matches.len() > 1 {
        let question = format!(
            "Going to delete multiple records:\n\t{}\ncontinue?",
            matches.join("\n\t")
        );
        if !ui::confirm(input, out, &question)? {
            ui::warn(out, "Operation aborted.")?;
            return Ok(());
        }
    }

    let removed = file.remove_matching(&words);
    file.save()?;
    ui::success(out, &format!("Deleted: {}", removed.join(", ")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::tempdir;

    fn settings(root: &Path) -> Settings {
        Settings::new(Some(root.to_path_buf()), None)
    }

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn run_add(root: &Path, object: Object, a: &[String], answer: &str) -> Result<String> {
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut out: Vec<u8> = Vec::new();
        add(&settings(root), object, a, &mut input, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn read(root: &Path, relative: &str) -> Result<String> {
        Ok(fs::read_to_string(root.join(relative))?)
    }

    #[test]
    fn keyword_defaults_to_any() -> Result<()> {
        let dir = tempdir()?;
        run_add(dir.path(), Object::Keyword, &args("dev-libs/foo"), "")?;
        run_add(dir.path(), Object::Keyword, &["dev-libs/bar ~amd64".to_string()], "")?;

        assert_eq!(
            read(dir.path(), KEYWORDS_FILE)?,
            "dev-libs/foo **\ndev-libs/bar ~amd64\n"
        );
        Ok(())
    }

    #[test]
    fn duplicate_mask_is_not_written_twice() -> Result<()> {
        let dir = tempdir()?;
        run_add(dir.path(), Object::Mask, &args(">=dev-libs/foo-2"), "")?;
        let text = run_add(dir.path(), Object::Mask, &args(">=dev-libs/foo-2"), "")?;

        assert!(text.contains("already present"));
        assert_eq!(read(dir.path(), MASK_FILE)?, ">=dev-libs/foo-2\n");
        Ok(())
    }

    #[test]
    fn use_flags_merge_with_existing_entry() -> Result<()> {
        let dir = tempdir()?;
        run_add(dir.path(), Object::Use, &args("app-editors/vim python -X"), "")?;
        let text = run_add(dir.path(), Object::Use, &args("app-editors/vim X"), "")?;

        assert!(text.contains("app-editors/vim python X"));
        assert_eq!(read(dir.path(), USE_FILE)?, "app-editors/vim python X\n");
        Ok(())
    }

    #[test]
    fn linguas_are_prefixed() -> Result<()> {
        let dir = tempdir()?;
        run_add(dir.path(), Object::Linguas, &args("sys-apps/man-pages -zh_CN de"), "")?;

        assert_eq!(
            read(dir.path(), USE_FILE)?,
            "sys-apps/man-pages -linguas_zh_CN linguas_de\n"
        );
        Ok(())
    }

    #[test]
    fn add_resolves_bare_names() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("usr/portage/sys-apps/man-pages"))?;

        run_add(dir.path(), Object::Keyword, &args("man-pages"), "y\n")?;
        assert_eq!(read(dir.path(), KEYWORDS_FILE)?, "sys-apps/man-pages **\n");

        run_add(dir.path(), Object::Mask, &args("man-pages"), "n\n")?;
        assert!(!dir.path().join(MASK_FILE).exists());
        Ok(())
    }

    #[test]
    fn add_without_content_fails() -> Result<()> {
        let dir = tempdir()?;
        let err = run_add(dir.path(), Object::Keyword, &[], "").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RecordError>(),
            Some(RecordError::MissingArgs { .. })
        ));
        Ok(())
    }

    #[test]
    fn list_filters_entries() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(USE_FILE);
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(
            &path,
            "app-editors/vim python\nsys-apps/man-pages linguas_de\nmedia-gfx/gimp linguas_fr python\n",
        )?;
        let settings = settings(dir.path());

        let mut out: Vec<u8> = Vec::new();
        list(&settings, Object::Use, &args("python"), &mut out)?;
        let text = String::from_utf8(out)?;
        assert!(text.contains("Total 2 entries found"));
        assert!(text.contains("\tapp-editors/vim python\n"));

        let mut out: Vec<u8> = Vec::new();
        list(&settings, Object::Linguas, &[], &mut out)?;
        let text = String::from_utf8(out)?;
        assert!(text.contains("Total 2 entries found"));
        assert!(!text.contains("vim"));
        Ok(())
    }

    #[test]
    fn list_empty_file_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let mut out: Vec<u8> = Vec::new();
        let err = list(&settings(dir.path()), Object::Mask, &[], &mut out).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RecordError>(),
            Some(RecordError::Empty { .. })
        ));
        Ok(())
    }

    #[test]
    fn delete_asks_before_removing_several() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(KEYWORDS_FILE);
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(&path, "dev-libs/foo **\ndev-libs/foobar **\ndev-libs/baz **\n")?;
        let settings = settings(dir.path());

        let mut out: Vec<u8> = Vec::new();
        delete(&settings, Object::Keyword, &args("foo"), &mut Cursor::new(b"n\n".to_vec()), &mut out)?;
        assert_eq!(fs::read_to_string(&path)?.lines().count(), 3);

        delete(&settings, Object::Keyword, &args("foo"), &mut Cursor::new(b"y\n".to_vec()), &mut out)?;
        assert_eq!(fs::read_to_string(&path)?, "dev-libs/baz **\n");

        // a single match needs no confirmation
        delete(&settings, Object::Keyword, &args("baz"), &mut Cursor::new(Vec::new()), &mut out)?;
        assert_eq!(fs::read_to_string(&path)?, "");
        Ok(())
    }

    #[test]
    fn distfiles_reject_record_commands() {
        let dir = tempdir().unwrap();
        let mut out: Vec<u8> = Vec::new();
        assert!(list(&settings(dir.path()), Object::Distfiles, &[], &mut out).is_err());
    }
}
