use crate::model::FileRecord;
use std::fmt;
use std::path::PathBuf;

/// Every file sharing one package key.
///
/// Records are folded in one at a time: the newest versioned record is kept
/// as the survivor and everything else lands in `obsolete`, in discovery
/// order. On an exact version tie the record seen first stays.
#[derive(Debug, Clone)]
pub struct PackageGroup {
    label: String,
    survivor: Option<FileRecord>,
    obsolete: Vec<FileRecord>,
}

impl PackageGroup {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            survivor: None,
            obsolete: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn survivor(&self) -> Option<&FileRecord> {
        self.survivor.as_ref()
    }

    pub fn obsolete(&self) -> &[FileRecord] {
        &self.obsolete
    }

    pub fn add_record(&mut self, record: FileRecord) {
        debug_assert_eq!(record.package_key(), self.label);

        if record.marked_for_deletion() {
            self.obsolete.push(record);
            return;
        }

        match self.survivor.take() {
            None => self.survivor = Some(record),
            Some(current) => {
                if record.version() > current.version() {
                    self.obsolete.push(current);
                    self.survivor = Some(record);
                } else {
                    self.obsolete.push(record);
                    self.survivor = Some(current);
                }
            }
        }
    }

    /// Paths and total size of everything that should go.
    pub fn finalize(&self) -> (Vec<PathBuf>, u64) {
        let files = self.obsolete.iter().map(|r| r.path.clone()).collect();
        let size = self.obsolete.iter().map(|r| r.size).sum();
        (files, size)
    }

    /// Printable summary of the group, `None` when nothing is obsolete.
    pub fn summary(&self, index: usize) -> Option<GroupSummary<'_>> {
        if self.obsolete.is_empty() {
            None
        } else {
            Some(GroupSummary { index, group: self })
        }
    }
}

pub struct GroupSummary<'a> {
    index: usize,
    group: &'a PackageGroup,
}

impl fmt::Display for GroupSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " {:03}: {}", self.index, self.group.label())?;
        match self.group.survivor() {
            Some(keep) => writeln!(f, "   KEEP: {}", keep.path.display())?,
            None => writeln!(f, "   KEEP: -")?,
        }
        for (i, record) in self.group.obsolete().iter().enumerate() {
            let tag = if i == 0 { "   DEL : " } else { "         " };
            writeln!(f, "{tag}{}", record.path.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecordKind, Version};

    fn pkg(path: &str, version: &str, size: u64) -> FileRecord {
        FileRecord::new(
            PathBuf::from(path),
            size,
            RecordKind::Versioned {
                name: "foo".to_string(),
                version: Version::parse(version).unwrap(),
            },
        )
    }

    fn survivor_path(group: &PackageGroup) -> Option<&str> {
        group.survivor().and_then(|r| r.path.to_str())
    }

    #[test]
    fn keeps_highest_version() {
        let mut group = PackageGroup::new("foo");
        group.add_record(pkg("foo-1.2", "1.2", 10));
        group.add_record(pkg("foo-1.10", "1.10", 20));
        group.add_record(pkg("foo-1.9", "1.9", 30));

        assert_eq!(survivor_path(&group), Some("foo-1.10"));
        let (files, size) = group.finalize();
        assert_eq!(files, vec![PathBuf::from("foo-1.2"), PathBuf::from("foo-1.9")]);
        assert_eq!(size, 40);
    }

    #[test]
    fn tie_keeps_first_seen() {
        let mut group = PackageGroup::new("foo");
        group.add_record(pkg("a/foo-1.0", "1.0", 1));
        group.add_record(pkg("b/foo-1.0", "1.0", 1));

        assert_eq!(survivor_path(&group), Some("a/foo-1.0"));
        assert_eq!(group.obsolete()[0].path, PathBuf::from("b/foo-1.0"));
    }

    #[test]
    fn survivor_dominates_and_counts_add_up() {
        let versions = ["3.1", "1.0", "2.5", "3.0.9", "0.1", "3.1", "2.10"];
        // a few rotations of the insertion order
        for shift in 0..versions.len() {
            let mut group = PackageGroup::new("foo");
            for i in 0..versions.len() {
                let v = versions[(i + shift) % versions.len()];
                group.add_record(pkg(&format!("foo-{v}-{i}"), v, 1));
            }

            let keep = group.survivor().and_then(FileRecord::version).unwrap();
            assert_eq!(keep, &Version::parse("3.1").unwrap());
            for rec in group.obsolete() {
                assert!(rec.version().unwrap() <= keep);
            }
            assert_eq!(group.obsolete().len() + 1, versions.len());
        }
    }

    #[test]
    fn a_priori_records_never_survive() {
        let mut group = PackageGroup::new("Patches");
        for i in 0..3 {
            group.add_record(FileRecord::new(
                PathBuf::from(format!("p{i}.patch")),
                5,
                RecordKind::Patch,
            ));
        }
        assert!(group.survivor().is_none());
        assert_eq!(group.finalize(), (
            vec![
                PathBuf::from("p0.patch"),
                PathBuf::from("p1.patch"),
                PathBuf::from("p2.patch")
            ],
            15
        ));
    }

    #[test]
    fn forced_records_skip_comparison() {
        let mut group = PackageGroup::new("foo");
        let mut newest = pkg("foo-9.0", "9.0", 1);
        newest.mark_for_deletion();
        group.add_record(pkg("foo-1.0", "1.0", 1));
        group.add_record(newest);

        assert_eq!(survivor_path(&group), Some("foo-1.0"));
        assert_eq!(group.obsolete().len(), 1);
    }

    #[test]
    fn empty_group_has_no_summary() {
        let mut group = PackageGroup::new("foo");
        group.add_record(pkg("foo-1.0", "1.0", 1));
        assert_eq!(group.finalize(), (vec![], 0));
        assert!(group.summary(0).is_none());
    }

    #[test]
    fn summary_lists_keep_and_deletes() {
        let mut group = PackageGroup::new("foo");
        group.add_record(pkg("foo-1.0", "1.0", 1));
        group.add_record(pkg("foo-2.0", "2.0", 1));
        group.add_record(pkg("foo-0.5", "0.5", 1));

        let text = group.summary(3).unwrap().to_string();
        assert_eq!(
            text,
            " 003: foo\n   KEEP: foo-2.0\n   DEL : foo-1.0\n         foo-0.5\n"
        );
    }
}
