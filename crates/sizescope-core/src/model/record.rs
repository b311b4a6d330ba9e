/// Immutable snapshot of one filesystem leaf entry.
///
/// Records are created during a directory scan and replaced wholesale on the
/// next scan of that directory; they are never mutated in place.
use compact_str::CompactString;
use std::path::{Path, PathBuf};

/// One file observed at the last scan of its parent directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Base name, e.g. `report.pdf`.
    name: CompactString,
    /// Absolute path; unique within the parent directory.
    path: PathBuf,
    /// Extension including the leading dot (`".pdf"`), or empty when the
    /// name contains no dot.
    extension: CompactString,
    /// Byte length at scan time.
    size: u64,
}

impl FileRecord {
    /// Build a record from the file's path and byte length.
    pub fn new(path: PathBuf, size: u64) -> Self {
        let name: CompactString = path
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy()))
            .unwrap_or_default();
        let extension = extension_of(&name);
        Self {
            name,
            path,
            extension,
            size,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Everything from the last `.` of the name, inclusive.
///
/// A leading-dot name such as `.bashrc` yields `".bashrc"`; a dotless name
/// yields the empty string.
fn extension_of(name: &str) -> CompactString {
    match name.rfind('.') {
        Some(i) => name[i..].into(),
        None => CompactString::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_includes_leading_dot() {
        let rec = FileRecord::new(PathBuf::from("/tmp/report.pdf"), 42);
        assert_eq!(rec.name(), "report.pdf");
        assert_eq!(rec.extension(), ".pdf");
        assert_eq!(rec.size(), 42);
    }

    #[test]
    fn extension_empty_without_dot() {
        let rec = FileRecord::new(PathBuf::from("/tmp/Makefile"), 1);
        assert_eq!(rec.extension(), "");
    }

    #[test]
    fn dotfile_is_its_own_extension() {
        let rec = FileRecord::new(PathBuf::from("/home/x/.bashrc"), 128);
        assert_eq!(rec.extension(), ".bashrc");
    }

    #[test]
    fn last_dot_wins() {
        let rec = FileRecord::new(PathBuf::from("/tmp/archive.tar.gz"), 9);
        assert_eq!(rec.extension(), ".gz");
    }
}
