/// Listing rows and sort modes for the presentation layer.
///
/// A listing is a flat snapshot of one folder's immediate children and files,
/// already sorted and rendered into display labels. The presentation layer
/// polls for a fresh listing on a timer and re-renders only when the returned
/// rows differ from its last-seen copy, which is why [`Row`] is `PartialEq`.
use compact_str::CompactString;

/// Type label shown for subdirectory rows.
pub const DIR_LABEL: &str = "Dir";

/// How a folder's listing is ordered.
///
/// A closed set dispatched through a single comparison in
/// [`Folder::listing`](super::Folder::listing) — deliberately an enum, not a
/// trait object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Subdirectories first (in scan order), then files (in scan order).
    #[default]
    ByType,
    /// Directories and files merged, ascending by display name.
    ///
    /// Ordering policy: case-sensitive byte-wise comparison. No locale
    /// collation is applied, so the order is identical on every platform.
    ByName,
    /// Directories and files merged, descending by size (cumulative size
    /// for directories, byte length for files).
    BySize,
}

/// One display row: `(typeLabel, sizeLabel, name)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// `"Dir"` for subdirectories, the file extension otherwise.
    pub type_label: CompactString,
    /// Human-readable size, e.g. `"14MB"`.
    pub size_label: CompactString,
    /// Base name of the entry.
    pub name: CompactString,
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}\t{}", self.type_label, self.size_label, self.name)
    }
}
