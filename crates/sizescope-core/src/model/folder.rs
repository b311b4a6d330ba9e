/// In-memory mirror of one directory, annotated with a recursive size total.
///
/// Folders form a tree: each node owns its child folders (`Arc` in the
/// parent's child list) and its file records, and holds a non-owning `Weak`
/// back-reference to its parent for upward navigation and size-delta
/// propagation. Parent and child never form an ownership cycle.
///
/// # Locking discipline
///
/// The `children` and `files` collections are guarded by independent
/// `parking_lot` mutexes. A scan holds the children lock only around the
/// append of a newly discovered child — the recursive descent into that child
/// runs outside the lock, so a reader is never blocked behind a slow subtree.
/// [`Folder::listing`] takes both locks, children first then files, for the
/// full snapshot+sort, so it can never observe a half-updated child list
/// paired with a fully-updated file list. Locks belong to individual nodes;
/// scanning or listing unrelated subtrees never contends.
use super::listing::{Row, SortMode, DIR_LABEL};
use super::record::FileRecord;
use super::size::format_size;
use compact_str::CompactString;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Weak};

/// Scan state of a folder, polled by the presentation layer to show a
/// loading indicator and gate the refresh control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ScanStatus {
    /// A scan of this folder is in progress; `children`/`files` may be
    /// partially populated and `size` is not yet meaningful.
    Loading = 0,
    /// The last scan of this folder (and all recursive child scans) returned.
    Done = 1,
}

impl ScanStatus {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Loading,
            _ => Self::Done,
        }
    }
}

/// One directory in the mirrored tree.
pub struct Folder {
    /// Absolute path; stable for the node's lifetime.
    path: PathBuf,
    /// Base name, falling back to the whole path for roots like `/` or `C:\`.
    name: CompactString,
    /// Non-owning back-reference; dangling only for roots.
    parent: Weak<Folder>,
    /// Immediate subdirectories observed at the last scan, in scan order.
    children: Mutex<Vec<Arc<Folder>>>,
    /// Immediate files observed at the last scan, in scan order.
    files: Mutex<Vec<FileRecord>>,
    /// Cumulative size: direct file bytes plus every descendant's bytes.
    ///
    /// Mutated by the owning scan and by delta propagation from refreshed
    /// descendants. An ancestor's value is transiently stale while a
    /// descendant rescan is in flight and becomes consistent again once that
    /// rescan's delta has been propagated.
    size: AtomicU64,
    status: AtomicU8,
}

impl Folder {
    /// Create a root folder (no parent). A new folder starts `Loading`.
    pub fn root(path: PathBuf) -> Arc<Self> {
        Arc::new(Self::new(Weak::new(), path))
    }

    /// Create a child folder whose parent back-reference points at `parent`.
    ///
    /// The caller is expected to append the result to `parent`'s child list
    /// via [`Folder::add_child`]; construction alone does not attach it.
    pub fn new_child(parent: &Arc<Self>, path: PathBuf) -> Arc<Self> {
        Arc::new(Self::new(Arc::downgrade(parent), path))
    }

    fn new(parent: Weak<Self>, path: PathBuf) -> Self {
        let name = display_name(&path);
        Self {
            path,
            name,
            parent,
            children: Mutex::new(Vec::new()),
            files: Mutex::new(Vec::new()),
            size: AtomicU64::new(0),
            status: AtomicU8::new(ScanStatus::Loading as u8),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name used in listings and child lookup.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current cumulative size in bytes.
    pub fn size(&self) -> u64 {
        self.size.load(Ordering::Relaxed)
    }

    pub fn status(&self) -> ScanStatus {
        ScanStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// The owning folder, or `None` for a root. Used for "navigate up".
    pub fn parent(&self) -> Option<Arc<Folder>> {
        self.parent.upgrade()
    }

    /// Linear search of the current children for a base-name match.
    /// Used by the presentation layer to descend into a clicked row.
    pub fn child(&self, name: &str) -> Option<Arc<Folder>> {
        self.children
            .lock()
            .iter()
            .find(|c| c.name() == name)
            .cloned()
    }

    /// Snapshot of the current child folders, in scan order.
    pub fn folders(&self) -> Vec<Arc<Folder>> {
        self.children.lock().clone()
    }

    /// Append a newly discovered subdirectory. The lock is held only for the
    /// push; the caller recurses into the child outside it.
    pub fn add_child(&self, child: Arc<Folder>) {
        self.children.lock().push(child);
    }

    /// Append a newly read file record.
    pub fn add_file(&self, record: FileRecord) {
        self.files.lock().push(record);
    }

    /// Reset for a (re)scan: flag `Loading`, discard previous contents.
    ///
    /// Previous children and files are replaced, never merged — the next
    /// completed scan is the sole source of truth for this node.
    pub fn begin_scan(&self) {
        self.status.store(ScanStatus::Loading as u8, Ordering::Release);
        self.children.lock().clear();
        self.files.lock().clear();
        self.size.store(0, Ordering::Relaxed);
    }

    /// Record the completed scan's total and flag `Done`.
    ///
    /// Only called after this node's enumeration *and* every recursive child
    /// scan have returned.
    pub fn finish_scan(&self, total: u64) {
        self.size.store(total, Ordering::Relaxed);
        self.status.store(ScanStatus::Done as u8, Ordering::Release);
    }

    /// Apply a signed size difference to this folder and every ancestor.
    ///
    /// This is what keeps ancestor totals correct in O(depth) after a
    /// targeted refresh of one directory, instead of re-scanning the tree.
    /// A zero delta returns immediately.
    ///
    /// The adjustment is a plain atomic add per node, with no cross-node
    /// transaction. A refresh racing a concurrent full rescan of an ancestor
    /// can therefore land its delta on a total the rescan is about to
    /// overwrite; that narrow race matches the observed contract and is
    /// accepted rather than serialised behind a global lock.
    pub fn apply_size_delta(&self, delta: i64) {
        if delta == 0 {
            return;
        }
        // Two's-complement wrapping add handles negative deltas.
        self.size.fetch_add(delta as u64, Ordering::Relaxed);
        let mut current = self.parent();
        while let Some(node) = current {
            node.size.fetch_add(delta as u64, Ordering::Relaxed);
            current = node.parent();
        }
    }

    /// Flat, ordered display rows for this folder's immediate contents.
    ///
    /// Takes the children lock and then the files lock for the whole
    /// snapshot+sort, so a concurrent scan of this same folder can never
    /// produce a torn view. Safe to call while the folder is `Loading`; the
    /// rows then reflect whatever has been appended so far.
    pub fn listing(&self, mode: SortMode) -> Vec<Row> {
        let children = self.children.lock();
        let files = self.files.lock();

        match mode {
            SortMode::ByType => {
                // Directories first, then files, each group in scan order.
                children
                    .iter()
                    .map(|c| dir_row(c))
                    .chain(files.iter().map(file_row))
                    .collect()
            }
            SortMode::ByName | SortMode::BySize => {
                // Merge files and directories, then one stable sort. Files
                // land ahead of directories on ties (merge order).
                let mut merged: Vec<Entry> = files
                    .iter()
                    .map(|f| Entry {
                        row: file_row(f),
                        size: f.size(),
                    })
                    .chain(children.iter().map(|c| Entry {
                        row: dir_row(c),
                        size: c.size(),
                    }))
                    .collect();
                match mode {
                    SortMode::ByName => merged.sort_by(|a, b| a.row.name.cmp(&b.row.name)),
                    _ => merged.sort_by(|a, b| b.size.cmp(&a.size)),
                }
                merged.into_iter().map(|e| e.row).collect()
            }
        }
    }
}

impl std::fmt::Debug for Folder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Folder")
            .field("path", &self.path)
            .field("size", &self.size())
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

/// A row paired with the raw size it sorts on.
struct Entry {
    row: Row,
    size: u64,
}

fn dir_row(folder: &Folder) -> Row {
    Row {
        type_label: DIR_LABEL.into(),
        size_label: format_size(folder.size()),
        name: folder.name.clone(),
    }
}

fn file_row(file: &FileRecord) -> Row {
    Row {
        type_label: file.extension().into(),
        size_label: format_size(file.size()),
        name: file.name().into(),
    }
}

/// Base name of a path, or the path itself when there is none (drive and
/// filesystem roots).
fn display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}
