/// Scanner — recursive directory walking with incremental size aggregation.
///
/// [`scan`] is the synchronous depth-first walk at the heart of the crate;
/// [`refresh`] is the targeted variant that rescans one folder and pushes the
/// resulting size delta up the ancestor chain. [`start_scan`] and
/// [`start_refresh`] wrap them in fire-and-forget background threads with a
/// progress channel, which is how the presentation layer consumes them.
pub mod error;
pub mod progress;

use crate::model::{FileRecord, Folder};
use error::ScanError;
use progress::{ProgressSink, ScanProgress};

use crossbeam_channel::Receiver;
use std::fs::{self, DirEntry};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::info;

/// Maximum number of progress messages that may queue up in the channel.
///
/// The presentation layer drains the channel once per poll tick (~1 s).
/// With `Update`s throttled to one per thousand files, 4 096 slots give a
/// scan minutes of headroom before back-pressure briefly stalls it instead
/// of consuming unbounded heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Handle to a running or completed background scan.
///
/// There is no cancellation: a scan of a very large subtree runs to
/// completion, and the presentation layer discovers completion either from
/// the channel's `Complete` message or by polling the root's `status()`.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    /// The folder being scanned, populated incrementally while the scan runs.
    pub root: Arc<Folder>,
    /// Join handle for the scan thread; held for ownership only.
    _thread: Option<thread::JoinHandle<()>>,
}

/// Start a full scan of `root_path` on a background thread.
///
/// Called once per mounted root at startup. The returned handle's `root` can
/// be listed immediately; rows grow as the walk proceeds.
pub fn start_scan(root_path: PathBuf) -> ScanHandle {
    let root = Folder::root(root_path);
    let (tx, progress_rx) = crossbeam_channel::bounded(PROGRESS_CHANNEL_CAPACITY);
    let folder = Arc::clone(&root);

    let thread = thread::Builder::new()
        .name("sizescope-scan".into())
        .spawn(move || {
            info!("starting scan of {}", folder.path().display());
            let sink = ProgressSink::new(tx);
            let start = Instant::now();
            let total = scan(&folder, &sink);
            info!(
                "scan of {} complete: {} files, {} bytes in {:?}",
                folder.path().display(),
                sink.files_found(),
                total,
                start.elapsed()
            );
            sink.complete(start.elapsed(), total);
        })
        .expect("failed to spawn scanner thread");

    ScanHandle {
        progress_rx,
        root,
        _thread: Some(thread),
    }
}

/// Start a targeted refresh of one already-mirrored folder, fire-and-forget.
///
/// Invoked when the user refreshes the currently viewed directory. On
/// completion the folder's new total has been propagated to every ancestor.
pub fn start_refresh(folder: Arc<Folder>) -> ScanHandle {
    let (tx, progress_rx) = crossbeam_channel::bounded(PROGRESS_CHANNEL_CAPACITY);
    let target = Arc::clone(&folder);

    let thread = thread::Builder::new()
        .name("sizescope-refresh".into())
        .spawn(move || {
            info!("refreshing {}", target.path().display());
            let sink = ProgressSink::new(tx);
            let start = Instant::now();
            let delta = refresh(&target, &sink);
            info!(
                "refresh of {} complete: delta {} bytes in {:?}",
                target.path().display(),
                delta,
                start.elapsed()
            );
            sink.complete(start.elapsed(), target.size());
        })
        .expect("failed to spawn refresh thread");

    ScanHandle {
        progress_rx,
        root: folder,
        _thread: Some(thread),
    }
}

/// Recursively populate `folder` from the live filesystem and return its
/// cumulative size.
///
/// Depth-first and synchronous: each discovered subdirectory is fully
/// scanned before the next sibling is considered, so the running total
/// always includes complete subtrees. The children lock is held only around
/// each append — the recursion itself runs outside it, and a concurrent
/// [`Folder::listing`] of this same node sees whatever has been appended so
/// far, never a torn collection.
///
/// Symbolic links and reparse points are skipped, not followed, so link
/// cycles cannot recurse. Error handling is graceful throughout: a vanished
/// or unreadable entry contributes zero and its siblings still appear.
pub fn scan(folder: &Arc<Folder>, sink: &ProgressSink) -> u64 {
    folder.begin_scan();

    let mut total: u64 = 0;
    match fs::read_dir(folder.path()) {
        Ok(entries) => {
            let (subdirs, file_entries) = partition_entries(folder, entries, sink);

            for dir_path in subdirs {
                let child = Folder::new_child(folder, dir_path);
                folder.add_child(Arc::clone(&child));
                // Recurse outside the children lock.
                total += scan(&child, sink);
            }

            for entry in file_entries {
                match entry.metadata() {
                    Ok(meta) => {
                        let record = FileRecord::new(entry.path(), meta.len());
                        total += record.size();
                        folder.add_file(record);
                        sink.file_scanned(meta.len());
                    }
                    Err(source) => sink.report(ScanError::Vanished {
                        path: entry.path(),
                        source,
                    }),
                }
            }
            sink.dir_scanned();
        }
        Err(source) if source.kind() == io::ErrorKind::PermissionDenied => {
            // By design not reported: the subtree is simply empty.
            sink.access_denied(folder.path());
        }
        Err(source) => sink.report(ScanError::RootMissing {
            path: folder.path().to_path_buf(),
            source,
        }),
    }

    folder.finish_scan(total);
    total
}

/// Rescan one folder in place and apply the resulting size difference to its
/// ancestor chain. Returns the signed delta.
///
/// The folder's own total is rebuilt by the scan itself, so propagation
/// starts at the parent.
pub fn refresh(folder: &Arc<Folder>, sink: &ProgressSink) -> i64 {
    let before = folder.size() as i64;
    let after = scan(folder, sink) as i64;
    let delta = after - before;
    if let Some(parent) = folder.parent() {
        parent.apply_size_delta(delta);
    }
    delta
}

/// Split one directory read into subdirectory paths and file entries,
/// dropping symlinks/reparse points and reporting entries that vanish
/// between enumeration and the type probe.
fn partition_entries(
    folder: &Arc<Folder>,
    entries: fs::ReadDir,
    sink: &ProgressSink,
) -> (Vec<PathBuf>, Vec<DirEntry>) {
    let mut subdirs = Vec::new();
    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                sink.report(ScanError::Vanished {
                    path: folder.path().to_path_buf(),
                    source,
                });
                continue;
            }
        };
        // DirEntry::file_type does not follow links.
        match entry.file_type() {
            Ok(ft) if ft.is_symlink() => {}
            Ok(ft) if ft.is_dir() => subdirs.push(entry.path()),
            Ok(_) => files.push(entry),
            Err(source) => sink.report(ScanError::Vanished {
                path: entry.path(),
                source,
            }),
        }
    }
    (subdirs, files)
}
