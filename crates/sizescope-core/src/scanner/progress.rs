/// Scan progress reporting — lightweight messages sent from scan threads to
/// the presentation layer via a crossbeam channel.
///
/// The tree data itself lives in the shared [`Folder`](crate::model::Folder)
/// nodes; these messages carry only counters and error reports.
use super::error::ScanError;
use crossbeam_channel::Sender;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// How many files between periodic `Update` messages.
const UPDATE_INTERVAL: u64 = 1_000;

/// Progress updates sent from a scan thread.
#[derive(Debug)]
pub enum ScanProgress {
    /// Periodic update with running totals.
    Update {
        files_found: u64,
        dirs_found: u64,
        total_size: u64,
    },
    /// A non-fatal error; the scan continued past it.
    Error { error: ScanError },
    /// The scan or refresh finished. The tree is already `Done` by the time
    /// this arrives; the total repeats what the root node reports.
    Complete {
        duration: Duration,
        total_size: u64,
        error_count: u64,
    },
}

/// Counters plus an optional progress channel, threaded through a scan.
///
/// Library callers driving [`scan`](super::scan) directly can pass
/// [`ProgressSink::disabled`] and rely on the `tracing` output alone.
#[derive(Debug, Default)]
pub struct ProgressSink {
    tx: Option<Sender<ScanProgress>>,
    files_found: AtomicU64,
    dirs_found: AtomicU64,
    bytes_found: AtomicU64,
    error_count: AtomicU64,
}

impl ProgressSink {
    pub fn new(tx: Sender<ScanProgress>) -> Self {
        Self {
            tx: Some(tx),
            ..Self::default()
        }
    }

    /// A sink that only counts and logs; nothing is sent anywhere.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn files_found(&self) -> u64 {
        self.files_found.load(Ordering::Relaxed)
    }

    pub fn error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Record one scanned file; emits an `Update` every [`UPDATE_INTERVAL`]
    /// files so the channel stays quiet on small trees.
    pub(super) fn file_scanned(&self, size: u64) {
        let files = self.files_found.fetch_add(1, Ordering::Relaxed) + 1;
        let bytes = self.bytes_found.fetch_add(size, Ordering::Relaxed) + size;
        if files % UPDATE_INTERVAL == 0 {
            self.send(ScanProgress::Update {
                files_found: files,
                dirs_found: self.dirs_found.load(Ordering::Relaxed),
                total_size: bytes,
            });
        }
    }

    pub(super) fn dir_scanned(&self) {
        self.dirs_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Report a non-fatal error to the log and the channel.
    pub(super) fn report(&self, error: ScanError) {
        warn!(path = %error.path().display(), "{error}");
        self.error_count.fetch_add(1, Ordering::Relaxed);
        self.send(ScanProgress::Error { error });
    }

    /// Access denied is deliberately not surfaced to the user: the subtree
    /// is treated as empty and only the debug log records it.
    pub(super) fn access_denied(&self, path: &Path) {
        debug!(path = %path.display(), "access denied, subtree treated as empty");
    }

    pub(super) fn complete(&self, duration: Duration, total_size: u64) {
        self.send(ScanProgress::Complete {
            duration,
            total_size,
            error_count: self.error_count(),
        });
    }

    fn send(&self, msg: ScanProgress) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(msg);
        }
    }
}
