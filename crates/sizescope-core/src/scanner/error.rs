/// Non-fatal scan errors, classified for the observability sink.
///
/// No error aborts a scan: every variant degrades to a zero-size
/// contribution and the walk continues with the remaining siblings. There
/// are no retries — the next user-triggered refresh is the retry mechanism.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// An entry present at enumeration time was gone by the time its
    /// metadata was read. Reported so the discrepancy is visible.
    #[error("entry vanished during scan: {}", path.display())]
    Vanished {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The path handed to a scan does not exist at all. The node ends with
    /// zero size and `Done` status; the rest of the tree is unaffected.
    #[error("scan root not found: {}", path.display())]
    RootMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Path of the entry the error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Vanished { path, .. } | Self::RootMissing { path, .. } => path,
        }
    }
}
