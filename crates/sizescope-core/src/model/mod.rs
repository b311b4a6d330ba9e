/// Data model for the mirrored directory tree.
///
/// Re-exports the folder tree and its supporting types.
pub mod folder;
pub mod listing;
pub mod record;
pub mod size;

pub use folder::{Folder, ScanStatus};
pub use listing::{Row, SortMode};
pub use record::FileRecord;
