/// sizescope core — directory tree mirror with incremental size aggregation.
///
/// This crate contains all business logic with zero UI dependencies. A
/// presentation layer (GUI, CLI, TUI) drives it through a small in-process
/// contract: start a scan per mounted root, poll a folder's listing on a
/// timer, navigate with `child`/`parent`, and refresh any folder in place
/// with its size delta propagated to every ancestor.
///
/// # Modules
///
/// - [`model`] — the folder tree, file records, listing rows, size display.
/// - [`scanner`] — depth-first scanning, targeted refresh, background
///   orchestration with progress reporting.
pub mod model;
pub mod scanner;
