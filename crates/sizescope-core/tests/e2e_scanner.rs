/// End-to-end scanner integration tests.
///
/// These tests exercise the real `scanner::scan` / `scanner::refresh` code
/// paths against a real temporary filesystem, verifying enumeration, size
/// aggregation, delta propagation, and the graceful-degradation contract.
///
/// **Why a `tests/` integration test (not unit test)?**
///
/// The scanner walks actual `DirEntry` objects and (for the background
/// variants) spawns real OS threads. Testing it in isolation would require
/// mocking the whole filesystem interface; an integration test with
/// `tempfile` exercises every code path with zero mocking.
use sizescope_core::model::{Folder, ScanStatus, SortMode};
use sizescope_core::scanner::progress::{ProgressSink, ScanProgress};
use sizescope_core::scanner::{self, start_scan, ScanHandle};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Create a reproducible directory tree, three levels deep:
///
/// ```text
/// root/
///   alpha/
///     a.txt        (100 bytes)
///     b.rs         (200 bytes)
///     nested/
///       deep.bin   (400 bytes)
///   beta/
///     c.png        (300 bytes)
///   d.zip          (500 bytes)
/// ```
///
/// Total file bytes: 1 500.
fn build_test_tree(root: &Path) {
    let nested = root.join("alpha").join("nested");
    let beta = root.join("beta");
    fs::create_dir_all(&nested).unwrap();
    fs::create_dir_all(&beta).unwrap();

    write_bytes(&root.join("alpha").join("a.txt"), 100);
    write_bytes(&root.join("alpha").join("b.rs"), 200);
    write_bytes(&nested.join("deep.bin"), 400);
    write_bytes(&beta.join("c.png"), 300);
    write_bytes(&root.join("d.zip"), 500);
}

fn write_bytes(path: &Path, n: usize) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}

/// Scan a fresh root synchronously and return it.
fn scan_fresh(path: &Path) -> Arc<Folder> {
    let root = Folder::root(path.to_path_buf());
    scanner::scan(&root, &ProgressSink::disabled());
    root
}

/// Block until the background scan sends `Complete`, returning its totals.
///
/// Waits up to 30 seconds — more than enough for any tmpdir scan but short
/// enough that a genuinely stuck test does not block the suite indefinitely.
fn drain_to_completion(handle: &ScanHandle) -> (u64, u64) {
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    loop {
        assert!(
            std::time::Instant::now() < deadline,
            "scanner did not complete within 30 seconds"
        );
        match handle.progress_rx.try_recv() {
            Ok(ScanProgress::Complete {
                total_size,
                error_count,
                ..
            }) => return (total_size, error_count),
            Ok(_) => continue,
            Err(crossbeam_channel::TryRecvError::Empty) => {
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(crossbeam_channel::TryRecvError::Disconnected) => {
                panic!("scanner channel disconnected before Complete was sent");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// Every node's cumulative size must equal the sum of all descendant file
/// bytes after a completed scan.
#[test]
fn aggregation_is_exact_over_three_levels() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let root = scan_fresh(tmp.path());
    assert_eq!(root.status(), ScanStatus::Done);
    assert_eq!(root.size(), 1_500);

    let alpha = root.child("alpha").expect("alpha should be mirrored");
    assert_eq!(alpha.size(), 700);

    let nested = alpha.child("nested").expect("nested should be mirrored");
    assert_eq!(nested.size(), 400);
    assert_eq!(nested.status(), ScanStatus::Done);

    let beta = root.child("beta").expect("beta should be mirrored");
    assert_eq!(beta.size(), 300);
}

/// Scanning the same node twice with no filesystem change must yield an
/// identical total and an identical listing.
#[test]
fn repeated_scan_is_idempotent() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let root = Folder::root(tmp.path().to_path_buf());
    let sink = ProgressSink::disabled();

    let first_total = scanner::scan(&root, &sink);
    let first_listing = root.listing(SortMode::ByName);

    let second_total = scanner::scan(&root, &sink);
    let second_listing = root.listing(SortMode::ByName);

    assert_eq!(first_total, second_total);
    assert_eq!(first_listing, second_listing);
    assert_eq!(root.size(), first_total);
}

/// Refreshing one deep directory and propagating its delta must leave every
/// ancestor's total equal to what a full fresh scan produces.
#[test]
fn refresh_delta_matches_full_rescan() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let root = scan_fresh(tmp.path());
    let alpha = root.child("alpha").unwrap();
    let nested = alpha.child("nested").unwrap();

    // Grow the deepest directory, then refresh just that node.
    write_bytes(&tmp.path().join("alpha/nested/extra.dat"), 250);
    let delta = scanner::refresh(&nested, &ProgressSink::disabled());
    assert_eq!(delta, 250);

    let expected = scan_fresh(tmp.path());
    assert_eq!(root.size(), expected.size());
    assert_eq!(alpha.size(), expected.child("alpha").unwrap().size());
    assert_eq!(nested.size(), 650);

    // Now shrink: remove a file and refresh again (negative delta).
    fs::remove_file(tmp.path().join("alpha/nested/deep.bin")).unwrap();
    let delta = scanner::refresh(&nested, &ProgressSink::disabled());
    assert_eq!(delta, -400);

    let expected = scan_fresh(tmp.path());
    assert_eq!(root.size(), expected.size());
    assert_eq!(alpha.size(), expected.child("alpha").unwrap().size());
}

/// A scan root that does not exist must degrade to a zero-size `Done` node
/// and report the error, without panicking or affecting anything else.
#[test]
fn missing_scan_root_degrades_to_zero() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let gone = tmp.path().join("never-existed");

    let handle = start_scan(gone);
    let (total, error_count) = drain_to_completion(&handle);

    assert_eq!(total, 0);
    assert_eq!(error_count, 1);
    assert_eq!(handle.root.size(), 0);
    assert_eq!(handle.root.status(), ScanStatus::Done);
    assert!(handle.root.listing(SortMode::ByType).is_empty());
}

/// Symbolic links must be skipped, not followed, so linked content neither
/// inflates the total nor creates cycles.
#[cfg(unix)]
#[test]
fn symlinks_are_skipped() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let target = tmp.path().join("target");
    fs::create_dir(&target).unwrap();
    write_bytes(&target.join("big.bin"), 10_000);

    // Directory link, file link, and a cycle back to the root itself.
    std::os::unix::fs::symlink(&target, tmp.path().join("dir-link")).unwrap();
    std::os::unix::fs::symlink(target.join("big.bin"), tmp.path().join("file-link")).unwrap();
    std::os::unix::fs::symlink(tmp.path(), target.join("loop")).unwrap();

    let root = scan_fresh(tmp.path());
    // Only target/big.bin counts; both links and the cycle contribute zero.
    assert_eq!(root.size(), 10_000);
    assert!(root.child("dir-link").is_none());

    let rows = root.listing(SortMode::ByType);
    assert!(rows.iter().all(|r| r.name != "file-link"));
}

/// A listing polled while the background scan is appending to the same tree
/// must never tear, and must converge to the final row count.
#[test]
fn listing_is_safe_during_background_scan() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    for i in 0..40 {
        let dir = tmp.path().join(format!("dir{i:02}"));
        fs::create_dir(&dir).unwrap();
        for j in 0..25 {
            write_bytes(&dir.join(format!("f{j:02}.dat")), 64);
        }
    }

    let handle = start_scan(tmp.path().to_path_buf());
    // Poll continuously while the walk runs; every snapshot must be
    // internally consistent regardless of scan progress.
    loop {
        let rows = handle.root.listing(SortMode::BySize);
        assert!(rows.len() <= 40);
        match handle.progress_rx.try_recv() {
            Ok(ScanProgress::Complete { total_size, .. }) => {
                assert_eq!(total_size, 40 * 25 * 64);
                break;
            }
            Ok(_) => {}
            Err(crossbeam_channel::TryRecvError::Empty) => {
                std::thread::sleep(Duration::from_millis(1));
            }
            Err(crossbeam_channel::TryRecvError::Disconnected) => {
                panic!("scanner channel disconnected before Complete");
            }
        }
    }

    assert_eq!(handle.root.listing(SortMode::ByType).len(), 40);
    assert_eq!(handle.root.status(), ScanStatus::Done);
}

/// The fire-and-forget refresh thread must complete, propagate upward, and
/// flip the node's status back to `Done`.
#[test]
fn background_refresh_propagates_upward() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let root = scan_fresh(tmp.path());
    let beta = root.child("beta").unwrap();
    write_bytes(&tmp.path().join("beta/grew.log"), 1_000);

    let handle = scanner::start_refresh(Arc::clone(&beta));
    let (total, error_count) = drain_to_completion(&handle);

    assert_eq!(total, 1_300);
    assert_eq!(error_count, 0);
    assert_eq!(beta.status(), ScanStatus::Done);
    assert_eq!(beta.size(), 1_300);
    assert_eq!(root.size(), 2_500);
}
