//! sizescope — disk-usage browser driver.
//!
//! Thin binary entry point standing in for a full presentation layer. All
//! logic lives in `sizescope-core`; this driver starts one background scan
//! per requested root, polls each root's listing on a one-second timer, and
//! reprints it whenever the rows change — the same poll-and-compare contract
//! a graphical frontend would use.

use anyhow::{bail, Result};
use sizescope_core::model::{Row, ScanStatus, SortMode};
use sizescope_core::scanner::progress::ScanProgress;
use sizescope_core::scanner::{start_scan, ScanHandle};
use std::path::PathBuf;
use std::time::Duration;

/// Poll interval for the listing refresh loop.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

struct Args {
    roots: Vec<PathBuf>,
    sort: SortMode,
}

fn parse_args() -> Result<Args> {
    let mut roots = Vec::new();
    let mut sort = SortMode::default();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sort" => {
                let mode = args.next().unwrap_or_default();
                sort = match mode.as_str() {
                    "type" => SortMode::ByType,
                    "name" => SortMode::ByName,
                    "size" => SortMode::BySize,
                    other => bail!("unknown sort mode '{other}' (expected type|name|size)"),
                };
            }
            "--help" | "-h" => {
                println!("usage: sizescope [--sort type|name|size] [PATH ...]");
                std::process::exit(0);
            }
            _ => roots.push(PathBuf::from(arg)),
        }
    }

    if roots.is_empty() {
        roots.push(PathBuf::from("."));
    }
    Ok(Args { roots, sort })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = parse_args()?;
    tracing::info!("sizescope starting, {} root(s)", args.roots.len());

    let handles: Vec<ScanHandle> = args.roots.into_iter().map(start_scan).collect();
    let mut last_seen: Vec<Vec<Row>> = vec![Vec::new(); handles.len()];
    let mut completed = vec![false; handles.len()];

    while !completed.iter().all(|done| *done) {
        for (i, handle) in handles.iter().enumerate() {
            drain_progress(handle, &mut completed[i]);

            // Reprint only when the listing actually changed.
            let rows = handle.root.listing(args.sort);
            if rows != last_seen[i] {
                print_listing(handle, &rows);
                last_seen[i] = rows;
            }
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    // Final state for each root.
    for handle in &handles {
        let rows = handle.root.listing(args.sort);
        print_listing(handle, &rows);
    }
    Ok(())
}

/// Pull everything currently queued on the progress channel.
fn drain_progress(handle: &ScanHandle, completed: &mut bool) {
    while let Ok(msg) = handle.progress_rx.try_recv() {
        match msg {
            ScanProgress::Update {
                files_found,
                total_size,
                ..
            } => {
                tracing::debug!(
                    "{}: {} files, {} bytes so far",
                    handle.root.path().display(),
                    files_found,
                    total_size
                );
            }
            ScanProgress::Error { error } => tracing::warn!("{error}"),
            ScanProgress::Complete {
                duration,
                total_size,
                error_count,
            } => {
                tracing::info!(
                    "{}: complete, {} bytes in {:?} ({} errors)",
                    handle.root.path().display(),
                    total_size,
                    duration,
                    error_count
                );
                *completed = true;
            }
        }
    }
}

fn print_listing(handle: &ScanHandle, rows: &[Row]) {
    let status = match handle.root.status() {
        ScanStatus::Loading => " (loading...)",
        ScanStatus::Done => "",
    };
    println!("\n{}{status}", handle.root.path().display());
    println!("Type\tSize\tName");
    for row in rows {
        println!("{row}");
    }
}
