//! Watch command implementation.

use super::{open_engine, print_outcome, CliResult};
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tabsync_engine::ConnectivityMonitor;

/// Prints connectivity changes, optionally reconciling on reconnect.
pub fn run(
    settings_path: &Path,
    interval_secs: Option<u64>,
    refresh: bool,
    duration_secs: Option<u64>,
) -> CliResult<()> {
    let (settings, engine) = open_engine(settings_path)?;
    let engine = Arc::new(engine);
    let interval = interval_secs
        .map(Duration::from_secs)
        .unwrap_or(engine.config().probe_interval);
    let deadline = duration_secs.map(|secs| Instant::now() + Duration::from_secs(secs));

    let (tx, rx) = mpsc::channel();
    let mut monitor = ConnectivityMonitor::spawn(Arc::clone(&engine), interval, move |online| {
        let _ = tx.send(online);
    })?;
    println!(
        "Watching {} every {}s",
        settings.server_url,
        interval.as_secs()
    );

    loop {
        let wait = match deadline {
            Some(deadline) => match deadline.checked_duration_since(Instant::now()) {
                Some(left) => left,
                None => break,
            },
            None => Duration::from_secs(3600),
        };

        match rx.recv_timeout(wait) {
            Ok(true) => {
                println!("Connected to server");
                if refresh {
                    print_outcome(&engine.refresh());
                }
            }
            Ok(false) => println!("Failed to connect to server"),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    monitor.stop();
    Ok(())
}
