//! Periodic connectivity monitoring.

use crate::engine::SyncEngine;
use crate::error::{SyncError, SyncResult};
use crate::transport::RemoteTransport;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tabsync_storage::LocalStore;
use tracing::{debug, info};

/// Something that can check whether the server is reachable.
pub trait Probe: Send + Sync {
    /// Returns true if the server answered.
    fn probe(&self) -> bool;
}

impl<L: LocalStore, T: RemoteTransport> Probe for SyncEngine<L, T> {
    fn probe(&self) -> bool {
        SyncEngine::probe(self)
    }
}

/// Background thread probing connectivity at a fixed interval.
///
/// The callback receives the first result and every change after it. The
/// thread is stopped and joined by [`ConnectivityMonitor::stop`] or on drop.
pub struct ConnectivityMonitor {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ConnectivityMonitor {
    /// Starts probing `prober` every `interval`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if `interval` is zero, or an error if
    /// the thread cannot be spawned.
    pub fn spawn<P, F>(prober: Arc<P>, interval: Duration, mut on_change: F) -> SyncResult<Self>
    where
        P: Probe + ?Sized + 'static,
        F: FnMut(bool) + Send + 'static,
    {
        if interval.is_zero() {
            return Err(SyncError::Config(
                "probe interval must be greater than zero".into(),
            ));
        }
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("tabsync-connectivity".into())
            .spawn(move || {
                let mut last = None;
                loop {
                    let online = prober.probe();
                    if last != Some(online) {
                        info!(online, "connectivity changed");
                        on_change(online);
                        last = Some(online);
                    }

                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("connectivity monitor stopped");
            })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stops the monitor and waits for the thread to exit.
    pub fn stop(&mut self) {
        // Dropping the sender wakes the thread as well
        self.stop_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Returns true while the background thread is running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
