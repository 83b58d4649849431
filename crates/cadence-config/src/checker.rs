//! Background drift polling.
//!
//! [`PresetChecker`] owns a named thread that calls
//! [`PresetManager::check_preset_changed`] at a fixed interval until it is
//! stopped or dropped. The manager is shared behind a `parking_lot::Mutex`;
//! each tick holds the lock only for the one check.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Sender, bounded, select, tick};
use parking_lot::Mutex;

use crate::manager::PresetManager;

/// Polling interval used when none is configured.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Handle to the drift polling thread.
#[derive(Debug)]
pub struct PresetChecker {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl PresetChecker {
    /// Starts polling `manager` every `interval`.
    pub fn spawn(manager: Arc<Mutex<PresetManager>>, interval: Duration) -> io::Result<Self> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let handle = thread::Builder::new()
            .name("preset-checker".into())
            .spawn(move || {
                let ticker = tick(interval);
                tracing::debug!(?interval, "preset checker started");
                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => {
                            manager.lock().check_preset_changed();
                        }
                    }
                }
                tracing::debug!("preset checker stopped");
            })?;

        Ok(Self {
            stop_tx,
            handle: Some(handle),
        })
    }

    /// Stops the thread and waits for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let _ = self.stop_tx.try_send(());
        if handle.join().is_err() {
            tracing::warn!("preset checker thread panicked");
        }
    }
}

impl Drop for PresetChecker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
