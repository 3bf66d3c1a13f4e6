// Signal handling module
//
// Supported signals:
// - SIGTERM: graceful shutdown
// - SIGINT:  graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Start the signal handler task (Unix).
///
/// SIGTERM and SIGINT both notify `shutdown`, which the accept loop
/// selects on; the process then exits 0 after draining.
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<Notify>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => logger::log_signal_received("SIGTERM"),
            _ = sigint.recv() => logger::log_signal_received("SIGINT"),
        }

        // notify_one stores a permit, so the signal is not lost if the
        // accept loop is mid-iteration rather than parked on notified()
        shutdown.notify_one();
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_signal_received("Ctrl+C");
            shutdown.notify_one();
        }
    });
}
