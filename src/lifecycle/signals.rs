//! OS signal handling.
//!
//! The first Ctrl-C asks the run to stop after the current wallet; a second
//! one exits immediately.

use crate::lifecycle::shutdown::Shutdown;

/// Spawn the Ctrl-C listener for `shutdown`.
pub fn spawn_ctrl_c_listener(shutdown: Shutdown) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::warn!("Unable to listen for Ctrl-C");
            return;
        }
        tracing::warn!("Interrupt received, stopping after the current wallet");
        shutdown.trigger();

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::error!("Second interrupt, exiting now");
            std::process::exit(130);
        }
    });
}
