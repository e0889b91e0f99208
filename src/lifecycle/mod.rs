//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Load keys → Build clients and strategies
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Finish the current wallet → Skip the rest → Summary
//!
//! Signals (signals.rs):
//!     Ctrl-C → Trigger shutdown; second Ctrl-C exits immediately
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::spawn_ctrl_c_listener;
pub use startup::{load_private_keys, load_wallets, Services, StartupError};
