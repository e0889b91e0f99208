//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Rate-limited API step:
//!     → retries.rs (sleep the carried pause, re-run that step only)
//!
//! Between wallets:
//!     → backoff.rs (uniform random delay from the configured range)
//! ```
//!
//! RPC timeouts and endpoint failover live with the blockchain client.

pub mod backoff;
pub mod retries;

pub use backoff::random_delay;
pub use retries::retry_rate_limited;
