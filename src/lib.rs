//! Airdrop claimer library.
//!
//! Drives a token-claim workflow for many wallets: owned NFTs are looked up,
//! eligibility is checked, and the claim is made either through the
//! backend relayer with a signed authorization or by calling the claim
//! contract directly and waiting for the receipt.

// Core subsystems
pub mod api;
pub mod auth;
pub mod blockchain;
pub mod claim;
pub mod config;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use claim::{ClaimOutcome, ClaimRunner, ClaimStrategy, RunSummary};
pub use config::ClaimerConfig;
pub use lifecycle::Shutdown;
