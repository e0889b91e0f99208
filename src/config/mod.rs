//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClaimerConfig (validated, immutable)
//!     → sections handed to the api, blockchain and claim subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a run uses one snapshot
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ClaimerConfig;
pub use schema::{
    ApiConfig, BlockchainConfig, ClaimMode, FeeConfig, FilesConfig, IndexerConfig,
    ObservabilityConfig, RetryConfig, ScheduleConfig,
};
