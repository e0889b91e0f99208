//! Off-chain API clients.
//!
//! # Data Flow
//! ```text
//! wallet address
//!     → indexer.rs (owned asset ids, paginated)
//!     → backend.rs checkEligible (eligible subset)
//!     → backend.rs getNonce (authorization challenge)
//!     → backend.rs callRelayer (signed submission)
//! ```
//!
//! Every call goes through one `ApiTransport`, which attaches the fixed
//! `Origin`/`Referer` headers and maps HTTP 429 to `ApiError::RateLimited`.

pub mod backend;
pub mod indexer;
pub mod transport;
pub mod types;

pub use backend::{BackendClient, ClaimBackend, ClaimSubmission, RELAYER_SUCCESS};
pub use indexer::{AssetIndexer, IndexerClient};
pub use transport::ApiTransport;
pub use types::{ApiError, ApiResult, AssetId};
