//! Challenge signing for relayer claims.
//!
//! The backend issues a nonce and timestamp per attempt; the wallet signs a
//! fixed-format text message over them and the relayer verifies the signer.

pub mod signer;
pub mod types;

pub use signer::{authorization_message, sign_authorization};
pub use types::{AuthorizationChallenge, SignedAuthorization};
