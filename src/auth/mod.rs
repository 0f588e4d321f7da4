//! Authentication module: session persistence and token expiry.
//!
//! This module provides:
//! - `SessionStore`: the persisted access/refresh token pair and identity
//! - `token`: local JWT expiry evaluation (fail-safe, no signature check)
//! - `CredentialStore`: OS-level password storage via keyring

pub mod credentials;
pub mod store;
pub mod token;

pub use credentials::CredentialStore;
pub use store::{FileStorage, MemoryStorage, SessionStore, StorageBackend};
