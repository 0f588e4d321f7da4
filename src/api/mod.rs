//! REST API gateway for the case-note management service.
//!
//! This module provides the `ApiClient` for authenticating caseworkers and
//! reading/writing case notes. All authenticated calls carry a JWT bearer
//! token and transparently recover from an expired access token with a
//! single refresh-and-retry.

pub mod client;
pub mod error;
pub mod transport;

pub use client::ApiClient;
pub use error::ApiError;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
