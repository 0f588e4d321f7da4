//! Client library for the case-note management REST API.
//!
//! The API authenticates caseworkers with a JWT access/refresh token pair.
//! This crate provides:
//!
//! - `auth`: persistent session storage and token expiry evaluation
//! - `api`: the authenticated request gateway with silent refresh-on-401
//! - `models`: client, case-note, and user data structures
//! - `config`: application configuration (API base URL, last username)

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;
