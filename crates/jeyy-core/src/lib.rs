//! # jeyy-core
//!
//! Core types and utilities for working with the Jeyy API.
//!
//! This crate provides the error taxonomy, configuration, session lifecycle,
//! and request descriptors shared by the Jeyy client.
//!
//! ## Modules
//!
//! - [`error`] - Error types, including remote failures and lifecycle misuse
//! - [`config`] - Client configuration (base URL, API version, credentials)
//! - [`client`] - HTTP transport defaults
//! - [`query`] - Query parameter builder and wire coercion
//! - [`request`] - Request descriptors, outcomes, and payloads
//! - [`session`] - Owned and borrowed HTTP sessions

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod request;
pub mod session;

// Re-export commonly used types
pub use error::{Error, Result};
