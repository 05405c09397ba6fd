//! Asynchronous client for the Jeyy API.
//!
//! This crate wraps the Jeyy image, text and discord endpoints behind a
//! single [`JeyyClient`]. Image transforms return the rendered bytes
//! untouched; metadata and text endpoints return decoded JSON.
//!
//! ```no_run
//! # async fn run() -> jeyy_api::Result<()> {
//! let client = jeyy_api::JeyyClient::new("api-key")?;
//! let gif = client.glitch("https://example.com/a.png", 3).await?;
//! client.close()?;
//! # let _ = gif;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod client;
pub mod discord;
pub mod dispatch;
pub mod general;
pub mod image;
pub mod models;
pub mod text;

pub use client::{ClientScope, JeyyClient, JeyyClientBuilder};
pub use dispatch::{Dispatch, HttpDispatcher};
pub use image::ImageEndpoint;
pub use jeyy_core::config::JeyyClientConfig;
pub use jeyy_core::session::Session;
pub use jeyy_core::Error;
pub use models::{
    AceSide, ActivityAssets, ActivityTimestamps, AnsiBackground, AnsiText, AnsiTextColor,
    PlayerCard, PresenceActivity, ShearAxis, SpotifyCard, TilesOptions, Timestamp,
    TrackDuration, TunnelDirection, WaveOptions,
};

/// Convenient result alias that reuses the shared Jeyy error type.
pub type Result<T> = jeyy_core::Result<T>;
