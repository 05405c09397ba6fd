//! `discord/*` endpoints: status cards and message formatting helpers.

use crate::client::JeyyClient;
use crate::models::{AnsiText, PlayerCard, PresenceActivity, SpotifyCard};
use crate::Result;
use bytes::Bytes;
use jeyy_core::query::QueryParams;
use serde_json::Value;
use std::fmt::Display;
use validator::Validate;

impl JeyyClient {
    /// Render a Spotify "now playing" card.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the cover URL is malformed.
    pub async fn spotify(&self, card: &SpotifyCard) -> Result<Bytes> {
        card.validate()?;
        self.fetch_bytes("discord/spotify", card.to_params()).await
    }

    /// Render a Spotify card from a Discord presence activity.
    ///
    /// # Errors
    ///
    /// Returns a type mismatch error if the activity is not a Spotify
    /// listening session.
    pub async fn spotify_from_activity(&self, activity: &PresenceActivity) -> Result<Bytes> {
        let card = SpotifyCard::try_from(activity)?;
        self.spotify(&card).await
    }

    /// Render a generic media player card.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the thumbnail URL is malformed.
    pub async fn player(&self, card: &PlayerCard) -> Result<Bytes> {
        card.validate()?;
        self.fetch_bytes("discord/player", card.to_params()).await
    }

    /// Spin a wheel over the given choices.
    pub async fn wheel<I, T>(&self, args: I) -> Result<Value>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.fetch_json("discord/wheel", QueryParams::new().with_all("args", args))
            .await
    }

    /// Format text as a Discord ANSI code block.
    pub async fn ansi(&self, text: &AnsiText) -> Result<Value> {
        self.fetch_json("discord/ansi", text.to_params()).await
    }
}
