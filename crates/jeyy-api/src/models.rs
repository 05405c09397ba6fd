//! Typed inputs for parametrized endpoints.

use chrono::{DateTime, TimeDelta, Utc};
use jeyy_core::query::QueryParams;
use jeyy_core::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

/// Discord activity type for "Listening to".
pub const LISTENING_ACTIVITY_TYPE: u8 = 2;

const SPOTIFY_ACTIVITY_NAME: &str = "Spotify";
const SPOTIFY_IMAGE_PREFIX: &str = "spotify:";
const SPOTIFY_COVER_BASE: &str = "https://i.scdn.co/image/";

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal $(| $alias:literal)*),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Returns the value sent on the wire.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire $(| $alias)* => Ok(Self::$variant),)+
                    other => Err(Error::ValidationError(format!(
                        "Unknown {} `{other}`",
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}

wire_enum! {
    /// Axis used by the `shear` transform.
    ShearAxis {
        /// Horizontal shear
        X => "X",
        /// Vertical shear
        Y => "Y",
    }
}

impl Default for ShearAxis {
    fn default() -> Self {
        Self::X
    }
}

wire_enum! {
    /// Direction of the `tunnel` transform.
    TunnelDirection {
        /// Slide horizontally
        Horizontal => "horizontal" | "h",
        /// Slide vertically
        Vertical => "vertical" | "v",
        /// Zoom in circles
        Circle => "circle" | "c",
        /// Rotate
        Rotate => "rotate" | "r",
    }
}

wire_enum! {
    /// Courtroom side for the `ace` generator.
    AceSide {
        /// Defence attorney
        Attorney => "attorney",
        /// Prosecutor
        Prosecutor => "prosecutor",
    }
}

wire_enum! {
    /// Foreground colours supported by Discord ANSI code blocks.
    AnsiTextColor {
        /// Gray
        Gray => "gray",
        /// Red
        Red => "red",
        /// Green
        Green => "green",
        /// Yellow
        Yellow => "yellow",
        /// Blue
        Blue => "blue",
        /// Pink
        Pink => "pink",
        /// Cyan
        Cyan => "cyan",
        /// White
        White => "white",
    }
}

wire_enum! {
    /// Background colours supported by Discord ANSI code blocks.
    AnsiBackground {
        /// Dark blue
        DarkBlue => "dark blue",
        /// Orange
        Orange => "orange",
        /// Darkest gray
        Gray1 => "gray 1",
        /// Dark gray
        Gray2 => "gray 2",
        /// Light gray
        Gray3 => "gray 3",
        /// Lightest gray
        Gray4 => "gray 4",
        /// Indigo
        Indigo => "indigo",
        /// White
        White => "white",
    }
}

/// Options for the `tiles` transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
pub struct TilesOptions {
    /// Number of edges per tile
    #[validate(range(min = 3, max = 8))]
    pub n_edges: u8,
}

impl Default for TilesOptions {
    fn default() -> Self {
        Self { n_edges: 4 }
    }
}

/// Options for the `wave` transform.
#[derive(Debug, Clone, Copy, PartialEq, Validate)]
pub struct WaveOptions {
    /// Wave frequency
    pub frequency: f64,
    /// Wave amplitude
    #[validate(range(min = 1, max = 5))]
    pub amplitude: u8,
}

impl Default for WaveOptions {
    fn default() -> Self {
        Self {
            frequency: 0.05,
            amplitude: 1,
        }
    }
}

/// Track length in whole seconds.
///
/// Built from a [`Duration`], a chrono [`TimeDelta`], or a raw seconds count;
/// all three yield the same `duration_seconds` value for the same length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TrackDuration(u64);

impl TrackDuration {
    /// Create a duration from a seconds count.
    #[must_use]
    pub const fn from_secs(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Whole seconds.
    #[must_use]
    pub const fn as_secs(&self) -> u64 {
        self.0
    }
}

impl From<Duration> for TrackDuration {
    fn from(duration: Duration) -> Self {
        Self(duration.as_secs())
    }
}

impl From<TimeDelta> for TrackDuration {
    fn from(delta: TimeDelta) -> Self {
        Self(u64::try_from(delta.num_seconds()).unwrap_or(0))
    }
}

impl From<u64> for TrackDuration {
    fn from(seconds: u64) -> Self {
        Self(seconds)
    }
}

impl From<u32> for TrackDuration {
    fn from(seconds: u32) -> Self {
        Self(u64::from(seconds))
    }
}

/// Playback start as fractional seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Timestamp(f64);

impl Timestamp {
    /// Create a timestamp from epoch seconds.
    #[must_use]
    pub const fn from_epoch_secs(seconds: f64) -> Self {
        Self(seconds)
    }

    /// Epoch seconds.
    #[must_use]
    pub const fn as_epoch_secs(&self) -> f64 {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    #[allow(clippy::cast_precision_loss)]
    fn from(time: DateTime<Utc>) -> Self {
        Self(time.timestamp_millis() as f64 / 1000.0)
    }
}

impl From<f64> for Timestamp {
    fn from(seconds: f64) -> Self {
        Self(seconds)
    }
}

/// Input for the `discord/spotify` status card.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct SpotifyCard {
    /// Track title
    pub title: String,
    /// Album cover URL
    #[validate(url)]
    pub cover_url: String,
    /// Track length
    pub duration: TrackDuration,
    /// When playback started
    pub start: Timestamp,
    /// Track artists, in credit order
    pub artists: Vec<String>,
}

impl SpotifyCard {
    /// Create a card input.
    pub fn new<I, S>(
        title: impl Into<String>,
        cover_url: impl Into<String>,
        duration: impl Into<TrackDuration>,
        start: impl Into<Timestamp>,
        artists: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            cover_url: cover_url.into(),
            duration: duration.into(),
            start: start.into(),
            artists: artists.into_iter().map(Into::into).collect(),
        }
    }

    /// Convert the card into URL query pairs.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("title", &self.title)
            .with("cover_url", &self.cover_url)
            .with("duration_seconds", self.duration.as_secs())
            .with("start_timestamp", self.start.as_epoch_secs())
            .with_all("artists", &self.artists)
    }
}

/// Start and end of an activity, in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityTimestamps {
    /// Start time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    /// End time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

/// Images attached to an activity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityAssets {
    /// Large image key (`spotify:<id>` for Spotify)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_image: Option<String>,
    /// Large image hover text (album name for Spotify)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_text: Option<String>,
}

/// A Discord presence activity as delivered by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceActivity {
    /// Activity name (`Spotify` for Spotify listening sessions)
    pub name: String,
    /// Activity type
    #[serde(rename = "type")]
    pub kind: u8,
    /// Track title for Spotify
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Artists joined with `; ` for Spotify
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Playback window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<ActivityTimestamps>,
    /// Activity images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<ActivityAssets>,
    /// Spotify track ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_id: Option<String>,
}

impl PresenceActivity {
    /// Returns true for a Spotify "Listening to" activity.
    #[must_use]
    pub fn is_spotify(&self) -> bool {
        self.name == SPOTIFY_ACTIVITY_NAME && self.kind == LISTENING_ACTIVITY_TYPE
    }
}

impl TryFrom<&PresenceActivity> for SpotifyCard {
    type Error = Error;

    fn try_from(activity: &PresenceActivity) -> Result<Self, Self::Error> {
        if !activity.is_spotify() {
            return Err(Error::TypeMismatch(format!(
                "Spotify activity expected, got `{}` (type {})",
                activity.name, activity.kind
            )));
        }

        let missing = |field: &str| Error::TypeMismatch(format!("Spotify activity has no {field}"));

        let title = activity.details.clone().ok_or_else(|| missing("details"))?;
        let artists = activity
            .state
            .as_deref()
            .ok_or_else(|| missing("state"))?
            .split("; ")
            .map(str::to_string)
            .collect::<Vec<_>>();

        let timestamps = activity.timestamps.ok_or_else(|| missing("timestamps"))?;
        let start_ms = timestamps.start.ok_or_else(|| missing("start timestamp"))?;
        let end_ms = timestamps.end.ok_or_else(|| missing("end timestamp"))?;
        let duration = end_ms
            .checked_sub(start_ms)
            .and_then(TimeDelta::try_milliseconds)
            .map(TrackDuration::from)
            .ok_or_else(|| {
                Error::TypeMismatch("Spotify activity has an invalid playback window".to_string())
            })?;
        #[allow(clippy::cast_precision_loss)]
        let start = Timestamp::from_epoch_secs(start_ms as f64 / 1000.0);

        let cover_id = activity
            .assets
            .as_ref()
            .and_then(|assets| assets.large_image.as_deref())
            .and_then(|image| image.strip_prefix(SPOTIFY_IMAGE_PREFIX))
            .ok_or_else(|| missing("album cover"))?;

        Ok(Self {
            title,
            cover_url: format!("{SPOTIFY_COVER_BASE}{cover_id}"),
            duration,
            start,
            artists,
        })
    }
}

impl TryFrom<PresenceActivity> for SpotifyCard {
    type Error = Error;

    fn try_from(activity: PresenceActivity) -> Result<Self, Self::Error> {
        Self::try_from(&activity)
    }
}

/// Input for the `discord/player` card.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct PlayerCard {
    /// Track title
    pub title: String,
    /// Thumbnail URL
    #[validate(url)]
    pub thumbnail_url: String,
    /// Elapsed playback time
    pub seconds_played: f64,
    /// Track length
    pub total_seconds: f64,
    /// First subtitle line
    pub line_1: Option<String>,
    /// Second subtitle line
    pub line_2: Option<String>,
}

impl PlayerCard {
    /// Create a card input without subtitle lines.
    pub fn new(
        title: impl Into<String>,
        thumbnail_url: impl Into<String>,
        seconds_played: f64,
        total_seconds: f64,
    ) -> Self {
        Self {
            title: title.into(),
            thumbnail_url: thumbnail_url.into(),
            seconds_played,
            total_seconds,
            line_1: None,
            line_2: None,
        }
    }

    /// Set the first subtitle line.
    #[must_use]
    pub fn with_line_1(mut self, line: impl Into<String>) -> Self {
        self.line_1 = Some(line.into());
        self
    }

    /// Set the second subtitle line.
    #[must_use]
    pub fn with_line_2(mut self, line: impl Into<String>) -> Self {
        self.line_2 = Some(line.into());
        self
    }

    /// Convert the card into URL query pairs.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("title", &self.title)
            .with("thumbnail_url", &self.thumbnail_url)
            .with("seconds_played", self.seconds_played)
            .with("total_seconds", self.total_seconds)
            .with_opt("line_1", self.line_1.as_deref())
            .with_opt("line_2", self.line_2.as_deref())
    }
}

/// Input for the `discord/ansi` formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiText {
    /// Text to format
    pub text: String,
    /// Bold text
    pub bold: bool,
    /// Underlined text
    pub underline: bool,
    /// Foreground colour
    pub text_color: Option<AnsiTextColor>,
    /// Background colour
    pub bg_color: Option<AnsiBackground>,
    /// Wrap the result in an `ansi` code block
    pub codeblock: bool,
}

impl AnsiText {
    /// Plain text wrapped in a code block.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            underline: false,
            text_color: None,
            bg_color: None,
            codeblock: true,
        }
    }

    /// Toggle bold.
    #[must_use]
    pub const fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Toggle underline.
    #[must_use]
    pub const fn underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    /// Set the foreground colour.
    #[must_use]
    pub const fn with_text_color(mut self, color: AnsiTextColor) -> Self {
        self.text_color = Some(color);
        self
    }

    /// Set the background colour.
    #[must_use]
    pub const fn with_bg_color(mut self, color: AnsiBackground) -> Self {
        self.bg_color = Some(color);
        self
    }

    /// Toggle the surrounding code block.
    #[must_use]
    pub const fn codeblock(mut self, codeblock: bool) -> Self {
        self.codeblock = codeblock;
        self
    }

    /// Convert the input into URL query pairs.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("text", &self.text)
            .with_bool("bold", self.bold)
            .with_bool("underline", self.underline)
            .with_opt("text_color", self.text_color)
            .with_opt("bg_color", self.bg_color)
            .with_bool("codeblock", self.codeblock)
    }
}
