//! `image/*` endpoints.
//!
//! Every transform answers with the rendered image bytes (PNG or GIF),
//! returned exactly as the service sent them. The single-argument transforms
//! are generated from the table at the bottom of this module; the ones that
//! take extra parameters are written out by hand.

use crate::client::JeyyClient;
use crate::models::{AceSide, ShearAxis, TilesOptions, TunnelDirection, WaveOptions};
use crate::Result;
use bytes::Bytes;
use jeyy_core::query::QueryParams;
use jeyy_core::Error;
use std::fmt::{self, Display};
use std::str::FromStr;
use validator::Validate;

/// Default `level` for [`JeyyClient::glitch`].
pub const DEFAULT_GLITCH_LEVEL: i64 = 3;

/// Default `level` for [`JeyyClient::boil`].
pub const DEFAULT_BOIL_LEVEL: i64 = 2;

/// Default `level` for [`JeyyClient::earthquake`].
pub const DEFAULT_EARTHQUAKE_LEVEL: i64 = 3;

/// Default `rainbow` flag for [`JeyyClient::hearts`].
pub const DEFAULT_HEARTS_RAINBOW: bool = true;

/// Default `rainbow` flag for [`JeyyClient::contour`].
pub const DEFAULT_CONTOUR_RAINBOW: bool = false;

/// Default emoji `size` for [`JeyyClient::im_emojify`].
pub const DEFAULT_EMOJIFY_SIZE: u32 = 32;

macro_rules! image_endpoints {
    (
        simple { $($simple_fn:ident => $simple:ident = $simple_name:literal),+ $(,)? }
        custom { $($custom:ident = $custom_name:literal),+ $(,)? }
    ) => {
        /// Every endpoint under `image/`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ImageEndpoint {
            $(
                #[doc = concat!("`image/", $simple_name, "`")]
                $simple,
            )+
            $(
                #[doc = concat!("`image/", $custom_name, "`")]
                $custom,
            )+
        }

        impl ImageEndpoint {
            const ALL: &'static [Self] = &[$(Self::$simple,)+ $(Self::$custom,)+];

            /// Endpoint name as used by the service.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$simple => $simple_name,)+
                    $(Self::$custom => $custom_name,)+
                }
            }

            /// Path relative to the API root.
            #[must_use]
            pub const fn path(&self) -> &'static str {
                match self {
                    $(Self::$simple => concat!("image/", $simple_name),)+
                    $(Self::$custom => concat!("image/", $custom_name),)+
                }
            }

            /// Returns true if the endpoint only takes `image_url`.
            #[must_use]
            pub const fn is_simple(&self) -> bool {
                matches!(self, $(Self::$simple)|+)
            }

            /// All image endpoints.
            #[must_use]
            pub const fn all() -> &'static [Self] {
                Self::ALL
            }
        }

        impl FromStr for ImageEndpoint {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s.strip_prefix("image/").unwrap_or(s) {
                    $($simple_name => Ok(Self::$simple),)+
                    $($custom_name => Ok(Self::$custom),)+
                    other => Err(Error::InvalidEndpoint(format!(
                        "Unknown image endpoint `{other}`"
                    ))),
                }
            }
        }

        impl JeyyClient {
            $(
                #[doc = concat!("Apply the `", $simple_name, "` transform to an image.")]
                pub async fn $simple_fn(&self, image_url: impl Display) -> Result<Bytes> {
                    self.image(
                        ImageEndpoint::$simple,
                        QueryParams::new().with("image_url", image_url),
                    )
                    .await
                }
            )+
        }
    };
}

impl fmt::Display for ImageEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JeyyClient {
    /// Call any image endpoint with caller-assembled parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the service rejects the parameters.
    pub async fn image(&self, endpoint: ImageEndpoint, params: QueryParams) -> Result<Bytes> {
        self.fetch_bytes(endpoint.path(), params).await
    }

    /// Glitch effect; higher `level` is stronger.
    pub async fn glitch(&self, image_url: impl Display, level: i64) -> Result<Bytes> {
        self.image(ImageEndpoint::Glitch, level_params(image_url, level))
            .await
    }

    /// Boiling animation.
    pub async fn boil(&self, image_url: impl Display, level: i64) -> Result<Bytes> {
        self.image(ImageEndpoint::Boil, level_params(image_url, level))
            .await
    }

    /// Shaking animation.
    pub async fn earthquake(&self, image_url: impl Display, level: i64) -> Result<Bytes> {
        self.image(ImageEndpoint::Earthquake, level_params(image_url, level))
            .await
    }

    /// Floating hearts, optionally rainbow coloured.
    pub async fn hearts(&self, image_url: impl Display, rainbow: bool) -> Result<Bytes> {
        self.image(ImageEndpoint::Hearts, rainbow_params(image_url, rainbow))
            .await
    }

    /// Shear along an axis.
    pub async fn shear(&self, image_url: impl Display, axis: ShearAxis) -> Result<Bytes> {
        let params = QueryParams::new()
            .with("image_url", image_url)
            .with("axis", axis);
        self.image(ImageEndpoint::Shear, params).await
    }

    /// Animated contour lines.
    pub async fn contour(&self, image_url: impl Display, rainbow: bool) -> Result<Bytes> {
        self.image(ImageEndpoint::Contour, rainbow_params(image_url, rainbow))
            .await
    }

    /// Rebuild an image out of emoji, rendered as an image.
    ///
    /// For the text rendition see [`JeyyClient::emojify`].
    pub async fn im_emojify(&self, image_url: impl Display, size: u32) -> Result<Bytes> {
        let params = QueryParams::new()
            .with("image_url", image_url)
            .with("size", size);
        self.image(ImageEndpoint::Emojify, params).await
    }

    /// Endless tunnel in the given direction.
    pub async fn tunnel(
        &self,
        image_url: impl Display,
        direction: TunnelDirection,
    ) -> Result<Bytes> {
        let params = QueryParams::new()
            .with("image_url", image_url)
            .with("direction", direction);
        self.image(ImageEndpoint::Tunnel, params).await
    }

    /// Split the image into polygon tiles.
    ///
    /// # Errors
    ///
    /// Returns a validation error without sending anything if `n_edges` is
    /// outside 3..=8.
    pub async fn tiles(&self, image_url: impl Display, options: &TilesOptions) -> Result<Bytes> {
        options.validate()?;
        let params = QueryParams::new()
            .with("image_url", image_url)
            .with("n_edges", options.n_edges);
        self.image(ImageEndpoint::Tiles, params).await
    }

    /// Courtroom objection scene.
    pub async fn ace(&self, name: &str, side: AceSide, text: &str) -> Result<Bytes> {
        let params = QueryParams::new()
            .with("name", name)
            .with("side", side)
            .with("text", text);
        self.image(ImageEndpoint::Ace, params).await
    }

    /// Heart locket holding one or two images.
    pub async fn heart_locket(
        &self,
        image_url: impl Display,
        image_url_2: Option<&str>,
    ) -> Result<Bytes> {
        let params = QueryParams::new()
            .with("image_url", image_url)
            .with_opt("image_url_2", image_url_2);
        self.image(ImageEndpoint::HeartLocket, params).await
    }

    /// Wave distortion.
    ///
    /// # Errors
    ///
    /// Returns a validation error without sending anything if `amplitude`
    /// is outside 1..=5.
    pub async fn wave(&self, image_url: impl Display, options: &WaveOptions) -> Result<Bytes> {
        options.validate()?;
        let params = QueryParams::new()
            .with("image_url", image_url)
            .with("frequency", options.frequency)
            .with("amplitude", options.amplitude);
        self.image(ImageEndpoint::Wave, params).await
    }

    /// Fake video comment.
    pub async fn youtube(
        &self,
        avatar_url: impl Display,
        author: &str,
        title: &str,
    ) -> Result<Bytes> {
        let params = QueryParams::new()
            .with("avatar_url", avatar_url)
            .with("author", author)
            .with("title", title);
        self.image(ImageEndpoint::Youtube, params).await
    }

    /// Ransom-note style text.
    pub async fn scrapbook(&self, text: &str) -> Result<Bytes> {
        self.image(ImageEndpoint::Scrapbook, QueryParams::new().with("text", text))
            .await
    }
}

fn level_params(image_url: impl Display, level: i64) -> QueryParams {
    QueryParams::new()
        .with("image_url", image_url)
        .with("level", level)
}

fn rainbow_params(image_url: impl Display, rainbow: bool) -> QueryParams {
    QueryParams::new()
        .with("image_url", image_url)
        .with_bool("rainbow", rainbow)
}

image_endpoints! {
    simple {
        patpat => Patpat = "patpat",
        burn => Burn = "burn",
        shock => Shock = "shock",
        r#abstract => Abstract = "abstract",
        infinity => Infinity = "infinity",
        bomb => Bomb = "bomb",
        bonks => Bonks = "bonks",
        sob => Sob = "sob",
        explicit => Explicit = "explicit",
        blur => Blur = "blur",
        lamp => Lamp = "lamp",
        rain => Rain = "rain",
        canny => Canny = "canny",
        cartoon => Cartoon = "cartoon",
        layers => Layers = "layers",
        radiate => Radiate = "radiate",
        shoot => Shoot = "shoot",
        tv => Tv = "tv",
        magnify => Magnify = "magnify",
        print => Print = "print",
        matrix => Matrix = "matrix",
        sensitive => Sensitive = "sensitive",
        dilute => Dilute = "dilute",
        dither => Dither = "dither",
        pattern => Pattern = "pattern",
        logoff => Logoff = "logoff",
        dilate => Dilate = "dilate",
        fire => Fire = "fire",
        fall => Fall = "fall",
        fan => Fan = "fan",
        flag => Flag = "flag",
        melt => Melt = "melt",
        cracks => Cracks = "cracks",
        endless => Endless = "endless",
        bayer => Bayer = "bayer",
        slice => Slice = "slice",
        spikes => Spikes = "spikes",
        blocks => Blocks = "blocks",
        phone => Phone = "phone",
        laundry => Laundry = "laundry",
        pizza => Pizza = "pizza",
        ripped => Ripped = "ripped",
        cinema => Cinema = "cinema",
        stretch => Stretch = "stretch",
        dots => Dots = "dots",
        zonk => Zonk = "zonk",
        knit => Knit = "knit",
        plank => Plank = "plank",
        shred => Shred = "shred",
        liquefy => Liquefy = "liquefy",
        poly => Poly = "poly",
        spin => Spin = "spin",
        plates => Plates = "plates",
        lsd => Lsd = "lsd",
        lines => Lines = "lines",
        ipcam => Ipcam = "ipcam",
        reflection => Reflection = "reflection",
        stereo => Stereo = "stereo",
        kanye => Kanye = "kanye",
        letters => Letters = "letters",
        wiggle => Wiggle = "wiggle",
        gameboy_camera => GameboyCamera = "gameboy_camera",
        ripple => Ripple = "ripple",
        globe => Globe = "globe",
        cow => Cow = "cow",
        pyramid => Pyramid = "pyramid",
        wall => Wall = "wall",
        cube => Cube = "cube",
        paint => Paint = "paint",
        painting => Painting = "painting",
        shine => Shine = "shine",
        neon => Neon = "neon",
        flush => Flush = "flush",
        gallery => Gallery = "gallery",
        paparazzi => Paparazzi = "paparazzi",
        balls => Balls = "balls",
        equation => Equation = "equation",
        half_invert => HalfInvert = "half_invert",
        roll => Roll = "roll",
        clock => Clock = "clock",
        optics => Optics = "optics",
        warp => Warp = "warp",
        ads => Ads = "ads",
        billboard => Billboard = "billboard",
        bubble => Bubble = "bubble",
        cloth => Cloth = "cloth",
    }
    custom {
        Glitch = "glitch",
        Boil = "boil",
        Earthquake = "earthquake",
        Hearts = "hearts",
        Shear = "shear",
        Contour = "contour",
        Emojify = "emojify",
        Tunnel = "tunnel",
        Tiles = "tiles",
        Ace = "ace",
        HeartLocket = "heart_locket",
        Wave = "wave",
        Youtube = "youtube",
        Scrapbook = "scrapbook",
    }
}
