//! Request descriptors and response outcomes.
//!
//! An [`ApiRequest`] describes one call completely: which endpoint, which
//! verb, which parameters, and which [`Outcome`] a successful response is
//! decoded into. Dispatchers turn it into a [`Payload`].

use crate::query::QueryParams;
use crate::{Error, Result};
use bytes::Bytes;
use serde_json::Value;
use std::fmt;

/// Multipart field name used for uploads.
pub const UPLOAD_FIELD: &str = "image";

/// Content type attached to uploaded images.
pub const UPLOAD_CONTENT_TYPE: &str = "image/gif";

/// HTTP verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Fetch with query parameters
    Get,
    /// Upload a multipart body
    Post,
}

impl Verb {
    /// Returns the verb as the reqwest method.
    #[must_use]
    pub fn method(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// Shape of a successful response body, fixed per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Opaque bytes, usually an image
    Binary,
    /// Decoded JSON document
    Json,
}

/// Decoded body of a successful (200) response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Raw response bytes
    Binary(Bytes),
    /// Decoded JSON value
    Json(Value),
}

impl Payload {
    /// Returns the outcome this payload was decoded as.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        match self {
            Self::Binary(_) => Outcome::Binary,
            Self::Json(_) => Outcome::Json,
        }
    }

    /// Unwrap a binary payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InternalError`] if the payload holds JSON.
    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            Self::Binary(bytes) => Ok(bytes),
            Self::Json(_) => Err(Error::InternalError(
                "expected a binary payload, got JSON".to_string(),
            )),
        }
    }

    /// Unwrap a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InternalError`] if the payload holds bytes.
    pub fn into_json(self) -> Result<Value> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Binary(_) => Err(Error::InternalError(
                "expected a JSON payload, got bytes".to_string(),
            )),
        }
    }
}

/// Description of a single API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Endpoint suffix relative to the API root, e.g. `image/glitch`
    pub path: String,
    /// HTTP verb
    pub verb: Verb,
    /// Query parameters
    pub params: QueryParams,
    /// Image uploaded as the multipart `image` field
    pub upload: Option<Bytes>,
    /// Expected shape of a successful response
    pub outcome: Outcome,
}

impl ApiRequest {
    /// A GET request whose successful body is returned as bytes.
    #[must_use]
    pub fn binary(path: impl Into<String>, params: QueryParams) -> Self {
        Self::get(path, params, Outcome::Binary)
    }

    /// A GET request whose successful body is decoded as JSON.
    #[must_use]
    pub fn json(path: impl Into<String>, params: QueryParams) -> Self {
        Self::get(path, params, Outcome::Json)
    }

    /// A multipart POST carrying `data` as the `image` field.
    #[must_use]
    pub fn upload(path: impl Into<String>, data: Bytes) -> Self {
        Self {
            path: normalize_path(path.into()),
            verb: Verb::Post,
            params: QueryParams::new(),
            upload: Some(data),
            outcome: Outcome::Json,
        }
    }

    fn get(path: impl Into<String>, params: QueryParams, outcome: Outcome) -> Self {
        Self {
            path: normalize_path(path.into()),
            verb: Verb::Get,
            params,
            upload: None,
            outcome,
        }
    }
}

// Suffixes are joined onto a root ending in `/`; a leading slash would
// replace the version segment.
fn normalize_path(path: String) -> String {
    match path.strip_prefix('/') {
        Some(stripped) => stripped.trim_start_matches('/').to_string(),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_request_is_get() {
        let request = ApiRequest::binary("image/glitch", QueryParams::new().with("level", 3));
        assert_eq!(request.verb, Verb::Get);
        assert_eq!(request.outcome, Outcome::Binary);
        assert!(request.upload.is_none());
        assert_eq!(request.params.get("level"), Some("3"));
    }

    #[test]
    fn upload_request_is_json_post() {
        let request = ApiRequest::upload("general/image_upload", Bytes::from_static(b"GIF89a"));
        assert_eq!(request.verb, Verb::Post);
        assert_eq!(request.outcome, Outcome::Json);
        assert_eq!(request.upload, Some(Bytes::from_static(b"GIF89a")));
    }

    #[test]
    fn leading_slashes_are_stripped() {
        let request = ApiRequest::json("//general/ping", QueryParams::new());
        assert_eq!(request.path, "general/ping");
    }

    #[test]
    fn payload_unwrapping_checks_outcome() {
        let payload = Payload::Binary(Bytes::from_static(b"\x89PNG"));
        assert_eq!(payload.outcome(), Outcome::Binary);
        assert!(payload.clone().into_json().is_err());
        assert_eq!(payload.into_bytes().unwrap(), Bytes::from_static(b"\x89PNG"));

        let payload = Payload::Json(serde_json::json!({"status": "ok"}));
        assert!(payload.clone().into_bytes().is_err());
        assert_eq!(payload.into_json().unwrap()["status"], "ok");
    }

    #[test]
    fn verb_display_and_method() {
        assert_eq!(Verb::Get.to_string(), "GET");
        assert_eq!(Verb::Post.method(), reqwest::Method::POST);
    }
}
