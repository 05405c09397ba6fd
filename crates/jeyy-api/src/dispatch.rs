//! Request dispatch over an HTTP session.
//!
//! [`HttpDispatcher`] is the single routine every endpoint goes through: it
//! joins the endpoint suffix onto the API root, attaches the bearer token,
//! sends the request, and classifies the response. Any status other than
//! exactly 200 becomes [`Error::Remote`] with the raw body text; a 200 is
//! buffered in full and returned as bytes or decoded JSON according to the
//! request's declared [`Outcome`]. Nothing is retried.

use crate::Result;
use async_trait::async_trait;
use jeyy_core::request::{ApiRequest, Outcome, Payload, UPLOAD_CONTENT_TYPE, UPLOAD_FIELD};
use jeyy_core::session::SessionHandle;
use jeyy_core::Error;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use url::Url;

/// Executes [`ApiRequest`]s and owns the session lifecycle behind them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Dispatch: Send + Sync {
    /// Send one request and decode its successful response.
    async fn dispatch(&self, request: ApiRequest) -> Result<Payload>;

    /// Release the session if this dispatcher owns it.
    fn close(&self) -> Result<()>;

    /// Returns true once the session has been closed.
    fn is_closed(&self) -> bool;

    /// Returns true if the session was created by this dispatcher.
    fn owns_session(&self) -> bool;
}

/// [`Dispatch`] implementation backed by a reqwest session.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    session: SessionHandle,
    root: Url,
    api_key: Option<SecretString>,
}

impl HttpDispatcher {
    /// Create a dispatcher for the given API root.
    ///
    /// `root` must end with `/`; endpoint suffixes are joined onto it.
    #[must_use]
    pub fn new(session: SessionHandle, root: Url, api_key: Option<SecretString>) -> Self {
        Self {
            session,
            root,
            api_key,
        }
    }

    /// The URL endpoint suffixes are joined onto.
    #[must_use]
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// The session requests are sent over.
    #[must_use]
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        self.root
            .join(path)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid endpoint `{path}`: {err}")))
    }
}

#[async_trait]
impl Dispatch for HttpDispatcher {
    async fn dispatch(&self, request: ApiRequest) -> Result<Payload> {
        let http = self.session.session().http()?;
        let url = self.build_url(&request.path)?;

        let mut builder = http
            .request(request.verb.method(), url)
            .query(request.params.pairs());

        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        if let Some(data) = request.upload {
            let part = Part::bytes(data.to_vec())
                .file_name(UPLOAD_FIELD)
                .mime_str(UPLOAD_CONTENT_TYPE)?;
            builder = builder.multipart(Form::new().part(UPLOAD_FIELD, part));
        }

        info!(
            path = %request.path,
            verb = %request.verb,
            params = request.params.len(),
            "Sending Jeyy request"
        );

        let response = builder.send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            let body = response.text().await?;
            debug!(path = %request.path, %status, "Jeyy request rejected");
            return Err(Error::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        debug!(path = %request.path, size = bytes.len(), "Jeyy response received");

        match request.outcome {
            Outcome::Binary => Ok(Payload::Binary(bytes)),
            Outcome::Json => serde_json::from_slice(&bytes)
                .map(Payload::Json)
                .map_err(|err| {
                    Error::ParseError(format!(
                        "Failed to parse response for `{}`: {err}",
                        request.path
                    ))
                }),
        }
    }

    fn close(&self) -> Result<()> {
        self.session.close()
    }

    fn is_closed(&self) -> bool {
        self.session.session().is_closed()
    }

    fn owns_session(&self) -> bool {
        self.session.is_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use jeyy_core::client::ClientConfig;
    use jeyy_core::query::QueryParams;
    use jeyy_core::session::Session;
    use serde_json::json;
    use wiremock::matchers::{header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn dispatcher(server: &MockServer, api_key: Option<&str>) -> HttpDispatcher {
        let root = Url::parse(&format!("{}/v2/", server.uri())).unwrap();
        HttpDispatcher::new(
            SessionHandle::owned(&ClientConfig::new()).unwrap(),
            root,
            api_key.map(|k| SecretString::from(k.to_string())),
        )
    }

    #[tokio::test]
    async fn binary_body_is_returned_untouched() {
        let server = MockServer::start().await;
        let body: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

        Mock::given(method("GET"))
            .and(path("/v2/image/glitch"))
            .and(query_param("image_url", "https://example.com/a.png"))
            .and(query_param("level", "3"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .expect(1)
            .mount(&server)
            .await;

        let request = ApiRequest::binary(
            "image/glitch",
            QueryParams::new()
                .with("image_url", "https://example.com/a.png")
                .with("level", 3),
        );
        let payload = dispatcher(&server, Some("secret"))
            .dispatch(request)
            .await
            .unwrap();
        assert_eq!(payload, Payload::Binary(Bytes::copy_from_slice(body)));
    }

    #[tokio::test]
    async fn json_body_is_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/general/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ping": 0.01})))
            .mount(&server)
            .await;

        let payload = dispatcher(&server, None)
            .dispatch(ApiRequest::json("general/ping", QueryParams::new()))
            .await
            .unwrap();
        assert_eq!(payload, Payload::Json(json!({"ping": 0.01})));
    }

    #[tokio::test]
    async fn non_200_is_remote_error_with_body() {
        let server = MockServer::start().await;
        for (status, body) in [(201, "created?"), (302, "moved"), (429, "slow down"), (500, "boom")] {
            server.reset().await;
            Mock::given(method("GET"))
                .and(path("/v2/image/burn"))
                .respond_with(ResponseTemplate::new(status).set_body_string(body))
                .mount(&server)
                .await;

            let err = dispatcher(&server, None)
                .dispatch(ApiRequest::binary("image/burn", QueryParams::new()))
                .await
                .unwrap_err();
            assert_eq!(
                err,
                Error::Remote {
                    status,
                    body: body.to_string()
                }
            );
        }
    }

    #[tokio::test]
    async fn malformed_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/text/emojify"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = dispatcher(&server, None)
            .dispatch(ApiRequest::json("text/emojify", QueryParams::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[tokio::test]
    async fn upload_sends_multipart_image_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/general/image_upload"))
            .and(header_exists("content-type"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "https://cdn/x.gif"})))
            .mount(&server)
            .await;

        let payload = dispatcher(&server, Some("k"))
            .dispatch(ApiRequest::upload(
                "general/image_upload",
                Bytes::from_static(b"GIF89a-data"),
            ))
            .await
            .unwrap();
        assert_eq!(payload, Payload::Json(json!({"url": "https://cdn/x.gif"})));

        let received: Vec<Request> = server.received_requests().await.unwrap();
        let request = &received[0];
        let content_type = request.headers.get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&request.body);
        assert!(body.contains("name=\"image\""));
        assert!(body.contains("Content-Type: image/gif"));
        assert!(body.contains("GIF89a-data"));
    }

    #[tokio::test]
    async fn closed_session_fails_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dispatcher = dispatcher(&server, None);
        assert!(dispatcher.owns_session());
        dispatcher.close().unwrap();
        assert!(dispatcher.is_closed());

        let err = dispatcher
            .dispatch(ApiRequest::json("general/ping", QueryParams::new()))
            .await
            .unwrap_err();
        assert_eq!(err, Error::SessionClosed);
        assert_eq!(dispatcher.close(), Err(Error::AlreadyClosed));
    }

    #[tokio::test]
    async fn borrowed_session_is_not_closed_by_dispatcher() {
        let session = Session::from_client(reqwest::Client::new());
        let dispatcher = HttpDispatcher::new(
            SessionHandle::borrowed(session.clone()),
            Url::parse("http://localhost/").unwrap(),
            None,
        );
        assert!(!dispatcher.owns_session());
        assert_eq!(dispatcher.close(), Err(Error::NotOwned));
        assert!(!session.is_closed());
    }
}
