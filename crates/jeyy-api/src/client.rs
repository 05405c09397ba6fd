//! Asynchronous Jeyy API client.

use crate::dispatch::{Dispatch, HttpDispatcher};
use crate::Result;
use bytes::Bytes;
use jeyy_core::client::ClientConfig;
use jeyy_core::config::JeyyClientConfig;
use jeyy_core::query::QueryParams;
use jeyy_core::request::{ApiRequest, Payload};
use jeyy_core::session::{Session, SessionHandle};
use jeyy_core::Error;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::ops::Deref;
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

/// Builder for [`JeyyClient`].
#[derive(Debug, Clone)]
pub struct JeyyClientBuilder {
    config: JeyyClientConfig,
    http_config: Option<ClientConfig>,
    session: Option<Session>,
}

impl JeyyClientBuilder {
    /// Create a new builder from a [`JeyyClientConfig`].
    #[must_use]
    pub fn new(config: JeyyClientConfig) -> Self {
        Self {
            config,
            http_config: None,
            session: None,
        }
    }

    /// Override the transport settings of the owned session.
    ///
    /// Ignored when a session is supplied with [`Self::with_session`].
    #[must_use]
    pub fn with_http_config(mut self, http_config: ClientConfig) -> Self {
        self.http_config = Some(http_config);
        self
    }

    /// Send requests over a caller-managed session.
    ///
    /// The client borrows the session: [`JeyyClient::close`] will refuse to
    /// close it, and the caller closes it instead.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Finalise the builder and create the [`JeyyClient`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn build(self) -> Result<JeyyClient> {
        self.config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        let root = self.config.endpoint_root()?;

        let session = match self.session {
            Some(session) => SessionHandle::borrowed(session),
            None => {
                let http_config = self
                    .http_config
                    .unwrap_or_else(|| self.config.http_config());
                SessionHandle::owned(&http_config)?
            }
        };

        debug!(root = %root, owned = session.is_owned(), "building Jeyy client");

        let dispatcher = HttpDispatcher::new(session, root, self.config.api_key);
        Ok(JeyyClient::with_dispatcher(Arc::new(dispatcher)))
    }
}

/// Asynchronous Jeyy API client.
///
/// Clones share the same dispatcher and session. Endpoint methods live in the
/// `general`, `image`, `text` and `discord` modules.
#[derive(Clone)]
pub struct JeyyClient {
    dispatcher: Arc<dyn Dispatch>,
}

impl fmt::Debug for JeyyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JeyyClient")
            .field("owns_session", &self.dispatcher.owns_session())
            .field("closed", &self.dispatcher.is_closed())
            .finish()
    }
}

impl JeyyClient {
    /// Create a client for the public API with its own session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        JeyyClientBuilder::new(JeyyClientConfig::new(api_key)).build()
    }

    /// Create a client for the public API that borrows `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_session(api_key: impl Into<String>, session: Session) -> Result<Self> {
        JeyyClientBuilder::new(JeyyClientConfig::new(api_key))
            .with_session(session)
            .build()
    }

    /// Construct a client directly from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &JeyyClientConfig) -> Result<Self> {
        JeyyClientBuilder::new(config.clone()).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: JeyyClientConfig) -> JeyyClientBuilder {
        JeyyClientBuilder::new(config)
    }

    /// Create a client over a custom [`Dispatch`] implementation.
    #[must_use]
    pub fn with_dispatcher(dispatcher: Arc<dyn Dispatch>) -> Self {
        Self { dispatcher }
    }

    /// Returns true if the client created its own session.
    #[must_use]
    pub fn owns_session(&self) -> bool {
        self.dispatcher.owns_session()
    }

    /// Returns true once the session has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.dispatcher.is_closed()
    }

    /// Close the owned session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyClosed`] on a second call, and
    /// [`Error::NotOwned`] if the session was supplied by the caller.
    pub fn close(&self) -> Result<()> {
        self.dispatcher.close()
    }

    /// Enter a scope that closes the client when dropped.
    ///
    /// Errors raised by the closing attempt are discarded, so cleanup never
    /// masks the result of the work done inside the scope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`] if the session is already closed.
    pub fn enter(self) -> Result<ClientScope> {
        if self.is_closed() {
            return Err(Error::SessionClosed);
        }
        Ok(ClientScope { client: self })
    }

    /// Run `work` with this client, then close it on every exit path.
    ///
    /// The result of `work` is returned unchanged; a failed close is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`] if the session is already closed, or
    /// whatever `work` returns.
    pub async fn scoped<F, Fut, T>(self, work: F) -> Result<T>
    where
        F: FnOnce(JeyyClient) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let scope = self.enter()?;
        let result = work(scope.client().clone()).await;
        drop(scope);
        result
    }

    /// Dispatch a raw request descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] for any non-200 response, or a transport
    /// error.
    pub async fn execute(&self, request: ApiRequest) -> Result<Payload> {
        self.dispatcher.dispatch(request).await
    }

    pub(crate) async fn fetch_bytes(&self, path: &str, params: QueryParams) -> Result<Bytes> {
        self.execute(ApiRequest::binary(path, params))
            .await?
            .into_bytes()
    }

    pub(crate) async fn fetch_json(&self, path: &str, params: QueryParams) -> Result<Value> {
        self.execute(ApiRequest::json(path, params))
            .await?
            .into_json()
    }
}

/// Scope guard returned by [`JeyyClient::enter`].
///
/// Dereferences to the client and closes it on drop.
#[derive(Debug)]
pub struct ClientScope {
    client: JeyyClient,
}

impl ClientScope {
    /// The scoped client.
    #[must_use]
    pub fn client(&self) -> &JeyyClient {
        &self.client
    }
}

impl Deref for ClientScope {
    type Target = JeyyClient;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl Drop for ClientScope {
    fn drop(&mut self) {
        if let Err(err) = self.client.close() {
            debug!(error = %err, "ignoring error while closing scoped Jeyy client");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::MockDispatch;
    use jeyy_core::request::Outcome;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> JeyyClientConfig {
        JeyyClientConfig::with_base_url(server.uri())
            .unwrap()
            .with_api_key("test-key")
    }

    #[test]
    fn new_client_owns_its_session() {
        let client = JeyyClient::new("key").unwrap();
        assert!(client.owns_session());
        assert!(!client.is_closed());

        client.close().unwrap();
        assert!(client.is_closed());
        assert_eq!(client.close(), Err(Error::AlreadyClosed));
    }

    #[test]
    fn borrowed_session_must_be_closed_by_caller() {
        let session = Session::from_client(reqwest::Client::new());
        let client = JeyyClient::with_session("key", session.clone()).unwrap();
        assert!(!client.owns_session());

        assert_eq!(client.close(), Err(Error::NotOwned));
        assert_eq!(client.close(), Err(Error::NotOwned));
        assert!(!session.is_closed());

        session.close().unwrap();
        assert!(client.is_closed());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = JeyyClientConfig::new("key");
        config.request_timeout_secs = 0;
        let err = JeyyClient::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn scope_closes_owned_client_on_drop() {
        let client = JeyyClient::new("key").unwrap();
        let observer = client.clone();
        {
            let scope = client.enter().unwrap();
            assert!(!scope.is_closed());
        }
        assert!(observer.is_closed());
        assert!(matches!(observer.enter(), Err(Error::SessionClosed)));
    }

    #[test]
    fn scope_swallows_close_errors() {
        let mut dispatcher = MockDispatch::new();
        dispatcher.expect_is_closed().return_const(false);
        dispatcher
            .expect_close()
            .times(1)
            .returning(|| Err(Error::NotOwned));

        let client = JeyyClient::with_dispatcher(Arc::new(dispatcher));
        let scope = client.enter().unwrap();
        drop(scope);
    }

    #[tokio::test]
    async fn scoped_returns_work_result_and_closes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/general/ping"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"pong": true})))
            .mount(&server)
            .await;

        let client = JeyyClient::from_config(&test_config(&server)).unwrap();
        let observer = client.clone();

        let value = client
            .scoped(|client| async move { client.ping().await })
            .await
            .unwrap();
        assert_eq!(value["pong"], true);
        assert!(observer.is_closed());
    }

    #[tokio::test]
    async fn scoped_preserves_primary_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/general/ping"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let session = Session::from_client(reqwest::Client::new());
        let client = JeyyClientBuilder::new(test_config(&server))
            .with_session(session.clone())
            .build()
            .unwrap();

        // Closing a borrowed session fails; the remote error must win.
        let err = client
            .scoped(|client| async move { client.ping().await })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::Remote {
                status: 503,
                body: "maintenance".to_string()
            }
        );
        assert!(!session.is_closed());
    }

    #[tokio::test]
    async fn fetch_helpers_check_declared_outcome() {
        let mut dispatcher = MockDispatch::new();
        dispatcher
            .expect_dispatch()
            .withf(|request| request.outcome == Outcome::Binary)
            .returning(|_| Ok(Payload::Json(serde_json::json!({}))));

        let client = JeyyClient::with_dispatcher(Arc::new(dispatcher));
        let err = client
            .fetch_bytes("image/burn", QueryParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InternalError(_)));
    }
}
