//! HTTP session lifecycle.
//!
//! A [`Session`] wraps a pooled `reqwest::Client` together with an
//! open/closed state. Clones share the same pool and the same state, so
//! closing any clone closes them all, and a session can be closed only once.
//!
//! A client either owns its session (it built it) or borrows one supplied by
//! the caller. [`SessionHandle`] records which, and only an owned session may
//! be closed through the client.

use crate::client::ClientConfig;
use crate::{Error, Result};
use reqwest::{Client, ClientBuilder};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Shared HTTP connection pool with at-most-once close.
#[derive(Debug, Clone)]
pub struct Session {
    http: Arc<RwLock<Option<Client>>>,
}

impl Session {
    /// Build a new connection pool from transport settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host);

        if !config.tls_verify {
            warn!("TLS verification disabled for Jeyy session");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        debug!("created Jeyy HTTP session");
        Ok(Self::from_client(http))
    }

    /// Wrap an already-configured HTTP client.
    #[must_use]
    pub fn from_client(http: Client) -> Self {
        Self {
            http: Arc::new(RwLock::new(Some(http))),
        }
    }

    /// Return a handle to the pooled client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`] once the session has been closed.
    pub fn http(&self) -> Result<Client> {
        let guard = self
            .http
            .read()
            .map_err(|_| Error::InternalError("session lock poisoned".to_string()))?;
        guard.clone().ok_or(Error::SessionClosed)
    }

    /// Returns true once [`Session::close`] has succeeded.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.http.read().map(|guard| guard.is_none()).unwrap_or(true)
    }

    /// Release the connection pool.
    ///
    /// Requests already in flight keep their connection until they finish;
    /// new requests fail with [`Error::SessionClosed`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyClosed`] if the session was closed before.
    pub fn close(&self) -> Result<()> {
        let mut guard = self
            .http
            .write()
            .map_err(|_| Error::InternalError("session lock poisoned".to_string()))?;
        match guard.take() {
            Some(_) => {
                debug!("closed Jeyy HTTP session");
                Ok(())
            }
            None => Err(Error::AlreadyClosed),
        }
    }

    /// Returns true if both handles refer to the same pool.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.http, &other.http)
    }
}

/// Session reference held by a client, keyed on ownership.
#[derive(Debug, Clone)]
pub enum SessionHandle {
    /// Created by the client; the client is responsible for closing it
    Owned(Session),
    /// Supplied by the caller; the caller closes it
    Borrowed(Session),
}

impl SessionHandle {
    /// Create and own a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn owned(config: &ClientConfig) -> Result<Self> {
        Session::new(config).map(Self::Owned)
    }

    /// Borrow a caller-supplied session.
    #[must_use]
    pub const fn borrowed(session: Session) -> Self {
        Self::Borrowed(session)
    }

    /// The underlying session, regardless of ownership.
    #[must_use]
    pub const fn session(&self) -> &Session {
        match self {
            Self::Owned(session) | Self::Borrowed(session) => session,
        }
    }

    /// Returns true if the client created this session.
    #[must_use]
    pub const fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// Close the session if it is owned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOwned`] for a borrowed session and
    /// [`Error::AlreadyClosed`] when an owned session is closed twice.
    pub fn close(&self) -> Result<()> {
        match self {
            Self::Owned(session) => session.close(),
            Self::Borrowed(_) => Err(Error::NotOwned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_session_closes_once() {
        let handle = SessionHandle::owned(&ClientConfig::new()).unwrap();
        assert!(handle.is_owned());
        assert!(!handle.session().is_closed());

        handle.close().unwrap();
        assert!(handle.session().is_closed());
        assert_eq!(handle.close(), Err(Error::AlreadyClosed));
    }

    #[test]
    fn borrowed_session_never_closes_through_handle() {
        let session = Session::from_client(Client::new());
        let handle = SessionHandle::borrowed(session.clone());
        assert!(!handle.is_owned());

        assert_eq!(handle.close(), Err(Error::NotOwned));
        assert_eq!(handle.close(), Err(Error::NotOwned));
        assert!(!session.is_closed());

        session.close().unwrap();
        assert_eq!(handle.close(), Err(Error::NotOwned));
        assert!(handle.session().is_closed());
    }

    #[test]
    fn closed_session_refuses_new_requests() {
        let session = Session::from_client(Client::new());
        assert!(session.http().is_ok());
        session.close().unwrap();
        assert!(matches!(session.http(), Err(Error::SessionClosed)));
    }

    #[test]
    fn clones_share_state() {
        let session = Session::from_client(Client::new());
        let clone = session.clone();
        assert!(session.same_as(&clone));

        clone.close().unwrap();
        assert!(session.is_closed());
        assert_eq!(session.close(), Err(Error::AlreadyClosed));
    }

    #[test]
    fn insecure_session_builds() {
        let config = ClientConfig::new().with_tls_verify(false);
        let session = Session::new(&config).unwrap();
        assert!(!session.is_closed());
    }
}
