//! Session identity and the injected session context.
//!
//! The session is the token/role/username triple issued at login. It is
//! written and cleared as a unit through a [`SessionStore`] port and read
//! through a [`SessionContext`] that callers pass explicitly to guards and
//! gateways.

use std::fmt;
use std::sync::Arc;

use zeroize::Zeroizing;

use super::ports::{SessionStore, SessionStoreError};
use super::role::normalize_role;
use super::Error;

/// Validation errors raised by [`SessionIdentity::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionIdentityError {
    /// The token was blank.
    #[error("session token must not be empty")]
    EmptyToken,
    /// The username was blank.
    #[error("session username must not be empty")]
    EmptyUsername,
}

/// The credential triple written atomically at login.
///
/// ## Invariants
/// - `token` and `username` are non-empty once trimmed.
/// - `role` is kept exactly as the backend sent it; readers normalise it.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    token: Zeroizing<String>,
    role: String,
    username: String,
}

impl SessionIdentity {
    /// Validate and build a session identity.
    ///
    /// # Examples
    /// ```
    /// use loanflow_client::domain::SessionIdentity;
    ///
    /// let identity = SessionIdentity::try_new("jwt", "ROLE_ADMIN", "ada").unwrap();
    /// assert_eq!(identity.role(), "ROLE_ADMIN");
    /// ```
    pub fn try_new(
        token: impl Into<String>,
        role: impl Into<String>,
        username: impl Into<String>,
    ) -> Result<Self, SessionIdentityError> {
        let token = Zeroizing::new(token.into());
        if token.trim().is_empty() {
            return Err(SessionIdentityError::EmptyToken);
        }
        let username = username.into();
        if username.trim().is_empty() {
            return Err(SessionIdentityError::EmptyUsername);
        }
        Ok(Self {
            token,
            role: role.into(),
            username,
        })
    }

    /// Opaque bearer credential.
    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    /// Role string as issued.
    pub fn role(&self) -> &str {
        self.role.as_str()
    }

    /// Display name of the signed-in user.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }
}

impl fmt::Debug for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionIdentity")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .field("username", &self.username)
            .finish()
    }
}

/// Whatever the session store currently holds. Each entry may be missing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StoredSession {
    /// Bearer credential, if stored.
    pub token: Option<String>,
    /// Raw role string, if stored.
    pub role: Option<String>,
    /// Username, if stored.
    pub username: Option<String>,
}

impl StoredSession {
    /// An empty (logged out) session.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Token with blank values treated as absent.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.trim().is_empty())
    }

    /// Raw role string, as stored.
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Whether a usable token is present.
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    /// Normalised role string; empty when no role is stored.
    pub fn normalized_role(&self) -> String {
        self.role.as_deref().map(normalize_role).unwrap_or_default()
    }
}

impl From<&SessionIdentity> for StoredSession {
    fn from(identity: &SessionIdentity) -> Self {
        Self {
            token: Some(identity.token().to_owned()),
            role: Some(identity.role().to_owned()),
            username: Some(identity.username().to_owned()),
        }
    }
}

impl fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredSession")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .field("username", &self.username)
            .finish()
    }
}

/// Cloneable handle over the session store, injected into guards and
/// gateways instead of being read from global state.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    /// Wrap a session store.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Persist the triple after a successful login.
    pub fn establish(&self, identity: &SessionIdentity) -> Result<(), Error> {
        self.store.save(identity).map_err(map_store_error)?;
        tracing::debug!(username = identity.username(), "session established");
        Ok(())
    }

    /// Clear the triple on logout.
    pub fn end(&self) -> Result<(), Error> {
        self.store.clear().map_err(map_store_error)?;
        tracing::debug!("session cleared");
        Ok(())
    }

    /// Read the current session.
    pub fn snapshot(&self) -> Result<StoredSession, Error> {
        self.store.load().map_err(map_store_error)
    }

    /// Token to attach to authenticated requests, if any.
    pub fn bearer_token(&self) -> Result<Option<String>, Error> {
        Ok(self.snapshot()?.token().map(str::to_owned))
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}

fn map_store_error(error: SessionStoreError) -> Error {
    Error::internal(format!("session store failure: {error}"))
}
