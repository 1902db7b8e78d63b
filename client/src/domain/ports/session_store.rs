//! Port for persisting the session triple between invocations.

use crate::domain::{SessionIdentity, StoredSession};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum SessionStoreError {
        /// Stored session could not be read or decoded.
        Read { message: String } => "session store read failed: {message}",
        /// Session could not be written or removed.
        Write { message: String } => "session store write failed: {message}",
    }
}

/// Port for reading, writing and clearing the token/role/username triple.
///
/// `save` and `clear` act on all three entries together; adapters must not
/// leave a partially written session behind.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Read whatever is currently stored. A missing session is not an error.
    fn load(&self) -> Result<StoredSession, SessionStoreError>;

    /// Replace the stored session with `identity`.
    fn save(&self, identity: &SessionIdentity) -> Result<(), SessionStoreError>;

    /// Remove every entry of the stored session.
    fn clear(&self) -> Result<(), SessionStoreError>;
}
