//! In-memory session store.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{SessionIdentity, StoredSession};

/// Session store holding the triple in process memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<StoredSession>,
}

impl MemorySessionStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with `session`, which may be partial.
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoredSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<StoredSession, SessionStoreError> {
        Ok(self.lock().clone())
    }

    fn save(&self, identity: &SessionIdentity) -> Result<(), SessionStoreError> {
        *self.lock() = StoredSession::from(identity);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        *self.lock() = StoredSession::empty();
        Ok(())
    }
}
