use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use avconf_store::Session;

/// Shared handler state.
pub type SharedState = Arc<AppState>;

/// The single user session behind the HTTP surface.
///
/// Only `set_root` takes the write lock; every other handler reads.
#[derive(Debug)]
pub struct AppState {
    session: RwLock<Session>,
}

impl AppState {
    pub fn new(session: Session) -> SharedState {
        Arc::new(Self {
            session: RwLock::new(session),
        })
    }

    pub fn session(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().expect("lock poisoned")
    }

    pub fn session_mut(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().expect("lock poisoned")
    }
}
