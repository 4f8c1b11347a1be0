//! Session and Routing
//!
//! The session id handed out by the auth service is wrapped in an explicit
//! [`Session`] value. Views receive it at initialization; only a
//! [`SessionStore`] persists or clears it. The [`guard`] decides which view
//! a navigation actually lands on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use thiserror::Error;

/// Opaque token identifying an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session(String);

impl Session {
    /// Returns `None` for a blank id
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session persistence errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to access session storage: {0}")]
    Storage(String),

    #[error("Corrupt session file: {0}")]
    Corrupt(String),
}

/// Client-local persistence of the single session key
pub trait SessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError>;

    fn save(&self, session: &Session) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;
}

/// Process-lifetime store, used by tests and ephemeral front-ends
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        self.slot
            .lock()
            .map(|slot| slot.clone())
            .map_err(|e| SessionError::Storage(e.to_string()))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        *slot = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}

#[cfg(feature = "native")]
pub use file_store::FileSessionStore;

#[cfg(feature = "native")]
mod file_store {
    use super::*;
    use std::path::{Path, PathBuf};

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct SessionFile {
        user_id: String,
    }

    /// Session kept in a small TOML file, surviving between CLI runs
    #[derive(Debug, Clone)]
    pub struct FileSessionStore {
        path: PathBuf,
    }

    impl FileSessionStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl SessionStore for FileSessionStore {
        fn load(&self) -> Result<Option<Session>, SessionError> {
            let content = match std::fs::read_to_string(&self.path) {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(SessionError::Storage(e.to_string())),
            };

            let file: SessionFile =
                toml::from_str(&content).map_err(|e| SessionError::Corrupt(e.to_string()))?;
            Ok(Session::new(file.user_id))
        }

        fn save(&self, session: &Session) -> Result<(), SessionError> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| SessionError::Storage(e.to_string()))?;
            }

            let content = toml::to_string(&SessionFile {
                user_id: session.id().to_string(),
            })
            .map_err(|e| SessionError::Storage(e.to_string()))?;

            std::fs::write(&self.path, content).map_err(|e| SessionError::Storage(e.to_string()))
        }

        fn clear(&self) -> Result<(), SessionError> {
            match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(SessionError::Storage(e.to_string())),
            }
        }
    }
}

/// The two views of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Auth,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Auth => "/",
            Route::Dashboard => "/dashboard",
        }
    }
}

/// Where a navigation to `requested` ends up given the current session.
///
/// The dashboard requires a session; the auth view is skipped when one
/// already exists.
pub fn guard(requested: Route, session: Option<&Session>) -> Route {
    match (requested, session) {
        (Route::Dashboard, None) => Route::Auth,
        (Route::Auth, Some(_)) => Route::Dashboard,
        (route, _) => route,
    }
}
