//! Session persistence in `localStorage`

use foodlens::{Session, SessionError, SessionStore};

/// Key holding the session id
pub const SESSION_KEY: &str = "userId";

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageSessionStore;

impl LocalStorageSessionStore {
    fn storage(&self) -> Result<web_sys::Storage, SessionError> {
        web_sys::window()
            .ok_or_else(|| SessionError::Storage("no window".to_string()))?
            .local_storage()
            .map_err(|e| SessionError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| SessionError::Storage("localStorage unavailable".to_string()))
    }
}

impl SessionStore for LocalStorageSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let id = self
            .storage()?
            .get_item(SESSION_KEY)
            .map_err(|e| SessionError::Storage(format!("{:?}", e)))?;
        Ok(id.and_then(Session::new))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        self.storage()?
            .set_item(SESSION_KEY, session.id())
            .map_err(|e| SessionError::Storage(format!("{:?}", e)))
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.storage()?
            .remove_item(SESSION_KEY)
            .map_err(|e| SessionError::Storage(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_session_survives_in_local_storage() {
        let store = LocalStorageSessionStore;
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);

        let session = Session::new("42").unwrap();
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
