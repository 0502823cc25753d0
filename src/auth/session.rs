use serde::{Deserialize, Serialize};
use tracing::warn;

/// Authenticated identity obtained from the OAuth redirect callback.
/// Lives for the process lifetime only; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: String,
    pub display_name: String,
}

impl Session {
    pub fn display_name_or_default(&self) -> &str {
        if self.display_name.is_empty() {
            "User"
        } else {
            &self.display_name
        }
    }
}

/// Holds the session established from the login callback. The first session
/// wins; a later callback while one is held is ignored.
#[derive(Debug, Default)]
pub struct SessionStore {
    session: Option<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false (and keeps the existing session) if one is already held.
    pub fn establish(&mut self, session: Session) -> bool {
        if self.session.is_some() {
            warn!("session already established, ignoring new login callback");
            return false;
        }
        self.session = Some(session);
        true
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

#[cfg(test)]
impl Session {
    pub fn mock() -> Self {
        Self {
            access_token: "mock_access_token".to_string(),
            refresh_token: "mock_refresh_token".to_string(),
            user_id: "mock_user".to_string(),
            display_name: "Mock User".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_session_wins() {
        let mut store = SessionStore::new();
        assert!(store.establish(Session::mock()));

        let mut second = Session::mock();
        second.user_id = "someone_else".to_string();
        assert!(!store.establish(second));

        assert_eq!(store.current().map(|s| s.user_id.as_str()), Some("mock_user"));
    }

    #[test]
    fn display_name_falls_back_to_user() {
        let mut session = Session::mock();
        assert_eq!(session.display_name_or_default(), "Mock User");

        session.display_name.clear();
        assert_eq!(session.display_name_or_default(), "User");
    }
}
