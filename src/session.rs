// ABOUTME: Session management with HttpOnly cookies for authenticated lawyers
// ABOUTME: Keeps the caller's id and display name server-side, keyed by a random cookie value

use crate::error::{AppError, Result};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

pub const SESSION_COOKIE_NAME: &str = "legalflow_session";
pub const DEFAULT_SESSION_MAX_AGE: i64 = 24 * 60 * 60; // 24 hours

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: i64,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    max_age_seconds: i64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_MAX_AGE)
    }
}

impl SessionStore {
    pub fn new(max_age_seconds: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_age_seconds,
        }
    }

    pub fn max_age_seconds(&self) -> i64 {
        self.max_age_seconds
    }

    pub fn create_session(&self, user_id: Uuid, name: String, email: String) -> String {
        let session_id = Uuid::new_v4().to_string();
        let session_data = SessionData {
            user_id,
            name,
            email,
            created_at: chrono::Utc::now().timestamp(),
        };

        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(session_id.clone(), session_data);
        }

        session_id
    }

    /// Expired sessions are dropped on sight and reported as missing.
    pub fn get_session(&self, session_id: &str) -> Option<SessionData> {
        let cutoff = chrono::Utc::now().timestamp() - self.max_age_seconds;
        let session = self
            .sessions
            .read()
            .ok()
            .and_then(|sessions| sessions.get(session_id).cloned())?;

        if session.created_at <= cutoff {
            self.remove_session(session_id);
            return None;
        }

        Some(session)
    }

    pub fn remove_session(&self, session_id: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(session_id);
        }
    }

    /// Keeps the display name used for note and document attribution current
    /// across every live session of the user.
    pub fn rename_user(&self, user_id: Uuid, name: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            for session in sessions.values_mut().filter(|s| s.user_id == user_id) {
                session.name = name.to_string();
            }
        }
    }

    pub fn cleanup_expired_sessions(&self) {
        let cutoff = chrono::Utc::now().timestamp() - self.max_age_seconds;

        if let Ok(mut sessions) = self.sessions.write() {
            sessions.retain(|_, session| session.created_at > cutoff);
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }
}

pub fn create_session_cookie(session_id: String, secure: bool, max_age: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(max_age))
        .path("/")
        .build()
}

pub fn create_logout_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(0))
        .path("/")
        .build()
}

pub fn extract_session_from_jar(
    jar: &CookieJar,
    session_store: &SessionStore,
) -> Result<SessionData> {
    let session_cookie = jar
        .get(SESSION_COOKIE_NAME)
        .ok_or_else(|| AppError::Unauthorized("No session cookie found".to_string()))?;

    let session_data = session_store
        .get_session(session_cookie.value())
        .ok_or_else(|| AppError::Unauthorized("Invalid session".to_string()))?;

    Ok(session_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_roundtrip() {
        let store = SessionStore::default();
        let user_id = Uuid::new_v4();
        let id = store.create_session(user_id, "Ada".into(), "ada@example.com".into());

        let session = store.get_session(&id).unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.name, "Ada");

        store.remove_session(&id);
        assert!(store.get_session(&id).is_none());
    }

    #[test]
    fn test_expired_session_is_rejected_and_dropped() {
        let store = SessionStore::new(0);
        let id = store.create_session(Uuid::new_v4(), "Ada".into(), "ada@example.com".into());

        assert!(store.get_session(&id).is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_rename_user_touches_only_that_user() {
        let store = SessionStore::default();
        let ada = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let a1 = store.create_session(ada, "Ada".into(), "ada@example.com".into());
        let a2 = store.create_session(ada, "Ada".into(), "ada@example.com".into());
        let b1 = store.create_session(bob, "Bob".into(), "bob@example.com".into());

        store.rename_user(ada, "Ada Lovelace");

        assert_eq!(store.get_session(&a1).unwrap().name, "Ada Lovelace");
        assert_eq!(store.get_session(&a2).unwrap().name, "Ada Lovelace");
        assert_eq!(store.get_session(&b1).unwrap().name, "Bob");
    }

    #[test]
    fn test_extract_requires_cookie() {
        let store = SessionStore::default();
        let jar = CookieJar::new();
        assert!(matches!(
            extract_session_from_jar(&jar, &store),
            Err(AppError::Unauthorized(_))
        ));

        let jar = jar.add(Cookie::new(SESSION_COOKIE_NAME, "bogus"));
        assert!(matches!(
            extract_session_from_jar(&jar, &store),
            Err(AppError::Unauthorized(_))
        ));
    }
}
