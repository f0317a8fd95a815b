//! Session management for authentication

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::auth::types::AuthUser;

/// Session data for the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The access token
    pub access_token: String,

    /// The refresh token
    pub refresh_token: String,

    /// The signed-in user
    pub user: AuthUser,

    /// The expiry timestamp (unix seconds)
    pub expires_at: i64,
}

impl Session {
    /// Create a new session expiring `expires_in` seconds from now
    pub fn new(
        access_token: String,
        refresh_token: String,
        user: AuthUser,
        expires_in: i64,
    ) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
            .as_secs() as i64;

        Self {
            access_token,
            refresh_token,
            user,
            expires_at: now + expires_in,
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
            .as_secs() as i64;

        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthUser {
        AuthUser {
            id: "u1".to_string(),
            email: None,
            display_name: None,
            phone: None,
        }
    }

    #[test]
    fn fresh_session_is_not_expired() {
        let session = Session::new("t".into(), "r".into(), user(), 3600);
        assert!(!session.is_expired());
    }

    #[test]
    fn past_expiry_is_expired() {
        let mut session = Session::new("t".into(), "r".into(), user(), 3600);
        session.expires_at = 1;
        assert!(session.is_expired());
    }
}
