//! Authentication and user management against the hosted identity service

mod session;
mod types;

use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::Error;
use crate::fetch::Fetch;

pub use session::Session;
pub use types::AuthUser;

use types::TokenResponse;

/// Client for the identity service
pub struct Auth {
    /// The base URL for the backend
    url: String,

    /// The API key for the project
    key: String,

    /// HTTP client used for requests
    client: Client,

    /// The current session
    session: Arc<Mutex<Option<Session>>>,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(url: &str, key: &str, client: Client) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            client,
            session: Arc::new(Mutex::new(None)),
        }
    }

    fn account_url(&self, action: &str) -> String {
        format!("{}/auth/v1/accounts:{}", self.url, action)
    }

    fn store_token_response(&self, result: TokenResponse) -> AuthUser {
        let user = AuthUser {
            id: result.local_id,
            email: result.email,
            display_name: result.display_name,
            phone: None,
        };
        let expires_in = result.expires_in.parse::<i64>().unwrap_or(3600);
        let session = Session::new(
            result.id_token,
            result.refresh_token,
            user.clone(),
            expires_in,
        );

        let mut current_session = self.session.lock().expect("session lock");
        *current_session = Some(session);
        user
    }

    /// Sign up a new user with email and password
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, Error> {
        let url = self.account_url("signUp");

        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());
        body.insert("password".to_string(), password.to_string());
        body.insert("returnSecureToken".to_string(), "true".to_string());

        let result = Fetch::post(&self.client, &url)
            .header("apikey", &self.key)
            .json(&body)?
            .execute::<TokenResponse>()
            .await?;

        Ok(self.store_token_response(result))
    }

    /// Sign in a user with email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, Error> {
        let url = self.account_url("signInWithPassword");

        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());
        body.insert("password".to_string(), password.to_string());
        body.insert("returnSecureToken".to_string(), "true".to_string());

        let result = Fetch::post(&self.client, &url)
            .header("apikey", &self.key)
            .json(&body)?
            .execute::<TokenResponse>()
            .await?;

        Ok(self.store_token_response(result))
    }

    /// Sign out the current user, clearing the local session
    pub fn sign_out(&self) {
        let mut current_session = self.session.lock().expect("session lock");
        *current_session = None;
    }

    /// The currently signed-in user, if any and the session is still valid
    pub fn current_user(&self) -> Option<AuthUser> {
        let current_session = self.session.lock().expect("session lock");
        current_session
            .as_ref()
            .filter(|s| !s.is_expired())
            .map(|s| s.user.clone())
    }

    /// The access token of the current session, if still valid
    pub fn access_token(&self) -> Option<String> {
        let current_session = self.session.lock().expect("session lock");
        current_session
            .as_ref()
            .filter(|s| !s.is_expired())
            .map(|s| s.access_token.clone())
    }

    /// Get the current session
    pub fn get_session(&self) -> Option<Session> {
        let current_session = self.session.lock().expect("session lock");
        current_session.clone()
    }

    /// Set the session (e.g. restored from persisted state)
    pub fn set_session(&self, session: Session) {
        let mut current_session = self.session.lock().expect("session lock");
        *current_session = Some(session);
    }
}
