//! Types for authentication and user management

use serde::{Deserialize, Serialize};

/// The signed-in user, as the rest of the crate sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    /// The account id
    pub id: String,

    /// The user's email address
    pub email: Option<String>,

    /// The user's display name
    pub display_name: Option<String>,

    /// The user's phone number
    pub phone: Option<String>,
}

impl AuthUser {
    /// Display name for writes that record who acted.
    ///
    /// Falls back to the email local-part, then "Anonymous", matching how
    /// receiver names were historically recorded.
    pub fn resolved_name(&self) -> String {
        if let Some(name) = &self.display_name {
            if !name.trim().is_empty() {
                return name.clone();
            }
        }
        if let Some(email) = &self.email {
            if let Some(local) = email.split('@').next() {
                if !local.is_empty() {
                    return local.to_string();
                }
            }
        }
        "Anonymous".to_string()
    }
}

/// Raw response of the identity API's sign-up/sign-in endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenResponse {
    /// The access token
    pub id_token: String,

    /// The refresh token
    pub refresh_token: String,

    /// Token lifetime in seconds, string-encoded on the wire
    pub expires_in: String,

    /// The account id
    pub local_id: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(display_name: Option<&str>, email: Option<&str>) -> AuthUser {
        AuthUser {
            id: "u1".to_string(),
            email: email.map(str::to_string),
            display_name: display_name.map(str::to_string),
            phone: None,
        }
    }

    #[test]
    fn resolved_name_fallback_chain() {
        assert_eq!(user(Some("Asha"), None).resolved_name(), "Asha");
        assert_eq!(
            user(Some("  "), Some("dev@example.com")).resolved_name(),
            "dev"
        );
        assert_eq!(user(None, Some("dev@example.com")).resolved_name(), "dev");
        assert_eq!(user(None, None).resolved_name(), "Anonymous");
    }
}
