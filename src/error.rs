//! Error handling for the Waste to Worth client

use std::fmt;
use thiserror::Error;

use crate::validate::ValidationError;

/// Unified error type for the Waste to Worth client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication errors (unauthenticated or rejected credentials)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Document store query or update errors
    #[error("Store error: {0}")]
    Store(String),

    /// Claim attempts rejected before any store write
    #[error("Claim rejected: {0}")]
    Claim(String),

    /// Form validation failures on the write side
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new store error
    pub fn store<T: fmt::Display>(msg: T) -> Self {
        Error::Store(msg.to_string())
    }

    /// Create a new claim rejection
    pub fn claim<T: fmt::Display>(msg: T) -> Self {
        Error::Claim(msg.to_string())
    }
}
