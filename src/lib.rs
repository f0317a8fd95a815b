//! Waste to Worth client library
//!
//! Connects food/goods donors with recipients and volunteers: fetches the
//! donation and urgent-request collections from the hosted document store,
//! normalizes their loosely-typed records into one canonical shape, merges
//! them into a single feed, and drives the claim state transition.

pub mod auth;
pub mod claim;
pub mod config;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod geocode;
pub mod realtime;
pub mod store;
pub mod submit;
pub mod validate;

use reqwest::Client;

use crate::auth::Auth;
use crate::claim::ClaimService;
use crate::config::ClientOptions;
use crate::feed::FeedService;
use crate::geocode::Geocoder;
use crate::realtime::FeedWatcher;
use crate::store::CollectionClient;
use crate::submit::SubmitService;

/// The main entry point for the Waste to Worth client.
///
/// Owns one HTTP client and the auth state; every service is handed out as
/// a constructed capability instead of being reached through a global.
pub struct WasteToWorth {
    /// The base URL for the backend
    pub url: String,
    /// The API key for the project
    pub key: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Auth client for user management and authentication
    pub auth: Auth,
    /// Client options
    pub options: ClientOptions,
}

impl WasteToWorth {
    /// Create a new client with default options
    ///
    /// # Example
    ///
    /// ```
    /// use waste_to_worth::WasteToWorth;
    ///
    /// let client = WasteToWorth::new("https://backend.example.com", "your-api-key");
    /// ```
    pub fn new(url: &str, key: &str) -> Self {
        Self::new_with_options(url, key, ClientOptions::default())
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use waste_to_worth::{config::ClientOptions, WasteToWorth};
    ///
    /// let options = ClientOptions::default().with_feed_limit(50);
    /// let client = WasteToWorth::new_with_options(
    ///     "https://backend.example.com",
    ///     "your-api-key",
    ///     options,
    /// );
    /// ```
    pub fn new_with_options(url: &str, key: &str, options: ClientOptions) -> Self {
        let http_client = match options.request_timeout {
            Some(timeout) => Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            None => Client::new(),
        };

        let url = url.trim_end_matches('/').to_string();
        let auth = Auth::new(&url, key, http_client.clone());

        Self {
            url,
            key: key.to_string(),
            http_client,
            auth,
            options,
        }
    }

    /// Get a reference to the auth client
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    fn database_url(&self) -> String {
        format!("{}/v1", self.url)
    }

    /// Create a client for one named collection in the document store.
    ///
    /// The current session's access token, if any, rides along so the
    /// store can enforce its access rules.
    pub fn collection(&self, name: &str) -> CollectionClient {
        let client = CollectionClient::new(
            &self.database_url(),
            &self.key,
            name,
            self.http_client.clone(),
        );
        match self.auth.access_token() {
            Some(token) => client.with_auth(&token),
            None => client,
        }
    }

    /// Create the feed service for loading the merged donation feed
    pub fn feed(&self) -> FeedService {
        FeedService::new(
            self.collection(&self.options.donations_collection),
            self.collection(&self.options.urgent_collection),
            self.options.feed_limit,
        )
    }

    /// Create the claim service
    pub fn claims(&self) -> ClaimService {
        ClaimService::new(
            self.collection(&self.options.donations_collection),
            self.collection(&self.options.urgent_collection),
        )
    }

    /// Create the submission service for new donations and urgent requests
    pub fn submissions(&self) -> SubmitService {
        SubmitService::new(
            self.collection(&self.options.donations_collection),
            self.collection(&self.options.urgent_collection),
        )
    }

    /// Create a feed watcher delivering live change events
    pub fn watcher(&self) -> FeedWatcher {
        FeedWatcher::new(self.feed(), self.options.watch_interval)
    }

    /// Create the best-effort geocoding client
    pub fn geocoder(&self) -> Geocoder {
        Geocoder::new(&self.url, &self.key, self.http_client.clone())
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::feed::{
        DonationRecord, FeedRow, Kind, Recommendation, RowAction, RowState,
    };
    pub use crate::WasteToWorth;
}
