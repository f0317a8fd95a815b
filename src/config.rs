//! Configuration options for the Waste to Worth client

use std::time::Duration;

/// Configuration options for the Waste to Worth client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// The collection holding standing donations
    pub donations_collection: String,

    /// The collection holding time-boxed urgent requests
    pub urgent_collection: String,

    /// Maximum number of documents fetched per feed query
    pub feed_limit: u32,

    /// Interval between feed watcher re-queries
    pub watch_interval: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            donations_collection: "donations".to_string(),
            urgent_collection: "urgent_requests".to_string(),
            feed_limit: 100,
            watch_interval: Duration::from_secs(15),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the donations collection name
    pub fn with_donations_collection(mut self, value: &str) -> Self {
        self.donations_collection = value.to_string();
        self
    }

    /// Set the urgent requests collection name
    pub fn with_urgent_collection(mut self, value: &str) -> Self {
        self.urgent_collection = value.to_string();
        self
    }

    /// Set the maximum number of documents fetched per feed query
    pub fn with_feed_limit(mut self, value: u32) -> Self {
        self.feed_limit = value;
        self
    }

    /// Set the interval between feed watcher re-queries
    pub fn with_watch_interval(mut self, value: Duration) -> Self {
        self.watch_interval = value;
        self
    }
}
