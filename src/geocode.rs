//! Best-effort forward geocoding.
//!
//! This is a separate, explicit operation; the feed normalizer never
//! geocodes implicitly. Every failure path (transport error, empty result
//! set, out-of-bounds response) resolves to absent coordinates.

use log::warn;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::Error;
use crate::feed::Coordinates;
use crate::fetch::Fetch;

/// Client for the geocoding service
#[derive(Debug, Clone)]
pub struct Geocoder {
    base_url: String,
    api_key: String,
    http_client: Client,
}

#[derive(Debug, Deserialize)]
struct GeocodeLocation {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: GeocodeLocation,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    status: String,
}

impl Geocoder {
    pub(crate) fn new(base_url: &str, api_key: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http_client,
        }
    }

    async fn try_lookup(&self, address: &str) -> Result<Option<Coordinates>, Error> {
        let url = format!("{}/geocode/v1/json", self.base_url);

        let mut params = HashMap::new();
        params.insert("address".to_string(), address.to_string());
        params.insert("key".to_string(), self.api_key.clone());

        let response = Fetch::get(&self.http_client, &url)
            .query(params)
            .execute::<GeocodeResponse>()
            .await?;

        if response.status != "OK" {
            return Ok(None);
        }
        Ok(response.results.first().and_then(|r| {
            Coordinates::new(r.geometry.location.lat, r.geometry.location.lng)
        }))
    }

    /// Resolve an address to coordinates, best-effort.
    ///
    /// Returns `None` on any failure; the error is logged, never surfaced.
    pub async fn lookup(&self, address: &str) -> Option<Coordinates> {
        if address.trim().is_empty() {
            return None;
        }
        match self.try_lookup(address).await {
            Ok(coords) => coords,
            Err(e) => {
                warn!("geocoding failed for {:?}: {}", address, e);
                None
            }
        }
    }
}
