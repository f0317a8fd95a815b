//! Canonical in-memory record shape for the donation feed.
//!
//! Everything downstream of the normalizer works with these types; raw
//! document fields are never re-inspected after normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a feed record offers (or asks for)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Food,
    Clothes,
    Urgent,
    Other,
}

impl Kind {
    /// Derive the kind from a raw `type`/`category` string.
    ///
    /// Donations written without a type default to food, matching what the
    /// producers historically wrote.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "food" => Kind::Food,
            "clothes" | "clothing" => Kind::Clothes,
            "urgent_request" | "urgent" => Kind::Urgent,
            _ => Kind::Other,
        }
    }
}

/// A validated latitude/longitude pair.
///
/// Construction enforces geographic bounds, so a value of this type is
/// always usable as a real map location. Invalid input resolves to absent,
/// never to (0,0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Build coordinates, rejecting out-of-bounds or non-finite values
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if latitude.abs() > 90.0 || longitude.abs() > 180.0 {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
        })
    }

    /// Parse a `"lat,lng"` string; anything else resolves to `None`
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.split(',').collect();
        if parts.len() != 2 {
            return None;
        }
        let latitude: f64 = parts[0].trim().parse().ok()?;
        let longitude: f64 = parts[1].trim().parse().ok()?;
        Self::new(latitude, longitude)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// The donor of a donation, or the requester of an urgent request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Party {
    /// Account id; absent for records written without one
    pub id: Option<String>,
    pub display_name: String,
    pub phone: Option<String>,
}

/// The user who claimed a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claimant {
    pub id: String,
    pub display_name: String,
}

/// One canonical feed record, normalized from a raw store document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationRecord {
    /// Store-assigned document id
    pub id: String,
    pub display_name: String,
    pub kind: Kind,
    pub description: String,
    /// Display string; the source field may have been numeric or textual
    pub quantity: String,
    /// Donor for donations, requester for urgent requests
    pub donor: Party,
    pub coordinates: Option<Coordinates>,
    /// Human-readable address, falling back to "lat,lng" text
    pub address: String,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub claimed: bool,
    /// Present only when `claimed` is true
    pub claimed_by: Option<Claimant>,
}

impl DonationRecord {
    /// Whether `user_id` is this record's donor/requester
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.donor.id.as_deref() == Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_reject_out_of_bounds() {
        assert!(Coordinates::new(90.0, 180.0).is_some());
        assert!(Coordinates::new(-90.0, -180.0).is_some());
        assert!(Coordinates::new(90.1, 0.0).is_none());
        assert!(Coordinates::new(0.0, 180.5).is_none());
        assert!(Coordinates::new(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn coordinates_parse_lat_lng_strings() {
        let c = Coordinates::parse("28.6,77.2").unwrap();
        assert_eq!(c.latitude(), 28.6);
        assert_eq!(c.longitude(), 77.2);

        assert!(Coordinates::parse(" 12.5 , 77.6 ").is_some());
        assert!(Coordinates::parse("not,a,number").is_none());
        assert!(Coordinates::parse("91,0").is_none());
        assert!(Coordinates::parse("0,181").is_none());
        assert!(Coordinates::parse("just an address").is_none());
        assert!(Coordinates::parse("").is_none());
    }

    #[test]
    fn kind_derivation_from_raw_strings() {
        assert_eq!(Kind::from_raw("food"), Kind::Food);
        assert_eq!(Kind::from_raw(""), Kind::Food);
        assert_eq!(Kind::from_raw("Clothes"), Kind::Clothes);
        assert_eq!(Kind::from_raw("urgent_request"), Kind::Urgent);
        assert_eq!(Kind::from_raw("furniture"), Kind::Other);
    }
}
