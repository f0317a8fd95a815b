//! Field Normalizer: one raw heterogeneous document in, one canonical
//! record out.
//!
//! The store's documents were written by several generations of producers
//! with drifting field names and types. The rules here are total: a
//! malformed field degrades to its default and is logged, it never aborts
//! the record, and an unusable record (no id) resolves to `None` rather
//! than poisoning the whole feed load.

use chrono::{DateTime, TimeZone, Utc};
use log::warn;

use crate::feed::record::{Claimant, Coordinates, DonationRecord, Kind, Party};
use crate::store::{Document, FieldValue};

/// Name candidates for donation records, in priority order
const DONATION_NAME_FIELDS: &[&str] = &["itemName", "foodName", "name", "category"];

/// Name candidates for urgent requests, in priority order
const URGENT_NAME_FIELDS: &[&str] = &["itemName", "foodType", "foodName"];

const DONATION_NAME_FALLBACK: &str = "Donation";
const URGENT_NAME_FALLBACK: &str = "Urgent Request";

/// First non-empty string among the candidate fields
fn first_non_empty(doc: &Document, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|key| doc.get_str(key))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Resolve a quantity field to a display string.
///
/// Numbers are stringified verbatim, strings pass through, anything else
/// yields the empty string.
fn resolve_quantity(value: Option<&FieldValue>) -> String {
    match value {
        Some(FieldValue::StringValue(s)) => s.clone(),
        // Integer values are already decimal strings on the wire
        Some(FieldValue::IntegerValue(s)) => s.clone(),
        Some(FieldValue::DoubleValue(d)) => format!("{}", d),
        Some(other) => {
            warn!("unusable quantity value: {:?}", other);
            String::new()
        }
        None => String::new(),
    }
}

/// Resolve a location field to validated coordinates.
///
/// Accepts a native geo-point or a `"lat,lng"` string; everything else,
/// including out-of-bounds values, resolves to absent. Geocoding of street
/// addresses is never attempted here.
fn resolve_coordinates(doc: &Document) -> Option<Coordinates> {
    match doc.get("location") {
        Some(FieldValue::GeoPointValue(p)) => {
            let coords = Coordinates::new(p.latitude, p.longitude);
            if coords.is_none() {
                warn!(
                    "document {} has out-of-bounds geo point ({}, {})",
                    doc.id(),
                    p.latitude,
                    p.longitude
                );
            }
            coords
        }
        Some(FieldValue::StringValue(s)) => Coordinates::parse(s),
        Some(other) => {
            warn!("document {} has unusable location: {:?}", doc.id(), other);
            None
        }
        None => None,
    }
}

/// Resolve a creation time from a native timestamp or epoch-millis number.
///
/// Anything else is absent, never "now"; the UI renders "time unknown"
/// instead of a misleading value.
fn resolve_created_at(doc: &Document) -> Option<DateTime<Utc>> {
    match doc.get("timestamp") {
        Some(FieldValue::TimestampValue(t)) => Some(*t),
        Some(FieldValue::IntegerValue(s)) => s
            .parse::<i64>()
            .ok()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        Some(FieldValue::DoubleValue(d)) if d.is_finite() => {
            Utc.timestamp_millis_opt(*d as i64).single()
        }
        Some(other) => {
            warn!("document {} has unusable timestamp: {:?}", doc.id(), other);
            None
        }
        None => None,
    }
}

/// Claim state, honoring the claimed-implies-claimant invariant
fn resolve_claim(doc: &Document) -> (bool, Option<Claimant>) {
    let claimed = doc.get_bool("isReceived").unwrap_or(false);
    if !claimed {
        return (false, None);
    }
    let claimant = doc.get_str("receiverId").map(|id| Claimant {
        id: id.to_string(),
        display_name: doc.get_str("receiverName").unwrap_or_default().to_string(),
    });
    (true, claimant)
}

/// Address display string, falling back to the raw location text
fn resolve_address(doc: &Document, address_field: &str) -> String {
    if let Some(address) = doc.get_str(address_field) {
        if !address.trim().is_empty() {
            return address.to_string();
        }
    }
    match doc.get("location") {
        Some(FieldValue::StringValue(s)) => s.clone(),
        Some(FieldValue::GeoPointValue(p)) => format!("{},{}", p.latitude, p.longitude),
        _ => String::new(),
    }
}

/// Normalize one raw donation document into the canonical record.
///
/// Returns `None` only when the record is unusable (missing id).
pub fn normalize_donation(doc: &Document) -> Option<DonationRecord> {
    if doc.id().is_empty() {
        warn!("skipping donation document with no id");
        return None;
    }

    let display_name =
        first_non_empty(doc, DONATION_NAME_FIELDS).unwrap_or_else(|| {
            DONATION_NAME_FALLBACK.to_string()
        });
    let kind = Kind::from_raw(
        first_non_empty(doc, &["type", "category"])
            .as_deref()
            .unwrap_or(""),
    );

    let donor = Party {
        id: first_non_empty(doc, &["donorId", "userId", "userid"]),
        display_name: doc.get_str("donorName").unwrap_or_default().to_string(),
        phone: first_non_empty(doc, &["phone", "donorPhone"]),
    };

    let (claimed, claimed_by) = resolve_claim(doc);

    Some(DonationRecord {
        id: doc.id().to_string(),
        display_name,
        kind,
        description: doc.get_str("description").unwrap_or_default().to_string(),
        quantity: resolve_quantity(doc.get("quantity")),
        donor,
        coordinates: resolve_coordinates(doc),
        address: resolve_address(doc, "address"),
        image_url: doc.get_str("imageUrl").map(str::to_string),
        status: doc.get_str("status").map(str::to_string),
        created_at: resolve_created_at(doc),
        claimed,
        claimed_by,
    })
}

/// Normalize one raw urgent-request document into the canonical record.
///
/// The donor slot holds the requester. A blank description is synthesized
/// from the quantity so the row is never empty.
pub fn normalize_urgent(doc: &Document) -> Option<DonationRecord> {
    if doc.id().is_empty() {
        warn!("skipping urgent-request document with no id");
        return None;
    }

    let display_name = first_non_empty(doc, URGENT_NAME_FIELDS)
        .unwrap_or_else(|| URGENT_NAME_FALLBACK.to_string());
    let quantity = resolve_quantity(doc.get("quantity"));

    let description = match doc.get_str("description").map(str::trim) {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => format!("Urgent food request: {} items needed", quantity),
    };

    let requester = Party {
        id: first_non_empty(doc, &["requesterId", "userId"]),
        display_name: doc
            .get_str("requesterName")
            .unwrap_or("Community Request")
            .to_string(),
        phone: first_non_empty(doc, &["requesterPhone", "phone"]),
    };

    let (claimed, claimed_by) = resolve_claim(doc);

    Some(DonationRecord {
        id: doc.id().to_string(),
        display_name,
        kind: Kind::Urgent,
        description,
        quantity,
        donor: requester,
        coordinates: resolve_coordinates(doc),
        address: resolve_address(doc, "deliveryAddress"),
        image_url: None,
        status: doc.get_str("status").map(str::to_string),
        created_at: resolve_created_at(doc),
        claimed,
        claimed_by,
    })
}
