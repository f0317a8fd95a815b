//! Donation matching: score and rank records for a donor or a receiver.
//!
//! Pure functions over normalized records; callers fetch the candidate
//! lists first (see `FeedService`). Scoring weighs category match,
//! distance, urgency, and freshness; unusable inputs simply earn no bonus,
//! they never fail the ranking.

use chrono::{DateTime, Utc};

use crate::feed::record::{Coordinates, DonationRecord, Kind};

const EARTH_RADIUS_KM: f64 = 6371.0;

const BASE_SCORE: f64 = 100.0;
const MAX_PRIORITY: u8 = 3;

/// One ranked match
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub record: DonationRecord,
    /// Great-circle distance to the viewer, when both ends have coordinates
    pub distance_km: Option<f64>,
    /// 1 (routine) to 3 (act now)
    pub priority: u8,
    pub match_score: f64,
}

/// Great-circle distance between two points, in kilometers (haversine)
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lng = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

fn resolve_distance(viewer: Option<Coordinates>, record: &DonationRecord) -> Option<f64> {
    match (viewer, record.coordinates) {
        (Some(a), Some(b)) => Some(distance_km(a, b)),
        _ => None,
    }
}

fn distance_bonus(distance: Option<f64>, tiers: [(f64, f64); 3]) -> f64 {
    let d = match distance {
        Some(d) => d,
        None => return 0.0,
    };
    for (limit, bonus) in tiers {
        if d < limit {
            return bonus;
        }
    }
    0.0
}

/// Case-insensitive exact match on the record's display name
fn category_is(record: &DonationRecord, category: &str) -> bool {
    record.display_name.eq_ignore_ascii_case(category.trim())
}

/// Case-insensitive substring match on the record's display name
fn category_overlaps(record: &DonationRecord, category: &str) -> bool {
    let category = category.trim().to_lowercase();
    !category.is_empty() && record.display_name.to_lowercase().contains(&category)
}

/// How urgently a donor should act on `request`
fn donor_priority(request: &DonationRecord, category: &str, distance: Option<f64>) -> u8 {
    let mut priority = 1;
    if request.kind == Kind::Urgent {
        priority = MAX_PRIORITY;
    }
    if matches!(distance, Some(d) if d < 5.0) {
        priority += 1;
    }
    if category_is(request, category) {
        priority += 1;
    }
    priority.min(MAX_PRIORITY)
}

/// Match score of one open request for a donor offering `category`/`quantity`
fn donor_match_score(
    request: &DonationRecord,
    category: &str,
    quantity: f64,
    distance: Option<f64>,
) -> f64 {
    let mut score = BASE_SCORE;

    if category_is(request, category) {
        score += 40.0;
    } else if category_overlaps(request, category) {
        score += 20.0;
    }

    score += distance_bonus(distance, [(2.0, 30.0), (5.0, 20.0), (10.0, 10.0)]);

    if request.kind == Kind::Urgent {
        score += 20.0;
    }

    if let Ok(required) = request.quantity.trim().parse::<f64>() {
        score += if quantity >= required { 10.0 } else { 5.0 };
    }

    score
}

/// Match score of one open donation for a receiver needing `categories`
fn receiver_match_score(
    donation: &DonationRecord,
    categories: &[&str],
    distance: Option<f64>,
    now: DateTime<Utc>,
) -> f64 {
    let mut score = BASE_SCORE;

    if categories.iter().any(|c| category_overlaps(donation, c)) {
        score += 30.0;
    }

    score += distance_bonus(distance, [(2.0, 25.0), (5.0, 15.0), (10.0, 5.0)]);

    if let Some(created_at) = donation.created_at {
        let hours_since = (now - created_at).num_hours();
        if hours_since < 2 {
            score += 20.0;
        } else if hours_since < 6 {
            score += 10.0;
        }
    }

    score
}

/// Rank open requests for a donor offering `category` in `quantity` units,
/// best match first
pub fn recommend_for_donor(
    requests: &[DonationRecord],
    donor_location: Option<Coordinates>,
    category: &str,
    quantity: f64,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = requests
        .iter()
        .map(|request| {
            let distance = resolve_distance(donor_location, request);
            Recommendation {
                record: request.clone(),
                distance_km: distance,
                priority: donor_priority(request, category, distance),
                match_score: donor_match_score(request, category, quantity, distance),
            }
        })
        .collect();

    recommendations.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    recommendations
}

/// Rank open donations for a receiver needing any of `categories`, best
/// match first. Donations matching none of the categories are dropped.
pub fn recommend_for_receiver(
    donations: &[DonationRecord],
    receiver_location: Option<Coordinates>,
    categories: &[&str],
    now: DateTime<Utc>,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = donations
        .iter()
        .filter(|donation| categories.iter().any(|c| category_overlaps(donation, c)))
        .map(|donation| {
            let distance = resolve_distance(receiver_location, donation);
            Recommendation {
                record: donation.clone(),
                distance_km: distance,
                priority: 1,
                match_score: receiver_match_score(donation, categories, distance, now),
            }
        })
        .collect();

    recommendations.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::record::Party;
    use chrono::Duration;

    fn record(
        id: &str,
        name: &str,
        kind: Kind,
        coordinates: Option<Coordinates>,
    ) -> DonationRecord {
        DonationRecord {
            id: id.to_string(),
            display_name: name.to_string(),
            kind,
            description: String::new(),
            quantity: String::new(),
            donor: Party::default(),
            coordinates,
            address: String::new(),
            image_url: None,
            status: None,
            created_at: None,
            claimed: false,
            claimed_by: None,
        }
    }

    #[test]
    fn haversine_matches_known_distances() {
        let a = Coordinates::new(28.6139, 77.2090).unwrap(); // New Delhi
        let b = Coordinates::new(19.0760, 72.8777).unwrap(); // Mumbai
        let d = distance_km(a, b);
        assert!((d - 1148.0).abs() < 15.0, "got {}", d);

        let same = Coordinates::new(28.6, 77.2).unwrap();
        assert!(distance_km(same, same) < 1e-9);
    }

    #[test]
    fn exact_category_outranks_overlap_and_mismatch() {
        let requests = vec![
            record("mismatch", "Furniture", Kind::Urgent, None),
            record("overlap", "Rice and Dal", Kind::Urgent, None),
            record("exact", "Rice", Kind::Urgent, None),
        ];
        let ranked = recommend_for_donor(&requests, None, "rice", 5.0);
        assert_eq!(ranked[0].record.id, "exact");
        assert_eq!(ranked[1].record.id, "overlap");
        assert_eq!(ranked[2].record.id, "mismatch");
        assert_eq!(ranked[0].match_score - ranked[1].match_score, 20.0);
    }

    #[test]
    fn nearby_requests_outrank_distant_ones() {
        let donor = Coordinates::new(28.6139, 77.2090);
        let requests = vec![
            record(
                "far",
                "Rice",
                Kind::Urgent,
                Coordinates::new(19.0760, 72.8777),
            ),
            record(
                "near",
                "Rice",
                Kind::Urgent,
                Coordinates::new(28.6200, 77.2100),
            ),
        ];
        let ranked = recommend_for_donor(&requests, donor, "Rice", 5.0);
        assert_eq!(ranked[0].record.id, "near");
        assert!(ranked[0].distance_km.unwrap() < 2.0);
        assert!(ranked[1].distance_km.unwrap() > 1000.0);
    }

    #[test]
    fn missing_coordinates_earn_no_distance_bonus() {
        let donor = Coordinates::new(28.6, 77.2);
        let requests = vec![record("no-coords", "Rice", Kind::Food, None)];
        let ranked = recommend_for_donor(&requests, donor, "Rice", 5.0);
        assert_eq!(ranked[0].distance_km, None);
        // base + exact category + quantity bonus absent (blank quantity)
        assert_eq!(ranked[0].match_score, 140.0);
    }

    #[test]
    fn urgent_kind_raises_priority_to_max() {
        let requests = vec![record("u", "Rice", Kind::Urgent, None)];
        let ranked = recommend_for_donor(&requests, None, "Rice", 5.0);
        // urgent already at the cap; category match cannot push past it
        assert_eq!(ranked[0].priority, 3);

        let requests = vec![record("d", "Rice", Kind::Food, None)];
        let ranked = recommend_for_donor(&requests, None, "Rice", 5.0);
        assert_eq!(ranked[0].priority, 2);
    }

    #[test]
    fn sufficient_quantity_earns_the_full_bonus() {
        let mut request = record("q", "Rice", Kind::Food, None);
        request.quantity = "10".to_string();

        let enough = recommend_for_donor(&[request.clone()], None, "Rice", 10.0);
        let short = recommend_for_donor(&[request], None, "Rice", 4.0);
        assert_eq!(enough[0].match_score - short[0].match_score, 5.0);
    }

    #[test]
    fn receiver_ranking_drops_unneeded_categories() {
        let donations = vec![
            record("bread", "Fresh Bread", Kind::Food, None),
            record("sofa", "Sofa", Kind::Other, None),
        ];
        let ranked = recommend_for_receiver(&donations, None, &["bread"], Utc::now());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].record.id, "bread");
    }

    #[test]
    fn fresher_donations_rank_higher() {
        let now = Utc::now();
        let mut fresh = record("fresh", "Rice", Kind::Food, None);
        fresh.created_at = Some(now - Duration::hours(1));
        let mut old = record("old", "Rice", Kind::Food, None);
        old.created_at = Some(now - Duration::hours(12));

        let ranked = recommend_for_receiver(&[old, fresh], None, &["rice"], now);
        assert_eq!(ranked[0].record.id, "fresh");
        assert_eq!(ranked[0].match_score - ranked[1].match_score, 20.0);
    }
}
