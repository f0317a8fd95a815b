//! Donation feed pipeline: fetch, normalize, merge, and derive display rows.
//!
//! Control flow is fetcher → normalizer (per raw record) → merger → rows.
//! Both collections are fetched concurrently and the merge runs only after
//! both complete; a failure of either query fails the whole load (no
//! partial merge), while a single bad record inside a successful response
//! is skipped by the normalizer.

pub mod merge;
pub mod normalize;
pub mod recommend;
pub mod record;

pub use merge::merge_feed;
pub use normalize::{normalize_donation, normalize_urgent};
pub use recommend::{distance_km, Recommendation};
pub use record::{Claimant, Coordinates, DonationRecord, Kind, Party};

use chrono::Utc;

use crate::error::Error;
use crate::store::{CollectionClient, FieldValue, QueryBuilder};

/// Loads and merges the donation/urgent-request feed
#[derive(Debug, Clone)]
pub struct FeedService {
    donations: CollectionClient,
    urgent: CollectionClient,
    feed_limit: u32,
}

impl FeedService {
    pub(crate) fn new(
        donations: CollectionClient,
        urgent: CollectionClient,
        feed_limit: u32,
    ) -> Self {
        Self {
            donations,
            urgent,
            feed_limit,
        }
    }

    /// Query for standing donations, newest first
    pub(crate) fn donations_query(&self) -> QueryBuilder {
        self.donations
            .query()
            .order_by_desc("timestamp")
            .limit(self.feed_limit)
    }

    /// Query for urgent requests still waiting to be fulfilled
    pub(crate) fn urgent_query(&self) -> QueryBuilder {
        self.urgent
            .query()
            .filter_eq("status", FieldValue::string("pending"))
            .limit(self.feed_limit)
    }

    /// Load the merged feed.
    ///
    /// Donations and urgent requests are fetched concurrently; each raw
    /// document goes through the normalizer and unusable records are
    /// dropped.
    pub async fn load(&self) -> Result<Vec<DonationRecord>, Error> {
        let donations_query = self.donations_query();
        let urgent_query = self.urgent_query();
        let (donations, urgent) = tokio::join!(donations_query.run(), urgent_query.run());
        let donations = donations?;
        let urgent = urgent?;

        let donations = donations.iter().filter_map(normalize_donation).collect();
        let urgent = urgent.iter().filter_map(normalize_urgent).collect();
        Ok(merge_feed(donations, urgent))
    }

    /// Load the merged feed, keeping only records nobody has claimed yet
    pub async fn load_unclaimed(&self) -> Result<Vec<DonationRecord>, Error> {
        let mut records = self.load().await?;
        records.retain(|r| !r.claimed);
        Ok(records)
    }

    /// Load the given user's own donations, newest first.
    ///
    /// The store would need a composite index to combine the donor filter
    /// with the timestamp ordering, so the filter runs in memory over the
    /// ordered page instead.
    pub async fn load_history(&self, user_id: &str) -> Result<Vec<DonationRecord>, Error> {
        let docs = self.donations_query().run().await?;
        let mut records: Vec<DonationRecord> =
            docs.iter().filter_map(normalize_donation).collect();
        records.retain(|r| r.is_owned_by(user_id));
        Ok(records)
    }

    /// Rank open urgent requests for a donor offering `category` in
    /// `quantity` units
    pub async fn donor_recommendations(
        &self,
        location: Option<Coordinates>,
        category: &str,
        quantity: f64,
    ) -> Result<Vec<Recommendation>, Error> {
        let docs = self.urgent_query().run().await?;
        let requests: Vec<DonationRecord> =
            docs.iter().filter_map(normalize_urgent).collect();
        Ok(recommend::recommend_for_donor(
            &requests, location, category, quantity,
        ))
    }

    /// Rank unclaimed donations for a receiver needing any of `categories`
    pub async fn receiver_recommendations(
        &self,
        location: Option<Coordinates>,
        categories: &[&str],
    ) -> Result<Vec<Recommendation>, Error> {
        let docs = self.donations_query().run().await?;
        let donations: Vec<DonationRecord> = docs
            .iter()
            .filter_map(normalize_donation)
            .filter(|r| !r.claimed)
            .collect();
        Ok(recommend::recommend_for_receiver(
            &donations,
            location,
            categories,
            Utc::now(),
        ))
    }
}

/// Display state of one feed row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    /// Claimable by the viewing user
    Open,
    /// Already claimed by someone
    Claimed,
    /// The viewing user's own record
    Mine,
}

/// Actions a row can offer, resolved against the record's data
#[derive(Debug, Clone, PartialEq)]
pub enum RowAction {
    Claim,
    Call(String),
    ViewOnMap(Coordinates),
}

/// One renderable feed row
#[derive(Debug, Clone, PartialEq)]
pub struct FeedRow {
    pub record: DonationRecord,
    pub state: RowState,
}

impl FeedRow {
    /// Derive the row state for the viewing user (`None` when signed out)
    pub fn new(record: DonationRecord, viewer_id: Option<&str>) -> Self {
        let state = if record.claimed {
            RowState::Claimed
        } else if viewer_id.is_some_and(|v| record.is_owned_by(v)) {
            RowState::Mine
        } else {
            RowState::Open
        };
        Self { record, state }
    }

    /// Actions available on this row.
    ///
    /// Claiming is offered only on open rows; calling requires a phone
    /// number and the map requires resolved coordinates.
    pub fn actions(&self) -> Vec<RowAction> {
        let mut actions = Vec::new();
        if self.state == RowState::Open {
            actions.push(RowAction::Claim);
        }
        if let Some(phone) = &self.record.donor.phone {
            actions.push(RowAction::Call(phone.clone()));
        }
        if let Some(coords) = self.record.coordinates {
            actions.push(RowAction::ViewOnMap(coords));
        }
        actions
    }
}

/// Build display rows for a record list as seen by `viewer_id`
pub fn build_rows(records: Vec<DonationRecord>, viewer_id: Option<&str>) -> Vec<FeedRow> {
    records
        .into_iter()
        .map(|record| FeedRow::new(record, viewer_id))
        .collect()
}
