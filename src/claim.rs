//! The claim state transition: `Open → Claimed`, terminal.
//!
//! Every guard runs before any store write, so a rejected claim never
//! touches the network. On store failure the caller's in-memory record is
//! left unchanged; nothing is optimistically advanced.

use chrono::Utc;
use std::collections::HashMap;

use crate::auth::AuthUser;
use crate::error::Error;
use crate::feed::{DonationRecord, Kind};
use crate::store::{CollectionClient, FieldValue};

/// Fulfilled marker written alongside the claim
const STATUS_FULFILLED: &str = "fulfilled";

/// Executes claim actions against the record's source collection
#[derive(Debug, Clone)]
pub struct ClaimService {
    donations: CollectionClient,
    urgent: CollectionClient,
}

impl ClaimService {
    pub(crate) fn new(donations: CollectionClient, urgent: CollectionClient) -> Self {
        Self { donations, urgent }
    }

    /// The collection a record's claim update must go to
    fn collection_for(&self, record: &DonationRecord) -> &CollectionClient {
        match record.kind {
            Kind::Urgent => &self.urgent,
            _ => &self.donations,
        }
    }

    /// Claim `record` on behalf of `user`.
    ///
    /// Rejected without a store write when the user is signed out, the
    /// record is already claimed, or the user is the record's own
    /// donor/requester. Otherwise issues a single partial field update;
    /// a failed update propagates and leaves the record claimable.
    pub async fn claim(
        &self,
        record: &DonationRecord,
        user: Option<&AuthUser>,
    ) -> Result<(), Error> {
        let user = user.ok_or_else(|| Error::auth("Please sign in to receive donations"))?;

        if record.claimed {
            return Err(Error::claim("This donation has already been received"));
        }
        if record.is_owned_by(&user.id) {
            return Err(Error::claim("You cannot receive your own donation"));
        }

        let mut updates = HashMap::new();
        updates.insert("isReceived".to_string(), FieldValue::boolean(true));
        updates.insert("receiverId".to_string(), FieldValue::string(&user.id));
        updates.insert(
            "receiverName".to_string(),
            FieldValue::string(user.resolved_name()),
        );
        if let Some(email) = &user.email {
            updates.insert("receiverEmail".to_string(), FieldValue::string(email));
        }
        updates.insert(
            "receivedTimestamp".to_string(),
            FieldValue::timestamp(Utc::now()),
        );
        updates.insert(
            "status".to_string(),
            FieldValue::string(STATUS_FULFILLED),
        );

        self.collection_for(record)
            .update(&record.id, updates)
            .await?;
        Ok(())
    }
}
