//! Feed Merger: combine donations and urgent requests into one display list.

use crate::feed::record::DonationRecord;

/// Merge two normalized lists into one, newest first.
///
/// The sort is stable and records with no creation time order after every
/// timestamped record. No deduplication is performed; each collection is
/// fetched exactly once, so the same record cannot appear twice.
pub fn merge_feed(
    donations: Vec<DonationRecord>,
    urgent: Vec<DonationRecord>,
) -> Vec<DonationRecord> {
    let mut merged = donations;
    merged.extend(urgent);
    // Option<DateTime> orders None first ascending, so comparing b to a
    // gives descending order with absent timestamps last.
    merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    merged
}
