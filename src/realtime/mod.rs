//! Live feed subscriptions.
//!
//! A watch re-runs the feed queries on an interval and diffs the result
//! against the previous snapshot, delivering one event per changed record.
//! The subscription lives until its handle is stopped or dropped.
//! Register on screen entry and release on screen exit, so no callbacks
//! outlive the surface that asked for them.

use log::{debug, warn};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::feed::{DonationRecord, FeedService};

/// What happened to a record between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// One delivered watch event
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A record changed
    Change {
        kind: ChangeKind,
        record: DonationRecord,
    },
    /// A refresh failed; the watch keeps running and will retry
    Error(String),
}

/// Handle releasing a running watch.
///
/// The watch task stops when `stop` is called or the handle is dropped.
#[derive(Debug)]
pub struct WatchHandle {
    task: JoinHandle<()>,
}

impl WatchHandle {
    /// Stop the watch
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Watches the merged feed for changes
#[derive(Debug, Clone)]
pub struct FeedWatcher {
    service: FeedService,
    interval: Duration,
}

/// Diff a fresh snapshot against the previous one, emitting one event per
/// changed record
fn diff_snapshot(
    previous: &HashMap<String, DonationRecord>,
    current: &[DonationRecord],
) -> Vec<(ChangeKind, DonationRecord)> {
    let mut events = Vec::new();

    for record in current {
        match previous.get(&record.id) {
            None => events.push((ChangeKind::Added, record.clone())),
            Some(old) if old != record => {
                events.push((ChangeKind::Modified, record.clone()))
            }
            Some(_) => {}
        }
    }

    for (id, record) in previous {
        if !current.iter().any(|r| &r.id == id) {
            events.push((ChangeKind::Removed, record.clone()));
        }
    }

    events
}

impl FeedWatcher {
    pub(crate) fn new(service: FeedService, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Start watching the merged feed.
    ///
    /// The first refresh delivers every current record as `Added`, matching
    /// how a fresh snapshot listener fires. Refresh failures are delivered
    /// as [`WatchEvent::Error`] and the watch continues; the consumer
    /// decides when to release it.
    pub fn subscribe(&self) -> (WatchHandle, mpsc::Receiver<WatchEvent>) {
        let (tx, rx) = mpsc::channel(64);
        let service = self.service.clone();
        let interval = self.interval;

        let task = tokio::spawn(async move {
            let mut snapshot: HashMap<String, DonationRecord> = HashMap::new();
            let mut ticker = tokio::time::interval(interval);

            loop {
                ticker.tick().await;

                let records = match service.load().await {
                    Ok(records) => records,
                    Err(e) => {
                        warn!("feed watch refresh failed: {}", e);
                        if tx.send(WatchEvent::Error(e.to_string())).await.is_err() {
                            return;
                        }
                        continue;
                    }
                };

                let events = diff_snapshot(&snapshot, &records);
                debug!("feed watch: {} change(s)", events.len());

                for (kind, record) in events {
                    if tx
                        .send(WatchEvent::Change { kind, record })
                        .await
                        .is_err()
                    {
                        // receiver released; stop watching
                        return;
                    }
                }

                snapshot = records.into_iter().map(|r| (r.id.clone(), r)).collect();
            }
        });

        (WatchHandle { task }, rx)
    }
}
