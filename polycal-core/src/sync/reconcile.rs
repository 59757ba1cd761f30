//! Diffing computed events against what the target calendar already holds.

use std::collections::HashMap;

use chrono::Utc;

use crate::config::CollisionPolicy;
use crate::error::{PolycalError, PolycalResult};
use crate::event::Event;
use crate::fingerprint::fingerprint;

/// Changes needed to bring the target calendar in line with the sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncBatch {
    /// New events and events whose content changed, with a fresh sequence.
    pub changed: Vec<Event>,
    /// Target events no source produced any more, marked `deleted`.
    pub tombstones: Vec<Event>,
}

impl SyncBatch {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.tombstones.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changed.len() + self.tombstones.len()
    }

    /// Changed events first, then tombstones.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.changed.iter().chain(self.tombstones.iter())
    }
}

/// A sequence number larger than any handed out by an earlier run,
/// assuming runs are at least a second apart.
pub fn sequence_now() -> i64 {
    Utc::now().timestamp()
}

/// Compute the batch that turns `existing` into `new_events`.
///
/// Events are matched by uid. A new event goes into the batch with
/// `sequence` when it has no counterpart or its fingerprint differs;
/// unmatched existing events come back as tombstones. `existing` is read
/// completely before the first new event is pulled.
pub fn reconcile(
    new_events: impl IntoIterator<Item = Event>,
    existing: impl IntoIterator<Item = Event>,
    sequence: i64,
    on_collision: CollisionPolicy,
) -> PolycalResult<SyncBatch> {
    let mut remaining: Vec<Option<Event>> = Vec::new();
    let mut remaining_by_uid: HashMap<String, usize> = HashMap::new();
    for mut event in existing {
        match remaining_by_uid.get(&event.uid) {
            Some(&idx) => {
                tracing::warn!(uid = %event.uid, "target calendar holds the uid twice");
                // Keep every backend id so a tombstone removes all copies.
                if let Some(dropped) = remaining[idx].take() {
                    for id in &dropped.source_ids {
                        event.add_source_id(id);
                    }
                }
                remaining[idx] = Some(event);
            }
            None => {
                remaining_by_uid.insert(event.uid.clone(), remaining.len());
                remaining.push(Some(event));
            }
        }
    }

    let mut changed: Vec<Event> = Vec::new();
    // uid -> position in `changed`, or None if the event was unchanged.
    let mut seen: HashMap<String, Option<usize>> = HashMap::new();
    let mut unchanged = 0usize;

    for mut event in new_events {
        if let Some(&earlier) = seen.get(&event.uid) {
            if on_collision == CollisionPolicy::Error {
                return Err(PolycalError::UidCollision(event.uid));
            }
            tracing::warn!(uid = %event.uid, "uid produced twice, keeping the later event");
            event.sequence = sequence;
            match earlier {
                Some(idx) => changed[idx] = event,
                None => {
                    unchanged -= 1;
                    seen.insert(event.uid.clone(), Some(changed.len()));
                    changed.push(event);
                }
            }
            continue;
        }

        let previous = remaining_by_uid
            .get(&event.uid)
            .and_then(|&idx| remaining[idx].take());
        let is_changed = match &previous {
            None => true,
            Some(previous) => fingerprint(&event)? != fingerprint(previous)?,
        };

        if is_changed {
            event.sequence = sequence;
            seen.insert(event.uid.clone(), Some(changed.len()));
            changed.push(event);
        } else {
            unchanged += 1;
            seen.insert(event.uid.clone(), None);
        }
    }

    let tombstones: Vec<Event> = remaining
        .into_iter()
        .flatten()
        .map(|mut event| {
            event.deleted = true;
            event
        })
        .collect();

    tracing::info!(
        changed = changed.len(),
        unchanged,
        tombstones = tombstones.len(),
        "reconciled"
    );
    Ok(SyncBatch {
        changed,
        tombstones,
    })
}
