//! Game-state reconstruction from previously recorded substitution groups.
//!
//! Each lineup group is a complete replacement of the on-field set at its
//! timestamp, never a delta, so reconstruction is a single max-by-timestamp
//! lookup rather than a fold.

use crate::domain::EventGroup;
use std::cmp::Ordering;

/// Returns the ids of the players in the game at `at_timestamp`, based on
/// the most recent lineup group at or before that time.
///
/// Groups are matched by `lineup_workflow_id` (the system-reserved
/// substitution workflow); soft-deleted events are excluded. When no lineup
/// group precedes the timestamp, nobody is known to be in the game and the
/// result is empty.
///
/// Timestamp ties resolve to the group appearing later in the slice, so
/// callers get a deterministic rule by supplying groups in creation order.
pub fn players_currently_in_game(
    groups: &[EventGroup],
    lineup_workflow_id: &str,
    at_timestamp: f64,
) -> Vec<String> {
    let latest = groups
        .iter()
        .filter(|g| g.workflow_id == lineup_workflow_id && g.video_timestamp <= at_timestamp)
        .max_by(|a, b| {
            a.video_timestamp
                .partial_cmp(&b.video_timestamp)
                .unwrap_or(Ordering::Equal)
        });

    match latest {
        Some(group) => group
            .events
            .iter()
            .filter(|e| !e.is_deleted())
            .filter_map(|e| e.breakdown_player_id.clone())
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
#[path = "roster_tests.rs"]
mod tests;
