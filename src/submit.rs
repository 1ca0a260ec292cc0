//! Submission adapter: request payloads for the remote event store.
//!
//! The builders here translate engine state into create requests; they never
//! send anything. On a submission failure the caller retries with the same
//! engine state, and only after a confirmed successful create does it apply
//! `ResetAfterSubmit` to clear the queue.

use crate::config::EngineConfig;
use crate::domain::Period;
use crate::engine::WorkflowEngine;
use crate::session::{Phase, QueuedEvent};
use anyhow::{bail, Result};
use serde::Serialize;

/// Create request for one event group (one per traversal).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGroupCreate {
    pub video_timestamp: f64,
    pub game_clock_timestamp: Option<f64>,
    pub workflow_id: Option<String>,
}

/// Create request for one event, in queued order within its group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCreate {
    pub event_type_id: String,
    pub breakdown_player_id: Option<String>,
    pub breakdown_team_id: Option<String>,
    /// Numeric metadata; omitted from the payload entirely when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<f64>,
}

/// Create request for a new period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCreate {
    pub index: u32,
}

/// A complete workflow or lineup submission: one group plus its events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowSubmission {
    pub group: EventGroupCreate,
    pub events: Vec<EventCreate>,
}

/// A period-end submission. `new_period` is present only when the period
/// being ended is the last configured one, meaning a new period starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodEndSubmission {
    pub new_period: Option<PeriodCreate>,
    pub group: EventGroupCreate,
    pub event: EventCreate,
}

fn event_create(queued: &QueuedEvent) -> EventCreate {
    EventCreate {
        event_type_id: queued.event_type_id.clone(),
        breakdown_player_id: if queued.participant_is_team {
            None
        } else {
            queued.participant_id.clone()
        },
        breakdown_team_id: if queued.participant_is_team {
            queued.participant_id.clone()
        } else {
            None
        },
        metadata: queued.numeric_value,
    }
}

/// Builds the create requests for a finished workflow traversal.
/// Valid only at `Confirmation`; events come out in queued order.
pub fn build_workflow_submission(engine: &WorkflowEngine) -> Result<WorkflowSubmission> {
    let state = engine.state();
    if state.phase != Phase::Confirmation {
        bail!("Nothing to submit: traversal is in phase {:?}", state.phase);
    }
    let Some(video_timestamp) = state.selected_timestamp else {
        bail!("Traversal has no recorded video timestamp");
    };

    Ok(WorkflowSubmission {
        group: EventGroupCreate {
            video_timestamp,
            game_clock_timestamp: state.game_clock_seconds,
            workflow_id: state.current_workflow_id.clone(),
        },
        events: state.queued_events.iter().map(event_create).collect(),
    })
}

/// Builds the create requests for a lineup or starters submission: one
/// substitution-in event per selected player, all in the same group.
pub fn build_lineup_submission(
    engine: &WorkflowEngine,
    config: &EngineConfig,
) -> Result<WorkflowSubmission> {
    let state = engine.state();
    if !matches!(state.phase, Phase::Lineup | Phase::Starters) {
        bail!("No lineup selection is open in phase {:?}", state.phase);
    }
    if state.lineup_player_ids.is_empty() {
        bail!("Select at least one player before submitting a lineup");
    }
    let Some(video_timestamp) = state.selected_timestamp else {
        bail!("Lineup has no recorded video timestamp");
    };

    let events = state
        .lineup_player_ids
        .iter()
        .map(|player_id| EventCreate {
            event_type_id: config.substitution_event_type_id.clone(),
            breakdown_player_id: Some(player_id.clone()),
            breakdown_team_id: None,
            metadata: None,
        })
        .collect();

    Ok(WorkflowSubmission {
        group: EventGroupCreate {
            video_timestamp,
            game_clock_timestamp: state.game_clock_seconds,
            workflow_id: engine.lineup_workflow().map(|w| w.id.clone()),
        },
        events,
    })
}

/// Builds the create requests for ending `ending_period_id`. Requires the
/// game clock to be set; prepends a period-creation request only when the
/// ending period is the last one configured.
pub fn build_period_end_submission(
    engine: &WorkflowEngine,
    config: &EngineConfig,
    periods: &[Period],
    ending_period_id: &str,
) -> Result<PeriodEndSubmission> {
    let state = engine.state();
    if state.phase != Phase::PeriodEnd {
        bail!("No period end is open in phase {:?}", state.phase);
    }
    let Some(game_clock) = state.game_clock_seconds else {
        bail!("Game clock is required to end a period");
    };
    let Some(video_timestamp) = state.selected_timestamp else {
        bail!("Period end has no recorded video timestamp");
    };
    let Some(ending) = periods.iter().find(|p| p.id == ending_period_id) else {
        bail!("Unknown period id {}", ending_period_id);
    };

    let last_index = periods.iter().map(|p| p.index).max().unwrap_or(ending.index);
    let new_period = (ending.index >= last_index).then(|| PeriodCreate {
        index: ending.index + 1,
    });

    Ok(PeriodEndSubmission {
        new_period,
        group: EventGroupCreate {
            video_timestamp,
            game_clock_timestamp: Some(game_clock),
            workflow_id: None,
        },
        event: EventCreate {
            event_type_id: config.period_end_event_type_id.clone(),
            breakdown_player_id: None,
            breakdown_team_id: None,
            metadata: None,
        },
    })
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
