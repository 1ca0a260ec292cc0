//! Mutable per-session state for the traversal engine.
//!
//! `SessionState` is the unit of undo: the engine clones it onto the history
//! stack before every advancing transition, and `GoBack` restores a clone
//! verbatim. Keep it small and cheaply cloneable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where the session currently is. Exactly one prompt is visible at a time;
/// the UI renders entirely from this plus the snapshot fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Initial starters entry, shown before any tagging when the breakdown
    /// has teams but no recorded starters.
    Starters,
    /// No traversal in flight; workflow buttons are available.
    Idle,
    /// Showing a step's prompt and options.
    Step,
    /// Waiting for the user to pick a participant for the pending event.
    Participant,
    /// Mid-game substitution editor.
    Lineup,
    /// Period-end entry (game clock + confirm).
    PeriodEnd,
    /// Traversal finished; queued events await submission.
    Confirmation,
}

impl Phase {
    /// UI-friendly label.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Starters => "Starters",
            Phase::Idle => "Idle",
            Phase::Step => "Step",
            Phase::Participant => "Participant",
            Phase::Lineup => "Lineup",
            Phase::PeriodEnd => "Period End",
            Phase::Confirmation => "Confirmation",
        }
    }
}

/// Which phase a fresh session starts in: `Starters` when the breakdown has
/// teams but no recorded starters yet, `Idle` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialPhase {
    Starters,
    Idle,
}

/// An event accumulated during a traversal, not yet submitted.
///
/// Ordering in `SessionState::queued_events` is significant: events are
/// submitted in queue order, and participant-copy resolution scans the queue
/// backward by `producing_step_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedEvent {
    pub event_type_id: String,
    pub participant_id: Option<String>,
    pub participant_name: Option<String>,
    pub participant_is_team: bool,
    /// Id of the step whose option produced this event.
    pub producing_step_id: String,
    /// Optional numeric metadata (e.g. shot distance).
    pub numeric_value: Option<f64>,
}

impl QueuedEvent {
    pub fn new(event_type_id: impl Into<String>, producing_step_id: impl Into<String>) -> Self {
        Self {
            event_type_id: event_type_id.into(),
            participant_id: None,
            participant_name: None,
            participant_is_team: false,
            producing_step_id: producing_step_id.into(),
            numeric_value: None,
        }
    }
}

/// The complete mutable state of one tagging session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub current_workflow_id: Option<String>,
    pub current_step_id: Option<String>,
    pub awaiting_participant: bool,
    pub participant_prompt: Option<String>,
    /// Step to enter once the pending participant is picked; `None` means
    /// the traversal terminates at confirmation instead.
    pub pending_step_after_participant: Option<String>,
    pub queued_events: Vec<QueuedEvent>,
    /// Toggle set for the lineup/starters sub-flow.
    pub lineup_player_ids: BTreeSet<String>,
    /// Video time the in-flight action was started at, in seconds.
    pub selected_timestamp: Option<f64>,
    /// Game-clock scratch value, in seconds. Survives cancellation; cleared
    /// only by a post-submit reset.
    pub game_clock_seconds: Option<f64>,
}

impl SessionState {
    pub fn new(initial_phase: InitialPhase) -> Self {
        let mut state = Self {
            phase: Phase::Idle,
            current_workflow_id: None,
            current_step_id: None,
            awaiting_participant: false,
            participant_prompt: None,
            pending_step_after_participant: None,
            queued_events: Vec::new(),
            lineup_player_ids: BTreeSet::new(),
            selected_timestamp: None,
            game_clock_seconds: None,
        };
        if initial_phase == InitialPhase::Starters {
            state.phase = Phase::Starters;
            // Starters are stamped at the start of the video.
            state.selected_timestamp = Some(0.0);
        }
        state
    }

    /// Clears everything an abandoned or submitted traversal owns and
    /// returns to `Idle`. The game clock is left alone; `ResetAfterSubmit`
    /// clears it separately.
    pub fn clear_traversal(&mut self) {
        self.phase = Phase::Idle;
        self.current_workflow_id = None;
        self.current_step_id = None;
        self.awaiting_participant = false;
        self.participant_prompt = None;
        self.pending_step_after_participant = None;
        self.queued_events.clear();
        self.lineup_player_ids.clear();
        self.selected_timestamp = None;
    }
}
