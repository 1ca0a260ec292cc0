//! Read-only snapshot of the session for UI rendering.
//!
//! The UI never mutates this; it receives a fresh snapshot via the watch
//! channel after every applied command and re-renders from it.

use crate::domain::WorkflowDefinition;
use crate::session::{Phase, QueuedEvent, SessionState};

/// One selectable answer, resolved for display.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionChoice {
    pub id: String,
    pub label: String,
}

/// Read-only view of the session for UI rendering.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub phase: Phase,
    /// Name of the workflow being traversed, if any.
    pub workflow_name: Option<String>,
    /// The visible prompt: the current step's prompt in `Step`, the
    /// participant prompt in `Participant`, nothing otherwise.
    pub prompt: Option<String>,
    /// Options of the current step; empty outside the `Step` phase.
    pub options: Vec<OptionChoice>,
    pub awaiting_participant: bool,
    pub queued_events: Vec<QueuedEvent>,
    pub lineup_player_ids: Vec<String>,
    pub selected_timestamp: Option<f64>,
    pub game_clock_seconds: Option<f64>,
    /// Whether a "Back" action would do anything.
    pub can_go_back: bool,
}

impl EngineSnapshot {
    pub(crate) fn capture(
        workflows: &[WorkflowDefinition],
        state: &SessionState,
        can_go_back: bool,
    ) -> Self {
        let workflow = state
            .current_workflow_id
            .as_deref()
            .and_then(|id| workflows.iter().find(|w| w.id == id));
        let current_step = match (workflow, state.current_step_id.as_deref()) {
            (Some(workflow), Some(step_id)) => workflow.step(step_id),
            _ => None,
        };

        let prompt = match state.phase {
            Phase::Participant => state.participant_prompt.clone(),
            Phase::Step => current_step.map(|s| s.prompt.clone()),
            _ => None,
        };
        let options = match (state.phase, current_step) {
            (Phase::Step, Some(step)) => step
                .options
                .iter()
                .map(|o| OptionChoice {
                    id: o.id.clone(),
                    label: o.label.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };

        Self {
            phase: state.phase,
            workflow_name: workflow.map(|w| w.name.clone()),
            prompt,
            options,
            awaiting_participant: state.awaiting_participant,
            queued_events: state.queued_events.clone(),
            lineup_player_ids: state.lineup_player_ids.iter().cloned().collect(),
            selected_timestamp: state.selected_timestamp,
            game_clock_seconds: state.game_clock_seconds,
            can_go_back,
        }
    }
}
