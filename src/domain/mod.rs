//! Externally-supplied data model.
//!
//! Workflow definitions are authored in the template subsystem and fetched by
//! the surrounding application; they are read-only for the duration of a
//! tagging session. Event groups are the already-recorded history for the
//! current breakdown, used to reconstruct game state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, directed graph of steps guiding one act of event tagging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub first_step_id: Option<String>,
    /// Marks the built-in lineup/substitution workflow, as opposed to
    /// user-authored ones.
    #[serde(default)]
    pub system_reserved: bool,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl WorkflowDefinition {
    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }
}

/// A single prompt with one or more selectable options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<StepOption>,
}

impl Step {
    pub fn option(&self, option_id: &str) -> Option<&StepOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// A selectable answer to a step's prompt.
///
/// `next_step_id = None` terminates the traversal (confirmation).
/// `event_type_id = None` advances the flow without recording an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub next_step_id: Option<String>,
    #[serde(default)]
    pub event_type_id: Option<String>,
    /// Whether selecting this option asks the user to pick a participant
    /// for the recorded event.
    #[serde(default)]
    pub collect_participant: bool,
    #[serde(default)]
    pub participant_prompt: Option<String>,
    /// Inherit the participant from the most recent queued event produced by
    /// this step instead of prompting again.
    #[serde(default)]
    pub participant_copy_step_id: Option<String>,
}

/// One previously-recorded tagging action: a timestamped group of events
/// submitted together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGroup {
    pub id: String,
    pub workflow_id: String,
    pub video_timestamp: f64,
    #[serde(default)]
    pub events: Vec<RecordedEvent>,
}

/// A single event inside a recorded group. Soft-deleted events keep their
/// row but carry a `deleted_at` timestamp and are excluded from
/// reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedEvent {
    pub event_type_id: String,
    #[serde(default)]
    pub breakdown_player_id: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl RecordedEvent {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A configured game period (quarter, half, ...). Indexes are 1-based and
/// ordered by play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub id: String,
    pub index: u32,
}

#[cfg(test)]
mod tests;
