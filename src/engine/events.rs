//! Events emitted by the engine after processing commands.
//!
//! These are for the session log and notifications only; the UI renders from
//! the watch channel's `EngineSnapshot`, not from these.

use crate::session::Phase;
use serde::Serialize;

/// Events emitted by the engine after processing commands.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    /// Phase changed from one phase to another.
    PhaseChanged { from: Phase, to: Phase },
    /// An event was appended to the submission queue.
    EventQueued {
        event_type_id: String,
        producing_step_id: String,
    },
    /// The pending event was attributed to a participant.
    ParticipantAssigned {
        participant_id: String,
        is_team: bool,
    },
    /// A queued event inherited its participant from an earlier step.
    ParticipantCopied { from_step_id: String },
    /// The history stack was popped.
    SteppedBack,
    /// The traversal was cancelled and all in-flight state discarded.
    TraversalCancelled,
    /// Post-submit reset, including the game-clock scratch value.
    TraversalReset,
    /// A player was added to or removed from the lineup selection.
    LineupPlayerToggled { player_id: String, selected: bool },
    /// The game-clock scratch value changed.
    GameClockSet { seconds: Option<f64> },
    /// Numeric metadata was attached to the last queued event.
    EventValueSet { value: f64 },
}
