//! Commands that can mutate the tagging session.
//!
//! All state changes MUST go through the engine's `apply()` method. This is
//! the only way to mutate session state, ensuring a single source of truth.

use serde::Serialize;

/// Commands that can mutate the tagging session.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum EngineCommand {
    /// Start a workflow traversal from `Idle`, stamped with the current
    /// video time in seconds.
    StartWorkflow { workflow_id: String, timestamp: f64 },
    /// Answer the current step's prompt with one of its options.
    SelectOption { option_id: String },
    /// Attribute the pending event to a player or team.
    SelectParticipant {
        participant_id: String,
        participant_name: String,
        is_team: bool,
    },
    /// Pop the history stack. A no-op at the session root.
    GoBack,
    /// Abandon the in-flight traversal and return to `Idle`.
    CancelWorkflow,
    /// Tail of a confirmed successful submission: a cancel that also clears
    /// the game-clock scratch value.
    ResetAfterSubmit,
    /// Enter the substitution editor, pre-seeded with who is currently in
    /// the game.
    StartLineup {
        timestamp: f64,
        in_game_player_ids: Vec<String>,
    },
    /// Add or remove one player from the lineup selection. Not individually
    /// undoable; only entering/leaving the sub-flow is.
    ToggleLineupPlayer { player_id: String },
    /// Enter the period-end flow.
    StartPeriodEnd { timestamp: f64 },
    /// Record or clear the game-clock scratch value, in seconds.
    SetGameClock { seconds: Option<f64> },
    /// Attach numeric metadata to the most recently queued event.
    SetEventValue { value: f64 },
}
