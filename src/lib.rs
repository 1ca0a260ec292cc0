//! Core engine for a video-tagging tool.
//!
//! A user watches a video and records timestamped events (plays,
//! substitutions, period boundaries) attributed to players or teams, guided
//! by a configurable multi-step questionnaire that branches on answers. This
//! crate is the stateful interpreter for that questionnaire: it walks the
//! step graph, queues attributed events, supports exact undo via a snapshot
//! stack, auto-skips trivial steps, and reconstructs who is currently in the
//! game from prior substitution groups.
//!
//! The engine is pure in-memory state with no I/O of its own: persistence,
//! video playback, and HTTP all live in the surrounding application. It only
//! computes, from a workflow definition and user input, the ordered set of
//! events to submit.

pub mod config;
pub mod domain;
pub mod engine;
pub mod roster;
pub mod session;
pub mod session_log;
pub mod submit;

pub use config::EngineConfig;
pub use engine::{EngineCommand, EngineEvent, EngineSnapshot, WorkflowEngine};
pub use session::{InitialPhase, Phase, QueuedEvent, SessionState};
pub use session_log::SessionLogger;
