//! Traversal engine for the tagging workflow graph.
//!
//! This module is the ONLY place session state changes. The engine owns the
//! state, validates commands, emits events for the session log, and
//! broadcasts read-only snapshots to the UI via a watch channel.
//!
//! Undo is history-as-snapshots: the full `SessionState` is cloned onto a
//! stack before every advancing transition and restored verbatim by
//! `GoBack`. The state is small, so snapshots are the intended mechanism,
//! not a shortcut.

mod commands;
mod events;
mod snapshot;

pub use commands::EngineCommand;
pub use events::EngineEvent;
pub use snapshot::{EngineSnapshot, OptionChoice};

use crate::domain::{Step, StepOption, WorkflowDefinition};
use crate::session::{InitialPhase, Phase, QueuedEvent, SessionState};
use crate::session_log::SessionLogger;
use anyhow::{bail, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;
use uuid::Uuid;

/// Cycle guard for malformed definitions: a single-option chain longer than
/// this is assumed to loop and is cut off at confirmation.
const MAX_AUTO_ADVANCE: usize = 256;

/// The ONLY place session state transitions happen.
/// Owns the state, validates commands, emits events, broadcasts snapshots.
pub struct WorkflowEngine {
    workflows: Vec<WorkflowDefinition>,
    state: SessionState,
    history: Vec<SessionState>,
    snapshot_tx: watch::Sender<EngineSnapshot>,
    logger: Arc<SessionLogger>,
    session_id: String,
    seq: u64,
}

impl WorkflowEngine {
    /// Creates the engine for one tagging session.
    ///
    /// Returns the engine and a watch receiver for UI snapshots.
    ///
    /// Construct exactly once per session. The caller owns a one-shot guard
    /// against a data refetch re-triggering construction: rebuilding the
    /// engine mid-traversal silently discards queued events and the lineup
    /// selection.
    ///
    /// `initial_phase` is `Starters` when the breakdown has teams but no
    /// recorded starters yet, `Idle` otherwise.
    pub fn new(
        workflows: Vec<WorkflowDefinition>,
        initial_phase: InitialPhase,
        logger: Arc<SessionLogger>,
    ) -> (Self, watch::Receiver<EngineSnapshot>) {
        let state = SessionState::new(initial_phase);
        let snapshot = EngineSnapshot::capture(&workflows, &state, false);
        let (snapshot_tx, snapshot_rx) = watch::channel(snapshot);
        let session_id = Uuid::new_v4().to_string();

        logger.log(
            "Engine",
            serde_json::json!({
                "type": "SessionInitialized",
                "session_id": session_id,
                "initial_phase": state.phase,
                "workflow_count": workflows.len(),
            }),
        );

        let engine = Self {
            workflows,
            state,
            history: Vec::new(),
            snapshot_tx,
            logger,
            session_id,
            seq: 0,
        };

        (engine, snapshot_rx)
    }

    /// All mutations go through this single method.
    /// Returns events for logging; broadcasts a snapshot automatically.
    ///
    /// An `Err` means the command was rejected at the boundary and the
    /// session state is untouched.
    pub fn apply(&mut self, command: EngineCommand) -> Result<Vec<EngineEvent>> {
        self.seq += 1;
        self.logger.log_command(self.seq, &command);

        let events = self.apply_internal(command)?;

        for event in &events {
            self.logger.log_event(self.seq, event);
        }

        let _ = self.snapshot_tx.send(self.snapshot());
        Ok(events)
    }

    fn apply_internal(&mut self, command: EngineCommand) -> Result<Vec<EngineEvent>> {
        use EngineCommand::*;
        use EngineEvent::*;

        match command {
            StartWorkflow {
                workflow_id,
                timestamp,
            } => {
                if self.state.phase != Phase::Idle {
                    bail!("Cannot start a workflow from phase {:?}", self.state.phase);
                }
                let Some(workflow) = self.workflows.iter().find(|w| w.id == workflow_id) else {
                    bail!("Unknown workflow id {}", workflow_id);
                };
                let first_step_id = workflow.first_step_id.clone();

                let from = self.state.phase;
                self.push_history();
                self.state.current_workflow_id = Some(workflow_id);
                self.state.queued_events.clear();
                self.state.selected_timestamp = Some(timestamp);

                let mut events = Vec::new();
                self.enter_step(first_step_id.as_deref(), &mut events, 0);
                if self.state.phase != from {
                    events.push(PhaseChanged {
                        from,
                        to: self.state.phase,
                    });
                }
                Ok(events)
            }

            SelectOption { option_id } => {
                if self.state.phase != Phase::Step {
                    bail!("Cannot select an option from phase {:?}", self.state.phase);
                }
                let (step_id, option) = {
                    let Some(step) = self.current_step() else {
                        bail!("No current step to select an option on");
                    };
                    let Some(option) = step.option(&option_id) else {
                        bail!("Step {} has no option {}", step.id, option_id);
                    };
                    (step.id.clone(), option.clone())
                };

                let from = self.state.phase;
                self.push_history();

                let mut events = Vec::new();
                self.advance_with_option(&step_id, &option, &mut events, 0);
                if self.state.phase != from {
                    events.push(PhaseChanged {
                        from,
                        to: self.state.phase,
                    });
                }
                Ok(events)
            }

            SelectParticipant {
                participant_id,
                participant_name,
                is_team,
            } => {
                if self.state.phase != Phase::Participant {
                    bail!(
                        "No participant prompt is pending in phase {:?}",
                        self.state.phase
                    );
                }
                if self.state.queued_events.is_empty() {
                    bail!("No queued event to attribute a participant to");
                }

                let from = self.state.phase;
                self.push_history();

                let pending = self.state.pending_step_after_participant.clone();
                if let Some(event) = self.state.queued_events.last_mut() {
                    // Only one participant prompt is pending at a time, so
                    // the target is always the most recently queued event.
                    event.participant_id = Some(participant_id.clone());
                    event.participant_name = Some(participant_name);
                    event.participant_is_team = is_team;
                }

                let mut events = vec![ParticipantAssigned {
                    participant_id,
                    is_team,
                }];
                self.enter_step(pending.as_deref(), &mut events, 0);
                if self.state.phase != from {
                    events.push(PhaseChanged {
                        from,
                        to: self.state.phase,
                    });
                }
                Ok(events)
            }

            GoBack => match self.history.pop() {
                Some(previous) => {
                    let from = self.state.phase;
                    self.state = previous;
                    let mut events = vec![SteppedBack];
                    if self.state.phase != from {
                        events.push(PhaseChanged {
                            from,
                            to: self.state.phase,
                        });
                    }
                    Ok(events)
                }
                // The empty stack is the session root.
                None => Ok(vec![]),
            },

            CancelWorkflow => {
                if self.state.phase == Phase::Idle {
                    return Ok(vec![]);
                }
                let from = self.state.phase;
                self.state.clear_traversal();
                self.history.clear();
                Ok(vec![
                    TraversalCancelled,
                    PhaseChanged {
                        from,
                        to: Phase::Idle,
                    },
                ])
            }

            ResetAfterSubmit => {
                let from = self.state.phase;
                self.state.clear_traversal();
                self.state.game_clock_seconds = None;
                self.history.clear();
                let mut events = vec![TraversalReset];
                if from != Phase::Idle {
                    events.push(PhaseChanged {
                        from,
                        to: Phase::Idle,
                    });
                }
                Ok(events)
            }

            StartLineup {
                timestamp,
                in_game_player_ids,
            } => {
                if self.state.phase != Phase::Idle {
                    bail!(
                        "Cannot open the lineup editor from phase {:?}",
                        self.state.phase
                    );
                }
                let lineup_workflow_id = self.lineup_workflow().map(|w| w.id.clone());

                self.push_history();
                self.state.phase = Phase::Lineup;
                self.state.current_workflow_id = lineup_workflow_id;
                // Pre-seed from the reconstructed on-field set so the user
                // edits a diff, not a blank slate.
                self.state.lineup_player_ids = in_game_player_ids.into_iter().collect();
                self.state.selected_timestamp = Some(timestamp);
                Ok(vec![PhaseChanged {
                    from: Phase::Idle,
                    to: Phase::Lineup,
                }])
            }

            ToggleLineupPlayer { player_id } => {
                if !matches!(self.state.phase, Phase::Lineup | Phase::Starters) {
                    bail!(
                        "Lineup selection is not open in phase {:?}",
                        self.state.phase
                    );
                }
                // No history push: individual toggles are not undoable, only
                // entering/leaving the sub-flow is.
                let selected = if self.state.lineup_player_ids.remove(&player_id) {
                    false
                } else {
                    self.state.lineup_player_ids.insert(player_id.clone());
                    true
                };
                Ok(vec![LineupPlayerToggled {
                    player_id,
                    selected,
                }])
            }

            StartPeriodEnd { timestamp } => {
                if self.state.phase != Phase::Idle {
                    bail!(
                        "Cannot start a period end from phase {:?}",
                        self.state.phase
                    );
                }
                self.push_history();
                self.state.phase = Phase::PeriodEnd;
                self.state.selected_timestamp = Some(timestamp);
                Ok(vec![PhaseChanged {
                    from: Phase::Idle,
                    to: Phase::PeriodEnd,
                }])
            }

            SetGameClock { seconds } => {
                if let Some(seconds) = seconds {
                    if !seconds.is_finite() || seconds < 0.0 {
                        bail!("Game clock must be a non-negative number of seconds");
                    }
                }
                self.state.game_clock_seconds = seconds;
                Ok(vec![GameClockSet { seconds }])
            }

            SetEventValue { value } => {
                if !value.is_finite() {
                    bail!("Event value must be a finite number");
                }
                let Some(event) = self.state.queued_events.last_mut() else {
                    bail!("No queued event to attach a value to");
                };
                event.numeric_value = Some(value);
                Ok(vec![EventValueSet { value }])
            }
        }
    }

    /// Moves the traversal onto `step_id`. A missing or dangling step is
    /// treated exactly like an explicit terminal option: the traversal lands
    /// on confirmation rather than erroring, so a broken definition cannot
    /// brick an in-progress session.
    fn enter_step(&mut self, step_id: Option<&str>, events: &mut Vec<EngineEvent>, depth: usize) {
        self.state.awaiting_participant = false;
        self.state.participant_prompt = None;
        self.state.pending_step_after_participant = None;

        if depth > MAX_AUTO_ADVANCE {
            warn!("auto-advance chain exceeded {MAX_AUTO_ADVANCE} steps; assuming a definition cycle");
            self.state.phase = Phase::Confirmation;
            self.state.current_step_id = None;
            return;
        }

        let step = step_id.and_then(|id| self.find_step(id)).cloned();
        match step {
            Some(step) => {
                self.state.phase = Phase::Step;
                self.state.current_step_id = Some(step.id.clone());
                // A single-option step is not a real decision point: apply
                // its sole option immediately, without a history push, so
                // "Back" never lands on it.
                if step.options.len() == 1 {
                    let option = step.options[0].clone();
                    self.advance_with_option(&step.id, &option, events, depth);
                }
            }
            None => {
                if let Some(dangling) = step_id {
                    warn!(step_id = %dangling, "step reference not found; treating as terminal");
                }
                self.state.phase = Phase::Confirmation;
                self.state.current_step_id = None;
            }
        }
    }

    /// Applies one option: queue its event (resolving a participant copy),
    /// then either stop on a participant prompt or advance to the next step
    /// or confirmation.
    fn advance_with_option(
        &mut self,
        step_id: &str,
        option: &StepOption,
        events: &mut Vec<EngineEvent>,
        depth: usize,
    ) {
        let mut participant_copied = false;

        if let Some(event_type_id) = &option.event_type_id {
            let mut queued = QueuedEvent::new(event_type_id.clone(), step_id);
            if let Some(copy_step_id) = &option.participant_copy_step_id {
                // Backward scan: the most recent event produced by the
                // copy-source step wins.
                let source = self
                    .state
                    .queued_events
                    .iter()
                    .rev()
                    .find(|e| e.producing_step_id == *copy_step_id);
                match source {
                    Some(source) if source.participant_id.is_some() => {
                        queued.participant_id = source.participant_id.clone();
                        queued.participant_name = source.participant_name.clone();
                        queued.participant_is_team = source.participant_is_team;
                        participant_copied = true;
                        events.push(EngineEvent::ParticipantCopied {
                            from_step_id: copy_step_id.clone(),
                        });
                    }
                    Some(_) => {
                        warn!(copy_step_id = %copy_step_id, "copy-source event has no participant");
                    }
                    None => {
                        warn!(copy_step_id = %copy_step_id, "participant copy source not found");
                    }
                }
            }
            events.push(EngineEvent::EventQueued {
                event_type_id: event_type_id.clone(),
                producing_step_id: step_id.to_string(),
            });
            self.state.queued_events.push(queued);
        }

        if option.collect_participant && !participant_copied {
            if option.event_type_id.is_none() {
                // Malformed: there is no event to attribute. Skip the prompt
                // and keep the traversal moving.
                warn!(option_id = %option.id, "option collects a participant but records no event; skipping prompt");
            } else {
                self.state.phase = Phase::Participant;
                self.state.awaiting_participant = true;
                self.state.participant_prompt = option.participant_prompt.clone();
                self.state.pending_step_after_participant = option.next_step_id.clone();
                return;
            }
        }

        self.enter_step(option.next_step_id.as_deref(), events, depth + 1);
    }

    fn push_history(&mut self) {
        self.history.push(self.state.clone());
    }

    fn find_step(&self, step_id: &str) -> Option<&Step> {
        self.current_workflow().and_then(|w| w.step(step_id))
    }

    fn current_workflow(&self) -> Option<&WorkflowDefinition> {
        self.state
            .current_workflow_id
            .as_deref()
            .and_then(|id| self.workflows.iter().find(|w| w.id == id))
    }

    /// The step whose prompt is currently shown, if any.
    pub fn current_step(&self) -> Option<&Step> {
        self.state
            .current_step_id
            .as_deref()
            .and_then(|id| self.find_step(id))
    }

    /// The system-reserved lineup/substitution workflow, if configured.
    pub fn lineup_workflow(&self) -> Option<&WorkflowDefinition> {
        self.workflows.iter().find(|w| w.system_reserved)
    }

    pub fn workflows(&self) -> &[WorkflowDefinition] {
        &self.workflows
    }

    /// Immutable view of the current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Whether a `GoBack` would do anything.
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Builds the current UI snapshot.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::capture(&self.workflows, &self.state, self.can_go_back())
    }

    /// Re-broadcasts the current snapshot to all watchers.
    pub fn broadcast_snapshot(&self) {
        let _ = self.snapshot_tx.send(self.snapshot());
    }
}
