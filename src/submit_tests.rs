//! Tests for the submission adapter.

use super::*;
use crate::domain::{Step, StepOption, WorkflowDefinition};
use crate::engine::EngineCommand;
use crate::session::InitialPhase;
use crate::session_log::SessionLogger;
use std::sync::Arc;
use tempfile::TempDir;

fn test_config() -> EngineConfig {
    EngineConfig {
        substitution_event_type_id: "et-sub-in".to_string(),
        period_end_event_type_id: "et-period-end".to_string(),
    }
}

fn tag_workflow() -> WorkflowDefinition {
    let base = |id: &str, label: &str| StepOption {
        id: id.to_string(),
        label: label.to_string(),
        next_step_id: None,
        event_type_id: None,
        collect_participant: false,
        participant_prompt: None,
        participant_copy_step_id: None,
    };
    WorkflowDefinition {
        id: "wf-turnover".to_string(),
        name: "Turnover".to_string(),
        first_step_id: Some("s-who".to_string()),
        system_reserved: false,
        steps: vec![
            Step {
                id: "s-who".to_string(),
                prompt: "Who lost the ball?".to_string(),
                options: vec![
                    StepOption {
                        event_type_id: Some("et-turnover".to_string()),
                        collect_participant: true,
                        participant_prompt: Some("Which player?".to_string()),
                        next_step_id: Some("s-steal".to_string()),
                        ..base("o-player", "A player")
                    },
                    StepOption {
                        event_type_id: Some("et-turnover".to_string()),
                        ..base("o-unknown", "Unclear")
                    },
                ],
            },
            Step {
                id: "s-steal".to_string(),
                prompt: "Credited steal?".to_string(),
                options: vec![
                    StepOption {
                        event_type_id: Some("et-steal".to_string()),
                        collect_participant: true,
                        participant_prompt: Some("Which side?".to_string()),
                        ..base("o-steal", "Yes")
                    },
                    base("o-no-steal", "No"),
                ],
            },
        ],
    }
}

fn lineup_workflow() -> WorkflowDefinition {
    WorkflowDefinition {
        id: "wf-lineup".to_string(),
        name: "Substitution".to_string(),
        first_step_id: None,
        system_reserved: true,
        steps: vec![],
    }
}

fn create_engine(initial_phase: InitialPhase) -> (WorkflowEngine, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Arc::new(
        SessionLogger::new("test-session", temp_dir.path()).expect("Failed to create logger"),
    );
    let (engine, _snapshot_rx) = WorkflowEngine::new(
        vec![tag_workflow(), lineup_workflow()],
        initial_phase,
        logger,
    );
    (engine, temp_dir)
}

#[test]
fn test_workflow_submission_splits_player_and_team() {
    let (mut engine, _temp) = create_engine(InitialPhase::Idle);
    engine
        .apply(EngineCommand::StartWorkflow {
            workflow_id: "wf-turnover".to_string(),
            timestamp: 61.5,
        })
        .expect("start");
    engine
        .apply(EngineCommand::SelectOption {
            option_id: "o-player".to_string(),
        })
        .expect("select");
    engine
        .apply(EngineCommand::SelectParticipant {
            participant_id: "p9".to_string(),
            participant_name: "Nina".to_string(),
            is_team: false,
        })
        .expect("pick player");
    engine
        .apply(EngineCommand::SelectOption {
            option_id: "o-steal".to_string(),
        })
        .expect("select steal");
    engine
        .apply(EngineCommand::SelectParticipant {
            participant_id: "t1".to_string(),
            participant_name: "Home".to_string(),
            is_team: true,
        })
        .expect("pick team");

    let submission = build_workflow_submission(&engine).expect("submission");

    assert_eq!(submission.group.video_timestamp, 61.5);
    assert_eq!(submission.group.workflow_id.as_deref(), Some("wf-turnover"));
    assert_eq!(submission.events.len(), 2);

    let player_event = &submission.events[0];
    assert_eq!(player_event.event_type_id, "et-turnover");
    assert_eq!(player_event.breakdown_player_id.as_deref(), Some("p9"));
    assert_eq!(player_event.breakdown_team_id, None);

    let team_event = &submission.events[1];
    assert_eq!(team_event.event_type_id, "et-steal");
    assert_eq!(team_event.breakdown_player_id, None);
    assert_eq!(team_event.breakdown_team_id.as_deref(), Some("t1"));
}

#[test]
fn test_submission_rejected_outside_confirmation() {
    let (mut engine, _temp) = create_engine(InitialPhase::Idle);
    assert!(build_workflow_submission(&engine).is_err());

    engine
        .apply(EngineCommand::StartWorkflow {
            workflow_id: "wf-turnover".to_string(),
            timestamp: 61.5,
        })
        .expect("start");
    assert!(build_workflow_submission(&engine).is_err());
}

#[test]
fn test_metadata_omitted_from_payload_when_absent() {
    let without = EventCreate {
        event_type_id: "et-shot".to_string(),
        breakdown_player_id: None,
        breakdown_team_id: None,
        metadata: None,
    };
    let value = serde_json::to_value(&without).expect("serialize");
    assert!(value.get("metadata").is_none());

    let with = EventCreate {
        metadata: Some(7.5),
        ..without
    };
    let value = serde_json::to_value(&with).expect("serialize");
    assert_eq!(value["metadata"], 7.5);
    assert!(value.get("eventTypeId").is_some());
}

#[test]
fn test_lineup_submission_one_event_per_player() {
    let (mut engine, _temp) = create_engine(InitialPhase::Idle);
    engine
        .apply(EngineCommand::StartLineup {
            timestamp: 410.0,
            in_game_player_ids: vec!["p2".to_string(), "p1".to_string()],
        })
        .expect("start lineup");
    engine
        .apply(EngineCommand::ToggleLineupPlayer {
            player_id: "p3".to_string(),
        })
        .expect("toggle");

    let submission = build_lineup_submission(&engine, &test_config()).expect("submission");

    assert_eq!(submission.group.video_timestamp, 410.0);
    assert_eq!(submission.group.workflow_id.as_deref(), Some("wf-lineup"));
    let player_ids: Vec<Option<&str>> = submission
        .events
        .iter()
        .map(|e| e.breakdown_player_id.as_deref())
        .collect();
    assert_eq!(player_ids, vec![Some("p1"), Some("p2"), Some("p3")]);
    assert!(submission
        .events
        .iter()
        .all(|e| e.event_type_id == "et-sub-in" && e.breakdown_team_id.is_none()));
}

#[test]
fn test_empty_lineup_rejected() {
    let (mut engine, _temp) = create_engine(InitialPhase::Idle);
    engine
        .apply(EngineCommand::StartLineup {
            timestamp: 410.0,
            in_game_player_ids: vec![],
        })
        .expect("start lineup");

    let result = build_lineup_submission(&engine, &test_config());
    assert!(result.is_err());
    // The engine itself is untouched; the user can keep editing.
    assert_eq!(engine.state().phase, Phase::Lineup);
}

#[test]
fn test_starters_submission_stamped_at_video_start() {
    let (mut engine, _temp) = create_engine(InitialPhase::Starters);
    engine
        .apply(EngineCommand::ToggleLineupPlayer {
            player_id: "p1".to_string(),
        })
        .expect("toggle");

    let submission = build_lineup_submission(&engine, &test_config()).expect("submission");
    assert_eq!(submission.group.video_timestamp, 0.0);
    assert_eq!(submission.events.len(), 1);
}

#[test]
fn test_period_end_requires_game_clock() {
    let (mut engine, _temp) = create_engine(InitialPhase::Idle);
    let periods = vec![
        Period {
            id: "per-1".to_string(),
            index: 1,
        },
        Period {
            id: "per-2".to_string(),
            index: 2,
        },
    ];

    engine
        .apply(EngineCommand::StartPeriodEnd { timestamp: 720.0 })
        .expect("start period end");
    assert!(build_period_end_submission(&engine, &test_config(), &periods, "per-1").is_err());

    engine
        .apply(EngineCommand::SetGameClock { seconds: Some(0.0) })
        .expect("set clock");
    let submission = build_period_end_submission(&engine, &test_config(), &periods, "per-1")
        .expect("submission");
    assert_eq!(submission.group.game_clock_timestamp, Some(0.0));
    assert_eq!(submission.event.event_type_id, "et-period-end");
}

#[test]
fn test_period_end_creates_next_period_only_for_last() {
    let (mut engine, _temp) = create_engine(InitialPhase::Idle);
    let periods = vec![
        Period {
            id: "per-1".to_string(),
            index: 1,
        },
        Period {
            id: "per-2".to_string(),
            index: 2,
        },
    ];

    engine
        .apply(EngineCommand::StartPeriodEnd { timestamp: 720.0 })
        .expect("start period end");
    engine
        .apply(EngineCommand::SetGameClock { seconds: Some(0.0) })
        .expect("set clock");

    let mid = build_period_end_submission(&engine, &test_config(), &periods, "per-1")
        .expect("submission");
    assert_eq!(mid.new_period, None);

    // Ending the last configured period implies a new one is starting.
    let last = build_period_end_submission(&engine, &test_config(), &periods, "per-2")
        .expect("submission");
    assert_eq!(last.new_period, Some(PeriodCreate { index: 3 }));
}
