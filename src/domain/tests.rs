//! Serde round-trip checks against the remote store's wire shapes.

use super::*;

#[test]
fn test_workflow_definition_parses_wire_json() {
    let raw = r#"{
        "id": "wf-shot",
        "name": "Shot Attempt",
        "firstStepId": "s-result",
        "systemReserved": false,
        "steps": [
            {
                "id": "s-result",
                "prompt": "What happened?",
                "options": [
                    {
                        "id": "o-made",
                        "label": "Made",
                        "eventTypeId": "et-made",
                        "collectParticipant": true,
                        "participantPrompt": "Who scored?"
                    },
                    {
                        "id": "o-skip",
                        "label": "Skip",
                        "nextStepId": "s-next"
                    }
                ]
            }
        ]
    }"#;

    let workflow: WorkflowDefinition = serde_json::from_str(raw).expect("parse workflow");
    assert_eq!(workflow.first_step_id.as_deref(), Some("s-result"));
    assert!(!workflow.system_reserved);

    let step = workflow.step("s-result").expect("step");
    let made = step.option("o-made").expect("option");
    assert_eq!(made.event_type_id.as_deref(), Some("et-made"));
    assert!(made.collect_participant);
    assert_eq!(made.next_step_id, None);

    // Omitted fields fall back to their defaults.
    let skip = step.option("o-skip").expect("option");
    assert!(!skip.collect_participant);
    assert_eq!(skip.event_type_id, None);
    assert_eq!(skip.next_step_id.as_deref(), Some("s-next"));
}

#[test]
fn test_event_group_parses_soft_deletes() {
    let raw = r#"{
        "id": "g1",
        "workflowId": "wf-lineup",
        "videoTimestamp": 120.5,
        "events": [
            {
                "eventTypeId": "et-sub-in",
                "breakdownPlayerId": "p1"
            },
            {
                "eventTypeId": "et-sub-in",
                "breakdownPlayerId": "p2",
                "deletedAt": "2026-08-27T10:15:00Z"
            }
        ]
    }"#;

    let group: EventGroup = serde_json::from_str(raw).expect("parse group");
    assert_eq!(group.video_timestamp, 120.5);
    assert!(!group.events[0].is_deleted());
    assert!(group.events[1].is_deleted());
}

#[test]
fn test_dangling_references_are_plain_data() {
    let workflow = WorkflowDefinition {
        id: "wf".to_string(),
        name: "Broken".to_string(),
        first_step_id: Some("s-missing".to_string()),
        system_reserved: false,
        steps: vec![],
    };

    // Lookups return None; the engine treats that as terminal.
    assert!(workflow.step("s-missing").is_none());
}
