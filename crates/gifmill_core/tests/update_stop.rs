use std::path::PathBuf;
use std::sync::Once;

use gifmill_core::{update, AppState, Effect, JobStatus, Msg, TerminalKind, TrackerPhase};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn polling(job_id: &str) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::SubmitRequested {
            video: PathBuf::from("clip.mp4"),
        },
    );
    let (state, _) = update(
        state,
        Msg::SubmitAccepted {
            job_id: job_id.to_string(),
        },
    );
    state
}

#[test]
fn stop_request_targets_the_active_job() {
    init_logging();
    let state = polling("abc");
    let (state, effects) = update(state, Msg::StopRequested);

    assert_eq!(
        effects,
        vec![Effect::RequestStop {
            job_id: "abc".to_string(),
        }]
    );
    // Still polling; the job is not assumed stopped until a status confirms.
    assert_eq!(state.phase(), TrackerPhase::Polling);
}

#[test]
fn stop_request_is_ignored_when_idle() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::StopRequested);

    assert!(effects.is_empty());
    assert!(state.is_settled());
}

#[test]
fn stop_ack_surfaces_the_message_and_queries_status() {
    init_logging();
    let state = polling("abc");
    let (state, effects) = update(
        state,
        Msg::StopAcknowledged {
            message: "Task stop requested.".to_string(),
        },
    );

    assert_eq!(state.view().notice.as_deref(), Some("Task stop requested."));
    assert_eq!(
        effects,
        vec![Effect::QueryStatus {
            job_id: "abc".to_string(),
        }]
    );
    assert_eq!(state.phase(), TrackerPhase::Polling);
}

#[test]
fn unreachable_stop_request_keeps_polling() {
    init_logging();
    let state = polling("abc");
    let (state, effects) = update(state, Msg::StopUnreachable);

    assert!(effects.is_empty());
    assert_eq!(state.phase(), TrackerPhase::Polling);
    assert_eq!(
        state.view().notice.as_deref(),
        Some("An error occurred while stopping the task.")
    );
    assert!(state.view().stop_visible);
}

#[test]
fn stop_flow_converges_on_the_stopped_status() {
    init_logging();
    // submit -> first poll at 10% -> stop -> ack -> confirming query.
    let state = polling("abc");
    let (state, _) = update(
        state,
        Msg::StatusArrived {
            job_id: "abc".to_string(),
            status: JobStatus::InProgress {
                percent: Some(10),
                label: "Processing".to_string(),
            },
        },
    );
    assert_eq!(state.view().percent, 10);
    assert!(state.view().stop_visible);

    let (state, effects) = update(state, Msg::StopRequested);
    assert_eq!(
        effects,
        vec![Effect::RequestStop {
            job_id: "abc".to_string(),
        }]
    );

    let (state, effects) = update(
        state,
        Msg::StopAcknowledged {
            message: "Stopping".to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::QueryStatus {
            job_id: "abc".to_string(),
        }]
    );

    let (state, effects) = update(
        state,
        Msg::StatusArrived {
            job_id: "abc".to_string(),
            status: JobStatus::Stopped,
        },
    );
    assert_eq!(state.phase(), TrackerPhase::Terminal);
    assert_eq!(state.outcome(), Some(TerminalKind::Stopped));
    assert_eq!(effects, vec![Effect::StopPolling, Effect::ClearHandle]);

    let view = state.view();
    assert!(!view.progress_visible);
    assert!(!view.stop_visible);
    assert_eq!(view.notice.as_deref(), Some("Stopped by User"));
}

#[test]
fn stop_ack_after_terminal_is_ignored() {
    init_logging();
    let state = polling("abc");
    let (mut state, _) = update(
        state,
        Msg::StatusArrived {
            job_id: "abc".to_string(),
            status: JobStatus::Completed { artifacts: vec![] },
        },
    );
    assert!(state.consume_dirty());

    let before = state.clone();
    let (state, effects) = update(
        state,
        Msg::StopAcknowledged {
            message: "Task stop requested.".to_string(),
        },
    );
    assert_eq!(state, before);
    assert!(effects.is_empty());
}
