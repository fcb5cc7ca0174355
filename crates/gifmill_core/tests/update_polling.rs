use std::path::PathBuf;
use std::sync::Once;

use gifmill_core::{update, AppState, Effect, JobStatus, Msg, TerminalKind, TrackerPhase};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

/// A state already polling `job_id`, as after an accepted submission.
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

fn report(job_id: &str, status: JobStatus) -> Msg {
    Msg::StatusArrived {
        job_id: job_id.to_string(),
        status,
    }
}

#[test]
fn percent_tracks_the_last_reported_value() {
    init_logging();
    let state = polling("abc");

    let (state, effects) = update(
        state,
        report(
            "abc",
            JobStatus::InProgress {
                percent: Some(10),
                label: "Processing Chunk 1-1".to_string(),
            },
        ),
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.percent, 10);
    assert_eq!(view.status_line, "Processing Chunk 1-1");
    assert!(view.stop_visible);

    // A report without a progress field keeps the last percent.
    let (state, _) = update(
        state,
        report(
            "abc",
            JobStatus::InProgress {
                percent: None,
                label: "Finished Processing Chunk 1".to_string(),
            },
        ),
    );
    let view = state.view();
    assert_eq!(view.percent, 10);
    assert_eq!(view.status_line, "Finished Processing Chunk 1");
}

#[test]
fn queued_status_keeps_percent() {
    init_logging();
    let state = polling("abc");
    let (state, _) = update(
        state,
        report(
            "abc",
            JobStatus::InProgress {
                percent: Some(5),
                label: "Loading Video".to_string(),
            },
        ),
    );
    let (state, _) = update(state, report("abc", JobStatus::Queued));

    let view = state.view();
    assert_eq!(view.percent, 5);
    assert_eq!(view.status_line, "Queued");
}

#[test]
fn completion_forces_percent_to_100_and_builds_the_gallery() {
    init_logging();
    let state = polling("xyz");
    let (state, _) = update(
        state,
        report(
            "xyz",
            JobStatus::InProgress {
                percent: Some(87),
                label: "Finished Processing Chunk 3".to_string(),
            },
        ),
    );

    let (state, effects) = update(
        state,
        report(
            "xyz",
            JobStatus::Completed {
                artifacts: vec!["a.gif".to_string(), "b.gif".to_string()],
            },
        ),
    );

    assert_eq!(state.phase(), TrackerPhase::Terminal);
    assert_eq!(state.outcome(), Some(TerminalKind::Completed));
    assert_eq!(effects, vec![Effect::StopPolling, Effect::ClearHandle]);

    let view = state.view();
    assert_eq!(view.percent, 100);
    assert!(!view.progress_visible);
    assert!(!view.stop_visible);
    assert_eq!(view.gallery.len(), 2);
    assert_eq!(view.gallery[0].artifact, "a.gif");
    assert_eq!(view.gallery[0].preview_href, "/static/uploads/output/a.gif");
    assert_eq!(view.gallery[0].download_href, "/download/a.gif");
    assert_eq!(view.gallery[1].preview_href, "/static/uploads/output/b.gif");
    assert_eq!(view.gallery[1].download_href, "/download/b.gif");
}

#[test]
fn completion_with_no_artifacts_renders_an_empty_gallery() {
    init_logging();
    let state = polling("xyz");
    let (state, effects) = update(
        state,
        report("xyz", JobStatus::Completed { artifacts: vec![] }),
    );

    assert_eq!(effects, vec![Effect::StopPolling, Effect::ClearHandle]);
    let view = state.view();
    assert!(view.gallery.is_empty());
    assert!(!view.progress_visible);
}

#[test]
fn failed_status_is_terminal_with_the_reason_shown_verbatim() {
    init_logging();
    let state = polling("abc");
    let (state, effects) = update(
        state,
        report(
            "abc",
            JobStatus::Failed {
                reason: "Failed: Video too short".to_string(),
            },
        ),
    );

    assert_eq!(state.phase(), TrackerPhase::Terminal);
    assert_eq!(state.outcome(), Some(TerminalKind::Failed));
    assert_eq!(effects, vec![Effect::StopPolling, Effect::ClearHandle]);

    let view = state.view();
    assert!(!view.progress_visible);
    assert!(!view.stop_visible);
    assert_eq!(view.notice.as_deref(), Some("Failed: Video too short"));
}

#[test]
fn poll_transport_failure_is_terminal_with_a_generic_notice() {
    init_logging();
    let state = polling("abc");
    let (state, effects) = update(
        state,
        Msg::StatusUnavailable {
            job_id: "abc".to_string(),
        },
    );

    assert_eq!(state.phase(), TrackerPhase::Terminal);
    assert_eq!(state.outcome(), Some(TerminalKind::Failed));
    assert_eq!(effects, vec![Effect::StopPolling, Effect::ClearHandle]);
    assert_eq!(
        state.view().notice.as_deref(),
        Some("Failed to retrieve progress.")
    );
}

#[test]
fn terminal_cleanup_is_idempotent() {
    init_logging();
    let state = polling("xyz");
    let (mut state, _) = update(
        state,
        report(
            "xyz",
            JobStatus::Completed {
                artifacts: vec!["a.gif".to_string()],
            },
        ),
    );
    assert!(state.consume_dirty());

    // A late duplicate of the terminal report changes nothing: no second
    // cleanup, no re-render, no duplicated gallery.
    let before = state.clone();
    let (mut state, effects) = update(
        state,
        report(
            "xyz",
            JobStatus::Completed {
                artifacts: vec!["a.gif".to_string()],
            },
        ),
    );
    assert_eq!(state, before);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn reports_for_other_jobs_are_ignored() {
    init_logging();
    let state = polling("abc");
    let before = state.clone();
    let (state, effects) = update(
        state,
        report(
            "stale",
            JobStatus::InProgress {
                percent: Some(90),
                label: "Processing".to_string(),
            },
        ),
    );

    assert_eq!(state, before);
    assert!(effects.is_empty());
}
