use crate::{AppState, Effect, JobStatus, Msg, TerminalKind, TrackerPhase};

// Notices for failures the server never got to describe. These mirror the
// wording shown by the browser front end of the conversion service.
const UPLOAD_FAILED_NOTICE: &str = "An error occurred during upload.";
const PROGRESS_FAILED_NOTICE: &str = "Failed to retrieve progress.";
const STOP_FAILED_NOTICE: &str = "An error occurred while stopping the task.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SubmitRequested { video } => {
            state.begin_submission();
            vec![Effect::SubmitVideo { video }]
        }
        Msg::SubmitAccepted { job_id } => {
            state.begin_polling(job_id.clone());
            vec![
                Effect::StoreHandle {
                    job_id: job_id.clone(),
                },
                Effect::StartPolling { job_id },
            ]
        }
        Msg::SubmitRejected { reason } => {
            state.reset_idle(reason);
            Vec::new()
        }
        Msg::SubmitUnreachable => {
            state.reset_idle(UPLOAD_FAILED_NOTICE.to_string());
            Vec::new()
        }
        Msg::HandleRestored { job_id } => {
            state.resume_polling(job_id.clone());
            vec![Effect::StartPolling { job_id }]
        }
        Msg::StatusArrived { job_id, status } => {
            if !state.tracks(&job_id) {
                return (state, Vec::new());
            }
            match status {
                JobStatus::Queued => {
                    state.apply_progress(None, "Queued");
                    Vec::new()
                }
                JobStatus::InProgress { percent, label } => {
                    state.apply_progress(percent, &label);
                    Vec::new()
                }
                JobStatus::Completed { artifacts } => {
                    state.finish_completed(artifacts);
                    terminal_cleanup()
                }
                JobStatus::Failed { reason } => {
                    state.finish_interrupted(reason, TerminalKind::Failed);
                    terminal_cleanup()
                }
                JobStatus::Stopped => {
                    state.finish_interrupted("Stopped by User".to_string(), TerminalKind::Stopped);
                    terminal_cleanup()
                }
            }
        }
        Msg::StatusUnavailable { job_id } => {
            if !state.tracks(&job_id) {
                return (state, Vec::new());
            }
            state.finish_interrupted(PROGRESS_FAILED_NOTICE.to_string(), TerminalKind::Failed);
            terminal_cleanup()
        }
        Msg::StopRequested => match (state.phase(), state.job_id()) {
            (TrackerPhase::Polling, Some(job_id)) => vec![Effect::RequestStop {
                job_id: job_id.to_string(),
            }],
            _ => Vec::new(),
        },
        Msg::StopAcknowledged { message } => {
            match (state.phase(), state.job_id().map(str::to_string)) {
                (TrackerPhase::Polling, Some(job_id)) => {
                    // The acknowledgement is informational; the follow-up
                    // query resolves the authoritative terminal status.
                    state.set_notice(message);
                    vec![Effect::QueryStatus { job_id }]
                }
                _ => Vec::new(),
            }
        }
        Msg::StopUnreachable => {
            if state.phase() == TrackerPhase::Polling {
                // The next scheduled tick keeps running; a failed stop
                // request must not leave the job untracked.
                state.set_notice(STOP_FAILED_NOTICE.to_string());
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

// Entering `Terminal` disarms the ticker (idempotent on the executor side)
// and forgets the persisted handle, so the next launch starts idle.
fn terminal_cleanup() -> Vec<Effect> {
    vec![Effect::StopPolling, Effect::ClearHandle]
}
