use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use client_logging::{client_debug, client_info, client_warn};
use gifmill_client::{
    ClientEvent, ClientHandle, ClientSettings, StatusReport, SubmitError, TaskHandleStore,
};
use gifmill_core::{Effect, JobStatus, Msg};

/// Executes core effects against the HTTP client and the handle store, and
/// feeds client events back into the message loop.
pub struct EffectRunner {
    client: Arc<ClientHandle>,
    store: Arc<dyn TaskHandleStore>,
}

impl EffectRunner {
    pub fn new(
        settings: ClientSettings,
        store: Arc<dyn TaskHandleStore>,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Self {
        let client = Arc::new(ClientHandle::new(settings));
        let runner = Self { client, store };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitVideo { video } => {
                    client_info!("uploading {}", video.display());
                    self.client.submit(video);
                }
                Effect::StoreHandle { job_id } => self.store.set(&job_id),
                Effect::ClearHandle => self.store.clear(),
                Effect::StartPolling { job_id } => {
                    client_info!("polling job {job_id}");
                    self.client.watch(job_id);
                }
                Effect::StopPolling => self.client.cancel_watch(),
                Effect::QueryStatus { job_id } => self.client.query_once(job_id),
                Effect::RequestStop { job_id } => {
                    client_info!("requesting stop for job {job_id}");
                    self.client.request_stop(job_id);
                }
            }
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let client = self.client.clone();
        thread::spawn(move || loop {
            if let Some(event) = client.try_recv() {
                if msg_tx.send(map_event(event)).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_event(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::SubmitResolved { result } => match result {
            Ok(job_id) => {
                client_info!("job {job_id} accepted");
                Msg::SubmitAccepted { job_id }
            }
            Err(SubmitError::Rejected { reason }) => Msg::SubmitRejected { reason },
            Err(SubmitError::Transport(error)) => {
                client_warn!("upload failed: {error}");
                Msg::SubmitUnreachable
            }
        },
        ClientEvent::StatusReported { job_id, report } => {
            client_logging::set_poll_tick(client_logging::get_poll_tick() + 1);
            client_debug!(
                "tick {}: job {job_id} reported {:?}",
                client_logging::get_poll_tick(),
                report.status
            );
            Msg::StatusArrived {
                job_id,
                status: map_report(report),
            }
        }
        ClientEvent::StatusFailed { job_id, error } => {
            client_warn!("progress query failed for job {job_id}: {error}");
            Msg::StatusUnavailable { job_id }
        }
        ClientEvent::StopResolved { job_id, result } => match result {
            Ok(ack) => Msg::StopAcknowledged {
                message: ack.message,
            },
            Err(error) => {
                client_warn!("stop request failed for job {job_id}: {error}");
                Msg::StopUnreachable
            }
        },
    }
}

/// Boundary parse: one raw wire report into the tagged status the state
/// machine consumes.
fn map_report(report: StatusReport) -> JobStatus {
    let percent = report
        .progress
        .map(|p| p.clamp(0.0, 100.0).round() as u8);
    JobStatus::from_report(percent, report.status.as_deref(), report.gifs)
}
