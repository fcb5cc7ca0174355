use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use client_logging::{client_debug, client_info, client_warn};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::{ClientSettings, JobApi, ReqwestApi};
use crate::{ClientEvent, JobId};

enum ClientCommand {
    Submit { video: PathBuf },
    Watch { job_id: JobId },
    CancelWatch,
    QueryOnce { job_id: JobId },
    RequestStop { job_id: JobId },
}

/// Handle to the client IO thread.
///
/// Commands go in over a channel; [`ClientEvent`]s come back out through
/// [`ClientHandle::try_recv`]. The thread owns a tokio runtime, so callers
/// never block on network IO.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: Mutex<mpsc::Receiver<ClientEvent>>,
}

impl ClientHandle {
    pub fn new(settings: ClientSettings) -> Self {
        let poll_interval = settings.poll_interval;
        Self::with_api(Arc::new(ReqwestApi::new(settings)), poll_interval)
    }

    /// Like [`ClientHandle::new`] but with a caller-supplied API, so tests
    /// can script the server's answers.
    pub fn with_api(api: Arc<dyn JobApi>, poll_interval: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ClientCommand>();
        let (event_tx, event_rx) = mpsc::channel::<ClientEvent>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut watch = WatchSlot::default();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    ClientCommand::Submit { video } => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = api.submit(&video).await;
                            let _ = event_tx.send(ClientEvent::SubmitResolved { result });
                        });
                    }
                    ClientCommand::Watch { job_id } => {
                        let token = watch.arm();
                        runtime.spawn(watch_job(
                            api.clone(),
                            poll_interval,
                            job_id,
                            token,
                            event_tx.clone(),
                        ));
                    }
                    ClientCommand::CancelWatch => watch.disarm(),
                    ClientCommand::QueryOnce { job_id } => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let event = query_event(api.as_ref(), job_id).await;
                            let _ = event_tx.send(event);
                        });
                    }
                    ClientCommand::RequestStop { job_id } => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = api.request_stop(&job_id).await;
                            let _ = event_tx.send(ClientEvent::StopResolved { job_id, result });
                        });
                    }
                }
            }
            // Command channel closed: make sure no watcher outlives the app.
            watch.disarm();
        });

        Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
        }
    }

    pub fn submit(&self, video: PathBuf) {
        let _ = self.cmd_tx.send(ClientCommand::Submit { video });
    }

    pub fn watch(&self, job_id: impl Into<JobId>) {
        let _ = self.cmd_tx.send(ClientCommand::Watch {
            job_id: job_id.into(),
        });
    }

    pub fn cancel_watch(&self) {
        let _ = self.cmd_tx.send(ClientCommand::CancelWatch);
    }

    pub fn query_once(&self, job_id: impl Into<JobId>) {
        let _ = self.cmd_tx.send(ClientCommand::QueryOnce {
            job_id: job_id.into(),
        });
    }

    pub fn request_stop(&self, job_id: impl Into<JobId>) {
        let _ = self.cmd_tx.send(ClientCommand::RequestStop {
            job_id: job_id.into(),
        });
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }
}

/// At most one armed watcher. Arming again cancels the previous one, and
/// disarming with nothing armed is a no-op.
#[derive(Default)]
struct WatchSlot {
    token: Option<CancellationToken>,
}

impl WatchSlot {
    fn arm(&mut self) -> CancellationToken {
        self.disarm();
        let token = CancellationToken::new();
        self.token = Some(token.clone());
        token
    }

    fn disarm(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}

async fn watch_job(
    api: Arc<dyn JobApi>,
    interval: Duration,
    job_id: JobId,
    token: CancellationToken,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    client_info!("watching job {job_id} every {interval:?}");
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        // Cancellation during the query gap must not issue another one.
        if token.is_cancelled() {
            break;
        }
        let event = query_event(api.as_ref(), job_id.clone()).await;
        if event_tx.send(event).is_err() {
            break;
        }
    }
    client_debug!("watcher for job {job_id} stopped");
}

async fn query_event(api: &dyn JobApi, job_id: JobId) -> ClientEvent {
    match api.status(&job_id).await {
        Ok(report) => ClientEvent::StatusReported { job_id, report },
        Err(error) => {
            client_warn!("status query for job {job_id} failed: {error}");
            ClientEvent::StatusFailed { job_id, error }
        }
    }
}
