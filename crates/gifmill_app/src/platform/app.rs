use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use client_logging::{client_info, client_warn};
use gifmill_client::{ClientSettings, CookieFileStore, TaskHandleStore};
use gifmill_core::{update, AppState, Msg, TerminalKind, TrackerPhase};

use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::ui;

const COOKIE_FILE: &str = ".gifmill_task.cookie";
const HANDLE_MAX_AGE: Duration = Duration::from_secs(3600);

pub fn run_app() -> ExitCode {
    logging::initialize(LogDestination::File);

    let settings = settings_from_env();
    let video = std::env::args().nth(1).map(PathBuf::from);

    let store: Arc<dyn TaskHandleStore> =
        Arc::new(CookieFileStore::new(PathBuf::from(COOKIE_FILE), HANDLE_MAX_AGE));

    // A stored handle wins over a fresh upload: one active job per client.
    let initial = match (store.get(), video) {
        (Some(job_id), video) => {
            if video.is_some() {
                client_warn!("a task is already in progress; resuming {job_id} instead of uploading");
            }
            println!("Resuming task {job_id}...");
            Msg::HandleRestored { job_id }
        }
        (None, Some(video)) => Msg::SubmitRequested { video },
        (None, None) => {
            eprintln!("usage: gifmill_app <video-file>");
            eprintln!("       GIFMILL_SERVER overrides the server address");
            return ExitCode::FAILURE;
        }
    };

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(settings.clone(), store, msg_tx.clone());
    spawn_stop_listener(msg_tx.clone());

    println!("Type 'stop' and press Enter to cancel the conversion.");
    let _ = msg_tx.send(initial);
    drop(msg_tx);

    let mut state = AppState::new();
    while let Ok(msg) = msg_rx.recv() {
        let (next, effects) = update(state, msg);
        state = next;
        runner.run(effects);
        if state.consume_dirty() {
            ui::render(&state.view(), &settings.base_url);
        }
        if state.phase() == TrackerPhase::Terminal || state.is_settled() {
            break;
        }
    }

    match state.outcome() {
        Some(TerminalKind::Completed) => {
            client_info!("job finished with {} artifact(s)", state.view().gallery.len());
            ExitCode::SUCCESS
        }
        _ => ExitCode::FAILURE,
    }
}

fn settings_from_env() -> ClientSettings {
    let mut settings = ClientSettings::default();
    if let Ok(base) = std::env::var("GIFMILL_SERVER") {
        let base = base.trim();
        if !base.is_empty() {
            settings.base_url = base.to_string();
        }
    }
    settings
}

/// The terminal stands in for the stop button: typing `stop` asks the
/// server to cancel the active job.
fn spawn_stop_listener(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().eq_ignore_ascii_case("stop") {
                client_info!("stop requested from the terminal");
                if msg_tx.send(Msg::StopRequested).is_err() {
                    break;
                }
            }
        }
    });
}
