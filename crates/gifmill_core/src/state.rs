use crate::view_model::{AppViewModel, GalleryRowView};

pub type JobId = String;

/// Lifecycle of the tracked job, from the controller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerPhase {
    /// No job is being tracked.
    #[default]
    Idle,
    /// A job id is known and status queries are being issued.
    Polling,
    /// The job reached a terminal status. Final.
    Terminal,
}

/// How a tracked job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    Completed,
    Failed,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    phase: TrackerPhase,
    job_id: Option<JobId>,
    submit_in_flight: bool,
    percent: u8,
    status_line: String,
    artifacts: Vec<String>,
    notice: Option<String>,
    outcome: Option<TerminalKind>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn outcome(&self) -> Option<TerminalKind> {
        self.outcome
    }

    /// True when no job is tracked and no submission is outstanding.
    pub fn is_settled(&self) -> bool {
        self.phase == TrackerPhase::Idle && !self.submit_in_flight
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            progress_visible: self.submit_in_flight || self.phase == TrackerPhase::Polling,
            percent: self.percent,
            status_line: self.status_line.clone(),
            stop_visible: self.phase == TrackerPhase::Polling,
            notice: self.notice.clone(),
            gallery: self
                .artifacts
                .iter()
                .map(|name| GalleryRowView::for_artifact(name))
                .collect(),
        }
    }

    /// Returns whether a render is due and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    /// Whether `job_id` is the job currently being polled. Reports for any
    /// other id (a finished job, a superseded submission) are stale.
    pub(crate) fn tracks(&self, job_id: &str) -> bool {
        self.phase == TrackerPhase::Polling && self.job_id.as_deref() == Some(job_id)
    }

    pub(crate) fn begin_submission(&mut self) {
        self.submit_in_flight = true;
        self.percent = 0;
        self.status_line = "Uploading video...".to_string();
        self.artifacts.clear();
        self.notice = None;
        self.dirty = true;
    }

    pub(crate) fn begin_polling(&mut self, job_id: JobId) {
        self.phase = TrackerPhase::Polling;
        self.job_id = Some(job_id);
        self.submit_in_flight = false;
        self.dirty = true;
    }

    pub(crate) fn resume_polling(&mut self, job_id: JobId) {
        self.begin_polling(job_id);
        self.percent = 0;
        self.status_line = "Resuming previous task...".to_string();
    }

    pub(crate) fn apply_progress(&mut self, percent: Option<u8>, label: &str) {
        if let Some(percent) = percent {
            self.percent = percent.min(100);
        }
        if !label.is_empty() {
            self.status_line = label.to_string();
        }
        self.dirty = true;
    }

    pub(crate) fn finish_completed(&mut self, artifacts: Vec<String>) {
        self.phase = TrackerPhase::Terminal;
        self.outcome = Some(TerminalKind::Completed);
        self.submit_in_flight = false;
        self.percent = 100;
        self.status_line = "Completed".to_string();
        self.artifacts = artifacts;
        self.dirty = true;
    }

    pub(crate) fn finish_interrupted(&mut self, reason: String, kind: TerminalKind) {
        self.phase = TrackerPhase::Terminal;
        self.outcome = Some(kind);
        self.submit_in_flight = false;
        self.notice = Some(reason);
        self.dirty = true;
    }

    pub(crate) fn reset_idle(&mut self, notice: String) {
        self.phase = TrackerPhase::Idle;
        self.job_id = None;
        self.submit_in_flight = false;
        self.notice = Some(notice);
        self.dirty = true;
    }

    pub(crate) fn set_notice(&mut self, notice: String) {
        self.notice = Some(notice);
        self.dirty = true;
    }
}
