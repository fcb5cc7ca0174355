//! Gifmill core: pure job-tracking state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, JobId, TerminalKind, TrackerPhase};
pub use status::JobStatus;
pub use update::update;
pub use view_model::{AppViewModel, GalleryRowView};
