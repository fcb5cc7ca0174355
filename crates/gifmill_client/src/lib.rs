//! Gifmill client: HTTP access to the conversion server, the repeating
//! status poller, and the durable task handle.
mod api;
mod handle;
mod poller;
mod types;

pub use api::{ClientSettings, JobApi, ReqwestApi};
pub use handle::{CookieFileStore, HandleError, MemoryHandleStore, TaskHandleStore};
pub use poller::ClientHandle;
pub use types::{
    ApiError, ApiFailure, ClientEvent, JobId, StatusReport, StopAck, SubmitError,
};
