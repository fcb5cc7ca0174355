use std::fmt;

use serde::Deserialize;

pub type JobId = String;

/// One raw progress report, as served by `GET /progress/{task_id}`.
///
/// The fields mirror the wire payload; classification into a tagged status
/// happens where the report crosses into the state machine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusReport {
    pub progress: Option<f64>,
    pub status: Option<String>,
    #[serde(default)]
    pub gifs: Vec<String>,
}

/// Acknowledgement of a stop request. The text comes from the reply's
/// `message` field, or from its `error` field when the server considered
/// the job already finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopAck {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiFailure,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFailure {
    Network,
    Timeout,
    HttpStatus(u16),
    MalformedReply,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::Network => write!(f, "network error"),
            ApiFailure::Timeout => write!(f, "timeout"),
            ApiFailure::HttpStatus(code) => write!(f, "http status {code}"),
            ApiFailure::MalformedReply => write!(f, "malformed reply"),
        }
    }
}

/// Why a submission produced no job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The server refused the payload before creating a job.
    Rejected { reason: String },
    /// The request never produced a decodable reply.
    Transport(ApiError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Rejected { reason } => write!(f, "rejected: {reason}"),
            SubmitError::Transport(error) => write!(f, "transport: {error}"),
        }
    }
}

/// Events delivered from the client IO thread to the driving application.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    SubmitResolved {
        result: Result<JobId, SubmitError>,
    },
    StatusReported {
        job_id: JobId,
        report: StatusReport,
    },
    StatusFailed {
        job_id: JobId,
        error: ApiError,
    },
    StopResolved {
        job_id: JobId,
        result: Result<StopAck, ApiError>,
    },
}
