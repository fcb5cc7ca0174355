use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted the upload form with a video file.
    SubmitRequested { video: PathBuf },
    /// The server accepted the submission and minted a job id.
    SubmitAccepted { job_id: crate::JobId },
    /// The server rejected the submission before creating a job.
    SubmitRejected { reason: String },
    /// The submission request failed in transit.
    SubmitUnreachable,
    /// A previously stored task handle was found on startup.
    HandleRestored { job_id: crate::JobId },
    /// One poll tick produced a parsed status.
    StatusArrived {
        job_id: crate::JobId,
        status: crate::JobStatus,
    },
    /// A status query failed in transit or could not be decoded.
    StatusUnavailable { job_id: crate::JobId },
    /// User asked to stop the active job.
    StopRequested,
    /// The stop request resolved with a server acknowledgement.
    StopAcknowledged { message: String },
    /// The stop request failed in transit.
    StopUnreachable,
    /// Fallback for placeholder wiring.
    NoOp,
}
