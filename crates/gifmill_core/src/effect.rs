use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Upload the form payload to the server.
    SubmitVideo { video: PathBuf },
    /// Persist the active job id in the durable handle.
    StoreHandle { job_id: crate::JobId },
    /// Expire the durable handle immediately.
    ClearHandle,
    /// Arm the repeating status query for this job.
    StartPolling { job_id: crate::JobId },
    /// Disarm the repeating status query. Safe to issue more than once.
    StopPolling,
    /// Issue one immediate status query outside the regular cadence.
    QueryStatus { job_id: crate::JobId },
    /// Ask the server to stop the job.
    RequestStop { job_id: crate::JobId },
}
