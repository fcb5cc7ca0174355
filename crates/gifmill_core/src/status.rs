/// Job status as reported by the conversion server, parsed into a tagged
/// value at the wire boundary. The rest of the state machine never inspects
/// raw status text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Accepted but not yet picked up by the executor.
    Queued,
    /// Any free-form progress label. `percent` is absent when the report
    /// carried no progress field; the last displayed value then stands.
    InProgress {
        percent: Option<u8>,
        label: String,
    },
    /// The job produced its artifacts.
    Completed { artifacts: Vec<String> },
    /// The executor reported a failure.
    Failed { reason: String },
    /// The job honored a stop request.
    Stopped,
}

impl JobStatus {
    /// Classifies one raw report. A status string of `"Completed"`, anything
    /// beginning with `"Failed"`, and `"Stopped by User"` are the three
    /// terminal spellings of the server contract; everything else is a
    /// progress label.
    pub fn from_report(percent: Option<u8>, status: Option<&str>, artifacts: Vec<String>) -> Self {
        let label = status.unwrap_or("").trim();
        if label == "Completed" {
            return JobStatus::Completed { artifacts };
        }
        if label.starts_with("Failed") {
            return JobStatus::Failed {
                reason: label.to_string(),
            };
        }
        if label == "Stopped by User" {
            return JobStatus::Stopped;
        }
        if label == "Queued" {
            return JobStatus::Queued;
        }
        JobStatus::InProgress {
            percent: percent.map(|p| p.min(100)),
            label: label.to_string(),
        }
    }

    /// True for the statuses after which no further polling happens.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed { .. } | JobStatus::Failed { .. } | JobStatus::Stopped
        )
    }
}
