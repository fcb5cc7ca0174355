use std::path::Path;
use std::time::Duration;

use reqwest::Body;
use serde::Deserialize;
use tokio_util::codec::{BytesCodec, FramedRead};
use url::Url;

use crate::{ApiError, ApiFailure, JobId, StatusReport, StopAck, SubmitError};

/// Connection settings for the conversion server.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Reply to a submission. The server sets exactly one of the two fields.
#[derive(Debug, Clone, Deserialize)]
struct SubmitReply {
    task_id: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct StopReply {
    message: Option<String>,
    error: Option<String>,
}

#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    /// Upload one video file; on acceptance the server mints a job id.
    async fn submit(&self, video: &Path) -> Result<JobId, SubmitError>;

    /// Query the current status of a job.
    async fn status(&self, job_id: &str) -> Result<StatusReport, ApiError>;

    /// Ask the server to stop a job. The acknowledgement text is returned
    /// even when the server reports the job as already finished.
    async fn request_stop(&self, job_id: &str) -> Result<StopAck, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ClientSettings,
}

impl ReqwestApi {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, ApiError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiFailure::Network, err.to_string()))
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path);
        Url::parse(&raw)
            .map_err(|err| ApiError::new(ApiFailure::Network, format!("bad endpoint {raw}: {err}")))
    }
}

#[async_trait::async_trait]
impl JobApi for ReqwestApi {
    async fn submit(&self, video: &Path) -> Result<JobId, SubmitError> {
        let url = self.endpoint("upload").map_err(SubmitError::Transport)?;
        let client = self.build_client().map_err(SubmitError::Transport)?;

        // An unreadable file is an input problem, same as a server-side
        // validation failure: surface the reason, no job is created.
        let file = tokio::fs::File::open(video).await.map_err(|err| {
            SubmitError::Rejected {
                reason: format!("cannot open {}: {err}", video.display()),
            }
        })?;
        let file_name = video
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.mp4")
            .to_string();
        let stream = FramedRead::new(file, BytesCodec::new());
        let part = reqwest::multipart::Part::stream(Body::wrap_stream(stream)).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("video", part);

        let response = client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| SubmitError::Transport(map_reqwest_error(err)))?;

        // Acceptance and rejection both come back as JSON; the HTTP status
        // only varies with them, so the body is what gets classified.
        let reply: SubmitReply = response
            .json()
            .await
            .map_err(|err| SubmitError::Transport(map_reqwest_error(err)))?;

        match (reply.task_id, reply.error) {
            (Some(task_id), _) => Ok(task_id),
            (None, Some(reason)) => Err(SubmitError::Rejected { reason }),
            (None, None) => Err(SubmitError::Transport(ApiError::new(
                ApiFailure::MalformedReply,
                "reply named neither task_id nor error",
            ))),
        }
    }

    async fn status(&self, job_id: &str) -> Result<StatusReport, ApiError> {
        let url = self.endpoint(&format!("progress/{job_id}"))?;
        let client = self.build_client()?;

        let response = client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ApiFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        response
            .json::<StatusReport>()
            .await
            .map_err(map_reqwest_error)
    }

    async fn request_stop(&self, job_id: &str) -> Result<StopAck, ApiError> {
        let url = self.endpoint(&format!("stop/{job_id}"))?;
        let client = self.build_client()?;

        let response = client.post(url).send().await.map_err(map_reqwest_error)?;
        let reply: StopReply = response.json().await.map_err(map_reqwest_error)?;
        let message = reply
            .message
            .or(reply.error)
            .unwrap_or_else(|| "Stop requested.".to_string());
        Ok(StopAck { message })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiFailure::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(ApiFailure::MalformedReply, err.to_string());
    }
    ApiError::new(ApiFailure::Network, err.to_string())
}
