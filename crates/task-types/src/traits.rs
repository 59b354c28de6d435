//! Transport and observer traits, and the error types shared by every layer.

use crate::{DownloadResponse, JobHandle, JobRequest, StartResponse, StatusResponse, TaskSpec};
use async_trait::async_trait;
use std::time::Duration;

/// Remote task API: one call per protocol step.
///
/// Implementations return the decoded body for any 2xx response, whatever its
/// `success` flag says; interpreting the flag is the caller's job.
#[async_trait]
pub trait JobApi: Send + Sync {
    /// Upload the request's file and fields to the task's start endpoint.
    async fn start(
        &self,
        task: &TaskSpec,
        request: &JobRequest,
        timeout: Duration,
    ) -> Result<StartResponse, TransportError>;

    /// Query job status.
    async fn status(
        &self,
        task: &TaskSpec,
        handle: &JobHandle,
        credential: &str,
        timeout: Duration,
    ) -> Result<StatusResponse, TransportError>;

    /// Ask for the result location.
    async fn download(
        &self,
        task: &TaskSpec,
        handle: &JobHandle,
        credential: &str,
        timeout: Duration,
    ) -> Result<DownloadResponse, TransportError>;
}

/// Receives progress from the poll loop. Attempts are 1-based.
pub trait PollObserver: Send + Sync {
    /// Status answered but the job is not complete yet.
    fn pending(&self, _task: &TaskSpec, _handle: &JobHandle, _attempt: u32, _max_attempts: u32) {}

    /// A poll attempt failed and will be retried (counted against the budget).
    fn transient_failure(
        &self,
        _task: &TaskSpec,
        _handle: &JobHandle,
        _attempt: u32,
        _max_attempts: u32,
        _error: &TransportError,
    ) {
    }

    /// Status reported completion on `attempt`.
    fn complete(&self, _task: &TaskSpec, _handle: &JobHandle, _attempt: u32) {}
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("request failed: {0}")]
    Request(String),
    #[error("invalid response body ({message}): {body}")]
    Decode { message: String, body: String },
    #[error("cannot read upload file: {0}")]
    Io(String),
}

/// Failure of one job phase.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("start request rejected: {0}")]
    Submission(String),
    #[error("status query failed: {0}")]
    StatusQuery(String),
    #[error("job failed remotely: {0}")]
    Failed(String),
    #[error("job did not complete after {attempts} status checks")]
    Timeout { attempts: u32 },
    #[error("download request rejected: {0}")]
    ResultFetch(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// The single error a full run reports: which task failed and why.
#[derive(Debug, thiserror::Error)]
#[error("{task} task failed: {source}")]
pub struct TaskError {
    pub task: String,
    #[source]
    pub source: JobError,
}

impl TaskError {
    pub fn new(task: impl Into<String>, source: JobError) -> Self {
        Self {
            task: task.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_error_message_carries_inner_cause() {
        let inner = JobError::Submission(
            TransportError::Http {
                status: 500,
                body: "{\"error\":\"boom\"}".to_string(),
            }
            .to_string(),
        );
        let err = TaskError::new("de-reverb", inner);
        let msg = err.to_string();
        assert!(msg.starts_with("de-reverb task failed: start request rejected"));
        assert!(msg.contains("HTTP 500"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn timeout_reports_attempts() {
        assert_eq!(
            JobError::Timeout { attempts: 60 }.to_string(),
            "job did not complete after 60 status checks"
        );
    }
}
