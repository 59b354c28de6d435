//! Scripted transport for tests: canned responses per endpoint, no network.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use task_types::{
    DownloadResponse, JobApi, JobHandle, JobRequest, StartResponse, StatusResponse, TaskSpec,
    TransportError,
};
use tokio::time::Instant;

type Script<T> = Mutex<VecDeque<Result<T, TransportError>>>;

/// Replays queued responses in order. Once the status queue is drained every
/// further status call answers `{"success": false}`; drained start and download
/// queues answer with a `Request` error.
#[derive(Default)]
pub struct ScriptedJobApi {
    start: Script<StartResponse>,
    status: Script<StatusResponse>,
    download: Script<DownloadResponse>,
    start_calls: Mutex<u32>,
    status_times: Mutex<Vec<Instant>>,
    download_calls: Mutex<u32>,
    credentials: Mutex<Vec<String>>,
}

impl ScriptedJobApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_start(self, r: Result<StartResponse, TransportError>) -> Self {
        self.start.lock().unwrap().push_back(r);
        self
    }

    pub fn push_status(self, r: Result<StatusResponse, TransportError>) -> Self {
        self.status.lock().unwrap().push_back(r);
        self
    }

    pub fn push_download(self, r: Result<DownloadResponse, TransportError>) -> Self {
        self.download.lock().unwrap().push_back(r);
        self
    }

    /// Accepted start with the given job id.
    pub fn accepting(job_id: &str) -> Self {
        Self::new().push_start(Ok(StartResponse {
            success: true,
            music_id: Some(job_id.to_string()),
            message: None,
        }))
    }

    /// Queue `pending` not-done answers followed by one done answer.
    pub fn completing_after(self, pending: u32) -> Self {
        let mut s = self;
        for _ in 0..pending {
            s = s.push_status(Ok(StatusResponse::default()));
        }
        s.push_status(Ok(StatusResponse {
            success: true,
            ..StatusResponse::default()
        }))
    }

    /// Successful download answer with `url`.
    pub fn with_url(self, url: &str) -> Self {
        self.push_download(Ok(DownloadResponse {
            success: true,
            data: Some(task_types::DownloadData {
                url: Some(url.to_string()),
            }),
            message: None,
        }))
    }

    pub fn start_calls(&self) -> u32 {
        *self.start_calls.lock().unwrap()
    }

    pub fn status_calls(&self) -> u32 {
        self.status_times.lock().unwrap().len() as u32
    }

    pub fn download_calls(&self) -> u32 {
        *self.download_calls.lock().unwrap()
    }

    /// Clock readings (tokio time) at each status call.
    pub fn status_call_times(&self) -> Vec<Instant> {
        self.status_times.lock().unwrap().clone()
    }

    /// Credentials seen, one entry per call of any kind.
    pub fn credentials(&self) -> Vec<String> {
        self.credentials.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl JobApi for ScriptedJobApi {
    async fn start(
        &self,
        _task: &TaskSpec,
        request: &JobRequest,
        _timeout: Duration,
    ) -> Result<StartResponse, TransportError> {
        *self.start_calls.lock().unwrap() += 1;
        self.credentials
            .lock()
            .unwrap()
            .push(request.credential().to_string());
        self.start
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("no scripted start".to_string())))
    }

    async fn status(
        &self,
        _task: &TaskSpec,
        _handle: &JobHandle,
        credential: &str,
        _timeout: Duration,
    ) -> Result<StatusResponse, TransportError> {
        self.status_times.lock().unwrap().push(Instant::now());
        self.credentials.lock().unwrap().push(credential.to_string());
        self.status
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(StatusResponse::default()))
    }

    async fn download(
        &self,
        _task: &TaskSpec,
        _handle: &JobHandle,
        credential: &str,
        _timeout: Duration,
    ) -> Result<DownloadResponse, TransportError> {
        *self.download_calls.lock().unwrap() += 1;
        self.credentials.lock().unwrap().push(credential.to_string());
        self.download
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("no scripted download".to_string())))
    }
}
