//! reqwest implementation of [`JobApi`].

use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use task_types::{
    DownloadResponse, JobApi, JobHandle, JobRequest, StartResponse, StatusResponse, TaskSpec,
    TransportError,
};

pub const DEFAULT_BASE_URL: &str = "https://console.oomol.com/api/tasks";

/// Task API client over HTTPS. Stateless apart from the connection pool.
pub struct HttpJobApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpJobApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        credential: &str,
        timeout: Duration,
    ) -> Result<T, TransportError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");
        let res = self
            .client
            .get(&url)
            .bearer_auth(credential)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| request_error(e, timeout))?;
        decode(res, timeout).await
    }
}

impl fmt::Debug for HttpJobApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpJobApi")
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn request_error(e: reqwest::Error, timeout: Duration) -> TransportError {
    if e.is_timeout() {
        TransportError::Request(format!("timed out after {:?}: {}", timeout, e))
    } else {
        TransportError::Request(e.to_string())
    }
}

async fn decode<T: DeserializeOwned>(
    res: reqwest::Response,
    timeout: Duration,
) -> Result<T, TransportError> {
    let status = res.status();
    let body = res.text().await.map_err(|e| request_error(e, timeout))?;
    if !status.is_success() {
        return Err(TransportError::Http {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| TransportError::Decode {
        message: e.to_string(),
        body,
    })
}

#[async_trait::async_trait]
impl JobApi for HttpJobApi {
    async fn start(
        &self,
        task: &TaskSpec,
        request: &JobRequest,
        timeout: Duration,
    ) -> Result<StartResponse, TransportError> {
        let bytes = tokio::fs::read(request.file_path()).await.map_err(|e| {
            TransportError::Io(format!("{}: {}", request.file_path().display(), e))
        })?;
        let file_name = request.upload_file_name(&task.upload.fallback_file_name);
        let mut part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        if let Some(ref ct) = task.upload.content_type {
            part = part
                .mime_str(ct)
                .map_err(|e| TransportError::Request(e.to_string()))?;
        }
        let mut form = reqwest::multipart::Form::new().part(task.upload.field.clone(), part);
        for (name, value) in request.parameters() {
            form = form.text(name.clone(), value.clone());
        }

        let url = self.url(&task.start_path());
        tracing::debug!(url = %url, "POST");
        let res = self
            .client
            .post(&url)
            .bearer_auth(request.credential())
            .multipart(form)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| request_error(e, timeout))?;
        decode(res, timeout).await
    }

    async fn status(
        &self,
        task: &TaskSpec,
        handle: &JobHandle,
        credential: &str,
        timeout: Duration,
    ) -> Result<StatusResponse, TransportError> {
        self.get(&task.status_path(handle), credential, timeout)
            .await
    }

    async fn download(
        &self,
        task: &TaskSpec,
        handle: &JobHandle,
        credential: &str,
        timeout: Duration,
    ) -> Result<DownloadResponse, TransportError> {
        self.get(&task.download_path(handle), credential, timeout)
            .await
    }
}
