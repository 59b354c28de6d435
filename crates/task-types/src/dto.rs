//! Request, handle, and result types plus the JSON bodies returned by the task API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One job submission: the local audio file, the bearer credential, and the
/// task-specific form fields sent alongside the file.
#[derive(Clone)]
pub struct JobRequest {
    file_path: PathBuf,
    credential: String,
    parameters: Vec<(String, String)>,
}

impl JobRequest {
    pub fn new(file_path: impl Into<PathBuf>, credential: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            credential: credential.into(),
            parameters: Vec::new(),
        }
    }

    /// Append one scalar form field. Fields are sent in insertion order.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }

    /// Append every field of a typed parameter set.
    pub fn with_params(mut self, params: impl Into<Vec<(String, String)>>) -> Self {
        self.parameters.extend(params.into());
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Name used for the multipart file part: the text after the last `/`, or
    /// `fallback` when that is empty (e.g. a path ending in a slash).
    pub fn upload_file_name(&self, fallback: &str) -> String {
        self.file_path
            .to_str()
            .and_then(|p| p.rsplit('/').next())
            .filter(|n| !n.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

impl fmt::Debug for JobRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobRequest")
            .field("file_path", &self.file_path)
            .field("credential", &"<redacted>")
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Form fields for the de-reverb task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeReverbParams {
    pub style: u32,
}

impl Default for DeReverbParams {
    fn default() -> Self {
        Self { style: 1 }
    }
}

impl From<DeReverbParams> for Vec<(String, String)> {
    fn from(p: DeReverbParams) -> Self {
        vec![("style".to_string(), p.style.to_string())]
    }
}

/// Form fields for the lossless pitch task. `pitch` is in semitones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchParams {
    pub pitch: f64,
    pub fp: bool,
    pub tp: bool,
}

impl From<PitchParams> for Vec<(String, String)> {
    fn from(p: PitchParams) -> Self {
        vec![
            ("pitch".to_string(), p.pitch.to_string()),
            ("fp".to_string(), p.fp.to_string()),
            ("tp".to_string(), p.tp.to_string()),
        ]
    }
}

/// Opaque id of a job accepted by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle {
    job_id: String,
}

impl JobHandle {
    /// Rebuild a handle for a job id obtained elsewhere (e.g. a previous run's logs).
    pub fn resume(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.job_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Complete,
    /// The service gave up on the job; polling further cannot help.
    Failed,
}

/// Numeric `task_status` code reported by the remote service for a failed job.
pub const TASK_STATUS_FAILED: u8 = 3;

/// Final output of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub download_url: String,
}

/// Body of `POST /{task}/start`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StartResponse {
    /// Handle for an accepted job; `None` unless `success` and a non-empty id are both present.
    pub fn job_handle(&self) -> Option<JobHandle> {
        if !self.success {
            return None;
        }
        self.music_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(JobHandle::resume)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_status: Option<u8>,
}

/// Body of `GET /{task}/status/{id}`. `success` is the completion signal; a
/// failed `status` string or `data.task_status == 3` marks a dead job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<StatusData>,
}

impl StatusResponse {
    pub fn job_status(&self) -> JobStatus {
        let failed_code = self
            .data
            .as_ref()
            .and_then(|d| d.task_status)
            .is_some_and(|c| c == TASK_STATUS_FAILED);
        let failed_word = self.status.as_deref().is_some_and(|s| {
            matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "failed" | "failure" | "error"
            )
        });
        if failed_code || failed_word {
            JobStatus::Failed
        } else if self.success {
            JobStatus::Complete
        } else {
            JobStatus::Pending
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadData {
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of `GET /{task}/download/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DownloadData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DownloadResponse {
    /// Non-empty `data.url`, if any.
    pub fn url(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.url.as_deref())
            .filter(|u| !u.is_empty())
    }
}

/// Remote `message` when present, else the serialized body.
pub fn describe_rejection<T: Serialize>(body: &T, message: Option<&str>) -> String {
    match message {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => serde_json::to_string(body).unwrap_or_else(|_| "<unserializable body>".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_success_flag_is_false() {
        let r: StatusResponse = serde_json::from_str(r#"{"status":"running"}"#).unwrap();
        assert!(!r.success);
        assert_eq!(r.job_status(), JobStatus::Pending);
    }

    #[test]
    fn failed_job_is_detected() {
        for body in [
            r#"{"success":false,"status":"failed","message":"bad audio"}"#,
            r#"{"success":false,"status":" ERROR "}"#,
            r#"{"success":true,"data":{"task_status":3}}"#,
        ] {
            let r: StatusResponse = serde_json::from_str(body).unwrap();
            assert_eq!(r.job_status(), JobStatus::Failed, "{}", body);
        }
        let r: StatusResponse =
            serde_json::from_str(r#"{"success":false,"data":{"task_status":1}}"#).unwrap();
        assert_eq!(r.job_status(), JobStatus::Pending);
        let r: StatusResponse =
            serde_json::from_str(r#"{"success":true,"status":"done"}"#).unwrap();
        assert_eq!(r.job_status(), JobStatus::Complete);
    }

    #[test]
    fn job_handle_requires_success_and_id() {
        let ok: StartResponse =
            serde_json::from_str(r#"{"success":true,"music_id":"abc123"}"#).unwrap();
        assert_eq!(ok.job_handle().unwrap().job_id(), "abc123");

        let no_id: StartResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(no_id.job_handle().is_none());

        let empty_id: StartResponse =
            serde_json::from_str(r#"{"success":true,"music_id":""}"#).unwrap();
        assert!(empty_id.job_handle().is_none());

        let rejected: StartResponse =
            serde_json::from_str(r#"{"success":false,"music_id":"abc"}"#).unwrap();
        assert!(rejected.job_handle().is_none());
    }

    #[test]
    fn download_url_ignores_empty() {
        let r: DownloadResponse =
            serde_json::from_str(r#"{"success":true,"data":{"url":""}}"#).unwrap();
        assert!(r.url().is_none());
        let r: DownloadResponse =
            serde_json::from_str(r#"{"success":true,"data":{"url":"https://x/a.mp3"}}"#).unwrap();
        assert_eq!(r.url(), Some("https://x/a.mp3"));
    }

    #[test]
    fn pitch_params_format_like_form_values() {
        let fields: Vec<(String, String)> = PitchParams {
            pitch: 2.0,
            fp: true,
            tp: false,
        }
        .into();
        assert_eq!(
            fields,
            vec![
                ("pitch".to_string(), "2".to_string()),
                ("fp".to_string(), "true".to_string()),
                ("tp".to_string(), "false".to_string()),
            ]
        );
        let fields: Vec<(String, String)> = PitchParams {
            pitch: -1.5,
            fp: false,
            tp: false,
        }
        .into();
        assert_eq!(fields[0].1, "-1.5");
    }

    #[test]
    fn upload_name_falls_back() {
        let req = JobRequest::new("/tmp/songs/track.flac", "k");
        assert_eq!(req.upload_file_name("audio.mp3"), "track.flac");
        let req = JobRequest::new("/", "k");
        assert_eq!(req.upload_file_name("audio.mp3"), "audio.mp3");
        let req = JobRequest::new("songs/", "k");
        assert_eq!(req.upload_file_name("audio.mp3"), "audio.mp3");
        let req = JobRequest::new("plain.wav", "k");
        assert_eq!(req.upload_file_name("audio.mp3"), "plain.wav");
    }

    #[test]
    fn debug_hides_credential() {
        let req = JobRequest::new("a.mp3", "secret-token")
            .with_params(DeReverbParams::default())
            .with_param("quality", "high");
        let s = format!("{:?}", req);
        assert!(!s.contains("secret-token"));
        assert!(s.contains("style"));
        assert_eq!(req.parameters()[1], ("quality".to_string(), "high".to_string()));
    }

    #[test]
    fn rejection_prefers_message() {
        let r = StartResponse {
            success: false,
            music_id: None,
            message: Some("quota exceeded".to_string()),
        };
        assert_eq!(describe_rejection(&r, r.message.as_deref()), "quota exceeded");
        let r = StartResponse::default();
        assert_eq!(describe_rejection(&r, None), r#"{"success":false}"#);
    }
}
