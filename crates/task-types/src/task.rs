//! Task descriptors: which endpoints a job talks to and how the file is uploaded.

use crate::JobHandle;

/// How the audio file is attached to the start request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSpec {
    /// Multipart field name for the file part.
    pub field: String,
    /// Explicit MIME type for the file part; `None` lets the transport decide.
    pub content_type: Option<String>,
    /// File name used when the path has no final component.
    pub fallback_file_name: String,
}

impl Default for UploadSpec {
    fn default() -> Self {
        Self {
            field: "file".to_string(),
            content_type: None,
            fallback_file_name: "audio.mp3".to_string(),
        }
    }
}

/// One remote task variant. Endpoints are `{base}/{path}/start`, `/status/{id}`, `/download/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    /// Label used in logs and in the outer error message.
    pub name: String,
    /// Path segment under the API base, without leading or trailing slash.
    pub path: String,
    pub upload: UploadSpec,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into().trim_matches('/').to_string(),
            upload: UploadSpec::default(),
        }
    }

    pub fn with_upload(mut self, upload: UploadSpec) -> Self {
        self.upload = upload;
        self
    }

    /// Reverb removal.
    pub fn de_reverb() -> Self {
        Self::new("de-reverb", "tuanzi/de-reverb").with_upload(UploadSpec {
            content_type: Some("audio/mpeg".to_string()),
            ..UploadSpec::default()
        })
    }

    /// Lossless pitch shifting.
    pub fn lossless_pitch() -> Self {
        Self::new("lossless-pitch", "tuanzi/lossless-pitch")
    }

    pub fn start_path(&self) -> String {
        format!("{}/start", self.path)
    }

    pub fn status_path(&self, handle: &JobHandle) -> String {
        format!("{}/status/{}", self.path, handle.job_id())
    }

    pub fn download_path(&self, handle: &JobHandle) -> String {
        format!("{}/download/{}", self.path, handle.job_id())
    }
}
