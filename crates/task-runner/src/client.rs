//! AsyncJobClient: start a job, poll it to completion, fetch the result URL.

use crate::encode::encode_uri;
use crate::observer::TracingObserver;
use crate::policy::{PollPolicy, TransportFailurePolicy};
use task_types::{
    describe_rejection, JobApi, JobError, JobHandle, JobRequest, JobResult, JobStatus,
    PollObserver, TaskError, TaskSpec,
};
use tracing::Instrument;

/// Proof that a status poll observed completion; the only way to reach [`AsyncJobClient::fetch_result`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    handle: JobHandle,
    attempts: u32,
}

impl Completed {
    pub fn handle(&self) -> &JobHandle {
        &self.handle
    }

    /// Status requests made, including the one that saw completion.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// Runs one task variant against a [`JobApi`].
///
/// Holds no per-job state: handles and attempt counters live in each call, so
/// one client can serve independent jobs as long as callers keep it that way.
pub struct AsyncJobClient<A, O = TracingObserver> {
    api: A,
    task: TaskSpec,
    policy: PollPolicy,
    observer: O,
}

impl<A: JobApi> AsyncJobClient<A, TracingObserver> {
    pub fn new(api: A, task: TaskSpec) -> Self {
        Self {
            api,
            task,
            policy: PollPolicy::default(),
            observer: TracingObserver,
        }
    }
}

impl<A: JobApi, O: PollObserver> AsyncJobClient<A, O> {
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_observer<O2: PollObserver>(self, observer: O2) -> AsyncJobClient<A, O2> {
        AsyncJobClient {
            api: self.api,
            task: self.task,
            policy: self.policy,
            observer,
        }
    }

    pub fn task(&self) -> &TaskSpec {
        &self.task
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Upload the file and fields; returns the remote job's handle.
    pub async fn submit(&self, request: &JobRequest) -> Result<JobHandle, JobError> {
        let res = self
            .api
            .start(&self.task, request, self.policy.submit_timeout)
            .await
            .map_err(|e| JobError::Submission(e.to_string()))?;
        if !res.success {
            return Err(JobError::Submission(describe_rejection(
                &res,
                res.message.as_deref(),
            )));
        }
        res.job_handle().ok_or_else(|| {
            JobError::InvalidResponse("start response has no music_id".to_string())
        })
    }

    /// Sleep the warm-up once, then poll every `interval` until the job reports
    /// success or `max_attempts` requests have been made. A job the service
    /// reports as failed ends the loop at once.
    pub async fn poll_until_complete(
        &self,
        handle: &JobHandle,
        credential: &str,
    ) -> Result<Completed, JobError> {
        let max = self.policy.max_attempts;
        tokio::time::sleep(self.policy.warm_up).await;

        for attempt in 1..=max {
            match self
                .api
                .status(&self.task, handle, credential, self.policy.status_timeout)
                .await
            {
                Ok(res) => match res.job_status() {
                    JobStatus::Complete => {
                        self.observer.complete(&self.task, handle, attempt);
                        return Ok(Completed {
                            handle: handle.clone(),
                            attempts: attempt,
                        });
                    }
                    JobStatus::Failed => {
                        return Err(JobError::Failed(describe_rejection(
                            &res,
                            res.message.as_deref(),
                        )));
                    }
                    JobStatus::Pending => self.observer.pending(&self.task, handle, attempt, max),
                },
                Err(e) => match self.policy.on_transport_failure {
                    TransportFailurePolicy::Retry => {
                        self.observer
                            .transient_failure(&self.task, handle, attempt, max, &e)
                    }
                    TransportFailurePolicy::Fail => {
                        return Err(JobError::StatusQuery(e.to_string()));
                    }
                },
            }
            if attempt < max {
                tokio::time::sleep(self.policy.interval).await;
            }
        }
        Err(JobError::Timeout { attempts: max })
    }

    /// Ask for the result location of a completed job. The URL is returned `encodeURI`-escaped.
    pub async fn fetch_result(
        &self,
        completed: &Completed,
        credential: &str,
    ) -> Result<JobResult, JobError> {
        let res = self
            .api
            .download(
                &self.task,
                &completed.handle,
                credential,
                self.policy.fetch_timeout,
            )
            .await
            .map_err(|e| JobError::ResultFetch(e.to_string()))?;
        if !res.success {
            return Err(JobError::ResultFetch(describe_rejection(
                &res,
                res.message.as_deref(),
            )));
        }
        let url = res.url().ok_or_else(|| {
            JobError::InvalidResponse("download response has no data.url".to_string())
        })?;
        Ok(JobResult {
            download_url: encode_uri(url),
        })
    }

    /// Submit, poll, fetch. Any phase failure comes back as one [`TaskError`] naming the task.
    pub async fn run_job(&self, request: &JobRequest) -> Result<JobResult, TaskError> {
        let span = tracing::info_span!("run_job", task = %self.task.name);
        self.run_phases(request)
            .instrument(span)
            .await
            .map_err(|e| TaskError::new(self.task.name.clone(), e))
    }

    async fn run_phases(&self, request: &JobRequest) -> Result<JobResult, JobError> {
        tracing::info!(file = %request.file_path().display(), "starting task");
        let handle = self.submit(request).await?;
        tracing::info!(job_id = %handle, "task started");

        let completed = self
            .poll_until_complete(&handle, request.credential())
            .await?;

        let result = self.fetch_result(&completed, request.credential()).await?;
        tracing::info!(job_id = %handle, download_url = %result.download_url, "download url ready");
        Ok(result)
    }
}
