//! Default poll observer: structured log lines.

use task_types::{JobHandle, PollObserver, TaskSpec, TransportError};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PollObserver for TracingObserver {
    fn pending(&self, task: &TaskSpec, handle: &JobHandle, attempt: u32, max_attempts: u32) {
        tracing::info!(
            task = %task.name,
            job_id = %handle,
            "task is running, check: ({}/{})",
            attempt,
            max_attempts
        );
    }

    fn transient_failure(
        &self,
        task: &TaskSpec,
        handle: &JobHandle,
        attempt: u32,
        max_attempts: u32,
        error: &TransportError,
    ) {
        tracing::warn!(
            task = %task.name,
            job_id = %handle,
            error = %error,
            "status query failed, will retry ({}/{})",
            attempt,
            max_attempts
        );
    }

    fn complete(&self, task: &TaskSpec, handle: &JobHandle, attempt: u32) {
        tracing::info!(task = %task.name, job_id = %handle, attempt, "task is done");
    }
}
