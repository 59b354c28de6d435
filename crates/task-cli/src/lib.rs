//! Command-line front end for the remote audio tasks.

pub mod cli;

use task_http::HttpJobApi;
use task_runner::{AsyncJobClient, PollPolicy};
use task_types::{JobResult, TaskError};

/// Run the job described by `cli` against its configured API base.
pub async fn run(cli: &cli::Cli, policy: PollPolicy) -> Result<JobResult, TaskError> {
    let (task, request) = cli.job();
    let client = AsyncJobClient::new(HttpJobApi::new(&cli.base_url), task).with_policy(policy);
    tracing::debug!(
        base_url = %client.api().base_url(),
        task = %client.task().name,
        "configured"
    );
    client.run_job(&request).await
}
