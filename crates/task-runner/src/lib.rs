//! Drives a remote audio job through start, status polling, and download.

mod client;
mod encode;
mod observer;
mod policy;

pub use client::{AsyncJobClient, Completed};
pub use encode::encode_uri;
pub use observer::TracingObserver;
pub use policy::{PollPolicy, TransportFailurePolicy};
pub use task_types::{JobError, TaskError};
