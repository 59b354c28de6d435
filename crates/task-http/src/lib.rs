//! HTTP transport for the remote audio task API.

mod http;
#[cfg(feature = "test-util")]
pub mod mock;

pub use http::{HttpJobApi, DEFAULT_BASE_URL};
pub use task_types::{JobApi, TransportError};

#[cfg(feature = "test-util")]
pub use mock::ScriptedJobApi;
