//! Core types and traits for the remote audio task API.
//!
//! Wire DTOs mirror the JSON returned by `/tasks/{task}/start|status|download`.

mod dto;
mod task;
mod traits;

pub use dto::*;
pub use task::*;
pub use traits::*;
