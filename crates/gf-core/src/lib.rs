//! Shared types and error taxonomy for the genfarm engine.

pub mod error;
pub mod types;

pub use error::{EngineError, MalformedCredential};
pub use types::{select_capability, AccountCredential, Capability, JobRequest, RewardToken};
