//! Trait seam between the orchestration engine and the remote service.
//!
//! The engine only ever talks to these traits; production wires in the
//! reqwest implementation, tests wire in scripted fakes.

use async_trait::async_trait;

use gf_core::{AccountCredential, Capability, EngineError, JobRequest};

/// Establishes authenticated sessions against the remote service.
///
/// The proxy, when present, belongs to the session being created rather
/// than to process-wide state, so concurrent logins through different
/// proxies cannot interfere.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        credential: &AccountCredential,
        proxy: Option<&str>,
    ) -> Result<Box<dyn RemoteSession>, EngineError>;
}

/// One account's authenticated handle.
#[async_trait]
pub trait RemoteSession: Send + Sync {
    /// Wait until the service advertises a non-empty capability catalog.
    ///
    /// Implementations bound the wait; expiry surfaces as
    /// [`EngineError::ReadinessTimeout`], the one error class the worker
    /// loop retries.
    async fn await_capabilities(&self) -> Result<Vec<Capability>, EngineError>;

    /// Submit a generation job.
    async fn submit_job(&self, request: &JobRequest) -> Result<Box<dyn JobHandle>, EngineError>;
}

/// A submitted job awaiting completion.
#[async_trait]
pub trait JobHandle: Send + Sync {
    /// Block until the job finishes; returns the result URLs.
    async fn await_completion(self: Box<Self>) -> Result<Vec<String>, EngineError>;
}
