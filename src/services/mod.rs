//! Annotation providers and the machinery that drives them.
//!
//! A provider implements the fixed four-step capability of [`Provider`]:
//! submit a sequence, check a job's status, fetch its raw result, and parse
//! that result into [`Feature`]s. The [`Orchestrator`](orchestrator::Orchestrator)
//! runs one provider over many sequences at once through a
//! [`JobClient`](client::JobClient), which adds the retry policy.
//!
//! Providers are registered at compile time in [`default_providers`] and
//! injected into the [`Surveyor`](crate::Surveyor); there is no runtime
//! discovery.

pub mod client;
pub mod error;
pub mod job;
pub mod interpro;
pub mod orchestrator;

use async_trait::async_trait;

use crate::core::feature::Feature;
use crate::core::sequence::ProteinSequence;
use error::{MalformedResult, ProviderError};
use job::{JobId, JobStatus};

/// The raw payload of a finished job, exactly as the service returned it.
pub type RawResult = serde_json::Value;

/// Concurrency cap used when a provider does not state its own.
pub const DEFAULT_MAX_JOBS: usize = 30;

/// One asynchronous annotation service.
///
/// Every method maps to a single upstream call; retries are the caller's
/// business.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Name stamped on every feature this provider produces.
    fn name(&self) -> &str;

    /// How many jobs this service tolerates in flight at once.
    fn max_jobs(&self) -> usize {
        DEFAULT_MAX_JOBS
    }

    async fn submit(&self, sequence: &ProteinSequence) -> Result<JobId, ProviderError>;

    async fn status(&self, job: &JobId) -> Result<JobStatus, ProviderError>;

    async fn result(&self, job: &JobId) -> Result<RawResult, ProviderError>;

    fn parse(&self, raw: &RawResult) -> Result<Vec<Feature>, MalformedResult>;
}

/// Every provider compiled into this build, configured for `user_email`.
#[cfg(feature = "interproscan")]
pub fn default_providers(user_email: &str) -> Vec<Box<dyn Provider>> {
    vec![Box::new(interpro::InterProScan::new(user_email))]
}

#[cfg(not(feature = "interproscan"))]
pub fn default_providers(_user_email: &str) -> Vec<Box<dyn Provider>> {
    Vec::new()
}
