use std::time::Duration;

use crate::core::feature::Feature;
use crate::core::sequence::ProteinSequence;
use crate::services::error::JobError;
use crate::services::job::{JobId, JobStatus};
use crate::services::{Provider, RawResult};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// How submission retries back off after transient failures.
///
/// The wait before retry `n` (1-based attempt that just failed) is
/// `base_delay * 2^n`, so the defaults wait 2s and then 4s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(self, max_attempts: u32) -> Self {
        assert!(max_attempts > 0, "Max attempts must be greater than 0");
        RetryPolicy { max_attempts, ..self }
    }

    pub fn with_base_delay(self, base_delay: Duration) -> Self {
        RetryPolicy { base_delay, ..self }
    }

    /// No waiting between attempts. Meant for test doubles.
    pub fn immediate(self) -> Self {
        self.with_base_delay(Duration::ZERO)
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Speaks the submit/poll/fetch protocol to one provider.
///
/// Only submission is retried: the upstream is known to shed load with 5xx
/// responses at job creation, while a job that exists is assumed reachable.
/// Every failure comes back as a [`JobError`] value.
pub struct JobClient<'a> {
    provider: &'a dyn Provider,
    retry: RetryPolicy,
}

impl<'a> JobClient<'a> {
    pub fn new(provider: &'a dyn Provider, retry: RetryPolicy) -> Self {
        JobClient { provider, retry }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn submit(&self, sequence: &ProteinSequence) -> Result<JobId, JobError> {
        let max_attempts = self.retry.max_attempts;
        let mut attempt = 1;

        loop {
            match self.provider.submit(sequence).await {
                Ok(id) => {
                    log::debug!("{}: submitted as job {}", sequence.name(), id);
                    return Ok(id);
                }
                Err(e) => {
                    log::error!(
                        "{}: {} (Attempt {} of {})",
                        sequence.name(),
                        e,
                        attempt,
                        max_attempts
                    );

                    if !e.is_transient() || attempt >= max_attempts {
                        return Err(JobError::SubmissionFailed {
                            attempts: attempt,
                            source: e,
                        });
                    }

                    tokio::time::sleep(self.retry.delay_after(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }

    pub async fn poll_status(&self, job: &JobId) -> Result<JobStatus, JobError> {
        self.provider.status(job).await.map_err(JobError::PollFailed)
    }

    pub async fn fetch_result(&self, job: &JobId) -> Result<RawResult, JobError> {
        self.provider.result(job).await.map_err(JobError::FetchFailed)
    }

    pub fn parse(&self, raw: &RawResult) -> Result<Vec<Feature>, JobError> {
        Ok(self.provider.parse(raw)?)
    }
}
