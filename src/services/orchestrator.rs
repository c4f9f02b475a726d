use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio::time::Instant;

use crate::core::feature::Feature;
use crate::core::sequence::ProteinSequence;
use crate::services::client::{JobClient, RetryPolicy};
use crate::services::error::JobError;
use crate::services::job::{Job, JobId, JobOutcome, JobState};
use crate::services::{Provider, RawResult};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Tunables for one orchestrated pass.
///
/// Polling is unbounded unless `max_polls` or `max_wait` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Overrides the provider's own concurrency cap.
    pub max_jobs: Option<usize>,
    pub poll_interval: Duration,
    pub max_polls: Option<u32>,
    pub max_wait: Option<Duration>,
    pub retry: RetryPolicy,
    /// Directory that receives each fetched payload as `<sequence>.json`.
    pub save_json: Option<PathBuf>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig {
            max_jobs: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: None,
            max_wait: None,
            retry: RetryPolicy::default(),
            save_json: None,
        }
    }
}

impl OrchestratorConfig {
    pub fn with_max_jobs(self, max_jobs: usize) -> Self {
        assert!(max_jobs > 0, "Max jobs must be greater than 0");
        OrchestratorConfig {
            max_jobs: Some(max_jobs),
            ..self
        }
    }

    pub fn with_poll_interval(self, poll_interval: Duration) -> Self {
        OrchestratorConfig { poll_interval, ..self }
    }

    pub fn with_max_polls(self, max_polls: u32) -> Self {
        OrchestratorConfig {
            max_polls: Some(max_polls),
            ..self
        }
    }

    pub fn with_max_wait(self, max_wait: Duration) -> Self {
        OrchestratorConfig {
            max_wait: Some(max_wait),
            ..self
        }
    }

    pub fn with_retry(self, retry: RetryPolicy) -> Self {
        OrchestratorConfig { retry, ..self }
    }

    pub fn with_save_json(self, dir: impl Into<PathBuf>) -> Self {
        OrchestratorConfig {
            save_json: Some(dir.into()),
            ..self
        }
    }

    /// Zero poll interval and zero backoff, for driving test doubles.
    pub fn immediate(self) -> Self {
        OrchestratorConfig {
            poll_interval: Duration::ZERO,
            retry: self.retry.immediate(),
            ..self
        }
    }
}

/// Counting gate bounding how many scans are past `Queued` at once.
///
/// Slots are handed out in request order by a fair semaphore. The gate also
/// tracks how many slots are held and the highest that number has been.
pub struct AdmissionGate {
    slots: Semaphore,
    capacity: usize,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl AdmissionGate {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Admission gate needs at least one slot");
        AdmissionGate {
            slots: Semaphore::new(capacity),
            capacity,
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Waits for a free slot. `None` only if the gate has been closed.
    pub async fn admit(&self) -> Option<Slot<'_>> {
        let permit = self.slots.acquire().await.ok()?;
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(active, Ordering::SeqCst);
        Some(Slot {
            gate: self,
            _permit: permit,
        })
    }

    /// Refuses every pending and future admission.
    pub fn close(&self) {
        self.slots.close();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// A held admission slot, returned to the gate when dropped.
pub struct Slot<'a> {
    gate: &'a AdmissionGate,
    _permit: SemaphorePermit<'a>,
}

impl Drop for Slot<'_> {
    fn drop(&mut self) {
        self.gate.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Everything that happened during one provider pass.
#[derive(Debug)]
pub struct RunReport {
    pub service: String,
    pub outcomes: Vec<JobOutcome>,
    /// Highest number of scans that held a slot at the same time.
    pub peak_in_flight: usize,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| o.succeeded())
    }

    pub fn failed(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    pub fn outcome(&self, sequence: &str) -> Option<&JobOutcome> {
        self.outcomes.iter().find(|o| o.sequence == sequence)
    }

    pub fn total_features(&self) -> usize {
        self.outcomes.iter().map(|o| o.features).sum()
    }
}

/// Runs one provider over a batch of sequences.
///
/// Each sequence gets its own submit → poll → fetch → parse state machine.
/// Machines run concurrently on the current task and share nothing but the
/// admission gate; a failing sequence never stops its siblings.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(config: OrchestratorConfig) -> Self {
        Orchestrator { config }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Scans every sequence and appends the resulting features in place.
    ///
    /// Returns once every scan is `Done` or `Failed`.
    pub async fn run(&self, provider: &dyn Provider, sequences: &mut [ProteinSequence]) -> RunReport {
        let capacity = self.config.max_jobs.unwrap_or_else(|| provider.max_jobs());
        let gate = AdmissionGate::new(capacity);
        self.run_gated(provider, &gate, sequences).await
    }

    /// Like [`run`](Self::run), admitting scans through a caller-owned gate.
    pub async fn run_gated(
        &self,
        provider: &dyn Provider,
        gate: &AdmissionGate,
        sequences: &mut [ProteinSequence],
    ) -> RunReport {
        log::info!(
            "Running {} on {} sequence(s), at most {} at a time...",
            provider.name(),
            sequences.len(),
            gate.capacity()
        );
        let started = Instant::now();
        let client = JobClient::new(provider, self.config.retry);

        let scans = sequences.iter_mut().map(|seq| self.scan(&client, gate, seq));
        let outcomes = join_all(scans).await;

        let report = RunReport {
            service: provider.name().to_string(),
            outcomes,
            peak_in_flight: gate.peak(),
            elapsed: started.elapsed(),
        };
        log::info!(
            "{} run complete: {} succeeded, {} failed, {} feature(s)",
            report.service,
            report.succeeded().count(),
            report.failed().count(),
            report.total_features()
        );
        report
    }

    async fn scan(
        &self,
        client: &JobClient<'_>,
        gate: &AdmissionGate,
        sequence: &mut ProteinSequence,
    ) -> JobOutcome {
        let mut job = Job::new(sequence.name());

        log::info!("{}: Waiting for a slot...", job.sequence);
        let Some(slot) = gate.admit().await else {
            let e = JobError::GateClosed;
            log::error!("{}: {} failed with {}: {}", job.sequence, client.provider_name(), e.kind(), e);
            job.fail(e);
            return job.into_outcome(0);
        };

        log::info!("{}: Scanning now...", job.sequence);
        let outcome = match self.drive(client, &mut job, sequence).await {
            Ok(features) => {
                let count = features.len();
                sequence.extend_features(features);
                job.advance(JobState::Done);
                log::info!("{}: Scan finished with {} feature(s).", job.sequence, count);
                job.into_outcome(count)
            }
            Err(e) => {
                log::error!("{}: {} failed with {}: {}", job.sequence, client.provider_name(), e.kind(), e);
                job.fail(e);
                job.into_outcome(0)
            }
        };

        drop(slot);
        outcome
    }

    async fn drive(
        &self,
        client: &JobClient<'_>,
        job: &mut Job,
        sequence: &ProteinSequence,
    ) -> Result<Vec<Feature>, JobError> {
        job.advance(JobState::Submitting);
        let id = client.submit(sequence).await?;
        job.id = Some(id.clone());

        job.advance(JobState::Polling);
        self.await_completion(client, &id).await?;

        job.advance(JobState::Fetching);
        let raw = client.fetch_result(&id).await?;
        if let Some(dir) = &self.config.save_json {
            save_raw(dir, sequence.name(), &raw);
        }

        job.advance(JobState::Parsing);
        client.parse(&raw)
    }

    async fn await_completion(&self, client: &JobClient<'_>, id: &JobId) -> Result<(), JobError> {
        let started = Instant::now();
        let mut polls = 0;

        loop {
            polls += 1;
            if client.poll_status(id).await?.is_finished() {
                return Ok(());
            }

            let out_of_polls = self.config.max_polls.is_some_and(|max| polls >= max);
            let out_of_time = self.config.max_wait.is_some_and(|max| started.elapsed() >= max);
            if out_of_polls || out_of_time {
                return Err(JobError::PollTimeout { polls });
            }

            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}

/// Writes a fetched payload for later inspection. Failures are only logged.
fn save_raw(dir: &Path, sequence: &str, raw: &RawResult) {
    let path = dir.join(format!("{}.json", file_stem(sequence)));
    let written = std::fs::create_dir_all(dir)
        .and_then(|_| serde_json::to_vec_pretty(raw).map_err(std::io::Error::from))
        .and_then(|bytes| std::fs::write(&path, bytes));
    match written {
        Ok(()) => log::debug!("{}: raw result saved to {}", sequence, path.display()),
        Err(e) => log::warn!("{}: could not save raw result to {}: {}", sequence, path.display(), e),
    }
}

/// FASTA identifiers such as `sp|P00334|ADH_DROME` are not safe file names.
fn file_stem(sequence: &str) -> String {
    sequence
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect()
}
