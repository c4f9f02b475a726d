use std::fmt;

use crate::services::error::JobError;

/// Identifier assigned by the upstream service when a job is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        JobId(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status reported by the upstream service for an existing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Finished,
}

impl JobStatus {
    /// Maps a plain-text status token.
    ///
    /// `FINISHED` is the only completion token; everything else means the
    /// caller should keep polling.
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "FINISHED" => JobStatus::Finished,
            "PENDING" | "QUEUED" => JobStatus::Pending,
            _ => JobStatus::Running,
        }
    }

    pub fn is_finished(self) -> bool {
        self == JobStatus::Finished
    }
}

/// Where a sequence's scan currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Submitting,
    Polling,
    Fetching,
    Parsing,
    Done,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Done | JobState::Failed)
    }
}

/// One sequence's job, alive only while its scan runs.
#[derive(Debug)]
pub struct Job {
    pub sequence: String,
    pub id: Option<JobId>,
    pub state: JobState,
    pub last_error: Option<JobError>,
}

impl Job {
    pub fn new(sequence: impl Into<String>) -> Self {
        Job {
            sequence: sequence.into(),
            id: None,
            state: JobState::Queued,
            last_error: None,
        }
    }

    /// Moves to the next state. Terminal states are absorbing.
    pub fn advance(&mut self, next: JobState) {
        if self.state.is_terminal() {
            log::warn!(
                "{}: ignoring transition {:?} -> {:?} out of a terminal state",
                self.sequence,
                self.state,
                next
            );
            return;
        }
        log::debug!("{}: {:?} -> {:?}", self.sequence, self.state, next);
        self.state = next;
    }

    pub fn fail(&mut self, error: JobError) {
        self.advance(JobState::Failed);
        self.last_error = Some(error);
    }

    /// Consumes the job into the record kept in a [`RunReport`](crate::services::orchestrator::RunReport).
    pub fn into_outcome(self, features: usize) -> JobOutcome {
        JobOutcome {
            sequence: self.sequence,
            job_id: self.id,
            state: self.state,
            features,
            error: self.last_error,
        }
    }
}

/// The settled result of one sequence's scan.
#[derive(Debug)]
pub struct JobOutcome {
    pub sequence: String,
    pub job_id: Option<JobId>,
    pub state: JobState,
    /// Number of features appended to the sequence.
    pub features: usize,
    pub error: Option<JobError>,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        self.state == JobState::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_is_trimmed() {
        let id = JobId::new("iprscan5-R20261019-123456-0001-1234-p1m\n");
        assert_eq!(id.as_str(), "iprscan5-R20261019-123456-0001-1234-p1m");
    }

    #[test]
    fn test_status_tokens() {
        assert_eq!(JobStatus::from_token("FINISHED"), JobStatus::Finished);
        assert_eq!(JobStatus::from_token("FINISHED\n"), JobStatus::Finished);
        assert_eq!(JobStatus::from_token("QUEUED"), JobStatus::Pending);
        assert_eq!(JobStatus::from_token("RUNNING"), JobStatus::Running);
        assert_eq!(JobStatus::from_token("finished"), JobStatus::Running);
        assert!(!JobStatus::from_token("ERROR").is_finished());
    }

    #[test]
    fn test_failed_is_absorbing() {
        let mut job = Job::new("seq");
        job.advance(JobState::Submitting);
        job.fail(JobError::GateClosed);
        job.advance(JobState::Polling);

        assert_eq!(job.state, JobState::Failed);
        let outcome = job.into_outcome(0);
        assert!(!outcome.succeeded());
        assert_eq!(outcome.error.unwrap().kind(), "GateClosed");
    }
}
