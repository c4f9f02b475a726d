use thiserror::Error;

/// Failure of a single call to an upstream service.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[cfg(feature = "interproscan")]
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl ProviderError {
    /// Whether the call is worth repeating.
    ///
    /// Server-side statuses, dropped connections and timeouts are transient;
    /// anything the client caused is not.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Status { status, .. } => *status >= 500,
            #[cfg(feature = "interproscan")]
            ProviderError::Http(e) => match e.status() {
                Some(status) => status.is_server_error(),
                None => e.is_timeout() || e.is_connect(),
            },
            ProviderError::Transport(_) => true,
        }
    }
}

/// A fetched payload did not have the shape the parser expects.
#[derive(Debug, Error)]
#[error("Malformed result: {0}")]
pub struct MalformedResult(pub String);

impl From<serde_json::Error> for MalformedResult {
    fn from(e: serde_json::Error) -> Self {
        MalformedResult(e.to_string())
    }
}

/// Terminal failure of one sequence's scan.
///
/// None of these abort a run; they are logged and recorded in the sequence's
/// [`JobOutcome`](crate::services::job::JobOutcome).
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Submission failed after {attempts} attempt(s): {source}")]
    SubmissionFailed {
        attempts: u32,
        #[source]
        source: ProviderError,
    },

    #[error("Status check failed: {0}")]
    PollFailed(#[source] ProviderError),

    #[error("Result retrieval failed: {0}")]
    FetchFailed(#[source] ProviderError),

    #[error(transparent)]
    MalformedResult(#[from] MalformedResult),

    #[error("Job did not finish after {polls} status check(s)")]
    PollTimeout { polls: u32 },

    #[error("Admission gate closed before a slot was granted")]
    GateClosed,
}

impl JobError {
    /// Short label used in log lines and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::SubmissionFailed { .. } => "SubmissionFailed",
            JobError::PollFailed(_) => "PollFailed",
            JobError::FetchFailed(_) => "FetchFailed",
            JobError::MalformedResult(_) => "MalformedResult",
            JobError::PollTimeout { .. } => "PollTimeout",
            JobError::GateClosed => "GateClosed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transience() {
        let server = ProviderError::Status { status: 503, body: "busy".into() };
        let client = ProviderError::Status { status: 400, body: "bad email".into() };

        assert!(server.is_transient());
        assert!(!client.is_transient());
        assert!(ProviderError::Transport("reset".into()).is_transient());
    }

    #[test]
    fn test_job_error_kinds() {
        let err = JobError::SubmissionFailed {
            attempts: 1,
            source: ProviderError::Status { status: 401, body: String::new() },
        };
        assert_eq!(err.kind(), "SubmissionFailed");
        assert_eq!(err.to_string(), "Submission failed after 1 attempt(s): HTTP 401: ");

        let malformed: JobError = MalformedResult("missing `results`".into()).into();
        assert_eq!(malformed.kind(), "MalformedResult");
        assert_eq!(malformed.to_string(), "Malformed result: missing `results`");
    }
}
