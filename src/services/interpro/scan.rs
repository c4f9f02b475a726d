use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::{DEFAULT_BASE_URL, MAX_JOBS, SERVICE_NAME, parser};
use crate::core::feature::Feature;
use crate::core::sequence::ProteinSequence;
use crate::services::error::{MalformedResult, ProviderError};
use crate::services::job::{JobId, JobStatus};
use crate::services::{Provider, RawResult};

/// Configuration for the InterProScan client
#[derive(Clone, Debug)]
pub struct InterProScanConfig {
    /// Service root (default: https://www.ebi.ac.uk/Tools/services/rest/iprscan5)
    pub base_url: String,
    /// Identifies the submitter to the EBI; required by their terms of use
    pub email: String,
    /// Ask for GO term cross-references (default: true)
    pub go_terms: bool,
    /// Ask for pathway cross-references (default: false)
    pub pathways: bool,
    /// Sequence type marker, `p` for protein
    pub sequence_type: String,
    /// Per-request timeout; none by default
    pub timeout: Option<Duration>,
    pub max_jobs: usize,
}

impl Default for InterProScanConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            email: String::new(),
            go_terms: true,
            pathways: false,
            sequence_type: "p".to_string(),
            timeout: None,
            max_jobs: MAX_JOBS,
        }
    }
}

/// Form body of a `run` request.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SubmitForm<'a> {
    pub email: &'a str,
    pub title: &'a str,
    pub goterms: bool,
    pub pathways: bool,
    pub stype: &'a str,
    pub sequence: &'a str,
}

/// Client for the InterProScan REST service.
#[derive(Clone)]
pub struct InterProScan {
    client: reqwest::Client,
    config: InterProScanConfig,
}

impl InterProScan {
    /// Create a client against the public EBI endpoint
    pub fn new(user_email: impl Into<String>) -> Self {
        Self::with_config(InterProScanConfig {
            email: user_email.into(),
            ..Default::default()
        })
    }

    pub fn with_config(config: InterProScanConfig) -> Self {
        assert!(config.max_jobs > 0, "Max jobs must be greater than 0");
        InterProScan {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &InterProScanConfig {
        &self.config
    }

    pub fn submit_form<'a>(&'a self, sequence: &'a ProteinSequence) -> SubmitForm<'a> {
        SubmitForm {
            email: &self.config.email,
            title: sequence.name(),
            goterms: self.config.go_terms,
            pathways: self.config.pathways,
            stype: &self.config.sequence_type,
            sequence: sequence.residues(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    /// Sends a request and returns the response if its status is a success.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ProviderError> {
        let response = self.request(builder).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Provider for InterProScan {
    fn name(&self) -> &str {
        SERVICE_NAME
    }

    fn max_jobs(&self) -> usize {
        self.config.max_jobs
    }

    async fn submit(&self, sequence: &ProteinSequence) -> Result<JobId, ProviderError> {
        let form = self.submit_form(sequence);
        let response = self.send(self.client.post(self.url("run")).form(&form)).await?;
        let status = response.status().as_u16();
        let id = JobId::new(response.text().await?);
        if id.as_str().is_empty() {
            return Err(ProviderError::Status {
                status,
                body: "empty job id".to_string(),
            });
        }
        Ok(id)
    }

    async fn status(&self, job: &JobId) -> Result<JobStatus, ProviderError> {
        let url = self.url(&format!("status/{job}"));
        let response = self.send(self.client.get(url)).await?;
        Ok(JobStatus::from_token(&response.text().await?))
    }

    async fn result(&self, job: &JobId) -> Result<RawResult, ProviderError> {
        let url = self.url(&format!("result/{job}/json"));
        let response = self.send(self.client.get(url)).await?;
        Ok(response.json().await?)
    }

    fn parse(&self, raw: &RawResult) -> Result<Vec<Feature>, MalformedResult> {
        parser::parse(SERVICE_NAME, raw)
    }
}
