//! InterProScan 5, served by the EBI job dispatcher REST API.

pub mod parser;

#[cfg(feature = "interproscan")]
mod scan;

#[cfg(feature = "interproscan")]
pub use scan::{InterProScan, InterProScanConfig, SubmitForm};

/// Name stamped on every feature InterProScan produces.
pub const SERVICE_NAME: &str = "iprscan5";

/// Jobs the EBI allows one user to have in flight.
pub const MAX_JOBS: usize = 30;

pub const DEFAULT_BASE_URL: &str = "https://www.ebi.ac.uk/Tools/services/rest/iprscan5";
