//! # Residual
//!
//! Submits protein sequences to slow, asynchronous annotation services,
//! waits for the jobs under a fixed concurrency cap, and tabulates the
//! features that come back.
//!
//! ## Features
//!
//! - **Validated Sequences**: residues are checked against the amino-acid alphabet on load
//! - **Bounded Concurrency**: one submit → poll → fetch state machine per sequence, admitted through a fair gate
//! - **Failure Isolation**: a failed job costs that sequence its features, never the run
//! - **Typed Results**: irregular upstream JSON is parsed into a small, stable feature model
//! - **Feature-gated HTTP**: the InterProScan client (and `reqwest`) only build with the `interproscan` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use residual::prelude::*;
//!
//! # async fn scan() -> Result<(), Box<dyn std::error::Error>> {
//! let mut surveyor = Surveyor::new(default_providers("me@example.org"));
//! surveyor.load_fasta("adh.fasta", true)?;
//! surveyor.run().await;
//! surveyor.write_out("adh_features.txt")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`core`](crate::core): sequences, features and the sequence store
//! - [`services`]: the provider trait, job client, orchestrator and InterProScan
//! - [`display`]: plain-text rendering
//! - [`prelude`]: commonly used types (import with `use residual::prelude::*`)

// ============================================================================
// Modules
// ============================================================================

pub mod core;
pub mod display;
pub mod services;
mod surveyor;

// ============================================================================
// Public Re-exports
// ============================================================================

// Data model
pub use crate::core::error::{InvalidSequence, StoreError};
pub use crate::core::feature::{Feature, GoTerm, Location};
pub use crate::core::sequence::ProteinSequence;
pub use crate::core::store::SequenceStore;

// Orchestration
pub use services::client::{JobClient, RetryPolicy};
pub use services::error::{JobError, MalformedResult, ProviderError};
pub use services::job::{Job, JobId, JobOutcome, JobState, JobStatus};
pub use services::orchestrator::{AdmissionGate, Orchestrator, OrchestratorConfig, RunReport};
pub use services::{Provider, RawResult, default_providers};

// Output
pub use display::SequenceDisplay;
pub use surveyor::Surveyor;

#[cfg(feature = "interproscan")]
pub use services::interpro::{InterProScan, InterProScanConfig};

// ============================================================================
// Prelude
// ============================================================================

/// Everything needed to load sequences, run providers and write results.
///
/// # Example
/// ```rust
/// use residual::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        default_providers, Feature, GoTerm, JobError, JobId, JobStatus, Location, Orchestrator,
        OrchestratorConfig, ProteinSequence, Provider, ProviderError, RawResult, RetryPolicy,
        RunReport, SequenceDisplay, SequenceStore, Surveyor,
    };

    #[cfg(feature = "interproscan")]
    pub use super::{InterProScan, InterProScanConfig};
}

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
