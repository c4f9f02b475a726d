use std::path::Path;

use crate::core::error::StoreError;
use crate::core::store::SequenceStore;
use crate::display::render_all;
use crate::services::Provider;
use crate::services::orchestrator::{Orchestrator, OrchestratorConfig, RunReport};

/// Loads protein sequences, runs every provider against them and writes out
/// the result.
///
/// Providers are passed in at construction; see
/// [`default_providers`](crate::services::default_providers) for the ones
/// compiled into this build.
pub struct Surveyor {
    store: SequenceStore,
    providers: Vec<Box<dyn Provider>>,
    orchestrator: Orchestrator,
}

impl Surveyor {
    pub fn new(providers: Vec<Box<dyn Provider>>) -> Self {
        Surveyor {
            store: SequenceStore::new(),
            providers,
            orchestrator: Orchestrator::default(),
        }
    }

    pub fn with_config(self, config: OrchestratorConfig) -> Self {
        Surveyor {
            orchestrator: Orchestrator::new(config),
            ..self
        }
    }

    pub fn store(&self) -> &SequenceStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SequenceStore {
        &mut self.store
    }

    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.name())
    }

    pub fn load_fasta(&mut self, path: impl AsRef<Path>, overwrite: bool) -> Result<usize, StoreError> {
        self.store.load_fasta(path, overwrite)
    }

    pub fn load_strings<S, N>(
        &mut self,
        sequences: impl IntoIterator<Item = S>,
        names: Option<impl IntoIterator<Item = N>>,
        overwrite: bool,
    ) -> Result<usize, StoreError>
    where
        S: Into<String>,
        N: Into<String>,
    {
        self.store.load_strings(sequences, names, overwrite)
    }

    /// Runs each provider in turn over all loaded sequences.
    ///
    /// Per-sequence failures are logged and reported, never returned as errors.
    pub async fn run(&mut self) -> Vec<RunReport> {
        if self.providers.is_empty() {
            log::warn!("No providers configured; nothing to run.");
        }

        let mut reports = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let report = self
                .orchestrator
                .run(provider.as_ref(), self.store.sequences_mut())
                .await;
            reports.push(report);
        }
        reports
    }

    /// Text blocks for every loaded sequence, in load order.
    pub fn render(&self) -> String {
        render_all(self.store.iter())
    }

    pub fn write_out(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path.as_ref(), self.render())?;
        log::info!("Results written to {}", path.as_ref().display());
        Ok(())
    }
}
