use std::collections::BTreeSet;
use std::fmt;

use crate::core::error::InvalidSequence;
use crate::core::feature::Feature;

/// The twenty standard amino-acid symbols accepted in a residue string.
pub const AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";

/// A protein sequence together with every feature providers have attached to it.
///
/// Residues are validated once, on construction. The feature list only ever
/// grows: each provider pass appends its own hits, so several services can
/// annotate the same sequence without overwriting one another.
#[derive(Debug, Clone)]
pub struct ProteinSequence {
    name: String,
    residues: String,
    features: Vec<Feature>,
}

impl ProteinSequence {
    pub fn new(name: impl Into<String>, residues: impl Into<String>) -> Result<Self, InvalidSequence> {
        let residues = residues.into();
        validate_residues(&residues)?;
        Ok(ProteinSequence {
            name: name.into(),
            residues,
            features: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn residues(&self) -> &str {
        &self.residues
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Appends features produced by one provider pass.
    pub fn extend_features(&mut self, features: impl IntoIterator<Item = Feature>) {
        self.features.extend(features);
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

impl fmt::Display for ProteinSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Residues are ASCII once validated, so byte slicing is safe here.
        if self.len() <= 20 {
            write!(f, "ProteinSequence(name={}, sequence={})", self.name, self.residues)
        } else {
            let tail = &self.residues[self.len() - 10..];
            write!(
                f,
                "ProteinSequence(name={}, sequence={}...{})",
                self.name,
                &self.residues[..10],
                tail
            )
        }
    }
}

fn validate_residues(residues: &str) -> Result<(), InvalidSequence> {
    let disallowed: BTreeSet<char> = residues
        .chars()
        .filter(|c| !AMINO_ACIDS.contains(*c))
        .collect();

    if disallowed.is_empty() {
        Ok(())
    } else {
        Err(InvalidSequence {
            characters: disallowed.into_iter().collect(),
        })
    }
}
