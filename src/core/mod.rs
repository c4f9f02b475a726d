//! Data model shared by every provider.
//!
//! - [`ProteinSequence`](sequence::ProteinSequence): validated residues plus attached features
//! - [`Feature`](feature::Feature), [`GoTerm`](feature::GoTerm), [`Location`](feature::Location)
//! - [`SequenceStore`](store::SequenceStore): loads and owns the sequences of one run

pub mod error;
pub mod feature;
pub mod sequence;
pub mod store;
