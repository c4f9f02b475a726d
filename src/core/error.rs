use thiserror::Error;

/// A residue string contained symbols outside the amino-acid alphabet.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid sequence characters: {}", format_symbols(.characters))]
pub struct InvalidSequence {
    /// Every offending symbol, deduplicated and sorted.
    pub characters: Vec<char>,
}

fn format_symbols(characters: &[char]) -> String {
    characters
        .iter()
        .map(|c| c.escape_debug().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Number of names and sequences must be equal ({names} names, {sequences} sequences)")]
    CountMismatch { names: usize, sequences: usize },

    #[error("Could not read sequence file: {0}")]
    Io(#[from] std::io::Error),
}
