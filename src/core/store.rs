use std::collections::HashMap;
use std::path::Path;

use crate::core::error::StoreError;
use crate::core::sequence::ProteinSequence;

/// Owns the sequences of one run, keyed by name and kept in load order.
///
/// Loading a name that is already present replaces that sequence in place.
#[derive(Debug, Default, Clone)]
pub struct SequenceStore {
    sequences: Vec<ProteinSequence>,
    index: HashMap<String, usize>,
}

impl SequenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ProteinSequence> {
        self.index.get(name).map(|&i| &self.sequences[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProteinSequence> {
        self.sequences.iter()
    }

    /// Mutable view handed to providers for the duration of one pass.
    ///
    /// The slice cannot be resized through this borrow, so the set of
    /// sequences stays fixed while a run is in progress.
    pub fn sequences_mut(&mut self) -> &mut [ProteinSequence] {
        &mut self.sequences
    }

    pub fn clear(&mut self) {
        self.sequences.clear();
        self.index.clear();
    }

    pub fn insert(&mut self, sequence: ProteinSequence) {
        match self.index.get(sequence.name()) {
            Some(&i) => self.sequences[i] = sequence,
            None => {
                self.index.insert(sequence.name().to_string(), self.sequences.len());
                self.sequences.push(sequence);
            }
        }
    }

    /// Reads a FASTA file and loads every valid record.
    ///
    /// Returns the number of sequences held afterwards.
    pub fn load_fasta(&mut self, path: impl AsRef<Path>, overwrite: bool) -> Result<usize, StoreError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(self.load_fasta_str(&text, overwrite))
    }

    /// Loads FASTA-formatted text.
    ///
    /// Records whose residues fail validation are logged and skipped; lines
    /// before the first header are ignored.
    pub fn load_fasta_str(&mut self, text: &str, overwrite: bool) -> usize {
        if overwrite {
            self.clear();
        }

        for (name, residues) in parse_fasta(text) {
            self.insert_checked(name, residues);
        }

        log::info!("{} total sequences loaded.", self.len());
        self.len()
    }

    /// Loads sequences from plain strings.
    ///
    /// With `names`, both lists must be the same length; a mismatch fails the
    /// whole call before anything is cleared or inserted. Without names the
    /// sequences are called `sequence_001`, `sequence_002`, ...
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
        let sequences: Vec<String> = sequences.into_iter().map(Into::into).collect();

        let names: Vec<String> = match names {
            Some(names) => {
                let names: Vec<String> = names.into_iter().map(Into::into).collect();
                if names.len() != sequences.len() {
                    return Err(StoreError::CountMismatch {
                        names: names.len(),
                        sequences: sequences.len(),
                    });
                }
                names
            }
            None => (1..=sequences.len()).map(|i| format!("sequence_{i:03}")).collect(),
        };

        if overwrite {
            self.clear();
        }

        for (name, residues) in names.into_iter().zip(sequences) {
            self.insert_checked(name, residues);
        }

        log::info!("{} total sequences loaded.", self.len());
        Ok(self.len())
    }

    fn insert_checked(&mut self, name: String, residues: String) {
        match ProteinSequence::new(name.clone(), residues) {
            Ok(sequence) => self.insert(sequence),
            Err(e) => log::error!("Error parsing {}: {}", name, e),
        }
    }
}

/// Splits FASTA text into `(identifier, residues)` pairs.
pub fn parse_fasta(text: &str) -> Vec<(String, String)> {
    let mut records = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in text.lines().map(str::trim) {
        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                records.push(record);
            }
            current = Some((header.trim().to_string(), String::new()));
        } else if let Some((_, residues)) = current.as_mut() {
            residues.push_str(line);
        }
    }

    records.extend(current);
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADH: &str = "\
>P00334
MSFTLTNKNVIFVAGLGGIG
LDTSKELLKRDL

>P28469
MSTAGKVIKCKAAVLWEEKK
>Q9QYY9
MGTQGKVIKCKAAIAWE
";

    #[test]
    fn test_parse_fasta() {
        let records = parse_fasta(ADH);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], ("P00334".to_string(), "MSFTLTNKNVIFVAGLGGIGLDTSKELLKRDL".to_string()));
        assert_eq!(records[2].1, "MGTQGKVIKCKAAIAWE");
    }

    #[test]
    fn test_parse_fasta_ignores_preamble() {
        let records = parse_fasta("; comment\nMSF\n>seq\nMST\n");
        assert_eq!(records, vec![("seq".to_string(), "MST".to_string())]);
    }

    #[test]
    fn test_fasta_loading() {
        let mut store = SequenceStore::new();
        assert_eq!(store.load_fasta_str(ADH, true), 3);

        assert_eq!(&store.get("P00334").unwrap().residues()[..10], "MSFTLTNKNV");
        assert_eq!(&store.get("P28469").unwrap().residues()[..10], "MSTAGKVIKC");
        assert_eq!(&store.get("Q9QYY9").unwrap().residues()[..10], "MGTQGKVIKC");

        let order: Vec<&str> = store.iter().map(ProteinSequence::name).collect();
        assert_eq!(order, vec!["P00334", "P28469", "Q9QYY9"]);
    }

    #[test]
    fn test_fasta_loading_skips_invalid_records() {
        let mut store = SequenceStore::new();
        let loaded = store.load_fasta_str(">good\nMSF\n>bad\nMSB1\n>also_good\nMST\n", true);

        assert_eq!(loaded, 2);
        assert!(store.get("bad").is_none());
        assert!(store.get("also_good").is_some());
    }

    #[test]
    fn test_fasta_loading_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adh.fasta");
        std::fs::write(&path, ADH).unwrap();

        let mut store = SequenceStore::new();
        assert_eq!(store.load_fasta(&path, true).unwrap(), 3);

        let missing = store.load_fasta(dir.path().join("missing.fasta"), true);
        assert!(matches!(missing, Err(StoreError::Io(_))));
        // The failed read must not have cleared what was loaded before.
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_iterable_loading() {
        let mut store = SequenceStore::new();
        let sequences = ["MSFTLTNKNV", "MSTAGKVIKC", "MGTQGKVIKC"];

        let loaded = store.load_strings(sequences, Some(["P00334", "P28469", "Q9QYY9"]), true);
        assert_eq!(loaded.unwrap(), 3);
        assert_eq!(store.get("P28469").unwrap().residues(), "MSTAGKVIKC");

        store.load_strings(sequences, None::<Vec<String>>, true).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("sequence_003").unwrap().residues(), "MGTQGKVIKC");
    }

    #[test]
    fn test_count_mismatch_leaves_store_untouched() {
        let mut store = SequenceStore::new();
        store.load_strings(["MSF"], Some(["kept"]), true).unwrap();

        let err = store
            .load_strings(["MSFTLTNKNV", "MSTAGKVIKC", "MGTQGKVIKC"], Some(["P00334", "P28469"]), true)
            .unwrap_err();

        assert!(matches!(err, StoreError::CountMismatch { names: 2, sequences: 3 }));
        assert_eq!(store.len(), 1);
        assert!(store.get("kept").is_some());
        assert!(store.get("P00334").is_none());
    }

    #[test]
    fn test_loading_without_overwrite_replaces_duplicates_in_place() {
        let mut store = SequenceStore::new();
        store.load_strings(["MSF", "MST"], Some(["a", "b"]), true).unwrap();
        store.load_strings(["MGT", "MKV"], Some(["a", "c"]), false).unwrap();

        let order: Vec<(&str, &str)> = store.iter().map(|s| (s.name(), s.residues())).collect();
        assert_eq!(order, vec![("a", "MGT"), ("b", "MST"), ("c", "MKV")]);
    }
}
