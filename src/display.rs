//! Plain-text rendering of sequences and their feature tables.

use std::fmt;

use crate::core::feature::Feature;
use crate::core::sequence::ProteinSequence;

const DEFAULT_LINE_WIDTH: usize = 80;
const MIN_COLUMN_WIDTH: usize = 15;
const COLUMN_PADDING: usize = 2;
const HEADERS: [&str; 4] = ["Service", "Name", "Locations", "Go terms"];

type Row = [String; 4];

/// Renders one sequence as a text block: FASTA-style header, wrapped
/// residues, a blank line, then the feature table.
pub struct SequenceDisplay<'a> {
    sequence: &'a ProteinSequence,
    line_width: usize,
}

impl<'a> SequenceDisplay<'a> {
    pub fn new(sequence: &'a ProteinSequence) -> Self {
        SequenceDisplay {
            sequence,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }

    pub fn with_line_width(self, line_width: usize) -> Self {
        assert!(line_width > 0, "Line width must be greater than 0");
        SequenceDisplay { line_width, ..self }
    }

    /// Residues split into lines of at most `line_width` symbols.
    pub fn residue_lines(&self) -> Vec<&'a str> {
        let residues = self.sequence.residues();
        // Validated residues are ASCII, so byte offsets are char offsets.
        (0..residues.len())
            .step_by(self.line_width)
            .map(|start| &residues[start..(start + self.line_width).min(residues.len())])
            .collect()
    }

    /// Table lines: header, divider, then each feature's rows followed by a
    /// blank row. Without features only the header and divider remain.
    pub fn tabulate_features(&self) -> Vec<String> {
        let mut features: Vec<&Feature> = self.sequence.features().iter().collect();
        features.sort_by_key(|f| f.sort_key());

        let rows: Vec<Row> = features
            .into_iter()
            .flat_map(|ft| {
                let mut rows = feature_into_rows(ft);
                rows.push(Row::default());
                rows
            })
            .collect();

        let widths: Vec<usize> = (0..HEADERS.len())
            .map(|col| {
                let widest = rows
                    .iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(HEADERS[col].chars().count()))
                    .max()
                    .unwrap_or(0);
                widest.max(MIN_COLUMN_WIDTH) + COLUMN_PADDING
            })
            .collect();

        let header = format_row(&HEADERS.map(String::from), &widths);
        let divider = "-".repeat(widths.iter().sum());

        let mut lines = vec![header, divider];
        lines.extend(rows.iter().map(|row| format_row(row, &widths)));
        lines
    }
}

impl fmt::Display for SequenceDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ">{}", self.sequence.name())?;
        for line in self.residue_lines() {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)?;
        for line in self.tabulate_features() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Lays a feature out as rows: service and name on the first row only,
/// one location and one GO term per row, blank cells where a column runs out.
pub fn feature_into_rows(feature: &Feature) -> Vec<Row> {
    let locations: Vec<String> = feature.locations().iter().map(ToString::to_string).collect();
    let go_terms: Vec<String> = feature.go_terms().iter().map(ToString::to_string).collect();
    let height = locations.len().max(go_terms.len()).max(1);

    (0..height)
        .map(|i| {
            let (service, name) = if i == 0 {
                (feature.service().to_string(), feature.name().to_string())
            } else {
                (String::new(), String::new())
            };
            [
                service,
                name,
                locations.get(i).cloned().unwrap_or_default(),
                go_terms.get(i).cloned().unwrap_or_default(),
            ]
        })
        .collect()
}

fn format_row(row: &Row, widths: &[usize]) -> String {
    row.iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect()
}

/// Renders every sequence, one block each, separated by blank lines.
pub fn render_all<'a>(sequences: impl IntoIterator<Item = &'a ProteinSequence>) -> String {
    sequences
        .into_iter()
        .map(|seq| SequenceDisplay::new(seq).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feature::{GoTerm, Location};

    fn replication() -> Feature {
        Feature::new(
            "Service 1",
            "Signature A",
            vec![Location::new(1, 10), Location::new(50, 60)],
            vec![GoTerm::new("GO:0000001", "BIOLOGICAL PROCESS", "Replication")],
        )
    }

    #[test]
    fn test_feature_into_rows() {
        let rows = feature_into_rows(&replication());
        assert_eq!(
            rows,
            vec![
                ["Service 1", "Signature A", "1-10", "GO:0000001 (BIOLOGICAL PROCESS) Replication"].map(String::from),
                ["", "", "50-60", ""].map(String::from),
            ]
        );
    }

    #[test]
    fn test_feature_without_locations_has_one_row() {
        let rows = feature_into_rows(&Feature::new("svc", "Family", vec![], vec![]));
        assert_eq!(rows, vec![["svc", "Family", "", ""].map(String::from)]);
    }

    #[test]
    fn test_residues_wrap() {
        let residues = "A".repeat(170);
        let seq = ProteinSequence::new("long", residues).unwrap();
        let display = SequenceDisplay::new(&seq);

        let lengths: Vec<usize> = display.residue_lines().iter().map(|l| l.len()).collect();
        assert_eq!(lengths, vec![80, 80, 10]);

        let narrow = SequenceDisplay::new(&seq).with_line_width(100);
        assert_eq!(narrow.residue_lines().len(), 2);
    }

    #[test]
    fn test_table_layout() {
        let mut seq = ProteinSequence::new("seq_1", "MSFTLTNKNV").unwrap();
        seq.extend_features(vec![replication()]);

        let lines = SequenceDisplay::new(&seq).tabulate_features();
        // Go-term column: 43 chars + padding; others: minimum 15 + padding.
        let total = 17 * 3 + 45;

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], format!("{:<17}{:<17}{:<17}{:<45}", "Service", "Name", "Locations", "Go terms"));
        assert_eq!(lines[1], "-".repeat(total));
        assert!(lines[2].starts_with("Service 1        Signature A      1-10             GO:0000001"));
        assert_eq!(lines[3].trim(), "50-60");
        assert_eq!(lines[4], " ".repeat(total));
    }

    #[test]
    fn test_features_sorted_by_first_location() {
        let mut seq = ProteinSequence::new("seq_1", "MSFTLTNKNV").unwrap();
        seq.extend_features(vec![
            Feature::new("svc", "Late", vec![Location::new(90, 99)], vec![]),
            Feature::new("svc", "Early", vec![Location::new(5, 9)], vec![]),
            Feature::new("svc", "Whole", vec![], vec![]),
        ]);

        let names: Vec<String> = SequenceDisplay::new(&seq)
            .tabulate_features()
            .iter()
            .skip(2)
            .filter_map(|line| line.get(17..34).map(|cell| cell.trim().to_string()))
            .filter(|cell| !cell.is_empty())
            .collect();
        assert_eq!(names, vec!["Whole", "Early", "Late"]);
    }

    #[test]
    fn test_block_without_features_has_empty_table() {
        let seq = ProteinSequence::new("P28469", "MSTAGKVIKC").unwrap();
        let block = SequenceDisplay::new(&seq).to_string();
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(lines[0], ">P28469");
        assert_eq!(lines[1], "MSTAGKVIKC");
        assert_eq!(lines[2], "");
        assert!(lines[3].starts_with("Service"));
        assert!(lines[4].chars().all(|c| c == '-'));
        assert_eq!(lines.len(), 5);
    }
}
