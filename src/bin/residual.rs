use clap::Parser;
use clap::builder::RangedU64ValueParser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use residual::{OrchestratorConfig, ProteinSequence, StoreError, Surveyor, default_providers};

/// What `--fasta` pointed at.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SequenceInput {
    File(PathBuf),
    Residues(Vec<String>),
}

/// Reads `--fasta` as comma-separated residue strings when every piece is a
/// valid sequence, and as a file path when it is a single piece that is not.
fn parse_sequence_input(value: &str) -> Result<SequenceInput, String> {
    let pieces: Vec<&str> = value.split(',').map(str::trim).collect();
    let all_residues = pieces
        .iter()
        .all(|piece| !piece.is_empty() && ProteinSequence::new("", *piece).is_ok());

    if all_residues {
        Ok(SequenceInput::Residues(pieces.into_iter().map(String::from).collect()))
    } else if pieces.len() == 1 {
        Ok(SequenceInput::File(PathBuf::from(value)))
    } else {
        Err(format!("could not parse sequence input '{value}'"))
    }
}

/// Whole or fractional seconds, finite and not negative.
fn parse_seconds(value: &str) -> Result<Duration, String> {
    let secs: f64 = value.parse().map_err(|e| format!("{e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("'{value}' is not a usable number of seconds"))
}

#[derive(Parser)]
#[command(name = "residual")]
#[command(about = "Annotate protein sequences with InterProScan and tabulate the features", long_about = None)]
#[command(version)]
struct Cli {
    /// Input FASTA file, or sequences separated by commas
    #[arg(short = 'f', long, value_name = "FASTA|SEQS", value_parser = parse_sequence_input)]
    fasta: SequenceInput,

    /// Names for comma-separated sequences, also separated by commas
    #[arg(short = 'n', long, value_name = "NAMES", value_delimiter = ',')]
    names: Option<Vec<String>>,

    /// Email used as identification when talking to the annotation services
    #[arg(short = 'u', long, value_name = "EMAIL")]
    user_email: String,

    /// Where to write the feature tables
    #[arg(short = 'o', long, value_name = "FILE", default_value = "residual_output.txt")]
    output: PathBuf,

    /// Jobs in flight per service (default: the service's own limit)
    #[arg(long, value_name = "INT", value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    max_jobs: Option<usize>,

    /// Seconds between job status checks
    #[arg(long, value_name = "SECS", default_value = "1", value_parser = parse_seconds)]
    poll_interval: Duration,

    /// Give up on a job after this many status checks
    #[arg(long, value_name = "INT", value_parser = clap::value_parser!(u32).range(1..))]
    max_polls: Option<u32>,

    /// Give up on a job after waiting this many seconds for it
    #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
    max_wait: Option<Duration>,

    /// Save every fetched raw result as <DIR>/<sequence>.json
    #[arg(long, value_name = "DIR")]
    save_json: Option<PathBuf>,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn orchestrator_config(&self) -> OrchestratorConfig {
        let mut config = OrchestratorConfig::default().with_poll_interval(self.poll_interval);
        if let Some(max_jobs) = self.max_jobs {
            config = config.with_max_jobs(max_jobs);
        }
        if let Some(max_polls) = self.max_polls {
            config = config.with_max_polls(max_polls);
        }
        if let Some(max_wait) = self.max_wait {
            config = config.with_max_wait(max_wait);
        }
        if let Some(dir) = &self.save_json {
            config = config.with_save_json(dir);
        }
        config
    }

    fn load(&self, surveyor: &mut Surveyor) -> Result<usize, StoreError> {
        match &self.fasta {
            SequenceInput::File(path) => {
                if self.names.is_some() {
                    log::warn!("--names is ignored for FASTA input; records keep their own identifiers");
                }
                let loaded = surveyor.load_fasta(path, true)?;
                log::info!("Loaded {} sequence(s) from {}", loaded, path.display());
                Ok(loaded)
            }
            SequenceInput::Residues(residues) => {
                surveyor.load_strings(residues.iter().cloned(), self.names.clone(), true)
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .parse_default_env()
        .init();

    let mut surveyor =
        Surveyor::new(default_providers(&cli.user_email)).with_config(cli.orchestrator_config());

    match cli.load(&mut surveyor) {
        Ok(0) => {
            log::error!("No valid sequences to scan");
            return ExitCode::FAILURE;
        }
        Ok(_) => {}
        Err(e) => {
            log::error!("Could not load sequences: {}", e);
            return ExitCode::FAILURE;
        }
    }

    for report in surveyor.run().await {
        for outcome in report.failed() {
            if let Some(e) = &outcome.error {
                log::warn!("{}: no {} features ({})", outcome.sequence, report.service, e.kind());
            }
        }
    }

    if let Err(e) = surveyor.write_out(&cli.output) {
        log::error!("Could not write {}: {}", cli.output.display(), e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(["residual", "-u", "me@example.org"].iter().chain(args))
    }

    #[test]
    fn test_comma_separated_residues() {
        assert_eq!(
            parse_sequence_input("MSFTLTNKNV, MSTAGKVIKC").unwrap(),
            SequenceInput::Residues(vec!["MSFTLTNKNV".to_string(), "MSTAGKVIKC".to_string()])
        );
        assert_eq!(
            parse_sequence_input("MSF").unwrap(),
            SequenceInput::Residues(vec!["MSF".to_string()])
        );
    }

    #[test]
    fn test_single_invalid_piece_is_a_path() {
        assert_eq!(
            parse_sequence_input("tests/data/adh.fasta").unwrap(),
            SequenceInput::File(PathBuf::from("tests/data/adh.fasta"))
        );
        assert_eq!(
            parse_sequence_input("adh.fa").unwrap(),
            SequenceInput::File(PathBuf::from("adh.fa"))
        );
    }

    #[test]
    fn test_mixed_list_is_rejected() {
        assert!(parse_sequence_input("MSFTLTNKNV,not a sequence").is_err());
        assert!(parse_sequence_input("MSFTLTNKNV,,MSF").is_err());
    }

    #[test]
    fn test_names_split_on_commas() {
        let cli = parse(&["-f", "MSF,MST", "-n", "first,second"]).unwrap();
        assert_eq!(cli.names, Some(vec!["first".to_string(), "second".to_string()]));
    }

    #[test]
    fn test_name_count_mismatch_fails_load() {
        let cli = parse(&["-f", "MSF,MST", "-n", "only"]).unwrap();
        let mut surveyor = Surveyor::new(Vec::new());

        let err = cli.load(&mut surveyor).unwrap_err();
        assert!(matches!(err, StoreError::CountMismatch { names: 1, sequences: 2 }));
        assert!(surveyor.store().is_empty());
    }

    #[test]
    fn test_inline_sequences_load_with_names() {
        let cli = parse(&["-f", "MSF,MST", "-n", "first,second"]).unwrap();
        let mut surveyor = Surveyor::new(Vec::new());

        assert_eq!(cli.load(&mut surveyor).unwrap(), 2);
        assert_eq!(surveyor.store().get("second").unwrap().residues(), "MST");
    }

    #[test]
    fn test_numeric_flags_are_validated() {
        assert!(parse(&["-f", "MSF", "--max-jobs", "0"]).is_err());
        assert!(parse(&["-f", "MSF", "--max-polls", "0"]).is_err());
        assert!(parse(&["-f", "MSF", "--poll-interval", "inf"]).is_err());
        assert!(parse(&["-f", "MSF", "--poll-interval", "NaN"]).is_err());
        assert!(parse(&["-f", "MSF", "--poll-interval=-1"]).is_err());
        assert!(parse(&["-f", "MSF", "--max-wait=-5"]).is_err());
        assert!(parse_seconds("-0.5").is_err());
        assert_eq!(parse_seconds("0").unwrap(), Duration::ZERO);

        let cli = parse(&["-f", "MSF", "--max-jobs", "4", "--poll-interval", "0.5", "--max-wait", "90"]).unwrap();
        let config = cli.orchestrator_config();
        assert_eq!(config.max_jobs, Some(4));
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.max_wait, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-f", "adh.fasta", "--save-json", "raw"]).unwrap();
        let config = cli.orchestrator_config();
        assert_eq!(cli.fasta, SequenceInput::File(PathBuf::from("adh.fasta")));
        assert_eq!(cli.output, PathBuf::from("residual_output.txt"));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.max_jobs, None);
        assert_eq!(config.save_json, Some(PathBuf::from("raw")));
    }
}
