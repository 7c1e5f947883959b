//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use missprobe_core::SeriesKind;

#[derive(Parser, Debug)]
#[command(name = "missprobe")]
#[command(about = "Replay forensics: hit association and anomaly statistics", version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Analysis settings (TOML)
    #[arg(short, long, global = true, env = "MISSPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Associate hits and print the anomaly report
    Analyze {
        replay: PathBuf,
        level: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the replay header without decoding the event stream
    Info { replay: PathBuf },
    /// List every frame, annotated with hits when a level is given
    Timeline {
        replay: PathBuf,
        #[arg(long)]
        level: Option<PathBuf>,
    },
    /// Export a raw series for plotting
    Export {
        replay: PathBuf,
        level: PathBuf,
        /// kinematics, frame-times, hit-errors, press-intervals, perfectness
        #[arg(long)]
        series: SeriesKind,
        #[arg(long, value_enum, default_value_t = ExportFormat::Tsv)]
        format: ExportFormat,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the context around every miss
    Misses {
        replay: PathBuf,
        level: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Mirror a replay vertically and write it back
    Flip { input: PathBuf, output: PathBuf },
    /// Dump raw container bytes
    Hexdump {
        replay: PathBuf,
        /// Start offset (hex, with or without 0x)
        #[arg(long, default_value = "0")]
        offset: String,
        #[arg(long, default_value_t = 256)]
        size: usize,
        /// Show the ASCII column
        #[arg(long)]
        ascii: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Tsv,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_arguments() {
        let cli = Cli::try_parse_from([
            "missprobe",
            "export",
            "a.osr",
            "b.json",
            "--series",
            "hit-errors",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Command::Export { series, format, output, .. } => {
                assert_eq!(series, SeriesKind::HitErrors);
                assert_eq!(format, ExportFormat::Json);
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["missprobe", "info", "a.osr", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
