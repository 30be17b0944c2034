use crate::config::ExerciseConfig;
use crate::flight::SortKey;
use crate::queue::OperationKind;
use crate::station::Station;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod advisory;
mod config;
mod console;
mod decision;
mod error;
mod flight;
mod pilot;
mod queue;
mod records;
mod report;
mod runway;
mod station;
mod time;
mod tower;

#[derive(Parser)]
#[command(version, about = "Tower 1978 - air traffic control exercise console")]
struct Args {
    /// Path to the JSON exercise file
    #[arg(short, long, value_name = "FILE", default_value = "tower.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// List the flight plans
    List {
        /// Sort key; priority sorts highest first
        #[arg(long, value_enum, default_value_t = SortKey::Etd)]
        by: SortKey,
    },
    /// Check that every required data file is present and readable
    ImportData,
    /// Add a flight to the takeoff or landing queue
    Enqueue {
        #[arg(value_enum)]
        kind: OperationKind,
        /// Flight code, e.g. ALT123
        #[arg(long, visible_alias = "voo")]
        flight: String,
    },
    /// Authorize the next queued operation on a runway
    Authorize {
        #[arg(value_enum)]
        kind: OperationKind,
        /// Runway name, e.g. 10/28
        #[arg(long, visible_alias = "pista")]
        runway: String,
    },
    /// Show runways, queues and advisories
    Status,
    /// Write the end-of-shift report from the decision log
    Report,
    /// Clear the decision log and queues and remove generated reports
    Reset,
    /// Interactive operator console (default)
    Console,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match ExerciseConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let mut station = Station::new(config);

    match args.command {
        Some(Command::Console) | None => match console::run(&mut station) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        },
        Some(command) if station.run(&command) => ExitCode::SUCCESS,
        Some(_) => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_exercise_commands() {
        let args = Args::try_parse_from(["torre", "enqueue", "takeoff", "--voo=ALT123"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Command::Enqueue { kind: OperationKind::Takeoff, ref flight }) if flight == "ALT123"
        ));
        assert_eq!(PathBuf::from("tower.json"), args.config);

        let args = Args::try_parse_from(["torre", "-c", "x.json", "list", "--by", "priority"]).unwrap();
        assert!(matches!(args.command, Some(Command::List { by: SortKey::Priority })));
        assert_eq!(PathBuf::from("x.json"), args.config);

        let args = Args::try_parse_from(["torre", "list"]).unwrap();
        assert!(matches!(args.command, Some(Command::List { by: SortKey::Etd })));

        let args = Args::try_parse_from(["torre"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn test_authorize_requires_runway() {
        assert!(Args::try_parse_from(["torre", "authorize", "landing"]).is_err());
    }
}
