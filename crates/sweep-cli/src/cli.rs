use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sweep",
    about = "Sweep: batch actions over admin-console resources",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a batch manifest against the simulated service
    Run(RunArgs),
    /// Show which manifest items would pass the eligibility check
    Check(CheckArgs),
    /// Print the engine configuration as TOML
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Manifest file (.toml or .json)
    pub manifest: PathBuf,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
    /// Engine configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    pub manifest: PathBuf,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Validate and print this file instead of the defaults
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_global_flags() {
        let cli = Cli::try_parse_from([
            "sweep", "run", "batch.toml", "--yes", "--format", "json", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.manifest, PathBuf::from("batch.toml"));
                assert!(args.yes);
                assert!(args.config.is_none());
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn config_path_is_optional() {
        let cli = Cli::try_parse_from(["sweep", "config"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(matches!(cli.command, Command::Config(ConfigArgs { path: None })));
    }

    #[test]
    fn run_requires_a_manifest() {
        assert!(Cli::try_parse_from(["sweep", "run"]).is_err());
    }
}
