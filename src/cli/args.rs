//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// tessup - Provision Tesseract OCR and its language data for a project.
#[derive(Debug, Parser)]
#[command(name = "tessup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .tessup.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Provision options for a run without a subcommand
    #[command(flatten)]
    pub provision: ProvisionArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Provision arguments for this invocation.
    ///
    /// Flags given after `provision` win; flags given before it still apply.
    pub fn provision_args(&self) -> ProvisionArgs {
        match &self.command {
            Some(Commands::Provision(args)) => ProvisionArgs {
                persist: args.persist || self.provision.persist,
                timeout: args.timeout.or(self.provision.timeout),
            },
            _ => self.provision.clone(),
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install the tool, configure PATH and fetch data files (default)
    Provision(ProvisionArgs),

    /// Report the current state without changing anything
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `provision` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ProvisionArgs {
    /// Also write PATH and TESSDATA_PREFIX to the user's persistent environment
    #[arg(
        long,
        env = "TESSUP_PERSIST",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub persist: bool,

    /// Timeout in seconds for each external command and download
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["tessup"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn provision_flags_parse() {
        let cli = Cli::try_parse_from(["tessup", "provision", "--persist", "--timeout", "30"])
            .unwrap();
        match cli.command {
            Some(Commands::Provision(args)) => {
                assert!(args.persist);
                assert_eq!(args.timeout, Some(30));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tessup", "check", "--json", "--project", "/work", "-v"])
            .unwrap();
        assert_eq!(cli.project, Some(PathBuf::from("/work")));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Check(CheckArgs { json: true }))));
    }

    #[test]
    fn bare_run_accepts_provision_flags() {
        let cli = Cli::try_parse_from(["tessup", "--persist", "--timeout", "45"]).unwrap();
        assert!(cli.command.is_none());
        let args = cli.provision_args();
        assert!(args.persist);
        assert_eq!(args.timeout, Some(45));
    }

    #[test]
    fn bare_run_defaults() {
        let cli = Cli::try_parse_from(["tessup", "--timeout", "5"]).unwrap();
        assert_eq!(cli.provision_args().timeout, Some(5));
        let cli = Cli::try_parse_from(["tessup"]).unwrap();
        assert_eq!(cli.provision_args().timeout, None);
    }

    #[test]
    fn subcommand_flags_win_over_leading_flags() {
        let cli = Cli::try_parse_from(["tessup", "--timeout", "5", "provision", "--timeout", "9"])
            .unwrap();
        assert_eq!(cli.provision_args().timeout, Some(9));
        let cli = Cli::try_parse_from(["tessup", "--persist", "provision"]).unwrap();
        assert!(cli.provision_args().persist);
    }

    #[test]
    fn global_flags_before_subcommand_still_parse() {
        let cli = Cli::try_parse_from(["tessup", "-v", "--project", "/work", "check"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Check(_))));
    }

    #[test]
    fn unknown_flag_is_an_error() {
        assert!(Cli::try_parse_from(["tessup", "--bogus"]).is_err());
    }

    #[test]
    fn timeout_must_be_a_number() {
        assert!(Cli::try_parse_from(["tessup", "provision", "--timeout", "soon"]).is_err());
    }
}
