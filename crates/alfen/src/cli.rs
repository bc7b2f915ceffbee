//! Clap derive structures for the `alfen` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// alfen -- read and steer an Alfen EV wallbox
#[derive(Debug, Parser)]
#[command(
    name = "alfen",
    version,
    about = "Read and control Alfen EV wallboxes from the command line",
    long_about = "Talks to the wallbox's local HTTP API.\n\n\
        Readings are served from one bulk property fetch, so a single\n\
        command never costs more than one request for its values.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Wallbox profile to use
    #[arg(long, short = 'p', env = "ALFEN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Wallbox URL (overrides profile)
    #[arg(long, short = 'u', env = "ALFEN_URL", global = true)]
    pub url: Option<String>,

    /// Password of the admin account
    #[arg(long, env = "ALFEN_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ALFEN_OUTPUT",
        default_value = "plain",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ALFEN_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "ALFEN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Plain,
    /// Pretty-printed JSON
    Json,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Charge status, limit, and power at a glance
    #[command(alias = "st")]
    Status,

    /// Device identity and boot counters
    Info,

    /// Power, energy, and per-phase currents and voltages
    Meter,

    /// Show or set the station current limit
    Current(CurrentArgs),

    /// Allow charging at full current
    Enable,

    /// Stop charging by lowering the current limit
    Disable,

    /// Show or switch the number of charging phases
    Phases(PhasesArgs),

    /// Restore 3-phase charging at full current and log out
    Reset,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CurrentArgs {
    #[command(subcommand)]
    pub command: Option<CurrentCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CurrentCommand {
    /// Write a new current limit
    Set {
        /// Limit in amperes
        #[arg(value_parser = clap::value_parser!(i64).range(0..=80))]
        amps: i64,
    },
}

#[derive(Debug, Args)]
pub struct PhasesArgs {
    #[command(subcommand)]
    pub command: Option<PhasesCommand>,
}

#[derive(Debug, Subcommand)]
pub enum PhasesCommand {
    /// Switch to 1- or 3-phase charging
    Set {
        /// Phase count (1 or 3)
        #[arg(value_parser = parse_phases)]
        phases: u8,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: Shell,
}

fn parse_phases(raw: &str) -> Result<u8, String> {
    match raw {
        "1" => Ok(1),
        "3" => Ok(3),
        other => Err(format!("expected 1 or 3, got '{other}'")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn phases_accepts_only_one_or_three() {
        assert_eq!(parse_phases("1").unwrap(), 1);
        assert_eq!(parse_phases("3").unwrap(), 3);
        assert!(parse_phases("2").is_err());
    }

    #[test]
    fn current_set_parses() {
        let cli = Cli::try_parse_from(["alfen", "current", "set", "10"]).unwrap();
        match cli.command {
            Command::Current(CurrentArgs {
                command: Some(CurrentCommand::Set { amps }),
            }) => assert_eq!(amps, 10),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
