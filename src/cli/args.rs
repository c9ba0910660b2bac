//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Operator CLI for managing aggregate tables on AtScale BI servers.
#[derive(Parser, Debug)]
#[command(name = "aggctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // === Global flags ===
    /// Connection profile path (default: ~/.config/aggctl/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the effective output format.
    #[must_use]
    pub const fn effective_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List published projects and their cubes
    Projects,

    /// List aggregates for a cube
    Aggregates(AggregatesArgs),

    /// Export aggregates for a cube to CSV
    Export(ExportArgs),

    /// Trigger an aggregate batch rebuild for a cube
    Rebuild(RebuildArgs),

    /// Show aggregate build history for a cube
    History(HistoryArgs),

    /// Show aggregate statistics for a cube
    Stats(CubeArgs),

    /// Check aggregate health for a cube
    Health(CubeArgs),

    /// Manage cached tokens
    #[command(subcommand)]
    Token(TokenCommand),
}

/// Project/cube identifier pair shared by every aggregate command.
#[derive(Parser, Debug)]
pub struct CubeArgs {
    /// Project/catalog ID
    #[arg(long, value_name = "ID")]
    pub project_id: String,

    /// Cube/model ID
    #[arg(long, value_name = "ID")]
    pub cube_id: String,
}

/// Arguments for the `aggregates` command.
#[derive(Parser, Debug)]
pub struct AggregatesArgs {
    #[command(flatten)]
    pub cube: CubeArgs,

    /// Maximum aggregates to fetch
    #[arg(long, default_value = "200", value_name = "N")]
    pub limit: u64,
}

/// Arguments for the `export` command.
#[derive(Parser, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub cube: CubeArgs,

    /// Output file (default: aggregates_<cube>_<timestamp>.csv)
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Maximum aggregates to fetch
    #[arg(long, default_value = "200", value_name = "N")]
    pub limit: u64,
}

/// Arguments for the `rebuild` command.
#[derive(Parser, Debug)]
pub struct RebuildArgs {
    #[command(flatten)]
    pub cube: CubeArgs,

    /// Request an incremental build instead of a full build
    #[arg(long)]
    pub incremental: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for the `history` command.
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub cube: CubeArgs,

    /// Maximum batches to fetch
    #[arg(long, default_value = "20", value_name = "N")]
    pub limit: u64,

    /// Show the per-batch detailed view after the table
    #[arg(long)]
    pub detailed: bool,
}

/// Token subcommands.
#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    /// Clear caches and acquire a fresh public token
    Refresh,

    /// Show a masked preview of the public token
    Show,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables and reports
    #[default]
    Human,
    /// JSON output (canonical shapes)
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_overrides_format() {
        let cli = Cli::parse_from(["aggctl", "--json", "projects"]);
        assert_eq!(cli.effective_format(), OutputFormat::Json);
    }

    #[test]
    fn aggregates_requires_both_ids() {
        let result = Cli::try_parse_from(["aggctl", "aggregates", "--project-id", "p1"]);
        assert!(result.is_err());
    }

    #[test]
    fn rebuild_flags_parse() {
        let cli = Cli::parse_from([
            "aggctl",
            "rebuild",
            "--project-id",
            "p1",
            "--cube-id",
            "c1",
            "--incremental",
            "-y",
        ]);
        match cli.command {
            Some(Commands::Rebuild(args)) => {
                assert!(args.incremental);
                assert!(args.yes);
                assert_eq!(args.cube.project_id, "p1");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
