use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "marginalia")]
#[command(about = "Merge annotation-library backups from different devices")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge two backups into one
    Merge {
        /// Left backup (directory or database file)
        left: PathBuf,
        /// Right backup (directory or database file)
        right: PathBuf,
        /// Destination backup directory, or a .db/.sqlite file
        dest: PathBuf,
        /// Resolve every conflict in favor of one side instead of asking
        #[arg(long, value_enum)]
        prefer: Option<PreferredSide>,
        /// Device name recorded in the output manifest
        #[arg(long, default_value = "marginalia", value_name = "NAME")]
        device_name: String,
    },
    /// Show row counts for a backup
    Stats {
        /// Backup to inspect (directory or database file)
        backup: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PreferredSide {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
