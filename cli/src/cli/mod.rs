mod history;

pub use history::HistoryCommands;

use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Emit one JSON record per interval on stdout (default)
    #[command(alias = "run")]
    Pipe {
        /// Number of samples to output (0 = infinite)
        #[arg(short, long, default_value_t = 0)]
        samples: u32,

        /// Sampling interval in milliseconds (defaults to the config value)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Indented JSON instead of one record per line
        #[arg(long)]
        pretty: bool,

        /// Also persist every record to the history database
        #[arg(short, long)]
        record: bool,
    },

    /// Persist newline-delimited records read from stdin
    Ingest,

    /// Query the history database
    History {
        #[command(subcommand)]
        command: Option<HistoryCommands>,
    },

    /// Print detected hardware, sensor paths and one sample
    Debug,

    /// Show or edit configuration
    Config {
        /// Print config file path
        #[arg(long)]
        path: bool,

        /// Reset config to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(short, long)]
        edit: bool,
    },

    /// View log output
    Logs {
        /// Number of lines to show
        #[arg(short = 'n', long, default_value_t = 50)]
        lines: usize,

        /// Follow log output
        #[arg(short, long)]
        follow: bool,
    },
}

/// Hardware telemetry sampler
#[derive(Debug, Parser)]
#[command(name = "hardmon", version, verbatim_doc_comment)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}
