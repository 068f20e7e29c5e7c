use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum HistoryCommands {
    /// Average load over recent windows (default)
    Averages {
        /// Window to average over, e.g. 5m or 1h (repeatable)
        #[arg(short, long = "window")]
        windows: Vec<String>,

        /// Print the rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print stored records as JSON lines
    Export {
        /// Only records newer than this window, e.g. 1h
        #[arg(long)]
        since: Option<String>,
    },

    /// Show database size and sample range
    Stats,
}
