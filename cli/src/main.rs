mod cli;
mod commands;
mod config;
mod data;
mod logging;

use clap::Parser;
use color_eyre::eyre::Result;

use cli::{Cli, Commands};
use config::{LogLevel, UserConfig};
use logging::LogMode;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = UserConfig::load();
    let log_level_override = cli.log_level.as_deref().map(LogLevel::from_str);
    let log_mode = LogMode::from_config(config.log_to_file);

    let command = cli.command.unwrap_or(Commands::Pipe {
        samples: 0,
        interval: None,
        pretty: false,
        record: false,
    });

    match command {
        Commands::Pipe {
            samples,
            interval,
            pretty,
            record,
        } => {
            let _guard = logging::init(config.log_level, log_mode, log_level_override);
            commands::pipe::run(&config, samples, interval, pretty, record)
        }
        Commands::Ingest => {
            let _guard = logging::init(config.log_level, log_mode, log_level_override);
            commands::ingest::run(&config)
        }
        Commands::History { command } => {
            let _guard = logging::init(config.log_level, LogMode::Stderr, log_level_override);
            commands::history::run(&config, command)
        }
        Commands::Debug => {
            let _guard = logging::init(config.log_level, LogMode::Stderr, log_level_override);
            commands::debug::run(&config)
        }
        Commands::Config { path, reset, edit } => commands::config::run(path, reset, edit),
        Commands::Logs { lines, follow } => commands::logs::run(lines, follow),
    }
}
