use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod validation;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize logging
    let default_directive = if args.verbose {
        "missprobe=debug,missprobe_core=debug"
    } else {
        "missprobe=info,missprobe_core=info"
    };
    let mut filter = EnvFilter::from_default_env();
    for directive in default_directive.split(',') {
        filter = filter.add_directive(directive.parse()?);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_config(args.config.as_deref());
    debug!("Analysis config: {:?}", config);

    match args.command {
        Command::Analyze {
            replay,
            level,
            json,
        } => commands::analyze::run(&replay, &level, json, config),
        Command::Info { replay } => commands::info::run(&replay),
        Command::Timeline { replay, level } => {
            commands::timeline::run(&replay, level.as_deref(), config)
        }
        Command::Export {
            replay,
            level,
            series,
            format,
            output,
        } => commands::export::run(&replay, &level, series, format, output.as_deref(), config),
        Command::Misses {
            replay,
            level,
            json,
        } => commands::misses::run(&replay, &level, json, config),
        Command::Flip { input, output } => commands::flip::run(&input, &output),
        Command::Hexdump {
            replay,
            offset,
            size,
            ascii,
        } => commands::hexdump::run(&replay, &offset, size, ascii),
    }
}
