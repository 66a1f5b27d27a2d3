mod cli;
mod commands;
mod config;
mod connection;
mod engine;
mod naming;
mod progress;
mod resource;
mod template;
mod ui;
mod upload;
mod validate;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Command::Provision(args) => commands::provision::run(&ctx, &args),
        Command::Render(args) => commands::render::run(&args),
        Command::Status(args) => commands::status::run(&ctx, &args),
        Command::Upload(args) => commands::upload::run(&ctx, &args),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "searchprov", &mut io::stdout());
            Ok(())
        }
    }
}
