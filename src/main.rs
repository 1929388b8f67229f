mod cli;
mod commands;
mod logging;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = commands::load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Show(args) => commands::show(&config, args),
        Command::Generate(args) => commands::generate(&config, args),
        Command::Stats(args) => commands::stats(&config, args),
        Command::Events(args) => commands::events(&config, args),
        Command::Check(args) => commands::check(&config, args),
    }
}
