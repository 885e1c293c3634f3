use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bt_cli::commands::util::{Clock, open_database, open_tracker};
use bt_cli::commands::{
    delete, edit, growth, history, insights, log, migrate, profile, reminder, stash, status, timer,
};
use bt_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let clock = Clock::system();
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    match command {
        Commands::Status => status::run(&mut writer, &config, &clock)?,
        Commands::Timer { action } => {
            let mut tracker = open_tracker(&config)?;
            timer::run(&mut writer, action, &mut tracker, &clock)?;
        }
        Commands::Log(args) => {
            let mut tracker = open_tracker(&config)?;
            log::run(&mut writer, args, &mut tracker, &clock)?;
        }
        Commands::Edit(args) => {
            let mut tracker = open_tracker(&config)?;
            edit::run(&mut writer, args, &mut tracker, &clock)?;
        }
        Commands::Delete(args) => {
            let mut tracker = open_tracker(&config)?;
            delete::run(&mut reader, &mut writer, args, &mut tracker, &clock)?;
        }
        Commands::History(args) => {
            let tracker = open_tracker(&config)?;
            history::run(&mut writer, args, &tracker, &clock)?;
        }
        Commands::Stash { action } => {
            let mut tracker = open_tracker(&config)?;
            stash::run(&mut reader, &mut writer, action, &mut tracker, &clock)?;
        }
        Commands::Growth { action } => {
            let mut tracker = open_tracker(&config)?;
            growth::run(&mut reader, &mut writer, action, &mut tracker, &clock)?;
        }
        Commands::Profile { action } => {
            let mut tracker = open_tracker(&config)?;
            profile::run(&mut writer, action, &mut tracker, &clock)?;
        }
        Commands::Reminder(args) => {
            if args.watch {
                reminder::watch(&mut writer, &config)?;
            } else {
                let tracker = open_tracker(&config)?;
                reminder::run(&mut writer, &tracker, &clock)?;
            }
        }
        Commands::Insights => {
            let tracker = open_tracker(&config)?;
            insights::run(&mut writer, &tracker, &config, &clock)?;
        }
        Commands::Migrate => {
            let mut db = open_database(&config)?;
            migrate::run(&mut writer, &mut db, &config)?;
        }
    }

    Ok(())
}
