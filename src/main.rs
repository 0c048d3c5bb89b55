use chrono::Local;
use clap::Parser;
use fintrack::args::{Args, Command, GoalCommand, TxCommand};
use fintrack::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().fintrack_home().path();
    let now = Local::now();

    // Every command except init needs an existing fintrack home
    let config = match args.command() {
        Command::Init => {
            commands::init(home, now).await?.print();
            return Ok(());
        }
        _ => Config::load(home).await?,
    };

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => {}

        Command::Tx(tx_args) => match tx_args.command() {
            TxCommand::List(args) => commands::list_transactions(&config, args, now)
                .await?
                .print(),
            TxCommand::Add(args) => commands::add_transaction(&config, args, now)
                .await?
                .print(),
            TxCommand::Update(args) => commands::update_transaction(&config, args, now)
                .await?
                .print(),
            TxCommand::Delete(args) => commands::delete_transaction(&config, args, now)
                .await?
                .print(),
        },

        Command::Goal(goal_args) => match goal_args.command() {
            GoalCommand::List(args) => commands::list_goals(&config, args, now).await?.print(),
            GoalCommand::Add(args) => commands::add_goal(&config, args, now).await?.print(),
            GoalCommand::Update(args) => commands::update_goal(&config, args, now).await?.print(),
            GoalCommand::Contribute(args) => {
                commands::contribute(&config, args, now).await?.print()
            }
            GoalCommand::Delete(args) => commands::delete_goal(&config, args, now).await?.print(),
        },

        Command::Categories => commands::categories(&config, now).await?.print(),

        Command::Dashboard => commands::dashboard(&config, now).await?.print(),

        Command::Export(export_args) => commands::export(&config, export_args, now)
            .await?
            .print(),

        Command::Import(import_args) => commands::import(&config, import_args).await?.print(),

        Command::Reset(reset_args) => commands::reset(&config, reset_args).await?.print(),

        Command::History => commands::history(&config).await?.print(),

        Command::DarkMode(dark_mode_args) => {
            commands::dark_mode(&config, dark_mode_args).await?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
