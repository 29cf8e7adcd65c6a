//! # Vitrina — scheduled catalog publisher
//!
//! Publishes goods from a CSV catalog to a Telegram channel on the
//! configured daily schedule, one good per firing, with an optional
//! AI-assisted description rewrite.
//!
//! Usage:
//!   vitrina run                     # Start the scheduler
//!   vitrina post                    # Publish one good right now
//!   vitrina schedule list           # Show the publish times
//!   vitrina schedule add 09:05      # Add a publish time
//!   vitrina schedule remove 09:05   # Remove a publish time
//!   vitrina fetch <url>             # Download a replacement catalog

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vitrina_catalog::{
    CALL_TO_ACTION_LABEL, CsvRowStore, GoodsPipeline, NO_ROWS_LEFT, PostOutcome, fetch_remote,
};
use vitrina_channels::TelegramChannel;
use vitrina_core::VitrinaConfig;
use vitrina_core::traits::Publisher;
use vitrina_core::types::LinkAction;
use vitrina_providers::OpenAiProvider;
use vitrina_schedule::{CronCoordinator, ScheduleService, ScheduleStore};

#[derive(Parser)]
#[command(
    name = "vitrina",
    version,
    about = "Scheduled catalog publisher for Telegram channels"
)]
struct Cli {
    /// Path to the config file (defaults to ~/.vitrina/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the scheduler and publish at every configured time
    Run,
    /// Publish one good right now, bypassing the schedule
    Post,
    /// Inspect or edit the publish-time schedule
    Schedule {
        #[command(subcommand)]
        action: ScheduleCommand,
    },
    /// Download a replacement catalog CSV
    Fetch { url: String },
}

#[derive(Subcommand)]
enum ScheduleCommand {
    /// Show the publish times
    List,
    /// Add a publish time (HH:MM)
    Add { time: String },
    /// Remove a publish time (HH:MM)
    Remove { time: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "info,vitrina=debug,vitrina_core=debug,vitrina_schedule=debug,\
         vitrina_catalog=debug,vitrina_channels=debug,vitrina_providers=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => {
            let path = shellexpand::tilde(path).to_string();
            VitrinaConfig::load_from(Path::new(&path))?
        }
        None => VitrinaConfig::load()?,
    };

    match cli.command {
        Command::Run => run(config).await,
        Command::Post => post_one(config).await,
        Command::Schedule { action } => edit_schedule(config, action).await,
        Command::Fetch { url } => {
            fetch_remote(&url, &config.storage.catalog_path()).await?;
            println!("Catalog saved to {}", config.storage.catalog_path().display());
            Ok(())
        }
    }
}

/// Wire the concrete collaborators into a pipeline.
fn build_pipeline(config: &VitrinaConfig) -> Result<(Arc<GoodsPipeline>, Arc<TelegramChannel>)> {
    let rows = Arc::new(CsvRowStore::new(config.storage.catalog_path()));
    let channel = Arc::new(TelegramChannel::from_config(&config.telegram)?);

    let publisher: Arc<dyn Publisher> = channel.clone();
    let mut pipeline = GoodsPipeline::new(rows, publisher);
    if config.llm.enabled {
        pipeline.set_rewriter(Arc::new(OpenAiProvider::from_config(&config.llm)));
    }
    if !config.telegram.call_to_action_url.is_empty() {
        pipeline.set_call_to_action(LinkAction {
            label: CALL_TO_ACTION_LABEL.into(),
            url: config.telegram.call_to_action_url.clone(),
        });
    }
    pipeline.set_timeouts(
        Duration::from_secs(config.llm.request_timeout_secs),
        Duration::from_secs(config.publish.timeout_secs),
    );

    Ok((Arc::new(pipeline), channel))
}

async fn run(config: VitrinaConfig) -> Result<()> {
    let (pipeline, channel) = build_pipeline(&config)?;

    let me = channel.get_me().await.context("Telegram bot check failed")?;
    tracing::info!(
        "Telegram bot: @{} ({})",
        me.username.as_deref().unwrap_or("unknown"),
        me.first_name
    );

    let tz: chrono_tz::Tz = config
        .schedule
        .timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid timezone {:?}: {e}", config.schedule.timezone))?;

    let fire_pipeline = Arc::clone(&pipeline);
    let coordinator = Arc::new(CronCoordinator::new(tz, move || {
        let pipeline = Arc::clone(&fire_pipeline);
        async move {
            match pipeline.process_next().await {
                Ok(PostOutcome::Posted { barcode, .. }) => {
                    tracing::info!("Scheduled publish done ({barcode})");
                }
                Ok(PostOutcome::Empty) => {}
                Err(e) => tracing::error!("Scheduled publish failed: {e}"),
            }
        }
    }));

    let service = ScheduleService::new(
        ScheduleStore::new(config.storage.schedule_path()),
        Arc::clone(&coordinator),
    );
    service.init().await?;

    let schedule = service.schedule()?;
    tracing::info!(
        "Vitrina started: {} publish time(s) in {}",
        schedule.len(),
        config.schedule.timezone
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    Ok(())
}

async fn post_one(config: VitrinaConfig) -> Result<()> {
    let (pipeline, _) = build_pipeline(&config)?;
    match pipeline.process_next().await? {
        PostOutcome::Posted { title, barcode } => {
            println!("Published {title:?} ({barcode})");
        }
        PostOutcome::Empty => println!("{NO_ROWS_LEFT}"),
    }
    Ok(())
}

async fn edit_schedule(config: VitrinaConfig, action: ScheduleCommand) -> Result<()> {
    // The triggers spawned here last only for the life of this command;
    // the running scheduler builds its own set from the persisted record.
    let coordinator = Arc::new(CronCoordinator::new(chrono_tz::UTC, || async {}));
    let service = ScheduleService::new(
        ScheduleStore::new(config.storage.schedule_path()),
        coordinator,
    );
    service.init().await?;

    let schedule = match action {
        ScheduleCommand::List => service.schedule()?,
        ScheduleCommand::Add { time } => match service.add(&time).await {
            Ok(schedule) => {
                println!("Publish time {time} added");
                schedule
            }
            Err(e) => {
                eprintln!("{e}");
                return Ok(());
            }
        },
        ScheduleCommand::Remove { time } => match service.remove(&time).await {
            Ok(schedule) => {
                println!("Publish time {time} removed");
                schedule
            }
            Err(e) => {
                eprintln!("{e}");
                return Ok(());
            }
        },
    };

    if schedule.is_empty() {
        println!("The schedule is empty");
    } else {
        for label in schedule {
            println!("{label}");
        }
    }
    Ok(())
}
