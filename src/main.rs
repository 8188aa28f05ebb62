use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

use stanzabot::bot::Bot;
use stanzabot::corpus::FileCorpus;
use stanzabot::fetch::Fetcher;
use stanzabot::journal::Journal;
use stanzabot::store::{FavoriteQueue, StateStore, UsageHistory};
use stanzabot::stream;
use stanzabot::transport::{ConsoleTransport, HttpTransport, Transport};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stanzabot")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("stanzabot.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None | Some(Commands::Run) => run_cycle(cli, config).await,
        Some(Commands::Stream) => run_stream(cli, config).await,
        Some(Commands::Fetch { base_url, track }) => {
            run_fetch(config, base_url.as_deref(), track.as_deref()).await
        }
    }
}

async fn run_cycle(cli: &Cli, config: &Config) -> Result<()> {
    info!("Running one cycle (debug: {}, force: {})", cli.debug, cli.force);
    if cli.debug {
        run_cycle_with(cli, config, ConsoleTransport::new()).await
    } else {
        let transport = HttpTransport::new(&config.api.base_url, &config.api.token_env)?;
        run_cycle_with(cli, config, transport).await
    }
}

async fn run_cycle_with<T: Transport>(cli: &Cli, config: &Config, transport: T) -> Result<()> {
    let corpus = FileCorpus::new(&config.corpus.glob);
    let state = StateStore::open(config.storage.state_path())?;
    let history = UsageHistory::open(config.storage.history_path())?;
    let queue = FavoriteQueue::new(config.storage.queue_path());
    let journal = Journal::new(config.storage.journal_dir(), &config.journal.file_pattern);

    let mut bot = Bot::new(corpus, transport, state, history, queue, journal);
    bot.run_cycle(cli.force).await.context("Run cycle failed")
}

async fn run_stream(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting streaming mode");
    let queue = FavoriteQueue::new(config.storage.queue_path());

    if cli.debug {
        println!("{}", "About to stream quote events".cyan());
        let transport = ConsoleTransport::new();
        stream::run(&transport, &queue).await.context("Streaming failed")
    } else {
        let transport = HttpTransport::new(&config.api.base_url, &config.api.token_env)?;
        stream::run(&transport, &queue).await.context("Streaming failed")
    }
}

async fn run_fetch(config: &Config, base_url: Option<&str>, track: Option<&str>) -> Result<()> {
    let base = base_url.unwrap_or(&config.fetch.base_url);
    let fetcher = Fetcher::new(base, config.corpus.dir())?;

    if let Some(title) = track {
        println!("{} {}", "Fetching:".green(), title);
        fetcher.fetch_single(title).await.context("Fetch failed")?;
        return Ok(());
    }

    let mut written = 0;
    for page in &config.fetch.pages {
        println!("{} {}", "Fetching:".green(), page);
        written += fetcher
            .fetch_discography(page)
            .await
            .with_context(|| format!("Fetch failed for {}", page))?;
    }
    println!("{} {} tracks written", "Done:".green(), written);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
