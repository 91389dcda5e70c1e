use std::fs;
use std::io::{self, Write};

use clap::Parser;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use harvester::cli::{Cli, Commands};
use harvester::clients::{HttpFeedClient, HttpPageFetcher};
use harvester::config::Config;
use harvester::errors::{HarvestError, HarvestResult};
use harvester::extraction::AdapterRegistry;
use harvester::services::{
    ArchiveService, ImportExportService, PollOptions, PollService, SourceService,
};
use harvester::storage::sqlite::{SqliteArticleRepository, SqliteSourceRepository, SqliteStorage};

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so harvested output on stdout stays clean
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

async fn run() -> HarvestResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize storage
    let storage = SqliteStorage::new(&config.db_path)?;
    let source_service = SourceService::new(SqliteSourceRepository::new(storage.clone()));

    match cli.command {
        Commands::Add { url } => cmd_add(&url, &source_service),
        Commands::Remove => cmd_remove(&source_service),
        Commands::List => cmd_list(&source_service, storage),
        Commands::Import { path } => cmd_import(&path, storage),
        Commands::Export { output } => cmd_export(storage, output),
        Commands::Run { dry_run, json } => {
            cmd_run(&source_service, storage, &config, dry_run, json).await
        }
        Commands::Articles { limit } => cmd_articles(storage, limit),
    }
}

fn cmd_add(url: &str, service: &SourceService<SqliteSourceRepository>) -> HarvestResult<()> {
    match service.add(url) {
        Ok(source) => {
            println!("Source added successfully!");
            println!("  URL: {}", source.url);
            Ok(())
        }
        Err(HarvestError::SourceAlreadyExists(_)) => {
            println!("Source already exists: {}", url);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn cmd_remove(service: &SourceService<SqliteSourceRepository>) -> HarvestResult<()> {
    let sources = service.list()?;

    if sources.is_empty() {
        println!("No sources to remove.");
        return Ok(());
    }

    // Display numbered list
    println!("Select a source to remove:\n");
    for (i, source) in sources.iter().enumerate() {
        println!("  {}. {}", i + 1, source.url);
    }
    println!();

    // Read user input
    print!("Enter number (or 'q' to cancel): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.eq_ignore_ascii_case("q") {
        println!("Cancelled.");
        return Ok(());
    }

    let index: usize = input
        .parse()
        .map_err(|_| HarvestError::InvalidInput("Invalid number".to_string()))?;

    if index == 0 || index > sources.len() {
        return Err(HarvestError::InvalidInput(
            "Number out of range".to_string(),
        ));
    }

    let source = &sources[index - 1];
    let source_id = source
        .id
        .ok_or_else(|| HarvestError::SourceNotFound(source.url.clone()))?;

    service.remove(source_id)?;
    println!("Removed: {}", source.url);

    Ok(())
}

fn cmd_list(
    service: &SourceService<SqliteSourceRepository>,
    storage: SqliteStorage,
) -> HarvestResult<()> {
    let sources = service.list()?;
    let archive = ArchiveService::new(SqliteArticleRepository::new(storage));

    if sources.is_empty() {
        println!("No sources configured.");
        return Ok(());
    }

    println!("Configured sources:\n");
    for source in sources {
        println!("  {}", source.url);
        println!("    Last modified: {}", source.watermark);
        println!("    Articles: {}", archive.count_for(&source)?);
        println!();
    }

    Ok(())
}

fn cmd_import(path: &str, storage: SqliteStorage) -> HarvestResult<()> {
    let content = fs::read_to_string(path)?;
    let service = ImportExportService::new(SqliteSourceRepository::new(storage));

    println!("Importing sources from {}...\n", path);

    let result = service.import_opml(&content)?;

    if !result.added.is_empty() {
        println!("Added {} sources:", result.added.len());
        for source in &result.added {
            println!("  + {}", source.url);
        }
        println!();
    }

    if !result.duplicates.is_empty() {
        println!("Skipped {} duplicates:", result.duplicates.len());
        for url in &result.duplicates {
            println!("  - {}", url);
        }
        println!();
    }

    if !result.invalid.is_empty() {
        println!("Failed {} sources:", result.invalid.len());
        for (url, error) in &result.invalid {
            println!("  ! {}: {}", url, error);
        }
        println!();
    }

    println!(
        "Import complete: {} added, {} duplicates, {} failed",
        result.added.len(),
        result.duplicates.len(),
        result.invalid.len()
    );

    Ok(())
}

fn cmd_export(storage: SqliteStorage, output: Option<String>) -> HarvestResult<()> {
    let service = ImportExportService::new(SqliteSourceRepository::new(storage));
    let opml = service.export_opml()?;

    match output {
        Some(path) => {
            fs::write(&path, &opml)?;
            println!("Exported sources to {}", path);
        }
        None => {
            println!("{}", opml);
        }
    }

    Ok(())
}

async fn cmd_run(
    source_service: &SourceService<SqliteSourceRepository>,
    storage: SqliteStorage,
    config: &Config,
    dry_run: bool,
    json: bool,
) -> HarvestResult<()> {
    let sources = source_service.list()?;

    if sources.is_empty() {
        println!("No sources configured.");
        return Ok(());
    }

    let poller = PollService::new(
        HttpFeedClient::from_config(config)?,
        HttpPageFetcher::from_config(config)?,
        AdapterRegistry::new(),
        PollOptions::from_config(config),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling the remaining sources");
            let _ = shutdown_tx.send(true);
        }
    });

    info!(sources = sources.len(), "Polling sources");
    let result = poller
        .poll_cycle_with_shutdown(&sources, shutdown_rx)
        .await;

    for report in &result.reports {
        if json {
            for article in &report.articles {
                println!("{}", serde_json::to_string(article)?);
            }
            continue;
        }

        println!(
            "{} [{}] ({} new articles)",
            report.url,
            report.outcome,
            report.articles.len()
        );
        for article in &report.articles {
            let marker = if dry_run { "[DRY RUN] " } else { "" };
            println!("  {}{} ({})", marker, article.headline, article.link);
        }
    }

    if dry_run {
        info!(
            articles = result.article_count(),
            "Dry run complete, nothing stored"
        );
        return Ok(());
    }

    // Watermarks are stored only after their articles
    let archive = ArchiveService::new(SqliteArticleRepository::new(storage));
    let mut stored = 0;
    for (source, report) in sources.iter().zip(&result.reports) {
        stored += archive.store(source, &report.articles)?;
    }

    let recorded = source_service.record_cycle(&result)?;
    info!(stored, watermarks = recorded, "Cycle persisted");

    Ok(())
}

fn cmd_articles(storage: SqliteStorage, limit: usize) -> HarvestResult<()> {
    let archive = ArchiveService::new(SqliteArticleRepository::new(storage));
    let articles = archive.recent(limit)?;

    if articles.is_empty() {
        println!("No articles harvested yet.");
        return Ok(());
    }

    for article in articles {
        println!("{} | {}", article.published_at, article.headline);
        println!("    {}", article.link);
        if article.has_content() {
            let preview: String = article.content.chars().take(160).collect();
            println!("    {}", preview);
        }
        println!();
    }

    Ok(())
}
