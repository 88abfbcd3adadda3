use anyhow::Context;
use clap::Parser;
use quotebox_core::{
    CategoryFilter, Config, FeedSource, QuoteStore, QuoteSurface, QuoteView, SyncOutcome,
    SyncService, TextSurface, EXPORT_FILE_NAME,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "quotebox")]
#[command(version, about = "Keep, browse and share a collection of quotes", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/quotebox/config.toml)
    #[arg(long, global = true, env = "QUOTEBOX_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the quote database
    #[arg(long, global = true, env = "QUOTEBOX_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show a random quote
    Random {
        /// Only pick from this category ("all" for every category).
        /// Defaults to the last selected category.
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Add a new quote
    Add {
        text: String,
        category: String,
    },
    /// List quotes
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List categories, marking the selected one
    Categories,
    /// Select a category ("all" to clear) and show a quote from it
    Filter { category: String },
    /// Import quotes from a JSON file
    Import { file: PathBuf },
    /// Export all quotes to a JSON file
    Export {
        #[arg(short, long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,
    },
    /// Merge new quotes from the server once
    Sync,
    /// Keep syncing on a timer until Ctrl-C
    Watch {
        /// Seconds between syncs (defaults to the configured interval)
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so quotes on stdout stay pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quotebox_cli=info,quotebox_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }

    let data_dir = config.data_dir()?;
    let mut store = QuoteStore::open(&data_dir)
        .with_context(|| format!("Failed to open quote store in {}", data_dir.display()))?;
    let mut surface = TextSurface::new(std::io::stdout());

    match cli.command {
        Some(Commands::Random { category }) => {
            let filter = match category {
                Some(c) => CategoryFilter::parse(&c),
                None => store.last_category(),
            };
            surface.show_quote(&store.show_random(&filter))?;
        }
        Some(Commands::Add { text, category }) => {
            let quote = store.add(&text, &category)?.clone();
            surface.notify(&format!("Added {} ({} quotes total)", quote, store.len()))?;
        }
        Some(Commands::List { category }) => {
            let filter = category
                .as_deref()
                .map(CategoryFilter::parse)
                .unwrap_or_default();
            let quotes = store.filter(&filter);
            if quotes.is_empty() {
                let view = if store.is_empty() {
                    QuoteView::NoQuotes
                } else {
                    QuoteView::NoMatches(filter.to_string())
                };
                surface.show_quote(&view)?;
            }
            for quote in quotes {
                surface.notify(&quote.to_string())?;
            }
        }
        Some(Commands::Categories) => {
            surface.show_categories(&store.categories(), &store.last_category())?;
        }
        Some(Commands::Filter { category }) => {
            let filter = CategoryFilter::parse(&category);
            store.select_category(&filter)?;
            surface.show_quote(&store.show_random(&filter))?;
        }
        Some(Commands::Import { file }) => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let summary = store.import_quotes(&content)?;
            surface.notify(&format!(
                "Quotes imported successfully! {} added, {} skipped.",
                summary.imported, summary.skipped
            ))?;
        }
        Some(Commands::Export { output }) => {
            store.export_to_file(&output)?;
            surface.notify(&format!(
                "Exported {} quotes to {}",
                store.len(),
                output.display()
            ))?;
        }
        Some(Commands::Sync) => {
            let source = FeedSource::from_config(&config.sync)?;
            let report = store.sync_with_remote(&source).await?;
            surface.notify(&report.message())?;
        }
        Some(Commands::Watch { interval }) => {
            let every = Duration::from_secs(interval.unwrap_or(config.sync.interval_secs).max(1));
            let source = FeedSource::from_config(&config.sync)?;
            let service = Arc::new(SyncService::new(
                Arc::new(Mutex::new(store)),
                Arc::new(source),
            ));

            let handle = service.spawn_periodic(every, |result| match result {
                Ok(SyncOutcome::Completed(report)) => println!("{}", report.message()),
                Ok(SyncOutcome::Skipped) => {}
                Err(e) => eprintln!("{}", e),
            });

            tokio::signal::ctrl_c().await?;
            tracing::info!("Stopping periodic sync");
            handle.cancel().await;
        }
        None => {
            surface.show_quote(&store.show_random(&store.last_category()))?;
        }
    }

    Ok(())
}
