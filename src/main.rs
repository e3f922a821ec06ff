use clap::{Parser, Subcommand, builder::styling};
use docstore_seeder::cli;
use docstore_seeder::config::SeederConfig;
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Document Store Seeder: batched merge-upserts of key-addressed datasets into a document store
#[derive(Parser)]
#[command(name = "docseed", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source store credentials from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a dataset file into a store collection in batched commits
    Seed {
        /// Dataset file to load (.json array or .ndjson); falls back to DOCSEED_DATASET
        dataset: Option<PathBuf>,

        /// Target collection; falls back to DOCSEED_COLLECTION
        #[arg(short, long)]
        collection: Option<String>,

        /// Documents per batch commit; falls back to DOCSEED_BATCH_CAPACITY, then 500
        #[arg(long)]
        capacity: Option<usize>,

        /// Record field each document key is taken from; falls back to DOCSEED_KEY_FIELD, then "id"
        #[arg(short, long)]
        key_field: Option<String>,

        /// Regex of keys to keep
        #[arg(short, long)]
        include: Option<String>,

        /// Regex of keys to drop (runs after --include)
        #[arg(short = 'x', long)]
        exclude: Option<String>,

        /// Run the full pipeline against an in-memory store instead of the remote
        #[arg(long)]
        dry_run: bool,
    },

    /// Inspect a dataset file without touching any store
    Check {
        /// Dataset file to inspect; falls back to DOCSEED_DATASET
        dataset: Option<PathBuf>,

        /// Record field each document key is taken from; falls back to DOCSEED_KEY_FIELD, then "id"
        #[arg(short, long)]
        key_field: Option<String>,
    },

    /// Test authorization to the document store remote
    Auth,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if std::path::Path::new(&cli.env).exists() {
        dotenvy::from_filename(&cli.env)?;
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match cli.command {
        Commands::Seed {
            dataset,
            collection,
            capacity,
            key_field,
            include,
            exclude,
            dry_run,
        } => {
            let config = SeederConfig::resolve(dataset, collection, capacity, key_field)?;
            log::info!(
                "Seeding '{}' from: {} ({} per batch)",
                config.collection.cyan(),
                config.dataset.display().bright_black(),
                config.capacity
            );
            cli::seed(&config, include, exclude, dry_run).await?;
        }
        Commands::Check { dataset, key_field } => {
            cli::check(dataset, key_field)?;
        }
        Commands::Auth => {
            log::info!("Testing authorization");
            cli::auth().await?;
        }
    }

    Ok(())
}
