//! Acme CLI - cart and catalog operations against the Shopify Storefront API.
//!
//! # Usage
//!
//! ```bash
//! # Add a variant to the cart (creates the cart on first use)
//! acme cart add gid://shopify/ProductVariant/123
//!
//! # Change a line's quantity (0 removes it)
//! acme cart update gid://shopify/CartLine/abc 2
//!
//! # Show the cart as JSON
//! acme cart show --json
//!
//! # List a collection, filtered and sorted
//! acme catalog --collection hats -q wool --color red --sort price-asc
//! ```
//!
//! # Commands
//!
//! - `cart show|add|update|create|forget` - Cart Manager operations
//! - `catalog` - Page-load product list through the filter pipeline
//! - `collections` - Collection list
//!
//! Configuration comes from the environment (see `acme_storefront::config`).
//! Logs go to stderr; command output goes to stdout.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use acme_storefront::cart::{CartManager, FileCartIdStore};
use acme_storefront::config::StorefrontConfig;
use acme_storefront::error::{AppError, Result};
use acme_storefront::shopify::StorefrontClient;

mod commands;

use commands::catalog::CatalogArgs;

#[derive(Parser)]
#[command(name = "acme")]
#[command(author, version, about = "Acme storefront cart and catalog tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// List products through the search, color and sort pipeline
    Catalog {
        /// Collection handle (the root collection lists everything)
        #[arg(long)]
        collection: Option<String>,

        /// Filter query string, e.g. `q=hat&fcolor=red,blue&sort=price-asc`
        #[arg(long)]
        filter: Option<String>,

        /// Search text
        #[arg(short = 'q', long = "query")]
        query: Option<String>,

        /// Color token (repeatable)
        #[arg(long = "color")]
        colors: Vec<String>,

        /// Sort key (`price-asc`, `price-desc`, `newest`, `oldest`)
        #[arg(long)]
        sort: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List collections
    Collections {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the current cart
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a variant
    Add {
        /// Variant identifier
        variant: String,

        #[arg(long)]
        json: bool,
    },
    /// Set a line's quantity (0 removes the line)
    Update {
        /// Cart line identifier
        line: String,

        /// New quantity
        quantity: u32,

        #[arg(long)]
        json: bool,
    },
    /// Create a new cart and store its identifier
    Create,
    /// Forget the stored cart identifier
    Forget,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with `EnvFilter` and Sentry integration.
fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "acme_storefront=info,acme_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            AppError::from(e).report();
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, &config).await {
        e.report();
        // Flush Sentry before exiting
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<()> {
    let client = StorefrontClient::new(&config.shopify);
    tracing::debug!(endpoint = client.endpoint(), "Using Storefront API");

    match cli.command {
        Commands::Cart { action } => {
            let store = FileCartIdStore::new(&config.cart_store_path);
            let manager = CartManager::new(Arc::new(client), Arc::new(store));

            match action {
                CartAction::Show { json } => commands::cart::show(&manager, json).await?,
                CartAction::Add { variant, json } => {
                    commands::cart::add(&manager, &variant, json).await?;
                }
                CartAction::Update {
                    line,
                    quantity,
                    json,
                } => commands::cart::update(&manager, &line, quantity, json).await?,
                CartAction::Create => commands::cart::create(&manager).await?,
                CartAction::Forget => commands::cart::forget(&manager)?,
            }
        }
        Commands::Catalog {
            collection,
            filter,
            query,
            colors,
            sort,
            json,
        } => {
            let args = CatalogArgs {
                collection,
                filter,
                query,
                colors,
                sort,
                json,
            };
            commands::catalog::list(&client, &config.catalog, &args).await?;
        }
        Commands::Collections { json } => {
            commands::catalog::collections(&client, json).await?;
        }
    }
    Ok(())
}
