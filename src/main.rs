//! Symposium - command-path completion prompt
//!
//! Starts an interactive prompt where `@/` target paths and `#/` operation
//! paths complete inline, or answers one-shot subcommands.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode with fixtures from ./data
//! symposium --data data
//!
//! # Resolve a token
//! symposium resolve "#/edit/card/"
//! ```

use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use symposium::cli::CliInterface;
use symposium::completion::CompletionEngine;
use symposium::error::Result;
use symposium::repl::ReplEngine;
use symposium::store::{self, DirectorySource, SharedStore};

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Handle subcommands that need no data
/// 4. Build the completion engine and load fixtures
/// 5. Answer a query subcommand or run the REPL
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if cli.handle_subcommand()? {
        return Ok(());
    }

    let (engine, source) = setup_engine(&cli).await?;

    if cli.handle_query(&engine)? {
        return Ok(());
    }

    let snapshot = engine.store().snapshot();
    cli.print_banner(snapshot.collection_names().len(), snapshot.record_count());

    let mut repl = ReplEngine::new(engine, cli.config())?;
    repl.run(&source).await?;

    println!("Goodbye!");
    Ok(())
}

/// Build the completion engine and load every bound collection
///
/// A missing or unreadable fixture directory leaves the store empty; dynamic
/// paths then offer no suggestions.
async fn setup_engine(cli: &CliInterface) -> Result<(CompletionEngine, DirectorySource)> {
    let document = cli.load_schema()?;
    let source = DirectorySource::new(
        cli.config().data.directory.clone(),
        document.bindings.collection_names(),
    );

    let engine = CompletionEngine::new(document.schema, document.bindings, SharedStore::default())?;

    if let Err(e) = store::refresh(engine.store(), &source).await {
        warn!("Could not load fixtures: {}", e);
    }

    Ok((engine, source))
}

/// Initialize logging from the effective configuration
///
/// `RUST_LOG` takes precedence over the configured level.
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
