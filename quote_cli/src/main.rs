//! Quote CLI — a terminal front end for the daily-quote store. It opens the
//! file-backed store under `--data-dir`, runs one subcommand against it, and
//! prints the result. The long-running `sync` mode polls a remote endpoint
//! on a timer, overwrites local data whenever the remote serves a non-empty
//! list, and prints each sync banner until Ctrl+C.
//!
//! Usage examples (CLI):
//! ```bash
//! quote_cli show --category Motivation
//! quote_cli add "Stay curious." --category Life --author "Unknown"
//! quote_cli export --out quotes.json
//! quote_cli sync --remote-url http://localhost:3000/quotes --interval 30
//! ```
//!
//! All rendering lives in `render`; the store core never sees the terminal.
#![warn(missing_docs)]
mod args;
mod render;

use std::fs;
use std::str::FromStr as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use log::{info, warn};
use quote_store::quote::CategoryFilter;
use quote_store::remote::HttpRemote;
use quote_store::storage::{FileStore, KeyValueStore, MemStore};
use quote_store::sync::{RemoteSource, StoreEvent, SyncEngine};
use quote_store::{QuoteStore, Result, StoreError};

use crate::args::{Args, Command};
use crate::render::{format_outcome, format_quote};

fn main() -> Result<(), StoreError> {
    init_logger();
    let args = Args::parse();

    let durable: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&args.data_dir));
    let session: Arc<dyn KeyValueStore> = Arc::new(MemStore::new());
    let mut store = QuoteStore::open(durable, session);

    match args.command {
        Command::Show { category, new } => show(&store, category.as_deref(), new),
        Command::Add { text, category, author, push_url } => {
            add(&mut store, &text, &category, author.as_deref(), push_url.as_deref())
        }
        Command::Categories => {
            for category in store.categories() {
                println!("{}", category);
            }
            Ok(())
        }
        Command::Filter { category } => {
            let filter = CategoryFilter::from_str(&category).unwrap_or(CategoryFilter::All);
            let applied = store.set_category_filter(filter);
            println!("Category filter set to {}", applied);
            Ok(())
        }
        Command::Export { out } => export(&store, &out),
        Command::Import { file } => import(&mut store, &file),
        Command::Sync { remote_url, interval } => run_sync(store, &remote_url, interval),
    }
}

fn show(store: &QuoteStore, category: Option<&str>, fresh: bool) -> Result<(), StoreError> {
    if !fresh {
        if let Some(last) = store.last_shown() {
            println!("{}", format_quote(&last));
            return Ok(());
        }
    }
    let filter = category.map(|c| CategoryFilter::from_str(c).unwrap_or(CategoryFilter::All));
    let outcome = store.pick_random(filter.as_ref());
    println!("{}", format_outcome(&outcome));
    Ok(())
}

fn add(
    store: &mut QuoteStore,
    text: &str,
    category: &str,
    author: Option<&str>,
    push_url: Option<&str>,
) -> Result<(), StoreError> {
    let quote = match store.add(text, category, author) {
        Ok(quote) => quote,
        Err(StoreError::Validation(_)) => {
            println!("Please enter both a quote and a category!");
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    println!("Quote added successfully!");

    if let Some(url) = push_url {
        match HttpRemote::new(url) {
            Ok(remote) => {
                if let Err(e) = remote.push(&quote) {
                    warn!("Failed to push quote to remote: {}", e);
                }
            }
            Err(e) => warn!("Failed to create remote client: {}", e),
        }
    }
    Ok(())
}

fn export(store: &QuoteStore, out: &str) -> Result<(), StoreError> {
    let snapshot = store.export_snapshot()?;
    fs::write(out, snapshot)?;
    println!("Exported {} quotes to {}", store.len(), out);
    Ok(())
}

fn import(store: &mut QuoteStore, file: &str) -> Result<(), StoreError> {
    let raw = fs::read_to_string(file)?;
    match store.import_snapshot(&raw) {
        Ok(report) => {
            println!(
                "Quotes imported successfully! Added {} of {}.",
                report.accepted, report.total
            );
            Ok(())
        }
        Err(StoreError::ImportFormat(_)) => {
            println!("Could not parse JSON file. Please check the format.");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn run_sync(store: QuoteStore, remote_url: &str, interval_secs: u64) -> Result<(), StoreError> {
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down sync...");
            shutdown.store(true, Ordering::SeqCst);
        })
        .expect("Error setting Ctrl+C handler");
    }

    let remote = Arc::new(HttpRemote::new(remote_url)?);
    let store = Arc::new(Mutex::new(store));
    let (engine, events) = SyncEngine::new(store, remote);
    let handle = engine.start(Duration::from_secs(interval_secs));
    println!(
        "Syncing every {}s from {}. Press Ctrl+C to exit.",
        interval_secs, remote_url
    );

    while !shutdown.load(Ordering::Relaxed) {
        match events.recv_timeout(Duration::from_millis(500)) {
            Ok(StoreEvent::QuotesUpdated(message)) => println!("{}", message),
            Ok(StoreEvent::Shutdown) => break,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        }
    }
    handle.stop()
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
