//!
//! Core library for the daily-quote store.
//!
//! This crate aggregates:
//! - `error` — unified error type `StoreError` used across the workspace.
//! - `result` — handy `Result<T, StoreError>` alias.
//! - `quote` — the persisted quote record, category filter, and seed data.
//! - `storage` — key-value storage trait with durable and session backends.
//! - `store` — the `QuoteStore` component owning the persisted quote list.
//! - `snapshot` — portable JSON snapshots for export/import.
//! - `sync` — periodic remote reconciliation where the remote always wins.
//! - `remote` — HTTP implementation of the remote source.
//!
//! The crate contains no display logic: adapters read `QuoteStore` outputs
//! and render them; the core never depends on a display surface.
#![warn(missing_docs)]
pub mod error;
pub mod result;
pub mod quote;
pub mod storage;
pub mod store;
pub mod snapshot;
pub mod sync;
pub mod remote;

pub use error::StoreError;
pub use result::Result;
pub use quote::{CategoryFilter, PickOutcome, Quote};
pub use store::QuoteStore;
