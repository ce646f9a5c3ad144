//! The persisted quote list and its operations.
//!
//! `QuoteStore` owns the in-memory quote sequence and keeps it persisted
//! through two injected [`KeyValueStore`] backends:
//!
//! - a durable store holding the quote list and the selected category filter,
//!   both surviving restarts;
//! - a session store remembering the last-displayed quote, cleared when the
//!   session ends.
//!
//! Failure policy:
//! - Absent persisted data seeds the built-in default list; corrupt data is
//!   logged and masked the same way. `open` never fails.
//! - A rejected write is logged and the in-memory mutation is kept, so the
//!   in-memory and persisted sequences may diverge until the next successful
//!   save. This is a known consistency gap, not rolled back.
//! - Validation failures surface to the caller and never mutate state.

use std::str::FromStr as _;
use std::sync::Arc;

use log::{error, info, warn};
use rand::Rng;

use crate::error::StoreError;
use crate::quote::{CategoryFilter, PickOutcome, Quote};
use crate::result::Result;
use crate::snapshot::{self, ImportReport};
use crate::storage::{FILTER_KEY, KeyValueStore, LAST_QUOTE_KEY, QUOTES_KEY};

/// In-memory quote list backed by a durable and a session store.
pub struct QuoteStore {
    quotes: Vec<Quote>,
    selected: CategoryFilter,
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl QuoteStore {
    /// Open the store, restoring the persisted quote list and category filter.
    ///
    /// Absent data falls back to the built-in seed list; corrupt data is
    /// logged and masked the same way. A persisted filter naming a category
    /// that no longer exists falls back to [`CategoryFilter::All`].
    pub fn open(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        let quotes = match Self::load_persisted(durable.as_ref()) {
            Ok(Some(quotes)) => quotes,
            Ok(None) => {
                info!("No persisted quotes found; seeding the default list");
                Quote::defaults()
            }
            Err(e) => {
                warn!("Discarding corrupt persisted quotes: {}", e);
                Quote::defaults()
            }
        };

        let mut store = QuoteStore {
            quotes,
            selected: CategoryFilter::All,
            durable,
            session,
        };
        store.selected = store.load_filter();
        store
    }

    /// Decode the persisted quote list. `Ok(None)` when nothing is stored;
    /// [`StoreError::CorruptState`] when the stored text is not a JSON array
    /// of quotes.
    fn load_persisted(durable: &dyn KeyValueStore) -> Result<Option<Vec<Quote>>> {
        let Some(raw) = durable.get(QUOTES_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<Vec<Quote>>(&raw) {
            Ok(quotes) => Ok(Some(quotes)),
            Err(e) => Err(StoreError::CorruptState(e.to_string())),
        }
    }

    fn load_filter(&self) -> CategoryFilter {
        let raw = match self.durable.get(FILTER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CategoryFilter::All,
            Err(e) => {
                warn!("Failed to read the persisted category filter: {}", e);
                return CategoryFilter::All;
            }
        };
        let filter = CategoryFilter::from_str(&raw).unwrap_or(CategoryFilter::All);
        if self.is_known(&filter) {
            filter
        } else {
            info!("Persisted filter \"{}\" matches no category; using all", raw);
            CategoryFilter::All
        }
    }

    fn is_known(&self, filter: &CategoryFilter) -> bool {
        match filter {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => {
                self.quotes.iter().any(|q| q.category == *category)
            }
        }
    }

    /// Serialize the current sequence and write it to the durable store.
    ///
    /// A rejected write fails with [`StoreError::StorageWrite`]; the
    /// in-memory sequence is left untouched either way.
    pub fn save(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.quotes)?;
        self.durable.set(QUOTES_KEY, &raw)
    }

    // Mutations persist through here: failures are logged and the in-memory
    // state is kept, with no retry.
    fn persist(&self) {
        if let Err(e) = self.save() {
            error!("Failed to persist quotes: {}", e);
        }
    }

    /// Append a new quote to the end of the sequence and persist it.
    ///
    /// Both `text` and `category` must be non-empty after trimming, otherwise
    /// the call fails with [`StoreError::Validation`] and nothing changes.
    /// Duplicates are accepted; there is no uniqueness check.
    pub fn add(&mut self, text: &str, category: &str, author: Option<&str>) -> Result<Quote> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() {
            return Err(StoreError::Validation(
                "quote text must not be empty".to_string(),
            ));
        }
        if category.is_empty() {
            return Err(StoreError::Validation(
                "quote category must not be empty".to_string(),
            ));
        }

        let quote = Quote::new(text, category, author);
        self.quotes.push(quote.clone());
        self.persist();
        Ok(quote)
    }

    /// Draw one quote uniformly at random over the eligible subset.
    ///
    /// `filter` overrides the active category filter for this draw; `None`
    /// uses the persisted selection. The draw is remembered in the session
    /// store so reopening within the same session shows the same quote. Never
    /// fails: an empty subset yields [`PickOutcome::NoQuotes`] or
    /// [`PickOutcome::NoMatch`], which render identically to the user.
    pub fn pick_random(&self, filter: Option<&CategoryFilter>) -> PickOutcome {
        let filter = filter.unwrap_or(&self.selected);
        let eligible: Vec<&Quote> = self.quotes.iter().filter(|q| filter.matches(q)).collect();
        if eligible.is_empty() {
            return if self.quotes.is_empty() {
                PickOutcome::NoQuotes
            } else {
                PickOutcome::NoMatch
            };
        }

        let mut rng = rand::rng();
        let quote = eligible[rng.random_range(0..eligible.len())].clone();
        self.remember_last(&quote);
        PickOutcome::Picked(quote)
    }

    fn remember_last(&self, quote: &Quote) {
        match serde_json::to_string(quote) {
            Ok(raw) => {
                if let Err(e) = self.session.set(LAST_QUOTE_KEY, &raw) {
                    warn!("Failed to remember the last quote: {}", e);
                }
            }
            Err(e) => warn!("Failed to encode the last quote: {}", e),
        }
    }

    /// The quote last shown during this session, if any.
    ///
    /// An unreadable session slot yields `None`, prompting a fresh draw.
    pub fn last_shown(&self) -> Option<Quote> {
        let raw = self.session.get(LAST_QUOTE_KEY).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    /// Set the active category filter and persist the selection durably.
    ///
    /// A filter naming a category that is not currently present falls back to
    /// [`CategoryFilter::All`]. Returns the filter actually applied.
    pub fn set_category_filter(&mut self, filter: CategoryFilter) -> &CategoryFilter {
        self.selected = if self.is_known(&filter) {
            filter
        } else {
            info!("Unknown category \"{}\"; falling back to all", filter);
            CategoryFilter::All
        };
        if let Err(e) = self.durable.set(FILTER_KEY, &self.selected.to_string()) {
            error!("Failed to persist the category filter: {}", e);
        }
        &self.selected
    }

    /// The active category filter.
    pub fn selected_category(&self) -> &CategoryFilter {
        &self.selected
    }

    /// Distinct categories in first-appearance order, recomputed on demand.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for quote in &self.quotes {
            if !seen.iter().any(|c| c == &quote.category) {
                seen.push(quote.category.clone());
            }
        }
        seen
    }

    /// Serialize the full sequence to a portable pretty-printed snapshot.
    /// Pure: no state is touched.
    pub fn export_snapshot(&self) -> Result<String> {
        snapshot::encode(&self.quotes)
    }

    /// Append the valid elements of a snapshot to the sequence and persist.
    ///
    /// Fails with [`StoreError::ImportFormat`] when the payload is not a JSON
    /// array, leaving state untouched. Elements of the wrong shape are
    /// dropped silently and show up only in the report's total. Accepted
    /// elements are appended as-is, with no dedup against existing quotes.
    pub fn import_snapshot(&mut self, raw: &str) -> Result<ImportReport> {
        let (accepted, total) = snapshot::decode(raw)?;
        let report = ImportReport {
            accepted: accepted.len(),
            total,
        };
        self.quotes.extend(accepted);
        self.persist();
        info!("Imported {} of {} quotes", report.accepted, report.total);
        Ok(report)
    }

    /// Replace the entire sequence and persist it.
    ///
    /// This is the sync engine's apply step: the incoming list wins
    /// unconditionally, overwriting any quotes added locally since the last
    /// successful sync.
    pub fn replace_all(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
        self.persist();
    }

    /// The current quote sequence, in insertion order.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Number of quotes currently held.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Whether the store holds no quotes at all.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
