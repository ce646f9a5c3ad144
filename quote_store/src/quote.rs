//! Quote records, the category filter, and the built-in seed data.
//!
//! A `Quote` is one persisted unit: required `text` and `category`, an
//! optional `author`, and provenance fields (`id`, `timestamp`) stamped at
//! creation time. Quotes are stored as an ordered JSON array; insertion order
//! is preserved and duplicates are allowed.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Category assigned to records created without an explicit category.
pub const DEFAULT_CATEGORY: &str = "General";

/// One persisted quote record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// The quoted text.
    pub text: String,
    /// Grouping label used by the category filter.
    pub category: String,
    /// Attribution, where the source recorded one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub author: Option<String>,
    /// Creation identifier; not required for correctness.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<u64>,
    /// Creation time in milliseconds since the UNIX epoch.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<u64>,
}

impl Quote {
    /// Create a new record with fresh provenance fields.
    ///
    /// Callers are expected to have trimmed and validated `text` and
    /// `category` already; this constructor stores them verbatim.
    pub fn new(text: &str, category: &str, author: Option<&str>) -> Self {
        let mut rng = rand::rng();
        Quote {
            text: text.to_string(),
            category: category.to_string(),
            author: author.map(String::from),
            id: Some(rng.random()),
            timestamp: Some(Utc::now().timestamp_millis() as u64),
        }
    }

    /// Built-in seed list used when no persisted state exists.
    pub fn defaults() -> Vec<Quote> {
        vec![
            Quote::seed("The only way to do great work is to love what you do.", "Motivation"),
            Quote::seed("In the middle of every difficulty lies opportunity.", "Inspiration"),
            Quote::seed("Simplicity is the ultimate sophistication.", "Philosophy"),
        ]
    }

    fn seed(text: &str, category: &str) -> Quote {
        Quote {
            text: text.to_string(),
            category: category.to_string(),
            author: None,
            id: None,
            timestamp: None,
        }
    }
}

/// Category filter applied to random picks.
///
/// Parses from text with the literal `all` (any casing) selecting everything;
/// any other value selects one category. Matching against quotes stays
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum CategoryFilter {
    /// No filtering; every quote is eligible.
    #[strum(serialize = "all")]
    All,
    /// Only quotes whose category equals the value exactly.
    #[strum(default)]
    Only(String),
}

impl CategoryFilter {
    /// Whether the given quote is eligible under this filter.
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => quote.category == *category,
        }
    }
}

/// Result of a random draw over the (possibly filtered) quote list.
#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    /// A quote was drawn.
    Picked(Quote),
    /// The store holds no quotes at all.
    NoQuotes,
    /// Quotes exist but none matched the requested category.
    NoMatch,
}

impl PickOutcome {
    /// User-facing message shown for both empty outcomes.
    pub const EMPTY_MESSAGE: &'static str = "No quotes available!";

    /// The drawn quote, if there was one.
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            PickOutcome::Picked(quote) => Some(quote),
            _ => None,
        }
    }
}
