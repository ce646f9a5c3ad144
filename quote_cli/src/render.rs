//! Rendering of store outputs to the terminal.
//!
//! This is the presentation side of the split: it only reads values produced
//! by the core and turns them into display text. Nothing here feeds back
//! into the store.
use quote_store::quote::{PickOutcome, Quote};

/// Format one quote the way the widget displays it.
pub fn format_quote(quote: &Quote) -> String {
    let attribution = match &quote.author {
        Some(author) => format!("{} ({})", author, quote.category),
        None => quote.category.clone(),
    };
    format!("\"{}\"\n— {}", quote.text, attribution)
}

/// Format a draw outcome; both empty conditions render the same message.
pub fn format_outcome(outcome: &PickOutcome) -> String {
    match outcome {
        PickOutcome::Picked(quote) => format_quote(quote),
        PickOutcome::NoQuotes | PickOutcome::NoMatch => PickOutcome::EMPTY_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn formats_attribution_with_and_without_author() {
        let plain = Quote::new("words", "Life", None);
        assert_eq!(format_quote(&plain), "\"words\"\n— Life");

        let attributed = Quote::new("words", "Life", Some("Someone"));
        assert_eq!(format_quote(&attributed), "\"words\"\n— Someone (Life)");
    }

    #[test]
    fn empty_outcomes_share_one_message() {
        assert_eq!(format_outcome(&PickOutcome::NoQuotes), PickOutcome::EMPTY_MESSAGE);
        assert_eq!(format_outcome(&PickOutcome::NoMatch), PickOutcome::EMPTY_MESSAGE);
    }
}
