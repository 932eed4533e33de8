//! Shared services used by the presentation layer and the sync engine.

mod quotes;

pub use quotes::{QuoteDisplay, QuoteService, NO_QUOTES_MESSAGE};
