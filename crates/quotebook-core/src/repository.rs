//! In-memory quote repository with write-through persistence.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::Value;

use crate::categories::CategoryFilter;
use crate::error::{Error, Result};
use crate::models::{default_quotes, Quote};
use crate::store::{KeyValueStore, QUOTES_KEY, UNREADABLE_QUOTES_KEY};

/// Store handle owned by the repository.
pub type BoxedStore = Box<dyn KeyValueStore + Send>;

/// Ordered collection of quotes for the current session.
///
/// Every mutation writes the full collection through to the store before it
/// returns. A failed write is logged and otherwise ignored: the in-memory
/// collection stays authoritative for the session.
pub struct QuoteRepository {
    quotes: Vec<Quote>,
    store: BoxedStore,
    revision: u64,
}

impl QuoteRepository {
    /// Load the collection from `store`.
    ///
    /// Stored records that no longer validate are skipped with a warning; the
    /// rest of the collection survives. The defaults are seeded only when
    /// nothing is stored or the stored document is not a JSON array at all, in
    /// which case the unreadable document is copied to
    /// [`UNREADABLE_QUOTES_KEY`] before anything overwrites it.
    pub fn load(store: impl KeyValueStore + Send + 'static) -> Self {
        let mut store: BoxedStore = Box::new(store);
        let quotes = match store.get(QUOTES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Value>>(&raw) {
                Ok(records) => stored_records_to_quotes(records),
                Err(error) => {
                    tracing::warn!("Stored quotes are unreadable, using defaults: {}", error);
                    if let Err(error) = store.set(UNREADABLE_QUOTES_KEY, &raw) {
                        tracing::warn!("Failed to keep unreadable quotes aside: {}", error);
                    }
                    default_quotes()
                }
            },
            Ok(None) => {
                tracing::debug!("No stored quotes, seeding defaults");
                default_quotes()
            }
            Err(error) => {
                tracing::warn!("Failed to read stored quotes, using defaults: {}", error);
                default_quotes()
            }
        };

        Self {
            quotes,
            store,
            revision: 0,
        }
    }

    /// Build a repository around an explicit collection without touching the
    /// store.
    pub fn with_quotes(store: impl KeyValueStore + Send + 'static, quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            store: Box::new(store),
            revision: 0,
        }
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Bumped by every mutation. Anything derived from the collection (such as
    /// the category set) is stale once this moves.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Validate and append a new quote.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote> {
        let quote = Quote::new(text, category)?;
        self.quotes.push(quote.clone());
        self.persist();
        Ok(quote)
    }

    /// Swap the whole collection.
    pub fn replace_all(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
        self.persist();
    }

    /// Append a batch of already validated quotes.
    pub fn append_all(&mut self, quotes: Vec<Quote>) -> usize {
        let added = quotes.len();
        self.quotes.extend(quotes);
        self.persist();
        added
    }

    /// Quotes matching `filter`, in collection order.
    pub fn filtered(&self, filter: &CategoryFilter) -> Vec<&Quote> {
        self.quotes
            .iter()
            .filter(|quote| filter.matches(quote))
            .collect()
    }

    /// Pick a quote uniformly at random among those matching `filter`.
    pub fn pick_random(&self, filter: &CategoryFilter) -> Result<Quote> {
        self.pick_random_with(filter, &mut rand::rng())
    }

    pub fn pick_random_with<R: Rng + ?Sized>(
        &self,
        filter: &CategoryFilter,
        rng: &mut R,
    ) -> Result<Quote> {
        self.filtered(filter)
            .choose(rng)
            .map(|quote| (*quote).clone())
            .ok_or_else(|| Error::EmptyResult(filter.describe()))
    }

    pub fn store(&self) -> &(dyn KeyValueStore + Send) {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut (dyn KeyValueStore + Send) {
        self.store.as_mut()
    }

    fn persist(&mut self) {
        self.revision += 1;

        let serialized = match serde_json::to_string(&self.quotes) {
            Ok(serialized) => serialized,
            Err(error) => {
                tracing::warn!("Failed to serialize quotes: {}", error);
                return;
            }
        };

        match self.store.set(QUOTES_KEY, &serialized) {
            Ok(()) => tracing::debug!("Persisted {} quotes", self.quotes.len()),
            Err(error) => tracing::warn!("Failed to persist quotes: {}", error),
        }
    }
}

fn stored_records_to_quotes(records: Vec<Value>) -> Vec<Quote> {
    let total = records.len();
    let quotes = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Quote>(record) {
            Ok(quote) => Some(quote),
            Err(error) => {
                tracing::warn!("Skipping stored quote {}: {}", index, error);
                None
            }
        })
        .collect::<Vec<_>>();

    if quotes.len() < total {
        tracing::warn!("Loaded {} of {} stored quotes", quotes.len(), total);
    }
    quotes
}

impl std::fmt::Debug for QuoteRepository {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("QuoteRepository")
            .field("quotes", &self.quotes)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}
