//! Shared quote service wrapper used by the CLI and the sync engine.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::categories::{categories_of, load_selected_filter, save_selected_filter, CategoryFilter};
use crate::error::{Error, Result};
use crate::models::Quote;
use crate::repository::QuoteRepository;
use crate::store::{JsonFileStore, KeyValueStore, MemoryStore};
use crate::transfer::{parse_import_document, render_json_export};

/// Placeholder shown when no quote matches the active filter.
pub const NO_QUOTES_MESSAGE: &str = "No quotes available for this category.";

/// What the presentation layer should render for a "show new quote" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteDisplay {
    Quote(Quote),
    Placeholder(String),
}

/// Thread-safe owner of the session's single quote repository.
///
/// Clones share the same repository; build one at startup and hand clones to
/// whoever needs it. Every mutation publishes the new repository revision on
/// [`QuoteService::subscribe_changes`].
#[derive(Clone)]
pub struct QuoteService {
    repository: Arc<Mutex<QuoteRepository>>,
    changes: Arc<watch::Sender<u64>>,
}

impl QuoteService {
    pub fn new(repository: QuoteRepository) -> Self {
        let (changes, _) = watch::channel(repository.revision());
        Self {
            repository: Arc::new(Mutex::new(repository)),
            changes: Arc::new(changes),
        }
    }

    /// Load the collection from `store`.
    pub fn open(store: impl KeyValueStore + Send + 'static) -> Self {
        Self::new(QuoteRepository::load(store))
    }

    /// Open the on-disk store inside `data_dir`.
    pub fn open_data_dir(data_dir: &Path) -> Result<Self> {
        let store = JsonFileStore::open_in_dir(data_dir)?;
        tracing::debug!("Using quote store at {}", store.path().display());
        Ok(Self::open(store))
    }

    /// Service over a volatile store (primarily for tests).
    pub fn open_in_memory() -> Self {
        Self::open(MemoryStore::new())
    }

    /// Receive the repository revision after each mutation.
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    pub async fn quotes(&self) -> Vec<Quote> {
        self.repository.lock().await.quotes().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.repository.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.repository.lock().await.is_empty()
    }

    /// Quotes matching `filter`, in collection order.
    pub async fn list(&self, filter: &CategoryFilter) -> Vec<Quote> {
        self.repository
            .lock()
            .await
            .filtered(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn add_quote(&self, text: &str, category: &str) -> Result<Quote> {
        let quote = {
            let mut repository = self.repository.lock().await;
            let quote = repository.add(text, category)?;
            self.publish_change(&repository);
            quote
        };
        tracing::info!("Added quote in category '{}'", quote.category());
        Ok(quote)
    }

    pub async fn pick_quote(&self, filter: &CategoryFilter) -> Result<Quote> {
        self.repository.lock().await.pick_random(filter)
    }

    /// Pick a random quote, degrading to a placeholder when nothing matches.
    pub async fn show_quote(&self, filter: &CategoryFilter) -> QuoteDisplay {
        match self.pick_quote(filter).await {
            Ok(quote) => QuoteDisplay::Quote(quote),
            Err(Error::EmptyResult(scope)) => {
                tracing::debug!("No quotes available for {}", scope);
                QuoteDisplay::Placeholder(NO_QUOTES_MESSAGE.to_string())
            }
            Err(error) => {
                tracing::warn!("Failed to pick a quote: {}", error);
                QuoteDisplay::Placeholder(NO_QUOTES_MESSAGE.to_string())
            }
        }
    }

    /// Snapshot of the distinct categories.
    pub async fn categories(&self) -> BTreeSet<String> {
        categories_of(self.repository.lock().await.quotes())
    }

    pub async fn selected_filter(&self) -> CategoryFilter {
        load_selected_filter(self.repository.lock().await.store())
    }

    /// Persist a new selected filter.
    pub async fn select_filter(&self, filter: &CategoryFilter) -> Result<()> {
        let mut repository = self.repository.lock().await;
        save_selected_filter(repository.store_mut(), filter)?;
        tracing::debug!("Selected category filter '{}'", filter);
        Ok(())
    }

    /// Replace the whole collection (used by sync).
    pub async fn replace_all(&self, quotes: Vec<Quote>) {
        let mut repository = self.repository.lock().await;
        repository.replace_all(quotes);
        self.publish_change(&repository);
    }

    pub async fn export_json(&self) -> Result<String> {
        let repository = self.repository.lock().await;
        Ok(render_json_export(repository.quotes())?)
    }

    /// Append every quote from an import document.
    ///
    /// Nothing is appended unless the whole document parses.
    pub async fn import_json(&self, raw: &str) -> Result<usize> {
        let imported = parse_import_document(raw)?;
        let added = {
            let mut repository = self.repository.lock().await;
            let added = repository.append_all(imported);
            self.publish_change(&repository);
            added
        };
        tracing::info!("Imported {} quotes", added);
        Ok(added)
    }

    fn publish_change(&self, repository: &QuoteRepository) {
        self.changes.send_replace(repository.revision());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::QUOTES_KEY;
    use pretty_assertions::assert_eq;

    fn quote(text: &str, category: &str) -> Quote {
        Quote::new(text, category).unwrap()
    }

    fn service_with(store: MemoryStore, quotes: Vec<Quote>) -> QuoteService {
        QuoteService::new(QuoteRepository::with_quotes(store, quotes))
    }

    #[tokio::test]
    async fn add_quote_grows_collection_by_one() {
        let service = QuoteService::open_in_memory();
        let before = service.len().await;

        service.add_quote("New one", "Fresh").await.unwrap();

        assert_eq!(service.len().await, before + 1);
        assert!(service.categories().await.contains("Fresh"));
    }

    #[tokio::test]
    async fn show_quote_degrades_to_placeholder() {
        let service = service_with(MemoryStore::new(), vec![quote("a", "X")]);

        let display = service
            .show_quote(&CategoryFilter::Category("Missing".to_string()))
            .await;
        assert_eq!(
            display,
            QuoteDisplay::Placeholder(NO_QUOTES_MESSAGE.to_string())
        );

        let display = service.show_quote(&CategoryFilter::All).await;
        assert_eq!(display, QuoteDisplay::Quote(quote("a", "X")));
    }

    #[tokio::test]
    async fn stale_selected_filter_matches_nothing() {
        let service = service_with(MemoryStore::new(), vec![quote("a", "X")]);
        service
            .select_filter(&CategoryFilter::Category("Gone".to_string()))
            .await
            .unwrap();

        let filter = service.selected_filter().await;
        assert_eq!(filter, CategoryFilter::Category("Gone".to_string()));
        assert!(service.list(&filter).await.is_empty());
        assert!(matches!(
            service.pick_quote(&filter).await,
            Err(Error::EmptyResult(_))
        ));
    }

    #[tokio::test]
    async fn export_then_import_into_empty_collection() {
        let source = service_with(MemoryStore::new(), vec![quote("a", "X"), quote("b", "Y")]);
        let exported = source.export_json().await.unwrap();

        let target = service_with(MemoryStore::new(), Vec::new());
        assert_eq!(target.import_json(&exported).await.unwrap(), 2);
        assert_eq!(target.quotes().await, source.quotes().await);
    }

    #[tokio::test]
    async fn import_appends_and_persists_combined_set() {
        let store = MemoryStore::new();
        let service = service_with(store.clone(), vec![quote("a", "X"), quote("b", "Y")]);

        let added = service
            .import_json(r#"[{"text":"c","category":"Z"}]"#)
            .await
            .unwrap();

        assert_eq!(added, 1);
        assert_eq!(service.len().await, 3);
        let stored: Vec<Quote> =
            serde_json::from_str(&store.get(QUOTES_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored, vec![quote("a", "X"), quote("b", "Y"), quote("c", "Z")]);
    }

    #[tokio::test]
    async fn import_rejects_malformed_document_without_mutating() {
        let store = MemoryStore::new();
        let service = service_with(store.clone(), vec![quote("a", "X")]);

        let error = service.import_json("not json").await.unwrap_err();
        assert!(matches!(error, Error::Parse(_)));

        let error = service
            .import_json(r#"{"text":"c","category":"Z"}"#)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Parse(_)));

        assert_eq!(service.len().await, 1);
        assert!(store.get(QUOTES_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn open_data_dir_persists_between_sessions() {
        let dir = tempfile::tempdir().unwrap();
        {
            let service = QuoteService::open_data_dir(dir.path()).unwrap();
            service.add_quote("Persist me", "Disk").await.unwrap();
            service
                .select_filter(&CategoryFilter::Category("Disk".to_string()))
                .await
                .unwrap();
        }

        let service = QuoteService::open_data_dir(dir.path()).unwrap();
        assert!(service.quotes().await.contains(&quote("Persist me", "Disk")));
        assert_eq!(
            service.selected_filter().await,
            CategoryFilter::Category("Disk".to_string())
        );
    }

    #[tokio::test]
    async fn mutations_publish_change_notifications() {
        let service = service_with(MemoryStore::new(), vec![quote("a", "X")]);
        let mut changes = service.subscribe_changes();
        assert!(!changes.has_changed().unwrap());

        service.add_quote("b", "Y").await.unwrap();
        assert!(changes.has_changed().unwrap());
        assert_eq!(*changes.borrow_and_update(), 1);

        assert!(service.add_quote("", "Y").await.is_err());
        assert!(service.import_json("nope").await.is_err());
        assert!(!changes.has_changed().unwrap());

        service.replace_all(vec![quote("c", "Z")]).await;
        assert_eq!(*changes.borrow_and_update(), 2);
        assert_eq!(
            service.categories().await,
            std::collections::BTreeSet::from(["Z".to_string()])
        );
    }
}
