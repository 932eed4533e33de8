//! Category index and the persisted category filter.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::models::Quote;
use crate::store::{KeyValueStore, SELECTED_CATEGORY_KEY};

/// Sentinel stored for "no filter".
pub const ALL_CATEGORIES: &str = "all";

/// Distinct categories across `quotes`.
///
/// Returns a snapshot; recompute after the collection changes.
pub fn categories_of(quotes: &[Quote]) -> BTreeSet<String> {
    quotes
        .iter()
        .map(|quote| quote.category().to_string())
        .collect()
}

/// Which quotes the user wants to see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Build a filter from user input. Blank input and `all` mean no filter.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Category(value.to_string())
        }
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => quote.category() == category,
        }
    }

    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(category) => category,
        }
    }

    /// Human readable label used in "no quotes" messages.
    pub fn describe(&self) -> String {
        match self {
            Self::All => "any category".to_string(),
            Self::Category(category) => format!("category '{category}'"),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load the last selected filter, falling back to [`CategoryFilter::All`].
///
/// A stored category that no longer exists is returned as-is; filtering with
/// it simply matches nothing.
pub fn load_selected_filter<S: KeyValueStore + ?Sized>(store: &S) -> CategoryFilter {
    match store.get(SELECTED_CATEGORY_KEY) {
        Ok(Some(value)) => CategoryFilter::parse(&value),
        Ok(None) => CategoryFilter::All,
        Err(error) => {
            tracing::warn!("Failed to read selected category: {}", error);
            CategoryFilter::All
        }
    }
}

pub fn save_selected_filter<S: KeyValueStore + ?Sized>(
    store: &mut S,
    filter: &CategoryFilter,
) -> Result<()> {
    store.set(SELECTED_CATEGORY_KEY, filter.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn quote(text: &str, category: &str) -> Quote {
        Quote::new(text, category).unwrap()
    }

    #[test]
    fn categories_of_deduplicates() {
        let quotes = vec![
            quote("a", "Wisdom"),
            quote("b", "Humor"),
            quote("c", "Wisdom"),
        ];
        let categories = categories_of(&quotes);
        assert_eq!(
            categories.into_iter().collect::<Vec<_>>(),
            vec!["Humor".to_string(), "Wisdom".to_string()]
        );
    }

    #[test]
    fn categories_of_empty_collection() {
        assert!(categories_of(&[]).is_empty());
    }

    #[test]
    fn parse_treats_sentinel_and_blank_as_all() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("  "), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(" Humor "),
            CategoryFilter::Category("Humor".to_string())
        );
    }

    #[test]
    fn category_filter_matches_exact_category() {
        let filter = CategoryFilter::Category("Humor".to_string());
        assert!(filter.matches(&quote("a", "Humor")));
        assert!(!filter.matches(&quote("a", "humor")));
        assert!(CategoryFilter::All.matches(&quote("a", "anything")));
    }

    #[test]
    fn selected_filter_round_trips_through_store() {
        let mut store = MemoryStore::new();
        assert_eq!(load_selected_filter(&store), CategoryFilter::All);

        let filter = CategoryFilter::Category("Motivation".to_string());
        save_selected_filter(&mut store, &filter).unwrap();
        assert_eq!(load_selected_filter(&store), filter);

        save_selected_filter(&mut store, &CategoryFilter::All).unwrap();
        assert_eq!(
            store.get(SELECTED_CATEGORY_KEY).unwrap().as_deref(),
            Some("all")
        );
    }
}
