//! Remote quote collection.
//!
//! The remote side is a single URL: `GET` returns a JSON array of records and
//! `POST` accepts the full local collection as a JSON body.

mod http;

pub use http::{HttpRemoteCollection, DEFAULT_REMOTE_TIMEOUT_SECS};

use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::Quote;

/// Trait for the remote end of a sync cycle (async)
#[allow(async_fn_in_trait)]
pub trait RemoteCollection {
    /// Fetch the full remote collection
    async fn fetch_quotes(&self) -> Result<Vec<Quote>>;

    /// Send the full local collection to the remote
    async fn push_quotes(&self, quotes: &[Quote]) -> Result<()>;
}

/// Map remote records onto quotes.
///
/// Only `text` and `category` are kept. Records without a usable text or
/// category are skipped so a partially malformed remote cannot put an invalid
/// quote into the collection. A non-empty payload in which no record maps to a
/// quote is not a quote collection at all and fails as `Network`; an empty
/// array is a valid, empty collection.
pub fn records_to_quotes(records: Vec<Value>) -> Result<Vec<Quote>> {
    let total = records.len();
    let quotes = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match record_to_quote(&record) {
            Some(quote) => Some(quote),
            None => {
                tracing::warn!("Skipping remote record {} without text/category", index);
                None
            }
        })
        .collect::<Vec<_>>();

    if total > 0 && quotes.is_empty() {
        return Err(Error::Network(format!(
            "remote returned {total} records but none had text and category"
        )));
    }
    if quotes.len() < total {
        tracing::info!("Ingested {} of {} remote records", quotes.len(), total);
    }
    Ok(quotes)
}

fn record_to_quote(record: &Value) -> Option<Quote> {
    let text = record.get("text")?.as_str()?;
    let category = record.get("category")?.as_str()?;
    Quote::new(text, category).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn records_to_quotes_drops_extra_fields() {
        let quotes = records_to_quotes(vec![json!({
            "id": 1,
            "userId": 9,
            "text": "b",
            "category": "Y"
        })])
        .unwrap();
        assert_eq!(quotes, vec![Quote::new("b", "Y").unwrap()]);
    }

    #[test]
    fn records_to_quotes_skips_unusable_records() {
        let quotes = records_to_quotes(vec![
            json!({"title": "no text", "body": "nor category"}),
            json!({"text": "", "category": "Y"}),
            json!({"text": "ok", "category": 4}),
            json!("just a string"),
            json!({"text": "kept", "category": "Z"}),
        ])
        .unwrap();
        assert_eq!(quotes, vec![Quote::new("kept", "Z").unwrap()]);
    }

    #[test]
    fn records_without_any_quote_are_rejected() {
        let posts = (1..=100)
            .map(|id| json!({"userId": 1, "id": id, "title": "sunt aut", "body": "quia et"}))
            .collect::<Vec<_>>();
        assert!(matches!(records_to_quotes(posts), Err(Error::Network(_))));
    }

    #[test]
    fn empty_payload_is_an_empty_collection() {
        assert_eq!(records_to_quotes(Vec::new()).unwrap(), Vec::new());
    }
}
