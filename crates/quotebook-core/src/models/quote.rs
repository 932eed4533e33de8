//! Quote model

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A short piece of text tagged with a category.
///
/// Quotes have no identity of their own: two quotes with the same text and
/// category are equal. Fields are private so every quote in circulation has
/// gone through [`Quote::new`] and carries a non-empty text and category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawQuote")]
pub struct Quote {
    text: String,
    category: String,
}

impl Quote {
    /// Create a quote, trimming both fields.
    ///
    /// Fails with [`Error::Validation`] when either field is blank.
    pub fn new(text: impl AsRef<str>, category: impl AsRef<str>) -> Result<Self> {
        let text = text.as_ref().trim();
        let category = category.as_ref().trim();

        if text.is_empty() {
            return Err(Error::Validation("quote text must not be empty".to_string()));
        }
        if category.is_empty() {
            return Err(Error::Validation(
                "quote category must not be empty".to_string(),
            ));
        }

        Ok(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({})", self.text, self.category)
    }
}

#[derive(Deserialize)]
struct RawQuote {
    text: String,
    category: String,
}

impl TryFrom<RawQuote> for Quote {
    type Error = Error;

    fn try_from(raw: RawQuote) -> Result<Self> {
        Self::new(raw.text, raw.category)
    }
}

/// Quotes seeded into a fresh collection when nothing has been stored yet.
#[must_use]
pub fn default_quotes() -> Vec<Quote> {
    [
        (
            "The best way to predict the future is to invent it.",
            "Inspiration",
        ),
        (
            "Life is 10% what happens to us and 90% how we react to it.",
            "Motivation",
        ),
    ]
    .into_iter()
    .map(|(text, category)| Quote {
        text: text.to_string(),
        category: category.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_fields() {
        let quote = Quote::new("  Stay hungry  ", "\tWisdom\n").unwrap();
        assert_eq!(quote.text(), "Stay hungry");
        assert_eq!(quote.category(), "Wisdom");
    }

    #[test]
    fn new_rejects_blank_fields() {
        assert!(matches!(Quote::new("", "x"), Err(Error::Validation(_))));
        assert!(matches!(Quote::new("x", "   "), Err(Error::Validation(_))));
    }

    #[test]
    fn deserialize_rejects_blank_category() {
        let result = serde_json::from_str::<Quote>(r#"{"text":"hi","category":" "}"#);
        assert!(result.is_err());
    }

    #[test]
    fn serializes_as_text_and_category() {
        let quote = Quote::new("a", "X").unwrap();
        assert_eq!(
            serde_json::to_string(&quote).unwrap(),
            r#"{"text":"a","category":"X"}"#
        );
    }

    #[test]
    fn default_quotes_are_valid() {
        let quotes = default_quotes();
        assert_eq!(quotes.len(), 2);
        assert!(quotes
            .iter()
            .all(|quote| !quote.text().is_empty() && !quote.category().is_empty()));
    }
}
