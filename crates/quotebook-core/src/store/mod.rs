//! Key/value persistence for Quotebook
//!
//! The store is deliberately dumb: string keys, string values, no
//! transactions. Callers serialize their own values.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Key holding the serialized JSON array of quotes.
pub const QUOTES_KEY: &str = "quotes";

/// Key holding a stored quotes document that could not be parsed.
pub const UNREADABLE_QUOTES_KEY: &str = "quotesUnreadable";

/// Key holding the last selected category filter.
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

/// Trait for durable key/value storage
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
