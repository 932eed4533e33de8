//! JSON export and import of the quote collection.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::Quote;

/// Default file name offered for exports.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Render quotes as a pretty-printed JSON array of `{text, category}`.
pub fn render_json_export(quotes: &[Quote]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(quotes)
}

/// Parse an import document into validated quotes.
///
/// The document must be a JSON array whose records each carry a non-empty
/// `text` and `category`. Extra fields are ignored. Nothing is returned unless
/// every record is valid.
pub fn parse_import_document(raw: &str) -> Result<Vec<Quote>> {
    let document: Value =
        serde_json::from_str(raw).map_err(|error| Error::Parse(format!("invalid JSON: {error}")))?;

    let Value::Array(records) = document else {
        return Err(Error::Parse(format!(
            "expected a JSON array of quotes, found {}",
            json_kind(&document)
        )));
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value::<Quote>(record)
                .map_err(|error| Error::Parse(format!("record {index}: {error}")))
        })
        .collect()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
