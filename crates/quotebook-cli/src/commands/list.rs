use std::path::Path;

use quotebook_core::CategoryFilter;

use crate::commands::common::{format_quote_lines, open_service, QuoteListItem};
use crate::error::CliError;

pub async fn run_list(category: Option<&str>, as_json: bool, data_dir: &Path) -> Result<(), CliError> {
    let service = open_service(data_dir)?;
    let filter = category.map(CategoryFilter::parse).unwrap_or_default();
    let quotes = service.list(&filter).await;

    if as_json {
        let json_items = quotes.iter().map(QuoteListItem::from).collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if quotes.is_empty() {
        println!("No quotes found for {}.", filter.describe());
        return Ok(());
    }

    for line in format_quote_lines(&quotes) {
        println!("{line}");
    }
    Ok(())
}
