use std::path::Path;

use crate::commands::common::{category_items, format_category_lines, open_service};
use crate::error::CliError;

pub async fn run_categories(as_json: bool, data_dir: &Path) -> Result<(), CliError> {
    let service = open_service(data_dir)?;
    let selected = service.selected_filter().await;
    let items = category_items(&service.quotes().await, &selected);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    for line in format_category_lines(&items, &selected) {
        println!("{line}");
    }
    Ok(())
}
