use std::path::Path;

use quotebook_core::CategoryFilter;

use crate::commands::common::{format_quote_display, open_service};
use crate::error::CliError;

/// Print a random quote from `category`, or from the saved filter when omitted.
pub async fn run_show(category: Option<&str>, data_dir: &Path) -> Result<(), CliError> {
    let service = open_service(data_dir)?;
    let filter = match category {
        Some(category) => CategoryFilter::parse(category),
        None => service.selected_filter().await,
    };

    let display = service.show_quote(&filter).await;
    println!("{}", format_quote_display(&display));
    Ok(())
}
