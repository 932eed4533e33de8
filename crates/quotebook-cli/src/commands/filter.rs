use std::path::Path;

use quotebook_core::CategoryFilter;

use crate::commands::common::{format_quote_display, open_service};
use crate::error::CliError;

/// Print the saved filter, or save a new one and show a quote from it.
pub async fn run_filter(category: Option<&str>, data_dir: &Path) -> Result<(), CliError> {
    let service = open_service(data_dir)?;

    let Some(category) = category else {
        println!("{}", service.selected_filter().await);
        return Ok(());
    };

    let filter = CategoryFilter::parse(category);
    if let CategoryFilter::Category(name) = &filter {
        if !service.categories().await.contains(name) {
            eprintln!("No quotes in category '{name}' yet");
        }
    }

    service.select_filter(&filter).await?;
    println!("Filter set to {filter}");

    let display = service.show_quote(&filter).await;
    println!("{}", format_quote_display(&display));
    Ok(())
}
