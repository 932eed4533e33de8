use std::io::{self, Read};
use std::path::Path;

use crate::commands::common::{is_stdio_path, open_service};
use crate::error::CliError;

pub async fn run_import(input_path: &Path, data_dir: &Path) -> Result<(), CliError> {
    let raw = if is_stdio_path(input_path) {
        let mut buffer = String::new();
        io::stdin().lock().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(input_path)?
    };

    let service = open_service(data_dir)?;
    let added = service.import_json(&raw).await?;

    println!("Imported {added} quotes ({} total)", service.len().await);
    Ok(())
}
