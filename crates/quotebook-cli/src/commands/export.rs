use std::path::Path;

use crate::commands::common::{is_stdio_path, open_service};
use crate::error::CliError;

pub async fn run_export(output_path: &Path, data_dir: &Path) -> Result<(), CliError> {
    let service = open_service(data_dir)?;
    let rendered = service.export_json().await?;

    if is_stdio_path(output_path) {
        println!("{rendered}");
    } else {
        std::fs::write(output_path, rendered)?;
        println!("{}", output_path.display());
    }

    Ok(())
}
