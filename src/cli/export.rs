//! `export` command: write a cube's aggregates to CSV.

use crate::cli::args::ExportArgs;
use crate::cli::cube_label;
use crate::core::ApiClient;
use crate::error::Result;
use crate::render::csv::{default_filename, write_csv};

pub async fn execute(client: &ApiClient, args: &ExportArgs) -> Result<()> {
    let label = cube_label(client, &args.cube.project_id, &args.cube.cube_id).await?;
    let envelope = client
        .list_aggregates(&args.cube.project_id, &args.cube.cube_id, args.limit)
        .await?;

    if envelope.data.is_empty() {
        println!("No aggregates found for {label}.");
        return Ok(());
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| default_filename(&label));
    let written = write_csv(&envelope.data, &path)?;
    let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

    println!("Report exported successfully: {}", path.display());
    println!("Total aggregates: {written}");
    println!("File size: {size} bytes");
    Ok(())
}
