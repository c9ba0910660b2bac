//! `stats` command: aggregate statistics for a cube.

use crate::backend::DEFAULT_AGGREGATE_LIMIT;
use crate::cli::args::{CubeArgs, OutputFormat};
use crate::cli::{cube_label, print_json};
use crate::core::ApiClient;
use crate::error::Result;
use crate::render::stats::render_stats;
use crate::report::CubeStatistics;

pub async fn execute(
    client: &ApiClient,
    args: &CubeArgs,
    format: OutputFormat,
    pretty: bool,
) -> Result<()> {
    let envelope = client
        .list_aggregates(&args.project_id, &args.cube_id, DEFAULT_AGGREGATE_LIMIT)
        .await?;
    let stats = CubeStatistics::compute(&envelope.data, envelope.total);

    match format {
        OutputFormat::Human => {
            let label = cube_label(client, &args.project_id, &args.cube_id).await?;
            if envelope.data.is_empty() {
                println!("No aggregates found for {label}.");
                return Ok(());
            }
            print!("{}", render_stats(&stats, &label));
        }
        OutputFormat::Json => print_json(&stats, pretty)?,
    }
    Ok(())
}
