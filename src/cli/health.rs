//! `health` command: aggregate health check for a cube.

use chrono::Utc;

use crate::backend::DEFAULT_AGGREGATE_LIMIT;
use crate::cli::args::{CubeArgs, OutputFormat};
use crate::cli::{cube_label, print_json};
use crate::core::ApiClient;
use crate::error::Result;
use crate::render::health::render_health;
use crate::report::HealthReport;

pub async fn execute(
    client: &ApiClient,
    args: &CubeArgs,
    format: OutputFormat,
    pretty: bool,
) -> Result<()> {
    let envelope = client
        .list_aggregates(&args.project_id, &args.cube_id, DEFAULT_AGGREGATE_LIMIT)
        .await?;
    let report = HealthReport::compute(&envelope.data, Utc::now());

    match format {
        OutputFormat::Human => {
            let label = cube_label(client, &args.project_id, &args.cube_id).await?;
            if envelope.data.is_empty() {
                println!("No aggregates found for {label}.");
                return Ok(());
            }
            print!("{}", render_health(&report, &label));
        }
        OutputFormat::Json => print_json(&report, pretty)?,
    }
    Ok(())
}
