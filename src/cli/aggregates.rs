//! `aggregates` command: list aggregates for a cube.

use crate::cli::args::{AggregatesArgs, OutputFormat};
use crate::cli::{cube_label, print_json};
use crate::core::ApiClient;
use crate::error::Result;
use crate::render::aggregates::render_aggregates;

pub async fn execute(
    client: &ApiClient,
    args: &AggregatesArgs,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<()> {
    let envelope = client
        .list_aggregates(&args.cube.project_id, &args.cube.cube_id, args.limit)
        .await?;

    match format {
        OutputFormat::Human => {
            let label = cube_label(client, &args.cube.project_id, &args.cube.cube_id).await?;
            print!("{}", render_aggregates(&envelope, &label, no_color));
        }
        OutputFormat::Json => print_json(&envelope, pretty)?,
    }
    Ok(())
}
