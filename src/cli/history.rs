//! `history` command: show aggregate build history.

use crate::cli::args::{HistoryArgs, OutputFormat};
use crate::cli::{cube_label, print_json};
use crate::core::ApiClient;
use crate::error::Result;
use crate::render::history::{render_detailed, render_history};

pub async fn execute(
    client: &ApiClient,
    args: &HistoryArgs,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<()> {
    let envelope = client
        .build_history(&args.cube.project_id, &args.cube.cube_id, args.limit)
        .await?;

    match format {
        OutputFormat::Human => {
            let label = cube_label(client, &args.cube.project_id, &args.cube.cube_id).await?;
            print!("{}", render_history(&envelope, &label, no_color));
            if args.detailed && !envelope.data.is_empty() {
                print!("{}", render_detailed(&envelope.data));
            }
        }
        OutputFormat::Json => print_json(&envelope, pretty)?,
    }
    Ok(())
}
