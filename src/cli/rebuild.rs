//! `rebuild` command: trigger an aggregate batch rebuild.

use dialoguer::Confirm;

use crate::cli::args::{OutputFormat, RebuildArgs};
use crate::cli::{cube_label, print_json};
use crate::core::ApiClient;
use crate::error::Result;

pub async fn execute(
    client: &ApiClient,
    args: &RebuildArgs,
    format: OutputFormat,
    pretty: bool,
) -> Result<()> {
    let full_build = !args.incremental;

    // Prompt only on a TTY; non-interactive invocations proceed.
    if !args.yes && atty::is(atty::Stream::Stdin) {
        let label = cube_label(client, &args.cube.project_id, &args.cube.cube_id).await?;
        let kind = if full_build { "full" } else { "incremental" };
        let confirmed = Confirm::new()
            .with_prompt(format!("Rebuild cube '{label}'? ({kind} build)"))
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirmed {
            println!("Rebuild cancelled.");
            return Ok(());
        }
    }

    tracing::info!(
        project_id = %args.cube.project_id,
        cube_id = %args.cube.cube_id,
        full_build,
        "triggering rebuild"
    );
    let response = client
        .rebuild(&args.cube.project_id, &args.cube.cube_id, full_build)
        .await?;

    match format {
        OutputFormat::Human => {
            println!("Rebuild request accepted.");
            println!("Response: {}", serde_json::to_string(&response)?);
        }
        OutputFormat::Json => print_json(&response, pretty)?,
    }
    Ok(())
}
