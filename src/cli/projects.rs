//! `projects` command: list published projects and their cubes.

use crate::cli::args::OutputFormat;
use crate::cli::print_json;
use crate::core::ApiClient;
use crate::error::Result;
use crate::render;

pub async fn execute(client: &ApiClient, format: OutputFormat, pretty: bool) -> Result<()> {
    let projects = client.list_projects().await?;

    match format {
        OutputFormat::Human => print!("{}", render::render_projects(&projects)),
        OutputFormat::Json => print_json(&projects, pretty)?,
    }
    Ok(())
}
