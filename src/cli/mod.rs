//! CLI argument parsing and command implementations.

pub mod aggregates;
pub mod args;
pub mod export;
pub mod health;
pub mod history;
pub mod menu;
pub mod projects;
pub mod rebuild;
pub mod stats;
pub mod token;

pub use args::{Cli, Commands, OutputFormat, TokenCommand};

use serde::Serialize;

use crate::core::models::CubeRef;
use crate::core::ApiClient;
use crate::error::Result;

/// Print a value as JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

/// Resolve the `Project::Cube` display label for an id pair.
pub(crate) async fn cube_label(
    client: &ApiClient,
    project_id: &str,
    cube_id: &str,
) -> Result<String> {
    let projects = client.list_projects().await?;
    Ok(CubeRef::resolve(&projects, project_id, cube_id).display())
}
