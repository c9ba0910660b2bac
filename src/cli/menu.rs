//! Interactive menu for TTY sessions without a subcommand.
//!
//! Action failures are printed and the loop continues; only prompt-level
//! I/O failures (e.g. a closed terminal) end the session.

use chrono::Utc;
use dialoguer::{Confirm, Select};

use crate::backend::{DEFAULT_AGGREGATE_LIMIT, DEFAULT_HISTORY_LIMIT};
use crate::core::models::CubeRef;
use crate::core::ApiClient;
use crate::error::Result;
use crate::render;
use crate::render::csv::{default_filename, write_csv};
use crate::report::{CubeStatistics, HealthReport};

/// Run the interactive menu loop until the user exits.
pub async fn run(client: &ApiClient, no_color: bool) -> Result<()> {
    loop {
        let items = ["Refresh token", "Rebuild aggregates", "Reports", "Exit"];
        let Some(selection) = Select::new()
            .with_prompt("aggctl")
            .items(&items)
            .default(0)
            .interact_opt()
            .unwrap_or(None)
        else {
            return Ok(());
        };

        match selection {
            0 => refresh_token(client).await,
            1 => {
                if let Err(e) = rebuild_flow(client).await {
                    println!("Error: {e}");
                }
            }
            2 => {
                if let Err(e) = report_flow(client, no_color).await {
                    println!("Error: {e}");
                }
            }
            _ => return Ok(()),
        }
    }
}

async fn refresh_token(client: &ApiClient) {
    client.session().clear();
    match client.session().public_token(true).await {
        Ok(token) => {
            let preview: String = token.chars().take(12).collect();
            println!("Token refreshed successfully");
            println!("Token preview: {preview}...");
        }
        Err(e) => println!("Error refreshing token: {e}"),
    }
}

/// Pick a `Project::Cube` pair, or `None` when the user backs out.
async fn select_cube(client: &ApiClient, prompt: &str) -> Result<Option<CubeRef>> {
    println!("Loading published projects and cubes...");
    let projects = client.list_projects().await?;
    let cubes = CubeRef::flatten(&projects);

    if cubes.is_empty() {
        println!("No cubes found in published projects.");
        return Ok(None);
    }

    let labels: Vec<String> = cubes.iter().map(CubeRef::display).collect();
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()
        .unwrap_or(None);

    Ok(selection.map(|i| cubes[i].clone()))
}

async fn rebuild_flow(client: &ApiClient) -> Result<()> {
    let Some(cube) = select_cube(client, "Select cube to rebuild").await? else {
        return Ok(());
    };

    let confirmed = Confirm::new()
        .with_prompt(format!("Rebuild cube '{}'? (full build)", cube.display()))
        .default(false)
        .interact()
        .unwrap_or(false);
    if !confirmed {
        return Ok(());
    }

    let response = client.rebuild(&cube.project_id, &cube.cube_id, true).await?;
    println!("Rebuild request accepted.");
    println!("Response: {}", serde_json::to_string(&response)?);
    Ok(())
}

async fn report_flow(client: &ApiClient, no_color: bool) -> Result<()> {
    let Some(cube) = select_cube(client, "Select cube for aggregate report").await? else {
        return Ok(());
    };
    let label = cube.display();

    loop {
        let items = [
            "List aggregates with details",
            "Export aggregates to CSV",
            "Show aggregate statistics",
            "Check aggregate health",
            "Aggregate build history",
            "Back to main menu",
        ];
        let Some(selection) = Select::new()
            .with_prompt(format!("Report for {label}"))
            .items(&items)
            .default(0)
            .interact_opt()
            .unwrap_or(None)
        else {
            return Ok(());
        };

        let outcome = match selection {
            0 => list_report(client, &cube, &label, no_color).await,
            1 => export_report(client, &cube, &label).await,
            2 => stats_report(client, &cube, &label).await,
            3 => health_report(client, &cube, &label).await,
            4 => history_report(client, &cube, &label, no_color).await,
            _ => return Ok(()),
        };
        if let Err(e) = outcome {
            println!("Error: {e}");
        }
    }
}

async fn list_report(
    client: &ApiClient,
    cube: &CubeRef,
    label: &str,
    no_color: bool,
) -> Result<()> {
    let envelope = client
        .list_aggregates(&cube.project_id, &cube.cube_id, DEFAULT_AGGREGATE_LIMIT)
        .await?;
    print!(
        "{}",
        render::aggregates::render_aggregates(&envelope, label, no_color)
    );
    Ok(())
}

async fn export_report(client: &ApiClient, cube: &CubeRef, label: &str) -> Result<()> {
    let envelope = client
        .list_aggregates(&cube.project_id, &cube.cube_id, DEFAULT_AGGREGATE_LIMIT)
        .await?;
    if envelope.data.is_empty() {
        println!("No aggregates found for {label}.");
        return Ok(());
    }
    let path = default_filename(label);
    let written = write_csv(&envelope.data, &path)?;
    println!("Report exported successfully: {}", path.display());
    println!("Total aggregates: {written}");
    Ok(())
}

async fn stats_report(client: &ApiClient, cube: &CubeRef, label: &str) -> Result<()> {
    let envelope = client
        .list_aggregates(&cube.project_id, &cube.cube_id, DEFAULT_AGGREGATE_LIMIT)
        .await?;
    if envelope.data.is_empty() {
        println!("No aggregates found for {label}.");
        return Ok(());
    }
    let stats = CubeStatistics::compute(&envelope.data, envelope.total);
    print!("{}", render::stats::render_stats(&stats, label));
    Ok(())
}

async fn health_report(client: &ApiClient, cube: &CubeRef, label: &str) -> Result<()> {
    let envelope = client
        .list_aggregates(&cube.project_id, &cube.cube_id, DEFAULT_AGGREGATE_LIMIT)
        .await?;
    if envelope.data.is_empty() {
        println!("No aggregates found for {label}.");
        return Ok(());
    }
    let report = HealthReport::compute(&envelope.data, Utc::now());
    print!("{}", render::health::render_health(&report, label));
    Ok(())
}

async fn history_report(
    client: &ApiClient,
    cube: &CubeRef,
    label: &str,
    no_color: bool,
) -> Result<()> {
    let envelope = client
        .build_history(&cube.project_id, &cube.cube_id, DEFAULT_HISTORY_LIMIT)
        .await?;
    print!(
        "{}",
        render::history::render_history(&envelope, label, no_color)
    );

    if !envelope.data.is_empty() {
        let detailed = Confirm::new()
            .with_prompt("Show detailed batch information?")
            .default(false)
            .interact()
            .unwrap_or(false);
        if detailed {
            print!("{}", render::history::render_detailed(&envelope.data));
        }
    }
    Ok(())
}
