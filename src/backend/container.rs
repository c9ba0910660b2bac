//! Container backend.
//!
//! Container deployments serve versioned `/v1/...` endpoints on the base
//! host, with a separate `/wapi/p/...` private surface for build history.
//! Their payloads use different field names and a flatter structure than
//! the canonical shape, so every field is mapped explicitly here; nothing
//! passes through implicitly.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::core::config::ConnectionProfile;
use crate::core::http::{self, READ_TIMEOUT, REBUILD_TIMEOUT};
use crate::core::models::{
    AggregateEnvelope, AggregateRecord, Cube, HistoryEnvelope, InstanceRecord, InstanceStats,
    Project,
};
use crate::core::session::Session;
use crate::error::{AggctlError, Result};

use super::Backend;

// =============================================================================
// Wire Shapes
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireCatalog {
    id: String,
    name: String,
    models: Vec<WireModel>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireModel {
    id: String,
    name: String,
    caption: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireInstanceList {
    data: Vec<WireInstance>,
}

/// One aggregate instance as `/v1/aggregates/instances` reports it.
/// Container has no separate latest/active distinction; this single
/// record feeds both canonical instances.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireInstance {
    id: String,
    definition_id: String,
    catalog_id: String,
    model_id: String,
    connection_id: String,
    status: String,
    message: String,
    table_name: String,
    table_schema: String,
    build_query_id: String,
    stats: WireInstanceStats,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireInstanceStats {
    materialization_start_time: String,
    materialization_end_time: String,
    build_duration: u64,
    number_of_rows: u64,
}

// =============================================================================
// Backend
// =============================================================================

pub struct ContainerBackend {
    base: String,
    read_client: Client,
    rebuild_client: Client,
}

impl ContainerBackend {
    /// Build the backend over the profile's base host.
    ///
    /// # Errors
    ///
    /// Returns error if client construction fails.
    pub fn new(profile: &ConnectionProfile) -> Result<Self> {
        Ok(Self {
            base: profile.base_url(),
            read_client: http::build_client(READ_TIMEOUT, profile.verify_tls)?,
            rebuild_client: http::build_client(REBUILD_TIMEOUT, profile.verify_tls)?,
        })
    }
}

#[async_trait]
impl Backend for ContainerBackend {
    async fn list_projects(&self, session: &Session) -> Result<Vec<Project>> {
        let url = format!("{}/v1/catalogs", self.base);
        let token = session.public_token(false).await?;
        tracing::debug!(%url, "container GET");

        let response = self
            .read_client
            .get(&url)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| http::classify_transport(&e, &url, READ_TIMEOUT))?;
        let response = http::ensure_success(response, &url).await?;

        let catalogs: Vec<WireCatalog> =
            response
                .json()
                .await
                .map_err(|e| AggctlError::RequestTransport {
                    url,
                    message: format!("malformed response: {e}"),
                })?;
        Ok(catalogs.into_iter().map(map_catalog).collect())
    }

    async fn list_aggregates(
        &self,
        session: &Session,
        project_id: &str,
        cube_id: &str,
        limit: u64,
    ) -> Result<AggregateEnvelope> {
        let url = format!(
            "{}/v1/aggregates/instances?catalogId={project_id}&modelId={cube_id}",
            self.base
        );
        let token = session.public_token(false).await?;
        tracing::debug!(%url, "container GET");

        let response = self
            .read_client
            .get(&url)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| http::classify_transport(&e, &url, READ_TIMEOUT))?;
        let response = http::ensure_success(response, &url).await?;

        let list: WireInstanceList =
            response
                .json()
                .await
                .map_err(|e| AggctlError::RequestTransport {
                    url,
                    message: format!("malformed response: {e}"),
                })?;
        Ok(map_instances(list, project_id, cube_id, limit))
    }

    async fn rebuild(
        &self,
        session: &Session,
        project_id: &str,
        cube_id: &str,
        full_build: bool,
    ) -> Result<serde_json::Value> {
        let url = format!(
            "{}/v1/aggregates-batch/catalogs/{project_id}/models/{cube_id}?isFullBuild={full_build}",
            self.base
        );
        let token = session.public_token(false).await?;
        tracing::debug!(%url, full_build, "container rebuild");

        // Empty-but-present structured body: the container backend
        // validates body presence on this endpoint.
        let response = self
            .rebuild_client
            .post(&url)
            .bearer_auth(&token)
            .header(ACCEPT, "application/json")
            .json(&json!({"gracePeriodOverrides": {}}))
            .send()
            .await
            .map_err(|e| http::classify_transport(&e, &url, REBUILD_TIMEOUT))?;
        let response = http::ensure_success(response, &url).await?;

        response
            .json()
            .await
            .map_err(|e| AggctlError::RequestTransport {
                url,
                message: format!("malformed response: {e}"),
            })
    }

    async fn build_history(
        &self,
        session: &Session,
        project_id: &str,
        cube_id: &str,
        limit: u64,
    ) -> Result<HistoryEnvelope> {
        let Some(token) = session.private_token(false).await? else {
            eprintln!(
                "warning: build history unavailable; container instances need client_id and \
                 client_secret in the profile for private API access"
            );
            return Ok(HistoryEnvelope::empty(limit));
        };

        let url = format!(
            "{}/wapi/p/aggregate/batch-history?page=1&limit={limit}&catalogId={project_id}&modelId={cube_id}",
            self.base
        );
        tracing::debug!(%url, "container private GET");

        // Authorization only. The private surface rejects GETs that carry
        // a body content-type header.
        let response = self
            .read_client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| http::classify_transport(&e, &url, READ_TIMEOUT))?;
        let response = http::ensure_success(response, &url).await?;

        response
            .json()
            .await
            .map_err(|e| AggctlError::RequestTransport {
                url,
                message: format!("malformed response: {e}"),
            })
    }
}

// =============================================================================
// Canonical Mapping
// =============================================================================

fn map_catalog(catalog: WireCatalog) -> Project {
    Project {
        id: catalog.id,
        name: catalog.name,
        cubes: catalog
            .models
            .into_iter()
            .map(|model| Cube {
                id: model.id,
                name: model.name,
                caption: model.caption,
            })
            .collect(),
    }
}

fn map_instances(
    list: WireInstanceList,
    project_id: &str,
    cube_id: &str,
    limit: u64,
) -> AggregateEnvelope {
    let total = list.data.len() as u64;
    let data = list
        .data
        .into_iter()
        .map(|instance| map_instance(instance, project_id, cube_id))
        .collect();
    AggregateEnvelope {
        data,
        total,
        limit,
        offset: 0,
    }
}

fn map_instance(wire: WireInstance, project_id: &str, cube_id: &str) -> AggregateRecord {
    let instance = InstanceRecord {
        id: wire.id,
        status: wire.status,
        message: wire.message,
        table_name: wire.table_name,
        table_schema: wire.table_schema,
        batch_id: wire.build_query_id,
        connection_id: wire.connection_id.clone(),
        stats: InstanceStats {
            materialization_start_time: wire.stats.materialization_start_time,
            materialization_end_time: wire.stats.materialization_end_time,
            build_duration: wire.stats.build_duration,
            number_of_rows: wire.stats.number_of_rows,
        },
    };

    AggregateRecord {
        id: wire.definition_id.clone(),
        name: wire.definition_id,
        kind: "system_defined".to_string(),
        subtype: "prediction_defined".to_string(),
        attributes: Vec::new(),
        project_id: or_fallback(wire.catalog_id, project_id),
        cube_id: or_fallback(wire.model_id, cube_id),
        connection_id: wire.connection_id,
        incremental: false,
        stats: crate::core::models::AggregateStats {
            created_at: String::new(),
            average_build_duration: instance.stats.build_duration,
            query_utilization: 0.0,
            most_recent_query: String::new(),
        },
        // Container reports a single instance; it stands in for both.
        active_instance: instance.clone(),
        latest_instance: instance,
    }
}

fn or_fallback(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
