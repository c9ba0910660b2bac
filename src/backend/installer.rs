//! Installer backend.
//!
//! Installer deployments serve data on a dedicated engine port with
//! organization-scoped paths, and their payloads already match the
//! canonical shape: decoding is the identity transform modulo the
//! `{"response": ...}` wrapper.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::core::config::ConnectionProfile;
use crate::core::http::{self, READ_TIMEOUT, REBUILD_TIMEOUT};
use crate::core::models::{AggregateEnvelope, HistoryEnvelope, Project};
use crate::core::session::Session;
use crate::error::{AggctlError, Result};

use super::Backend;

/// Installer responses arrive wrapped in a `response` field.
#[derive(Debug, Deserialize)]
struct ResponseWrapper<T> {
    response: T,
}

pub struct InstallerBackend {
    organization: String,
    engine_base: String,
    read_client: Client,
    rebuild_client: Client,
}

impl InstallerBackend {
    /// Build the backend, deriving the engine base URL from the profile
    /// host with the port rewritten to the engine port.
    ///
    /// # Errors
    ///
    /// Returns error on an unparseable host or client construction failure.
    pub fn new(profile: &ConnectionProfile) -> Result<Self> {
        let mut url = url::Url::parse(&profile.base_url())
            .map_err(|e| AggctlError::Config(format!("invalid host: {e}")))?;
        url.set_port(Some(profile.engine_port))
            .map_err(|()| AggctlError::Config("host does not accept a port".to_string()))?;

        Ok(Self {
            organization: profile.organization.clone().unwrap_or_default(),
            engine_base: url.to_string().trim_end_matches('/').to_string(),
            read_client: http::build_client(READ_TIMEOUT, profile.verify_tls)?,
            rebuild_client: http::build_client(REBUILD_TIMEOUT, profile.verify_tls)?,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, session: &Session, url: &str) -> Result<T> {
        let token = session.public_token(false).await?;
        tracing::debug!(%url, "installer GET");

        let response = self
            .read_client
            .get(url)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| http::classify_transport(&e, url, READ_TIMEOUT))?;

        let response = http::ensure_success(response, url).await?;
        response
            .json()
            .await
            .map_err(|e| AggctlError::RequestTransport {
                url: url.to_string(),
                message: format!("malformed response: {e}"),
            })
    }
}

#[async_trait]
impl Backend for InstallerBackend {
    async fn list_projects(&self, session: &Session) -> Result<Vec<Project>> {
        let url = format!(
            "{}/projects/published/orgId/{}",
            self.engine_base, self.organization
        );
        let wrapper: ResponseWrapper<Vec<Project>> = self.get_json(session, &url).await?;
        Ok(wrapper.response)
    }

    async fn list_aggregates(
        &self,
        session: &Session,
        project_id: &str,
        cube_id: &str,
        limit: u64,
    ) -> Result<AggregateEnvelope> {
        let url = format!(
            "{}/aggregates/orgId/{}?limit={limit}&projectId={project_id}&cubeId={cube_id}",
            self.engine_base, self.organization
        );
        let wrapper: ResponseWrapper<AggregateEnvelope> = self.get_json(session, &url).await?;
        Ok(wrapper.response)
    }

    async fn rebuild(
        &self,
        session: &Session,
        project_id: &str,
        cube_id: &str,
        full_build: bool,
    ) -> Result<serde_json::Value> {
        // Query-string-only POST: the installer backend rejects a body here.
        let url = format!(
            "{}/aggregate-batch/orgId/{}/projectId/{project_id}?cubeId={cube_id}&isFullBuild={full_build}",
            self.engine_base, self.organization
        );
        let token = session.public_token(false).await?;
        tracing::debug!(%url, full_build, "installer rebuild");

        let response = self
            .rebuild_client
            .post(&url)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
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
        // Installer has no separate private surface; the public token
        // covers history as well.
        let url = format!(
            "{}/aggregate-batch/orgId/{}/history?limit={limit}&projectId={project_id}&cubeId={cube_id}",
            self.engine_base, self.organization
        );
        let wrapper: ResponseWrapper<HistoryEnvelope> = self.get_json(session, &url).await?;
        Ok(wrapper.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{InstanceKind, DEFAULT_AUTH_PORT, DEFAULT_ENGINE_PORT};

    fn profile() -> ConnectionProfile {
        ConnectionProfile {
            instance: InstanceKind::Installer,
            host: "bi.example.com".to_string(),
            organization: Some("acme".to_string()),
            username: Some("admin".to_string()),
            password: Some("hunter2".to_string()),
            token: None,
            client_id: None,
            client_secret: None,
            verify_tls: false,
            auth_port: DEFAULT_AUTH_PORT,
            engine_port: DEFAULT_ENGINE_PORT,
        }
    }

    #[test]
    fn engine_base_rewrites_port() {
        let backend = InstallerBackend::new(&profile()).unwrap();
        assert_eq!(backend.engine_base, "https://bi.example.com:10502");
    }

    #[test]
    fn canonical_payload_decodes_unchanged() {
        // Installer payloads are already canonical; decode is identity.
        let raw = r#"{
            "response": {
                "data": [{
                    "id": "agg-1",
                    "name": "orders_by_region",
                    "type": "user_defined",
                    "subtype": "manual",
                    "project_id": "p1",
                    "cube_id": "c1",
                    "latest_instance": {
                        "id": "inst-1",
                        "status": "active",
                        "stats": {"build_duration": 850, "number_of_rows": 120000}
                    }
                }],
                "total": 1,
                "limit": 200,
                "offset": 0
            }
        }"#;

        let wrapper: ResponseWrapper<AggregateEnvelope> = serde_json::from_str(raw).unwrap();
        let envelope = wrapper.response;
        assert_eq!(envelope.total, 1);
        let record = &envelope.data[0];
        assert_eq!(record.name, "orders_by_region");
        assert_eq!(record.latest_instance.stats.number_of_rows, 120_000);
        assert_eq!(record.latest_instance.stats.build_duration, 850);
        // Absent fields take their declared defaults, nothing else moves.
        assert_eq!(record.active_instance, Default::default());
    }
}
