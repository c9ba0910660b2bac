//! API client facade.
//!
//! Thin dispatcher owning one [`Session`] and one backend strategy, both
//! chosen at configuration-load time. Everything above this point consumes
//! canonical shapes only.

use crate::backend::{self, Backend};
use crate::core::config::ConnectionProfile;
use crate::core::models::{AggregateEnvelope, HistoryEnvelope, Project};
use crate::core::session::Session;
use crate::error::Result;

pub struct ApiClient {
    session: Session,
    backend: Box<dyn Backend>,
}

impl ApiClient {
    /// Build a client for a validated profile.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client construction fails.
    pub fn new(profile: ConnectionProfile) -> Result<Self> {
        let backend = backend::for_profile(&profile)?;
        let session = Session::new(profile)?;
        Ok(Self { session, backend })
    }

    /// The session backing this client.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// List published projects with their cubes.
    ///
    /// # Errors
    ///
    /// Propagates auth and request failures untouched.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.backend.list_projects(&self.session).await
    }

    /// List aggregates for one cube.
    ///
    /// # Errors
    ///
    /// Propagates auth and request failures untouched.
    pub async fn list_aggregates(
        &self,
        project_id: &str,
        cube_id: &str,
        limit: u64,
    ) -> Result<AggregateEnvelope> {
        self.backend
            .list_aggregates(&self.session, project_id, cube_id, limit)
            .await
    }

    /// Trigger an aggregate batch rebuild.
    ///
    /// # Errors
    ///
    /// Propagates auth and request failures untouched.
    pub async fn rebuild(
        &self,
        project_id: &str,
        cube_id: &str,
        full_build: bool,
    ) -> Result<serde_json::Value> {
        self.backend
            .rebuild(&self.session, project_id, cube_id, full_build)
            .await
    }

    /// Fetch aggregate build history (soft-degrades on container
    /// deployments without OIDC credentials).
    ///
    /// # Errors
    ///
    /// Propagates auth and request failures untouched.
    pub async fn build_history(
        &self,
        project_id: &str,
        cube_id: &str,
        limit: u64,
    ) -> Result<HistoryEnvelope> {
        self.backend
            .build_history(&self.session, project_id, cube_id, limit)
            .await
    }
}
