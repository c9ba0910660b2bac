//! Backend protocol strategies.
//!
//! The two deployment flavors expose incompatible REST APIs. Each flavor
//! implements the same [`Backend`] contract and decodes its own wire shape
//! into the canonical models, so everything above this layer is
//! flavor-blind. The strategy is chosen once, at configuration-load time.

pub mod container;
pub mod installer;

use async_trait::async_trait;

use crate::core::config::{ConnectionProfile, InstanceKind};
use crate::core::models::{AggregateEnvelope, HistoryEnvelope, Project};
use crate::core::session::Session;
use crate::error::Result;

/// Default page size for aggregate listings.
pub const DEFAULT_AGGREGATE_LIMIT: u64 = 200;

/// Default page size for build history.
pub const DEFAULT_HISTORY_LIMIT: u64 = 20;

/// The operations every backend flavor supports.
///
/// Every method takes domain identifiers and returns the canonical shape;
/// no caller may assume one backend's URL or payload structure. No method
/// retries: each network call is attempted exactly once.
#[async_trait]
pub trait Backend: Send + Sync {
    /// List published projects/catalogs with their cubes/models.
    async fn list_projects(&self, session: &Session) -> Result<Vec<Project>>;

    /// List aggregates for one cube.
    async fn list_aggregates(
        &self,
        session: &Session,
        project_id: &str,
        cube_id: &str,
        limit: u64,
    ) -> Result<AggregateEnvelope>;

    /// Trigger an aggregate batch rebuild. Returns the backend's raw
    /// acknowledgment payload.
    async fn rebuild(
        &self,
        session: &Session,
        project_id: &str,
        cube_id: &str,
        full_build: bool,
    ) -> Result<serde_json::Value>;

    /// Fetch aggregate build history. Capability-gated on container
    /// deployments: without OIDC credentials this returns an empty
    /// envelope and prints one warning line instead of failing.
    async fn build_history(
        &self,
        session: &Session,
        project_id: &str,
        cube_id: &str,
        limit: u64,
    ) -> Result<HistoryEnvelope>;
}

/// Select the backend strategy for a profile.
///
/// # Errors
///
/// Returns error if the backend's HTTP clients cannot be constructed.
pub fn for_profile(profile: &ConnectionProfile) -> Result<Box<dyn Backend>> {
    match profile.instance {
        InstanceKind::Installer => Ok(Box::new(installer::InstallerBackend::new(profile)?)),
        InstanceKind::Container => Ok(Box::new(container::ContainerBackend::new(profile)?)),
    }
}
