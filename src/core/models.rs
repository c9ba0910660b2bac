//! Canonical data models.
//!
//! These are the only shapes the reporting layer sees: both backends decode
//! into them, so no downstream code can depend on which deployment flavor
//! produced a response. Installer payloads already arrive in this shape;
//! container payloads are mapped into it field by field in the container
//! backend.
//!
//! Every struct takes `#[serde(default)]`: absent numeric fields decode to
//! 0 and absent strings to empty, while a type mismatch is still a clear
//! decode error rather than a silently propagated zero.

use serde::{Deserialize, Serialize};

// =============================================================================
// Projects and Cubes
// =============================================================================

/// A published project (installer) or catalog (container).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub cubes: Vec<Cube>,
}

/// A cube (installer) or model (container) inside a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Cube {
    pub id: String,
    pub name: String,
    pub caption: String,
}

/// A flattened `Project::Cube` pair, the addressing unit for every
/// aggregate operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeRef {
    pub project_id: String,
    pub project_name: String,
    pub cube_id: String,
    pub cube_name: String,
}

impl CubeRef {
    /// Display label in `Project::Cube` form.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}::{}", self.project_name, self.cube_name)
    }

    /// Flatten a project list into selectable cube entries.
    #[must_use]
    pub fn flatten(projects: &[Project]) -> Vec<Self> {
        projects
            .iter()
            .flat_map(|project| {
                project.cubes.iter().map(|cube| Self {
                    project_id: project.id.clone(),
                    project_name: project.name.clone(),
                    cube_id: cube.id.clone(),
                    cube_name: cube.name.clone(),
                })
            })
            .collect()
    }

    /// Resolve names for a known id pair, falling back to placeholders when
    /// the pair is not in the published list.
    #[must_use]
    pub fn resolve(projects: &[Project], project_id: &str, cube_id: &str) -> Self {
        for project in projects {
            if project.id == project_id {
                for cube in &project.cubes {
                    if cube.id == cube_id {
                        return Self {
                            project_id: project_id.to_string(),
                            project_name: project.name.clone(),
                            cube_id: cube_id.to_string(),
                            cube_name: cube.name.clone(),
                        };
                    }
                }
                return Self {
                    project_id: project_id.to_string(),
                    project_name: project.name.clone(),
                    cube_id: cube_id.to_string(),
                    cube_name: "Unknown Cube".to_string(),
                };
            }
        }
        Self {
            project_id: project_id.to_string(),
            project_name: "Unknown Project".to_string(),
            cube_id: cube_id.to_string(),
            cube_name: "Unknown Cube".to_string(),
        }
    }
}

// =============================================================================
// Aggregates
// =============================================================================

/// Envelope wrapping every list-returning aggregate call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AggregateEnvelope {
    pub data: Vec<AggregateRecord>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// One aggregate definition with its latest and active instances.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AggregateRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub subtype: String,
    pub attributes: Vec<Attribute>,
    pub project_id: String,
    pub cube_id: String,
    pub connection_id: String,
    pub incremental: bool,
    pub stats: AggregateStats,
    pub latest_instance: InstanceRecord,
    pub active_instance: InstanceRecord,
}

/// An attribute participating in an aggregate (key, measure, or dimension).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Attribute {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Definition-level statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AggregateStats {
    pub created_at: String,
    pub average_build_duration: u64,
    pub query_utilization: f64,
    pub most_recent_query: String,
}

/// One materialized instance of an aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InstanceRecord {
    pub id: String,
    pub status: String,
    pub message: String,
    pub table_name: String,
    pub table_schema: String,
    pub batch_id: String,
    pub connection_id: String,
    pub stats: InstanceStats,
}

/// Instance-level build statistics. Durations are in milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InstanceStats {
    pub materialization_start_time: String,
    pub materialization_end_time: String,
    pub build_duration: u64,
    pub number_of_rows: u64,
}

// =============================================================================
// Build History
// =============================================================================

/// Envelope wrapping the build-history call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryEnvelope {
    pub data: Vec<BuildBatch>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

impl HistoryEnvelope {
    /// Empty envelope for the capability-gated soft degradation.
    #[must_use]
    pub fn empty(limit: u64) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}

/// One aggregate build batch. The wire shape is camelCase on both
/// backends; `sum_of_instance_build_times` is an ISO-8601 duration
/// (e.g. `PT3.232S`) and `estimate_time` is in milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildBatch {
    pub id: String,
    pub status: String,
    pub is_full_build: bool,
    pub batch_type: String,
    pub create_date: String,
    pub start_time: String,
    pub end_time: String,
    pub estimate_time: u64,
    pub sum_of_instance_build_times: String,
}
