//! Pure report computations over canonical shapes.
//!
//! Nothing in this module performs I/O; every report is computed from an
//! already-fetched envelope so the CLI and the interactive menu can share
//! the same logic and the numbers stay testable.

pub mod health;
pub mod history;
pub mod stats;

pub use health::HealthReport;
pub use history::HistorySummary;
pub use stats::CubeStatistics;
