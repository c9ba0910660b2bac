//! aggctl - operator CLI for managing aggregate tables on AtScale BI servers.
//!
//! Authenticates against the server's REST API, browses published analytic
//! models, triggers aggregate-table rebuilds, and reports over aggregate
//! tables (listing, statistics, health, build history, CSV export). The two
//! deployment flavors (installer and container) expose incompatible REST
//! APIs; the backend layer unifies them behind one canonical shape.

#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod cli;
pub mod core;
pub mod error;
pub mod render;
pub mod report;
pub mod util;

pub use error::{AggctlError, ExitCode, Result};
