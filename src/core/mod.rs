//! Core: configuration, session, HTTP, canonical models, client facade.

pub mod client;
pub mod config;
pub mod http;
pub mod logging;
pub mod models;
pub mod session;

pub use client::ApiClient;
pub use config::{ConnectionProfile, InstanceKind};
pub use session::Session;
