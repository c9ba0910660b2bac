//! Connection profile loading and validation.
//!
//! Loads the connection profile from:
//! - Linux/macOS: `~/.config/aggctl/config.toml`
//! - Windows: `%APPDATA%/aggctl/config.toml`
//!
//! The path can be overridden with the `--config` flag or the
//! `AGGCTL_CONFIG` environment variable (flag wins). The profile is read
//! once at startup and is immutable for the rest of the process run.
//!
//! Required fields depend on the instance kind:
//! - `installer`: host, username, password, organization
//! - `container`: host, token (OIDC fields only for private-API access)
//!
//! A missing, malformed, or invalid profile is always a fatal, user-visible
//! error; there are no retries and no defaults for required fields.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{AggctlError, Result};

/// Environment variable to override the config file path.
pub const ENV_CONFIG: &str = "AGGCTL_CONFIG";

/// Default auth port for installer deployments.
pub const DEFAULT_AUTH_PORT: u16 = 10500;

/// Default engine (data) port for installer deployments.
pub const DEFAULT_ENGINE_PORT: u16 = 10502;

const fn default_auth_port() -> u16 {
    DEFAULT_AUTH_PORT
}

const fn default_engine_port() -> u16 {
    DEFAULT_ENGINE_PORT
}

// =============================================================================
// Instance Kind
// =============================================================================

/// The two supported deployment flavors of the target BI server.
///
/// Each exposes a structurally different REST API; every URL, header, and
/// payload decision downstream branches on this value exactly once, at
/// backend selection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceKind {
    Installer,
    Container,
}

impl InstanceKind {
    /// Name as it appears in the config file and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Installer => "installer",
            Self::Container => "container",
        }
    }
}

impl std::fmt::Display for InstanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Connection Profile
// =============================================================================

/// Persisted connection profile for one BI server.
///
/// Loaded once per process run; immutable thereafter.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionProfile {
    /// Deployment flavor of the target server.
    pub instance: InstanceKind,

    /// Server host, with or without a scheme (defaults to https).
    pub host: String,

    /// Organization slug (installer only).
    pub organization: Option<String>,

    /// Username for Basic auth (installer) or the OIDC password grant
    /// (container private API).
    pub username: Option<String>,

    /// Password paired with `username`.
    pub password: Option<String>,

    /// Static bearer token for the container public API.
    pub token: Option<String>,

    /// OIDC client id for container private-API access.
    pub client_id: Option<String>,

    /// OIDC client secret for container private-API access.
    pub client_secret: Option<String>,

    /// Verify TLS certificates. Off by default: the target deployments run
    /// with self-signed certificates, so verification is an explicit opt-in
    /// rather than a silent default.
    #[serde(default)]
    pub verify_tls: bool,

    /// Installer auth port. Overridable for deployments behind
    /// port-mapping proxies (and for tests against a mock server).
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,

    /// Installer engine (data) port.
    #[serde(default = "default_engine_port")]
    pub engine_port: u16,
}

impl ConnectionProfile {
    /// Load and validate the profile from `path` if given, else from
    /// `AGGCTL_CONFIG`, else from the default location.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file is missing, malformed
    /// TOML, or fails required-field validation for its instance kind.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => std::env::var(ENV_CONFIG)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map_or_else(default_config_path, PathBuf::from),
        };
        Self::load_from(&path)
    }

    /// Load and validate the profile from an explicit path.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ConnectionProfile::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AggctlError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = fs::read_to_string(path)?;
        let profile: Self =
            toml::from_str(&contents).map_err(|e| AggctlError::ConfigParse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        profile.validate()?;
        Ok(profile)
    }

    /// Pure required-field check for the declared instance kind.
    ///
    /// Callable independently of `load` for fail-fast tooling that wants
    /// validation without network calls.
    ///
    /// # Errors
    ///
    /// Returns `Config` naming the missing fields and the instance kind.
    pub fn validate(&self) -> Result<()> {
        let mut missing: Vec<&str> = Vec::new();

        if self.host.trim().is_empty() {
            missing.push("host");
        }

        match self.instance {
            InstanceKind::Installer => {
                if blank(&self.username) {
                    missing.push("username");
                }
                if blank(&self.password) {
                    missing.push("password");
                }
                if blank(&self.organization) {
                    missing.push("organization");
                }
            }
            InstanceKind::Container => {
                if blank(&self.token) {
                    missing.push("token");
                }
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AggctlError::Config(format!(
                "{} profile is missing required fields: {}",
                self.instance,
                missing.join(", ")
            )))
        }
    }

    /// Host normalized to carry a scheme (https when none given).
    #[must_use]
    pub fn base_url(&self) -> String {
        normalize_host(&self.host)
    }

    /// Whether the profile carries everything the OIDC password grant
    /// needs. Only meaningful for container instances.
    #[must_use]
    pub fn has_oidc_credentials(&self) -> bool {
        !blank(&self.client_id)
            && !blank(&self.client_secret)
            && !blank(&self.username)
            && !blank(&self.password)
    }
}

fn blank(field: &Option<String>) -> bool {
    field.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// Normalize a host string to include a protocol, defaulting to https.
#[must_use]
pub fn normalize_host(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", host.trim_end_matches('/'))
    }
}

/// Default config file path (`~/.config/aggctl/config.toml` or platform
/// equivalent).
#[must_use]
pub fn default_config_path() -> PathBuf {
    ProjectDirs::from("com", "aggctl", "aggctl").map_or_else(
        || PathBuf::from(".config/aggctl/config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installer_profile() -> ConnectionProfile {
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

    fn container_profile() -> ConnectionProfile {
        ConnectionProfile {
            instance: InstanceKind::Container,
            host: "https://bi.example.com".to_string(),
            organization: None,
            username: None,
            password: None,
            token: Some("static-token".to_string()),
            client_id: None,
            client_secret: None,
            verify_tls: false,
            auth_port: DEFAULT_AUTH_PORT,
            engine_port: DEFAULT_ENGINE_PORT,
        }
    }

    #[test]
    fn installer_profile_validates() {
        assert!(installer_profile().validate().is_ok());
    }

    #[test]
    fn installer_missing_fields_are_named() {
        let mut profile = installer_profile();
        profile.organization = None;
        profile.password = Some(String::new());

        let err = profile.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("installer"));
        assert!(message.contains("organization"));
        assert!(message.contains("password"));
        assert!(!message.contains("username"));
    }

    #[test]
    fn container_needs_only_host_and_token() {
        assert!(container_profile().validate().is_ok());
    }

    #[test]
    fn container_without_token_fails() {
        let mut profile = container_profile();
        profile.token = None;
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn oidc_credentials_require_all_four_fields() {
        let mut profile = container_profile();
        assert!(!profile.has_oidc_credentials());

        profile.client_id = Some("cli".to_string());
        profile.client_secret = Some("secret".to_string());
        profile.username = Some("admin".to_string());
        assert!(!profile.has_oidc_credentials());

        profile.password = Some("hunter2".to_string());
        assert!(profile.has_oidc_credentials());
    }

    #[test]
    fn normalize_host_adds_https() {
        assert_eq!(normalize_host("bi.example.com"), "https://bi.example.com");
        assert_eq!(
            normalize_host("http://bi.example.com/"),
            "http://bi.example.com"
        );
        assert_eq!(
            normalize_host("https://bi.example.com"),
            "https://bi.example.com"
        );
    }

    #[test]
    fn toml_defaults_apply() {
        let profile: ConnectionProfile = toml::from_str(
            r#"
            instance = "container"
            host = "bi.example.com"
            token = "static-token"
            "#,
        )
        .unwrap();

        assert_eq!(profile.instance, InstanceKind::Container);
        assert!(!profile.verify_tls);
        assert_eq!(profile.auth_port, DEFAULT_AUTH_PORT);
        assert_eq!(profile.engine_port, DEFAULT_ENGINE_PORT);
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: std::result::Result<ConnectionProfile, _> = toml::from_str(
            r#"
            instance = "container"
            host = "bi.example.com"
            token = "static-token"
            statics_token = "typo"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn load_missing_file_is_config_not_found() {
        let err = ConnectionProfile::load_from(Path::new("/nonexistent/config.toml"))
            .unwrap_err();
        assert!(matches!(err, AggctlError::ConfigNotFound { .. }));
    }
}
