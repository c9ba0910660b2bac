//! Token acquisition and caching.
//!
//! The [`Session`] owns both token caches exclusively and is injected into
//! the backend layer, so cache behavior is testable by substitution rather
//! than hidden in process-global state. Cached tokens carry no expiry;
//! they are dropped only by [`Session::clear`] or process exit.
//!
//! The call pattern is single-threaded, but the caches are mutex-guarded
//! so concurrent adaptation stays safe: a refresh race means a redundant
//! acquisition, last writer wins, and no correctness invariant depends on
//! exactly-once refresh.

use std::sync::{Mutex, MutexGuard, PoisonError};

use reqwest::Client;
use serde::Deserialize;

use crate::core::config::{ConnectionProfile, InstanceKind};
use crate::core::http::{self, AUTH_TIMEOUT};
use crate::error::{body_snippet, AggctlError, Result};

/// OIDC token endpoint path on container deployments.
const OIDC_TOKEN_PATH: &str = "/auth/realms/atscale/protocol/openid-connect/token";

#[derive(Debug, Deserialize)]
struct OidcTokenResponse {
    access_token: String,
}

/// Authenticated session against one BI server.
///
/// Produces bearer credentials for the public surface (always available)
/// and the private surface (container only, capability-gated).
pub struct Session {
    profile: ConnectionProfile,
    client: Client,
    public: Mutex<Option<String>>,
    private: Mutex<Option<String>>,
}

impl Session {
    /// Create a session for the given profile.
    ///
    /// # Errors
    ///
    /// Returns error if the auth HTTP client cannot be constructed.
    pub fn new(profile: ConnectionProfile) -> Result<Self> {
        let client = http::build_client(AUTH_TIMEOUT, profile.verify_tls)?;
        Ok(Self {
            profile,
            client,
            public: Mutex::new(None),
            private: Mutex::new(None),
        })
    }

    /// The connection profile this session authenticates.
    #[must_use]
    pub const fn profile(&self) -> &ConnectionProfile {
        &self.profile
    }

    /// Sole access path to a token cache. A poisoned lock holds at worst
    /// a stale token, so the guard is recovered rather than panicking.
    fn cache(cell: &Mutex<Option<String>>) -> MutexGuard<'_, Option<String>> {
        cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bearer credential for the public API surface.
    ///
    /// Installer: returns the cached token unless `force_refresh`, else
    /// performs HTTP Basic auth against the org-scoped auth endpoint and
    /// caches the raw response body. Container: returns the static token
    /// from the profile without any network call.
    ///
    /// # Errors
    ///
    /// `AuthRejected`/`AuthTransport` when the installer auth endpoint
    /// fails (cache left unchanged); `Config` when a container profile
    /// has no static token.
    pub async fn public_token(&self, force_refresh: bool) -> Result<String> {
        match self.profile.instance {
            InstanceKind::Container => self.profile.token.clone().ok_or_else(|| {
                AggctlError::Config(
                    "container profile requires 'token' for public API access".to_string(),
                )
            }),
            InstanceKind::Installer => {
                if !force_refresh {
                    if let Some(cached) = Self::cache(&self.public).clone() {
                        return Ok(cached);
                    }
                }

                let token = self.acquire_installer_token().await?;
                *Self::cache(&self.public) = Some(token.clone());
                Ok(token)
            }
        }
    }

    /// Bearer credential for the private API surface, when available.
    ///
    /// Container only. Requires client id, client secret, username, and
    /// password; if any is missing, returns `None` so callers can degrade
    /// gracefully. A transport or non-2xx failure on the OIDC exchange is
    /// a deliberate soft-fail: it logs one warning and returns `None`,
    /// because private-API access is optional functionality.
    ///
    /// # Errors
    ///
    /// `Unsupported` for installer instances, where callers must use the
    /// public token instead.
    pub async fn private_token(&self, force_refresh: bool) -> Result<Option<String>> {
        if self.profile.instance == InstanceKind::Installer {
            return Err(AggctlError::Unsupported {
                operation: "private token acquisition",
                kind: InstanceKind::Installer.as_str(),
            });
        }

        if !self.profile.has_oidc_credentials() {
            return Ok(None);
        }

        if !force_refresh {
            if let Some(cached) = Self::cache(&self.private).clone() {
                return Ok(Some(cached));
            }
        }

        match self.acquire_oidc_token().await {
            Ok(token) => {
                *Self::cache(&self.private) = Some(token.clone());
                Ok(Some(token))
            }
            Err(e) => {
                tracing::warn!(error = %e, "OIDC token exchange failed; private API unavailable");
                Ok(None)
            }
        }
    }

    /// Drop both cached tokens. Process-wide, immediate, no network effect.
    pub fn clear(&self) {
        *Self::cache(&self.public) = None;
        *Self::cache(&self.private) = None;
    }

    /// URL of the installer auth endpoint: host rewritten to the auth
    /// port, scoped to the organization path.
    ///
    /// # Errors
    ///
    /// `Config` when the profile host does not parse as a URL.
    pub fn installer_auth_url(&self) -> Result<String> {
        let org = self.profile.organization.as_deref().unwrap_or_default();
        let mut url = url::Url::parse(&self.profile.base_url())
            .map_err(|e| AggctlError::Config(format!("invalid host: {e}")))?;
        url.set_port(Some(self.profile.auth_port))
            .map_err(|()| AggctlError::Config("host does not accept a port".to_string()))?;
        url.set_path(&format!("{org}/auth"));
        Ok(url.to_string())
    }

    async fn acquire_installer_token(&self) -> Result<String> {
        let url = self.installer_auth_url()?;
        let username = self.profile.username.as_deref().unwrap_or_default();
        let password = self.profile.password.as_deref().unwrap_or_default();

        tracing::debug!(%url, "acquiring installer token");
        let response = self
            .client
            .get(&url)
            .basic_auth(username, Some(password))
            .send()
            .await
            .map_err(|e| AggctlError::AuthTransport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(AggctlError::AuthRejected {
                url,
                status: status.as_u16(),
                body: body_snippet(&body),
            });
        }

        Ok(body.trim().to_string())
    }

    async fn acquire_oidc_token(&self) -> Result<String> {
        let url = format!("{}{OIDC_TOKEN_PATH}", self.profile.base_url());
        let form = [
            ("client_id", self.profile.client_id.as_deref().unwrap_or_default()),
            (
                "client_secret",
                self.profile.client_secret.as_deref().unwrap_or_default(),
            ),
            ("username", self.profile.username.as_deref().unwrap_or_default()),
            ("password", self.profile.password.as_deref().unwrap_or_default()),
            ("grant_type", "password"),
        ];

        tracing::debug!(%url, "acquiring OIDC token");
        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AggctlError::AuthTransport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AggctlError::AuthRejected {
                url,
                status: status.as_u16(),
                body: body_snippet(&body),
            });
        }

        let token: OidcTokenResponse =
            response
                .json()
                .await
                .map_err(|e| AggctlError::AuthTransport {
                    url,
                    message: format!("malformed token response: {e}"),
                })?;
        Ok(token.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{DEFAULT_AUTH_PORT, DEFAULT_ENGINE_PORT};

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
            host: "bi.example.com".to_string(),
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
    fn installer_auth_url_rewrites_port_and_scopes_org() {
        let session = Session::new(installer_profile()).unwrap();
        assert_eq!(
            session.installer_auth_url().unwrap(),
            "https://bi.example.com:10500/acme/auth"
        );
    }

    #[tokio::test]
    async fn container_public_token_is_the_static_token() {
        let session = Session::new(container_profile()).unwrap();
        let token = session.public_token(false).await.unwrap();
        assert_eq!(token, "static-token");
    }

    #[tokio::test]
    async fn container_without_static_token_is_a_config_error() {
        let mut profile = container_profile();
        profile.token = None;
        let session = Session::new(profile).unwrap();
        let err = session.public_token(false).await.unwrap_err();
        assert!(matches!(err, AggctlError::Config(_)));
    }

    #[tokio::test]
    async fn installer_private_token_is_unsupported() {
        let session = Session::new(installer_profile()).unwrap();
        let err = session.private_token(false).await.unwrap_err();
        assert!(matches!(err, AggctlError::Unsupported { .. }));
    }

    #[tokio::test]
    async fn container_private_token_without_oidc_credentials_is_none() {
        // Each missing credential independently gates the private surface.
        let complete = |p: &mut ConnectionProfile| {
            p.client_id = Some("cli".to_string());
            p.client_secret = Some("secret".to_string());
            p.username = Some("admin".to_string());
            p.password = Some("hunter2".to_string());
        };

        for wipe in [
            (|p: &mut ConnectionProfile| p.client_id = None) as fn(&mut ConnectionProfile),
            |p| p.client_secret = None,
            |p| p.username = None,
            |p| p.password = None,
        ] {
            let mut profile = container_profile();
            complete(&mut profile);
            wipe(&mut profile);

            let session = Session::new(profile).unwrap();
            let token = session.private_token(false).await.unwrap();
            assert!(token.is_none());
        }
    }
}
