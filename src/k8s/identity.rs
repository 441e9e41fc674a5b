use crate::error::ProvisionError;
use std::path::Path;
use tracing::info;
use url::Url;

/// Well-known mount points for in-cluster service account material.
pub const TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";
pub const CA_CERT_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";

/// Authentication material provided by the execution environment rather
/// than by explicit configuration: the in-cluster API endpoint, the
/// mounted service account token, and (when present) the cluster CA.
#[derive(Debug, Clone)]
pub struct AmbientIdentity {
    pub api_server: Url,
    pub token: String,
    pub ca_cert_pem: Option<Vec<u8>>,
}

impl AmbientIdentity {
    /// Load identity from the standard in-cluster locations.
    pub fn load() -> Result<Self, ProvisionError> {
        Self::load_from(Path::new(TOKEN_PATH), Path::new(CA_CERT_PATH))
    }

    /// Load identity with explicit mount paths. The API endpoint always
    /// comes from `KUBERNETES_SERVICE_HOST` / `KUBERNETES_SERVICE_PORT`.
    pub fn load_from(token_path: &Path, ca_cert_path: &Path) -> Result<Self, ProvisionError> {
        let host = std::env::var("KUBERNETES_SERVICE_HOST").map_err(|_| {
            ProvisionError::Config(
                "KUBERNETES_SERVICE_HOST environment variable not found".to_string(),
            )
        })?;
        let port =
            std::env::var("KUBERNETES_SERVICE_PORT").unwrap_or_else(|_| "443".to_string());
        let api_server = Url::parse(&format!("https://{host}:{port}"))?;

        if !token_path.exists() {
            return Err(ProvisionError::Config(format!(
                "service account token not found at {}",
                token_path.display()
            )));
        }
        let token = std::fs::read_to_string(token_path)?.trim().to_string();
        if token.is_empty() {
            return Err(ProvisionError::Config(format!(
                "service account token at {} is empty",
                token_path.display()
            )));
        }

        // Missing CA is tolerated; the HTTP client falls back to the
        // default trust roots.
        let ca_cert_pem = if ca_cert_path.exists() {
            Some(std::fs::read(ca_cert_path)?)
        } else {
            None
        };

        info!(
            api_server = %api_server,
            custom_ca = ca_cert_pem.is_some(),
            "loaded in-cluster identity"
        );
        Ok(Self {
            api_server,
            token,
            ca_cert_pem,
        })
    }
}
