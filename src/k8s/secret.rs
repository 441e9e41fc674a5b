use crate::db::GeneratedCredential;
use crate::error::ProvisionError;
use crate::k8s::identity::AmbientIdentity;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::info;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Kubernetes Secret manifest, serialized as the API server expects it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretManifest {
    api_version: &'static str,
    kind: &'static str,
    metadata: SecretMetadata,
    #[serde(rename = "type")]
    secret_type: &'static str,
    data: BTreeMap<&'static str, String>,
}

#[derive(Debug, Serialize)]
struct SecretMetadata {
    name: String,
    namespace: String,
    labels: SecretLabels,
}

#[derive(Debug, Serialize)]
struct SecretLabels {
    app: &'static str,
    database: String,
}

impl SecretManifest {
    pub fn new(namespace: &str, name: &str, credential: &GeneratedCredential) -> Self {
        Self {
            api_version: "v1",
            kind: "Secret",
            metadata: SecretMetadata {
                name: name.to_string(),
                namespace: namespace.to_string(),
                labels: SecretLabels {
                    app: "tenantdb",
                    database: credential.schema.clone(),
                },
            },
            secret_type: "Opaque",
            data: build_secret_payload(credential),
        }
    }
}

/// Base64-encode every credential field for the Secret `data` block. The
/// connection string is the only field that embeds the password.
pub fn build_secret_payload(credential: &GeneratedCredential) -> BTreeMap<&'static str, String> {
    let encode = |value: &str| STANDARD.encode(value.as_bytes());
    BTreeMap::from([
        ("username", encode(&credential.username)),
        ("password", encode(&credential.password)),
        ("database", encode(&credential.schema)),
        ("host", encode(&credential.host)),
        ("port", encode(&credential.port.to_string())),
        ("connection-string", encode(&credential.connection_string())),
    ])
}

/// Publishes exactly one Secret per run against the in-cluster API,
/// refusing to clobber an existing one.
pub struct SecretPublisher {
    client: reqwest::Client,
    identity: AmbientIdentity,
}

impl SecretPublisher {
    pub fn new(identity: AmbientIdentity) -> Result<Self, ProvisionError> {
        let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);
        if let Some(pem) = identity.ca_cert_pem.as_deref() {
            let cert = reqwest::Certificate::from_pem(pem)
                .map_err(ProvisionError::Transport)?;
            builder = builder.add_root_certificate(cert);
        }
        let client = builder.build().map_err(ProvisionError::Transport)?;
        Ok(Self { client, identity })
    }

    /// Create the Secret in the namespaced collection. A 409 means a
    /// Secret of this name already exists; that demands human review, so
    /// it surfaces as a distinct `Conflict` error rather than a generic
    /// publish failure. No retry on any outcome.
    pub async fn create_secret(
        &self,
        namespace: &str,
        name: &str,
        credential: &GeneratedCredential,
    ) -> Result<(), ProvisionError> {
        let manifest = SecretManifest::new(namespace, name, credential);
        let url = self
            .identity
            .api_server
            .join(&format!("api/v1/namespaces/{namespace}/secrets"))?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.identity.token)
            .json(&manifest)
            .send()
            .await
            .map_err(ProvisionError::Transport)?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                info!(secret = name, namespace, "created Secret");
                Ok(())
            }
            StatusCode::CONFLICT => Err(ProvisionError::Conflict {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ProvisionError::Publish { status, body })
            }
        }
    }
}
