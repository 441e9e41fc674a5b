use crate::config::Config;
use crate::db::{GeneratedCredential, SchemaProvisioner, password};
use crate::error::ProvisionError;
use crate::k8s::{AmbientIdentity, SecretPublisher};
use tracing::info;

/// Run the full provisioning pipeline: schema, user, Secret.
///
/// The database connection is released on every exit path; the pipeline
/// result is captured first so a close failure cannot mask it.
pub async fn run(cfg: &Config) -> Result<(), ProvisionError> {
    let mut provisioner = SchemaProvisioner::connect(cfg).await?;
    let outcome = pipeline(&mut provisioner, cfg).await;
    provisioner.close().await;
    outcome
}

async fn pipeline(
    provisioner: &mut SchemaProvisioner,
    cfg: &Config,
) -> Result<(), ProvisionError> {
    provisioner.ensure_schema(&cfg.schema_name).await?;

    let generated = password::generate(password::DEFAULT_LENGTH);
    info!(user = %cfg.db_user, "generated password for database user");

    // The schema exists at this point; grants target it directly.
    provisioner
        .ensure_user(&cfg.db_user, &generated, &cfg.schema_name)
        .await?;

    let credential = GeneratedCredential {
        username: cfg.db_user.clone(),
        password: generated,
        schema: cfg.schema_name.clone(),
        host: cfg.mysql_host.clone(),
        port: cfg.mysql_port,
    };

    let identity = AmbientIdentity::load()?;
    let publisher = SecretPublisher::new(identity)?;
    publisher
        .create_secret(&cfg.k8s_namespace, &cfg.secret_name, &credential)
        .await?;
    Ok(())
}
