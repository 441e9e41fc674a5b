use mimalloc::MiMalloc;
use tenantdb::ProvisionError;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!("starting tenant database provisioner");

    let cfg = match tenantdb::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    info!(
        host = %cfg.mysql_host,
        port = cfg.mysql_port,
        schema = %cfg.schema_name,
        user = %cfg.db_user,
        namespace = %cfg.k8s_namespace,
        secret = %cfg.secret_name,
        "loaded configuration"
    );

    if let Err(e) = tenantdb::provision::run(&cfg).await {
        match &e {
            ProvisionError::Conflict { .. } => {
                error!(error = %e, "secret conflict requires manual remediation");
            }
            _ => error!(error = %e, "provisioning failed"),
        }
        std::process::exit(1);
    }

    info!("schema, user, and Secret provisioned successfully");
}
