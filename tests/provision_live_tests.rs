//! End-to-end checks against a real MySQL server. Ignored by default;
//! run with `cargo test -- --ignored` after exporting the full job
//! environment (MYSQL_HOST, MYSQL_ROOT_USER, MYSQL_ROOT_PASSWORD,
//! SCHEMA_NAME, DB_USER, K8S_NAMESPACE, SECRET_NAME).

use sqlx::mysql::MySqlConnectOptions;
use sqlx::{Connection, MySqlConnection, Row};
use tenantdb::Config;
use tenantdb::db::{SchemaProvisioner, password};

async fn root_connection(cfg: &Config) -> MySqlConnection {
    let opts = MySqlConnectOptions::new()
        .host(&cfg.mysql_host)
        .port(cfg.mysql_port)
        .username(&cfg.mysql_root_user)
        .password(&cfg.mysql_root_password);
    MySqlConnection::connect_with(&opts)
        .await
        .expect("root connection")
}

fn live_config() -> Config {
    Config::from_env().expect("live test environment must be fully configured")
}

#[tokio::test]
#[ignore = "requires a live MySQL server"]
async fn ensure_schema_is_idempotent() {
    let cfg = live_config();
    let mut provisioner = SchemaProvisioner::connect(&cfg).await.expect("connect");

    provisioner
        .ensure_schema(&cfg.schema_name)
        .await
        .expect("first ensure_schema");
    provisioner
        .ensure_schema(&cfg.schema_name)
        .await
        .expect("second ensure_schema must be a no-op");
    provisioner.close().await;

    let mut conn = root_connection(&cfg).await;
    let count: i64 = sqlx::query(
        "SELECT COUNT(*) AS n FROM information_schema.SCHEMATA WHERE SCHEMA_NAME = ?",
    )
    .bind(&cfg.schema_name)
    .fetch_one(&mut conn)
    .await
    .expect("schema count")
    .get("n");
    assert_eq!(count, 1, "schema must exist exactly once");
    conn.close().await.expect("close");
}

#[tokio::test]
#[ignore = "requires a live MySQL server"]
async fn ensure_user_recreates_and_scopes_grants() {
    let cfg = live_config();
    let mut provisioner = SchemaProvisioner::connect(&cfg).await.expect("connect");
    provisioner
        .ensure_schema(&cfg.schema_name)
        .await
        .expect("ensure_schema");

    // Two runs in a row: the second must replace the first cleanly.
    provisioner
        .ensure_user(&cfg.db_user, &password::generate(password::DEFAULT_LENGTH), &cfg.schema_name)
        .await
        .expect("first ensure_user");
    provisioner
        .ensure_user(&cfg.db_user, &password::generate(password::DEFAULT_LENGTH), &cfg.schema_name)
        .await
        .expect("second ensure_user");
    provisioner.close().await;

    let mut conn = root_connection(&cfg).await;
    let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM mysql.user WHERE User = ?")
        .bind(&cfg.db_user)
        .fetch_one(&mut conn)
        .await
        .expect("user count")
        .get("n");
    assert_eq!(count, 1, "exactly one user must exist after reruns");

    let grants = sqlx::query(&format!("SHOW GRANTS FOR '{}'@'%'", cfg.db_user))
        .fetch_all(&mut conn)
        .await
        .expect("show grants");
    let grant_lines: Vec<String> = grants
        .into_iter()
        .map(|row| row.get::<String, _>(0))
        .collect();
    assert!(
        grant_lines
            .iter()
            .any(|g| g.contains(&format!("`{}`.*", cfg.schema_name))),
        "user must hold privileges on the target schema: {grant_lines:?}"
    );
    assert!(
        !grant_lines.iter().any(|g| g.contains("ON *.*")
            && g.contains("ALL PRIVILEGES")),
        "user must not hold global privileges: {grant_lines:?}"
    );
    conn.close().await.expect("close");
}
