use crate::error::ProvisionError;
use figment::Figment;
use figment::providers::Env;
use serde::Deserialize;

fn default_mysql_port() -> u16 {
    3306
}

/// Provisioning request, sourced entirely from the environment.
///
/// Immutable once constructed; every external call receives the values it
/// needs from here rather than reading the environment itself.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mysql_host: String,
    #[serde(default = "default_mysql_port")]
    pub mysql_port: u16,
    pub mysql_root_user: String,
    pub mysql_root_password: String,
    pub schema_name: String,
    pub db_user: String,
    pub k8s_namespace: String,
    pub secret_name: String,
}

impl Config {
    /// Extract and validate the configuration from process environment
    /// variables (MYSQL_HOST, MYSQL_PORT, MYSQL_ROOT_USER,
    /// MYSQL_ROOT_PASSWORD, SCHEMA_NAME, DB_USER, K8S_NAMESPACE,
    /// SECRET_NAME). Fails before any external call is made.
    pub fn from_env() -> Result<Self, ProvisionError> {
        let cfg: Config = Figment::new()
            .merge(Env::raw())
            .extract()
            .map_err(|e| ProvisionError::Config(format!("missing or invalid environment: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ProvisionError> {
        let required = [
            ("MYSQL_HOST", &self.mysql_host),
            ("MYSQL_ROOT_USER", &self.mysql_root_user),
            ("MYSQL_ROOT_PASSWORD", &self.mysql_root_password),
            ("SCHEMA_NAME", &self.schema_name),
            ("DB_USER", &self.db_user),
            ("K8S_NAMESPACE", &self.k8s_namespace),
            ("SECRET_NAME", &self.secret_name),
        ];
        for (var, value) in required {
            if value.is_empty() {
                return Err(ProvisionError::Config(format!("{var} must not be empty")));
            }
        }
        if self.mysql_port == 0 {
            return Err(ProvisionError::Config(
                "MYSQL_PORT must be a positive integer".to_string(),
            ));
        }
        validate_identifier("SCHEMA_NAME", &self.schema_name)?;
        validate_identifier("DB_USER", &self.db_user)?;
        Ok(())
    }
}

/// Schema and user names end up inside quoted SQL identifiers, where they
/// cannot be bound as statement parameters, so the accepted alphabet is
/// restricted up front.
fn validate_identifier(var: &str, value: &str) -> Result<(), ProvisionError> {
    let ok = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(ProvisionError::Config(format!(
            "{var} may only contain ASCII letters, digits, '_' and '-' (got '{value}')"
        )))
    }
}
