use reqwest::StatusCode;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ProvisionError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to connect to MySQL at {host}:{port}: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: SqlxError,
    },

    #[error("schema operation failed for `{schema}`: {source}")]
    Schema {
        schema: String,
        #[source]
        source: SqlxError,
    },

    #[error("user or grant operation failed for '{user}': {source}")]
    Grant {
        user: String,
        #[source]
        source: SqlxError,
    },

    #[error(
        "secret '{name}' already exists in namespace '{namespace}'; refusing to overwrite \
         existing credentials. Remove the existing Secret if safe to do so, or use a \
         different Secret name"
    )]
    Conflict { namespace: String, name: String },

    #[error("secret store request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("secret store rejected the request with status {status}: {body}")]
    Publish { status: StatusCode, body: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
