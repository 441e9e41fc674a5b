pub mod config;
pub mod db;
pub mod error;
pub mod k8s;
pub mod provision;

pub use config::Config;
pub use error::ProvisionError;
