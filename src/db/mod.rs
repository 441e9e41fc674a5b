pub mod password;
pub mod provisioner;

pub use provisioner::{GeneratedCredential, SchemaProvisioner};
