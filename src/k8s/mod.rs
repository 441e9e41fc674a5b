pub mod identity;
pub mod secret;

pub use identity::AmbientIdentity;
pub use secret::SecretPublisher;
