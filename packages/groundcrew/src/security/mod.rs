//! Credential handling.

mod credentials;

pub use credentials::{ProviderCredentials, SecretString};
