pub mod speech;
pub mod translator;
pub mod vision;

use reqwest::Client;

use crate::error::ConfigError;

/// Shared HTTP client construction for the three remote services.
pub(crate) fn http_client() -> Result<Client, ConfigError> {
    let client = Client::builder()
        .user_agent(concat!("lingualens/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
