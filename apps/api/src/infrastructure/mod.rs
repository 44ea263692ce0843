// Infrastructure layer module
// Contains database adapters and external service integrations
// Follows Hexagonal Architecture

pub mod atlas;
pub mod email;
pub mod llm;
pub mod repositories;

use std::time::Duration;

/// Upper bound for any single call to an outside API
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client shared by the outbound adapters
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()
}
