use reqwest::Client;
use tracing::debug;

use crate::error::IngestError;

/// Fetches the body of a user-supplied link as source text.
#[derive(Debug, Clone, Default)]
pub struct LinkFetcher {
    client: Client,
}

impl LinkFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// GET `link` and return the response body as text. The content type is
    /// not checked.
    pub async fn fetch_text(&self, link: &str) -> Result<String, IngestError> {
        let link = link.trim();
        let url = reqwest::Url::parse(link).map_err(|e| IngestError::InvalidLink(format!("{}: {}", link, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(IngestError::InvalidLink(format!("unsupported scheme: {}", url.scheme())));
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        debug!("Fetched {} chars from {}", text.chars().count(), link);
        Ok(text)
    }
}
