//! HTTP client for the remote recipe catalog.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{CategoriesEnvelope, CategoryEnvelope, RecipeEnvelope};
use super::{
    CatalogClient, CatalogDump, RemoteCategory, RemoteCategoryDetail, RemoteError, RemoteRecipe,
};
use crate::config::RemoteConfig;

/// Remote catalog client over HTTP.
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// Create a new client. The configured timeout bounds each request.
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Remote catalog GET {}", url);

        let response = self.client.get(&url).send().await.map_err(transport_error)?;

        let status = response.status();
        if status == 404 {
            return Err(RemoteError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await.map_err(transport_error)?;
        serde_json::from_str(&body)
            .map_err(|e| RemoteError::Parse(format!("Failed to parse {} response: {}", path, e)))
    }
}

fn transport_error(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Timeout
    } else {
        RemoteError::Http(e)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_categories(&self) -> Result<Vec<RemoteCategory>, RemoteError> {
        let envelope: CategoriesEnvelope = self.get_json("/categories").await?;
        Ok(envelope.categories)
    }

    async fn fetch_category_detail(
        &self,
        slug: &str,
    ) -> Result<RemoteCategoryDetail, RemoteError> {
        let path = format!("/categories/{}", urlencoding::encode(slug));
        let envelope: CategoryEnvelope = self.get_json(&path).await?;
        Ok(envelope.category)
    }

    async fn fetch_recipe(&self, slug: &str) -> Result<RemoteRecipe, RemoteError> {
        let path = format!("/recipes/{}", urlencoding::encode(slug));
        let envelope: RecipeEnvelope = self.get_json(&path).await?;
        Ok(envelope.recipe)
    }

    async fn fetch_catalog(&self) -> Result<CatalogDump, RemoteError> {
        self.get_json("/data").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = RemoteConfig {
            base_url: "https://ressipy.com/api/".to_string(),
            ..Default::default()
        };
        let client = HttpCatalogClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://ressipy.com/api");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_remote_error() {
        let config = RemoteConfig {
            // Port 9 (discard) on localhost is closed in test environments
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..Default::default()
        };
        let client = HttpCatalogClient::new(&config).unwrap();

        let result = client.fetch_categories().await;
        assert!(matches!(
            result,
            Err(RemoteError::Http(_)) | Err(RemoteError::Timeout)
        ));
    }
}
