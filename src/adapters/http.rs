use crate::core::RankApi;
use crate::utils::error::{Result, ToolError};
use crate::utils::validation::{validate_non_empty_string, validate_url};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://apistore.aizhan.com";

/// Client for the aizhan `baidurank/siteinfos` endpoint.
#[derive(Debug, Clone)]
pub struct AizhanClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl AizhanClient {
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        validate_url("api.endpoint", endpoint)?;
        validate_non_empty_string("api.key", api_key)?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn site_info_url(&self) -> String {
        format!("{}/baidurank/siteinfos/{}", self.endpoint, self.api_key)
    }
}

#[async_trait]
impl RankApi for AizhanClient {
    async fn site_info(&self, domain: &str) -> Result<String> {
        // 不記錄完整 URL，避免 API key 出現在日誌
        tracing::debug!("GET {}/baidurank/siteinfos/*** domains={}", self.endpoint, domain);

        let response = self
            .client
            .get(self.site_info_url())
            .query(&[("domains", domain)])
            .send()
            .await?;

        tracing::debug!("API response status: {}", response.status());

        // 金鑰無效時重試沒有意義
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ToolError::ConfigError {
                message: format!("API key rejected by ranking service (HTTP {})", status.as_u16()),
            });
        }

        let body = response.error_for_status()?.text().await?;
        Ok(body)
    }
}
