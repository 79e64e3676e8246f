use crate::domain::model::SearchHit;
use crate::domain::ports::SearchProvider;
use crate::utils::error::{EnrichError, Result};
use async_trait::async_trait;
use serde::Deserialize;

const SERPAPI_URL: &str = "https://serpapi.com";

/// SerpApi 搜尋客戶端：每個查詢發出一次 GET，不重試
pub struct SerpApiClient {
    api_key: String,
    language: String,
    region: String,
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<SearchHit>,
    error: Option<String>,
}

impl SerpApiClient {
    pub fn new(api_key: &str, language: &str, region: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            language: language.to_string(),
            region: region.to_string(),
            client: reqwest::Client::new(),
            base_url: SERPAPI_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let url = format!("{}/search.json", self.base_url);

        tracing::debug!("🔎 Search request: {}", query);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("hl", &self.language),
                ("gl", &self.region),
                ("api_key", &self.api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // 原始回應僅供除錯
        tracing::debug!("Raw search response: {}", body);

        if !status.is_success() {
            return Err(EnrichError::SearchProviderError {
                message: format!("{}: {}", status, body),
            });
        }

        let parsed: SerpApiResponse =
            serde_json::from_str(&body).map_err(|e| EnrichError::SearchProviderError {
                message: format!("unexpected response payload: {}", e),
            })?;

        // SerpApi 會在 200 回應裡帶 error 欄位
        if let Some(message) = parsed.error {
            return Err(EnrichError::SearchProviderError { message });
        }

        Ok(parsed.organic_results)
    }
}
