use crate::domain::ports::Extractor;
use crate::utils::error::{EnrichError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

const SYSTEM_PROMPT: &str = "You are an intelligent assistant for parsing information.";

/// OpenAI chat-completions 擷取器，輸出長度由 max_tokens 限制
pub struct OpenAiExtractor {
    api_key: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiExtractor {
    pub fn new(api_key: &str, model: &str, max_tokens: u32) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
            client: reqwest::Client::new(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    fn build_prompt(snippet: &str, template: &str) -> String {
        format!(
            "Use the following template to process the text:\n\n{}\n\nText:\n{}\n\nExtracted Information:",
            template, snippet
        )
    }
}

#[async_trait]
impl Extractor for OpenAiExtractor {
    async fn extract(&self, snippet: &str, template: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Self::build_prompt(snippet, template),
                },
            ],
            max_tokens: self.max_tokens,
        };

        tracing::debug!("🤖 Extraction request (model: {})", self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(EnrichError::ExtractionAuthError);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichError::ExtractionProviderError {
                message: format!("{}: {}", status, body),
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| EnrichError::ExtractionProviderError {
                    message: format!("unexpected response payload: {}", e),
                })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| EnrichError::ExtractionProviderError {
                message: "no completion in response".to_string(),
            })
    }
}
