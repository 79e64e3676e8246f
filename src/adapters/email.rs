use crate::domain::model::NO_EMAIL_FOUND;
use crate::domain::ports::Extractor;
use crate::utils::error::Result;
use async_trait::async_trait;
use regex::Regex;

const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

/// 本地 email 擷取器：對 snippet 做正規表達式比對，不需要外部服務
pub struct EmailExtractor {
    pattern: Regex,
}

impl EmailExtractor {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(EMAIL_PATTERN).expect("email pattern compiles"),
        }
    }
}

impl Default for EmailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for EmailExtractor {
    async fn extract(&self, snippet: &str, _template: &str) -> Result<String> {
        // 取第一個符合的位址，找不到時回傳固定文字
        let result = self
            .pattern
            .find(snippet)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| NO_EMAIL_FOUND.to_string());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_single_email_is_returned() {
        let extractor = EmailExtractor::new();
        let result = extractor
            .extract("Reach us at sales@acme.example for a quote", "")
            .await
            .unwrap();
        assert_eq!(result, "sales@acme.example");
    }

    #[tokio::test]
    async fn test_no_email_returns_sentinel() {
        let extractor = EmailExtractor::new();
        let result = extractor
            .extract("Acme Corp makes everything", "")
            .await
            .unwrap();
        assert_eq!(result, NO_EMAIL_FOUND);
    }

    #[tokio::test]
    async fn test_first_of_multiple_emails_wins() {
        let extractor = EmailExtractor::new();
        let result = extractor
            .extract("Try sales@acme.example or support@acme.example", "")
            .await
            .unwrap();
        assert_eq!(result, "sales@acme.example");
    }

    #[tokio::test]
    async fn test_plus_and_dot_addresses_match() {
        let extractor = EmailExtractor::new();
        let result = extractor
            .extract("Contact jane.doe+leads@mail.acme.example today", "")
            .await
            .unwrap();
        assert_eq!(result, "jane.doe+leads@mail.acme.example");
    }
}
