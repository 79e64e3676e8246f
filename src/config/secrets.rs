use crate::utils::error::{EnrichError, Result};

pub const SERPAPI_KEY_VAR: &str = "SERPAPI_API_KEY";
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// 兩個供應商密鑰在行程啟動時讀入，之後以參考傳給各客戶端，不放全域狀態
#[derive(Debug, Clone)]
pub struct Secrets {
    pub serpapi_api_key: String,
    pub openai_api_key: Option<String>,
}

impl Secrets {
    /// 缺少搜尋密鑰時整個執行在開始前中止；擷取密鑰只有選用 llm 模式才需要
    pub fn from_env() -> Result<Self> {
        let serpapi_api_key = std::env::var(SERPAPI_KEY_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| EnrichError::MissingConfigError {
                field: SERPAPI_KEY_VAR.to_string(),
            })?;

        let openai_api_key = std::env::var(OPENAI_KEY_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty());

        Ok(Self {
            serpapi_api_key,
            openai_api_key,
        })
    }

    pub fn require_openai_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| EnrichError::MissingConfigError {
                field: OPENAI_KEY_VAR.to_string(),
            })
    }
}
