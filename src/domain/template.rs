use crate::utils::error::{EnrichError, Result};

pub const ENTITY_PLACEHOLDER: &str = "{entity}";

/// 查詢模板：將 entity 值代入 {entity} 佔位符
#[derive(Debug, Clone)]
pub struct QueryTemplate {
    raw: String,
}

impl QueryTemplate {
    /// 寬鬆建構：沒有佔位符的模板也接受，每個 entity 會產生相同查詢
    pub fn lenient(template: &str) -> Self {
        Self {
            raw: template.to_string(),
        }
    }

    /// 嚴格建構：缺少佔位符視為錯誤，僅在設定驗證時使用
    pub fn strict(template: &str) -> Result<Self> {
        if !template.contains(ENTITY_PLACEHOLDER) {
            return Err(EnrichError::TemplateError {
                message: format!(
                    "template does not contain the {} placeholder",
                    ENTITY_PLACEHOLDER
                ),
            });
        }
        Ok(Self::lenient(template))
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn has_placeholder(&self) -> bool {
        self.raw.contains(ENTITY_PLACEHOLDER)
    }

    /// 只代入第一個佔位符，entity 值原樣帶入，不做任何跳脫
    pub fn render(&self, entity: &str) -> String {
        self.raw.replacen(ENTITY_PLACEHOLDER, entity, 1)
    }
}
