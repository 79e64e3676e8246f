use crate::domain::model::{ExtractorMode, OUTPUT_FILENAME};
use crate::domain::ports::ConfigProvider;
use crate::domain::template::QueryTemplate;
use crate::utils::error::{EnrichError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 100;

/// TOML 任務檔：可重複執行的 enrichment 設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub job: JobMeta,
    pub source: SourceConfig,
    pub search: SearchConfig,
    pub extraction: Option<ExtractionConfig>,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMeta {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: String,
    pub path: Option<String>,
    pub sheet_url: Option<String>,
    pub credentials: Option<String>,
    pub entity_column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub template: String,
    pub language: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub mode: Option<String>,
    pub model: Option<String>,
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub filename: Option<String>,
}

impl JobConfig {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EnrichError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EnrichError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SERPAPI_API_KEY})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").expect("env pattern compiles");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn uses_sheets_source(&self) -> bool {
        self.source.r#type == "sheets"
    }

    pub fn csv_path(&self) -> Option<&str> {
        self.source.path.as_deref()
    }

    pub fn sheet_url(&self) -> Option<&str> {
        self.source.sheet_url.as_deref()
    }

    pub fn credentials_path(&self) -> &str {
        self.source
            .credentials
            .as_deref()
            .unwrap_or(DEFAULT_CREDENTIALS_PATH)
    }

    pub fn model(&self) -> &str {
        self.extraction
            .as_ref()
            .and_then(|e| e.model.as_deref())
            .unwrap_or(DEFAULT_MODEL)
    }

    pub fn max_output_tokens(&self) -> u32 {
        self.extraction
            .as_ref()
            .and_then(|e| e.max_output_tokens)
            .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS)
    }

    fn extraction_mode_str(&self) -> &str {
        self.extraction
            .as_ref()
            .and_then(|e| e.mode.as_deref())
            .unwrap_or("llm")
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_one_of("source.type", &self.source.r#type, &["csv", "sheets"])?;

        match self.source.r#type.as_str() {
            "csv" => {
                let path =
                    self.csv_path()
                        .ok_or_else(|| EnrichError::MissingConfigError {
                            field: "source.path".to_string(),
                        })?;
                validate_path("source.path", path)?;
            }
            _ => {
                let sheet_url =
                    self.sheet_url()
                        .ok_or_else(|| EnrichError::MissingConfigError {
                            field: "source.sheet_url".to_string(),
                        })?;
                validate_url("source.sheet_url", sheet_url)?;
            }
        }

        validate_non_empty_string("source.entity_column", &self.source.entity_column)?;
        validate_one_of(
            "extraction.mode",
            self.extraction_mode_str(),
            ExtractorMode::ALLOWED,
        )?;
        validate_path("output.path", &self.output.path)?;

        if let Err(e) = QueryTemplate::strict(&self.search.template) {
            tracing::warn!("⚠️ {}; every entity will produce the same query", e);
        }

        Ok(())
    }
}

impl ConfigProvider for JobConfig {
    fn entity_column(&self) -> &str {
        &self.source.entity_column
    }

    fn query_template(&self) -> &str {
        &self.search.template
    }

    fn extractor_mode(&self) -> ExtractorMode {
        self.extraction_mode_str().parse().unwrap_or(ExtractorMode::Llm)
    }

    fn search_language(&self) -> &str {
        self.search.language.as_deref().unwrap_or("en")
    }

    fn search_region(&self) -> &str {
        self.search.region.as_deref().unwrap_or("us")
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_filename(&self) -> String {
        self.output
            .filename
            .as_deref()
            .unwrap_or(OUTPUT_FILENAME)
            .replace(
                "{timestamp}",
                &chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string(),
            )
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
