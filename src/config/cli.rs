use crate::domain::model::{ExtractorMode, OUTPUT_FILENAME};
use crate::domain::ports::ConfigProvider;
use crate::domain::template::QueryTemplate;
use crate::utils::error::{EnrichError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_one_of, validate_path,
    validate_positive_number, validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "entity-enrich")]
#[command(about = "Search-and-extract enrichment for tabular entity data")]
pub struct CliConfig {
    /// CSV input file (mutually exclusive with --sheet-url)
    #[arg(long)]
    pub input: Option<String>,

    /// Google Sheets URL (mutually exclusive with --input)
    #[arg(long)]
    pub sheet_url: Option<String>,

    /// Service-account key file for the sheets source
    #[arg(long, default_value = "credentials.json")]
    pub credentials: String,

    /// Column whose values drive the per-entity search
    #[arg(long)]
    pub column: String,

    #[arg(long, default_value = "Find the email address of {entity}")]
    pub template: String,

    /// Extraction mode: llm, email or none
    #[arg(long, default_value = "llm")]
    pub extractor: String,

    #[arg(long, default_value = "gpt-3.5-turbo")]
    pub model: String,

    #[arg(long, default_value = "100")]
    pub max_tokens: u32,

    /// Search locale (hl)
    #[arg(long, default_value = "en")]
    pub language: String,

    /// Search region (gl)
    #[arg(long, default_value = "us")]
    pub region: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// TOML job file; when set it overrides the flags above
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

impl CliConfig {
    pub fn uses_sheets_source(&self) -> bool {
        self.sheet_url.is_some()
    }
}

impl ConfigProvider for CliConfig {
    fn entity_column(&self) -> &str {
        &self.column
    }

    fn query_template(&self) -> &str {
        &self.template
    }

    fn extractor_mode(&self) -> ExtractorMode {
        self.extractor.parse().unwrap_or(ExtractorMode::Llm)
    }

    fn search_language(&self) -> &str {
        &self.language
    }

    fn search_region(&self) -> &str {
        &self.region
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_filename(&self) -> String {
        OUTPUT_FILENAME.to_string()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match (&self.input, &self.sheet_url) {
            (None, None) => {
                return Err(EnrichError::MissingConfigError {
                    field: "--input or --sheet-url".to_string(),
                })
            }
            (Some(input), None) => validate_file_extension("input", input, &["csv"])?,
            (None, Some(sheet_url)) => validate_url("sheet_url", sheet_url)?,
            (Some(_), Some(_)) => {
                return Err(EnrichError::InvalidConfigValueError {
                    field: "input".to_string(),
                    value: "both --input and --sheet-url".to_string(),
                    reason: "Choose exactly one data source".to_string(),
                })
            }
        }

        validate_non_empty_string("column", &self.column)?;
        validate_one_of("extractor", &self.extractor, ExtractorMode::ALLOWED)?;
        validate_non_empty_string("model", &self.model)?;
        validate_positive_number("max_tokens", self.max_tokens as usize, 1)?;
        validate_path("output_path", &self.output_path)?;

        // 模板沒有佔位符照樣執行，只是每個 entity 的查詢會相同
        if let Err(e) = QueryTemplate::strict(&self.template) {
            tracing::warn!("⚠️ {}; every entity will produce the same query", e);
        }

        Ok(())
    }
}
