use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::error::Result;

/// 搜尋結果缺少欄位時使用的固定替代文字
pub const NO_TITLE: &str = "No Title";
pub const NO_SNIPPET: &str = "No Snippet";
pub const NO_LINK: &str = "No Link";
pub const NO_EMAIL_FOUND: &str = "No email found";

pub const OUTPUT_FILENAME: &str = "extracted_results.csv";
pub const OUTPUT_MIME: &str = "text/csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    pub data: HashMap<String, String>,
}

/// 單次執行的輸入表格，建立後只讀
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// 依列順序取出指定欄位的值，缺漏的儲存格視為空字串
    pub fn column_values(&self, name: &str) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.data.get(name).cloned().unwrap_or_default())
            .collect()
    }
}

/// 搜尋供應商回傳的原始結果，欄位皆可能缺漏
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
}

/// 補齊缺漏欄位後、對應單一 (entity, 搜尋結果) 的一列
#[derive(Debug, Clone)]
pub struct SearchRecord {
    pub entity: String,
    pub title: String,
    pub link: String,
    pub snippet: String,
}

impl SearchRecord {
    pub fn from_hit(entity: &str, hit: SearchHit) -> Self {
        Self {
            entity: entity.to_string(),
            title: hit.title.unwrap_or_else(|| NO_TITLE.to_string()),
            link: hit.link.unwrap_or_else(|| NO_LINK.to_string()),
            snippet: hit.snippet.unwrap_or_else(|| NO_SNIPPET.to_string()),
        }
    }
}

/// 擷取方式：LLM 擷取、本地 email 正規表達式、或完全略過
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorMode {
    Llm,
    Email,
    None,
}

impl ExtractorMode {
    pub const ALLOWED: &'static [&'static str] = &["llm", "email", "none"];
}

impl std::str::FromStr for ExtractorMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "llm" => Ok(ExtractorMode::Llm),
            "email" => Ok(ExtractorMode::Email),
            "none" => Ok(ExtractorMode::None),
            other => Err(format!("unknown extractor mode: {}", other)),
        }
    }
}

impl std::fmt::Display for ExtractorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExtractorMode::Llm => "llm",
            ExtractorMode::Email => "email",
            ExtractorMode::None => "none",
        };
        write!(f, "{}", s)
    }
}

/// 匯出用的結果表格
#[derive(Debug, Clone)]
pub struct OutputTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl OutputTable {
    pub fn columns_for(mode: ExtractorMode) -> Vec<String> {
        let columns: &[&str] = match mode {
            ExtractorMode::Llm => &["Entity", "Snippet", "Extracted Info"],
            ExtractorMode::Email => &["Entity", "Title", "Link", "Snippet", "Email"],
            ExtractorMode::None => &["Entity", "Title", "Snippet", "Link"],
        };
        columns.iter().map(|c| c.to_string()).collect()
    }

    pub fn new(mode: ExtractorMode) -> Self {
        Self {
            columns: Self::columns_for(mode),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        writer.into_inner().map_err(|e| {
            crate::utils::error::EnrichError::IoError(std::io::Error::other(e.to_string()))
        })
    }
}

/// enrich 階段的產出：補齊後的搜尋結果加上最終輸出表格
#[derive(Debug, Clone)]
pub struct EnrichResult {
    pub records: Vec<SearchRecord>,
    pub output: OutputTable,
    pub entities_without_results: Vec<String>,
}
