use crate::domain::model::{Row, Table};
use crate::domain::ports::TableSource;
use crate::utils::error::{EnrichError, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// 以上傳的 CSV 檔作為資料來源，每次 fetch 重新讀檔
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: String,
}

impl CsvSource {
    pub fn new(path: String) -> Self {
        Self { path }
    }

    /// 將 CSV 位元組解析成表格，首列為欄位名稱，所有值一律視為字串
    pub fn parse_bytes(data: &[u8]) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(data);

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| EnrichError::SourceUnavailable {
                message: format!("malformed CSV header: {}", e),
            })?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| EnrichError::SourceUnavailable {
                message: format!("malformed CSV row: {}", e),
            })?;

            let mut data = HashMap::new();
            for (i, column) in columns.iter().enumerate() {
                // 長度不足的列以空字串補齊
                let value = record.get(i).unwrap_or_default();
                data.insert(column.clone(), value.to_string());
            }
            rows.push(Row { data });
        }

        Ok(Table::new(columns, rows))
    }
}

#[async_trait]
impl TableSource for CsvSource {
    async fn fetch(&self) -> Result<Table> {
        tracing::debug!("Reading CSV source: {}", self.path);
        let data = std::fs::read(&self.path).map_err(|e| EnrichError::SourceUnavailable {
            message: format!("cannot read {}: {}", self.path, e),
        })?;
        Self::parse_bytes(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_with_header() {
        let data = b"Company,City\nAcme,Austin\nGlobex,Springfield\n";
        let table = CsvSource::parse_bytes(data).unwrap();

        assert_eq!(table.columns(), &["Company", "City"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column_values("Company"), vec!["Acme", "Globex"]);
    }

    #[test]
    fn test_numeric_values_stay_strings() {
        let data = b"Company,Employees\nAcme,12000\n";
        let table = CsvSource::parse_bytes(data).unwrap();
        assert_eq!(table.column_values("Employees"), vec!["12000"]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let data = b"Company,City\nAcme\n";
        let table = CsvSource::parse_bytes(data).unwrap();
        assert_eq!(table.column_values("City"), vec![""]);
    }

    #[test]
    fn test_quoted_delimiter_in_cell() {
        let data = b"Company,Notes\n\"Acme, Inc.\",\"sales, support\"\n";
        let table = CsvSource::parse_bytes(data).unwrap();
        assert_eq!(table.column_values("Company"), vec!["Acme, Inc."]);
    }

    #[tokio::test]
    async fn test_missing_file_is_source_unavailable() {
        let source = CsvSource::new("/nonexistent/companies.csv".to_string());
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, EnrichError::SourceUnavailable { .. }));
    }
}
