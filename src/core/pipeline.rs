use crate::core::{
    ConfigProvider, EnrichResult, Extractor, ExtractorMode, OutputTable, Pipeline, SearchProvider,
    SearchRecord, Storage, Table, TableSource,
};
use crate::domain::template::QueryTemplate;
use crate::utils::error::{EnrichError, Result};
use std::sync::Arc;

/// 擷取供應商驗證失敗時內嵌到結果列的文字
pub const AUTH_FAILURE_TEXT: &str = "Error: Authentication failed. Please check your API key.";

pub struct EnrichPipeline<S: Storage, C: ConfigProvider> {
    source: Arc<dyn TableSource>,
    searcher: Arc<dyn SearchProvider>,
    extractor: Option<Arc<dyn Extractor>>,
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> EnrichPipeline<S, C> {
    pub fn new(
        source: Arc<dyn TableSource>,
        searcher: Arc<dyn SearchProvider>,
        extractor: Option<Arc<dyn Extractor>>,
        storage: S,
        config: C,
    ) -> Self {
        Self {
            source,
            searcher,
            extractor,
            storage,
            config,
        }
    }

    /// 失敗的擷取結果內嵌為列值，整批流程不中斷
    fn extraction_text(result: Result<String>) -> String {
        match result {
            Ok(text) => text,
            Err(EnrichError::ExtractionAuthError) => AUTH_FAILURE_TEXT.to_string(),
            Err(e) => format!(
                "Error: Something went wrong with the extraction provider. Details: {}",
                e
            ),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for EnrichPipeline<S, C> {
    async fn acquire(&self) -> Result<Table> {
        let table = self.source.fetch().await?;
        tracing::debug!(
            "Source table: {} rows, columns: {:?}",
            table.len(),
            table.columns()
        );
        Ok(table)
    }

    async fn enrich(&self, table: Table) -> Result<EnrichResult> {
        let column = self.config.entity_column();
        if !table.has_column(column) {
            return Err(EnrichError::InvalidConfigValueError {
                field: "column".to_string(),
                value: column.to_string(),
                reason: format!(
                    "column not present in the source; available: {}",
                    table.columns().join(", ")
                ),
            });
        }

        let template = QueryTemplate::lenient(self.config.query_template());
        let mode = self.config.extractor_mode();

        let mut records = Vec::new();
        let mut entities_without_results = Vec::new();

        // 一次處理一個 entity，每個 entity 一次搜尋請求
        for entity in table.column_values(column) {
            let query = template.render(&entity);
            tracing::debug!("🔎 {}: {}", entity, query);

            match self.searcher.search(&query).await {
                Ok(hits) if hits.is_empty() => {
                    tracing::warn!("⚠️ No organic results found for {}", entity);
                    entities_without_results.push(entity.clone());
                }
                Ok(hits) => {
                    for hit in hits {
                        records.push(SearchRecord::from_hit(&entity, hit));
                    }
                }
                Err(e) => {
                    // 單一 entity 的搜尋失敗不影響其餘 entity
                    tracing::warn!("⚠️ Search failed for {}: {}", entity, e);
                }
            }
        }

        let mut output = OutputTable::new(mode);

        if mode == ExtractorMode::None {
            for record in &records {
                output.push(vec![
                    record.entity.clone(),
                    record.title.clone(),
                    record.snippet.clone(),
                    record.link.clone(),
                ]);
            }
        } else {
            let extractor =
                self.extractor
                    .as_ref()
                    .ok_or_else(|| EnrichError::MissingConfigError {
                        field: "extractor".to_string(),
                    })?;

            tracing::info!("Processing {} search results", records.len());
            for record in &records {
                let extracted = Self::extraction_text(
                    extractor.extract(&record.snippet, template.raw()).await,
                );

                match mode {
                    ExtractorMode::Llm => output.push(vec![
                        record.entity.clone(),
                        record.snippet.clone(),
                        extracted,
                    ]),
                    ExtractorMode::Email => output.push(vec![
                        record.entity.clone(),
                        record.title.clone(),
                        record.link.clone(),
                        record.snippet.clone(),
                        extracted,
                    ]),
                    ExtractorMode::None => unreachable!(),
                }
            }
        }

        Ok(EnrichResult {
            records,
            output,
            entities_without_results,
        })
    }

    async fn export(&self, result: EnrichResult) -> Result<String> {
        let data = result.output.to_csv()?;
        let filename = self.config.output_filename();

        tracing::debug!(
            "Writing {} ({} rows, {})",
            filename,
            result.output.len(),
            crate::domain::model::OUTPUT_MIME
        );

        self.storage.write_file(&filename, &data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{SearchHit, NO_SNIPPET, NO_TITLE};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FixedSource {
        table: Table,
    }

    #[async_trait]
    impl TableSource for FixedSource {
        async fn fetch(&self) -> Result<Table> {
            Ok(self.table.clone())
        }
    }

    /// 依查詢字串回覆預先排好的結果；未知查詢視為供應商錯誤
    struct ScriptedSearcher {
        responses: HashMap<String, Vec<SearchHit>>,
        failing_queries: Vec<String>,
    }

    #[async_trait]
    impl SearchProvider for ScriptedSearcher {
        async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
            if self.failing_queries.iter().any(|q| q == query) {
                return Err(EnrichError::SearchProviderError {
                    message: "scripted failure".to_string(),
                });
            }
            Ok(self.responses.get(query).cloned().unwrap_or_default())
        }
    }

    struct ScriptedExtractor {
        result: fn() -> Result<String>,
    }

    #[async_trait]
    impl Extractor for ScriptedExtractor {
        async fn extract(&self, _snippet: &str, _template: &str) -> Result<String> {
            (self.result)()
        }
    }

    #[derive(Clone, Default)]
    struct MemoryStorage {
        files: std::sync::Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MemoryStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
            let mut files = self.files.lock().unwrap();
            files.insert(path.to_string(), data.to_vec());
            Ok(format!("mem://{}", path))
        }
    }

    struct TestConfig {
        column: String,
        template: String,
        mode: ExtractorMode,
    }

    impl Default for TestConfig {
        fn default() -> Self {
            Self {
                column: "Company".to_string(),
                template: "Find the email address of {entity}".to_string(),
                mode: ExtractorMode::Llm,
            }
        }
    }

    impl ConfigProvider for TestConfig {
        fn entity_column(&self) -> &str {
            &self.column
        }

        fn query_template(&self) -> &str {
            &self.template
        }

        fn extractor_mode(&self) -> ExtractorMode {
            self.mode
        }

        fn search_language(&self) -> &str {
            "en"
        }

        fn search_region(&self) -> &str {
            "us"
        }

        fn output_path(&self) -> &str {
            "./output"
        }

        fn output_filename(&self) -> String {
            "extracted_results.csv".to_string()
        }
    }

    fn table(entities: &[&str]) -> Table {
        let rows = entities
            .iter()
            .map(|e| crate::domain::model::Row {
                data: HashMap::from([("Company".to_string(), e.to_string())]),
            })
            .collect();
        Table::new(vec!["Company".to_string()], rows)
    }

    fn hit(snippet: &str) -> SearchHit {
        SearchHit {
            title: Some("A title".to_string()),
            link: Some("https://example.com".to_string()),
            snippet: Some(snippet.to_string()),
        }
    }

    fn pipeline(
        searcher: ScriptedSearcher,
        extractor: Option<Arc<dyn Extractor>>,
        config: TestConfig,
    ) -> EnrichPipeline<MemoryStorage, TestConfig> {
        EnrichPipeline::new(
            Arc::new(FixedSource {
                table: table(&["Acme", "Globex"]),
            }),
            Arc::new(searcher),
            extractor,
            MemoryStorage::default(),
            config,
        )
    }

    #[tokio::test]
    async fn test_enrich_produces_one_row_per_search_result() {
        let searcher = ScriptedSearcher {
            responses: HashMap::from([
                (
                    "Find the email address of Acme".to_string(),
                    vec![hit("Contact sales@acme.example")],
                ),
                (
                    "Find the email address of Globex".to_string(),
                    vec![hit("Contact info@globex.example")],
                ),
            ]),
            failing_queries: vec![],
        };
        let extractor = ScriptedExtractor {
            result: || Ok("someone@example.com".to_string()),
        };

        let pipeline = pipeline(searcher, Some(Arc::new(extractor)), TestConfig::default());
        let input = pipeline.acquire().await.unwrap();
        let result = pipeline.enrich(input).await.unwrap();

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.output.len(), 2);
        assert_eq!(
            result.output.columns,
            vec!["Entity", "Snippet", "Extracted Info"]
        );
        assert_eq!(result.output.rows[0][2], "someone@example.com");
        assert!(result.entities_without_results.is_empty());
    }

    #[tokio::test]
    async fn test_missing_column_is_rejected() {
        let searcher = ScriptedSearcher {
            responses: HashMap::new(),
            failing_queries: vec![],
        };
        let config = TestConfig {
            column: "Organisation".to_string(),
            ..TestConfig::default()
        };

        let pipeline = pipeline(searcher, None, config);
        let input = pipeline.acquire().await.unwrap();
        let err = pipeline.enrich(input).await.unwrap_err();

        match err {
            EnrichError::InvalidConfigValueError { field, reason, .. } => {
                assert_eq!(field, "column");
                assert!(reason.contains("Company"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_failure_only_skips_that_entity() {
        let searcher = ScriptedSearcher {
            responses: HashMap::from([(
                "Find the email address of Globex".to_string(),
                vec![hit("Contact info@globex.example")],
            )]),
            failing_queries: vec!["Find the email address of Acme".to_string()],
        };
        let extractor = ScriptedExtractor {
            result: || Ok("info@globex.example".to_string()),
        };

        let pipeline = pipeline(searcher, Some(Arc::new(extractor)), TestConfig::default());
        let input = pipeline.acquire().await.unwrap();
        let result = pipeline.enrich(input).await.unwrap();

        // Acme 失敗但 Globex 照常處理
        assert_eq!(result.output.len(), 1);
        assert_eq!(result.output.rows[0][0], "Globex");
    }

    #[tokio::test]
    async fn test_zero_results_contributes_zero_rows() {
        let searcher = ScriptedSearcher {
            responses: HashMap::from([(
                "Find the email address of Globex".to_string(),
                vec![hit("Contact info@globex.example")],
            )]),
            failing_queries: vec![],
        };
        let extractor = ScriptedExtractor {
            result: || Ok("info@globex.example".to_string()),
        };

        let pipeline = pipeline(searcher, Some(Arc::new(extractor)), TestConfig::default());
        let input = pipeline.acquire().await.unwrap();
        let result = pipeline.enrich(input).await.unwrap();

        assert_eq!(result.output.len(), 1);
        assert_eq!(result.entities_without_results, vec!["Acme"]);
    }

    #[tokio::test]
    async fn test_auth_failure_is_embedded_in_the_row() {
        let searcher = ScriptedSearcher {
            responses: HashMap::from([(
                "Find the email address of Acme".to_string(),
                vec![hit("Contact sales@acme.example")],
            )]),
            failing_queries: vec![],
        };
        let extractor = ScriptedExtractor {
            result: || Err(EnrichError::ExtractionAuthError),
        };

        let pipeline = pipeline(searcher, Some(Arc::new(extractor)), TestConfig::default());
        let input = pipeline.acquire().await.unwrap();
        let result = pipeline.enrich(input).await.unwrap();

        let value = &result.output.rows[0][2];
        assert_eq!(value, AUTH_FAILURE_TEXT);
        assert!(value.starts_with("Error"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_embedded_in_the_row() {
        let searcher = ScriptedSearcher {
            responses: HashMap::from([(
                "Find the email address of Acme".to_string(),
                vec![hit("snippet")],
            )]),
            failing_queries: vec![],
        };
        let extractor = ScriptedExtractor {
            result: || {
                Err(EnrichError::ExtractionProviderError {
                    message: "rate limited".to_string(),
                })
            },
        };

        let pipeline = pipeline(searcher, Some(Arc::new(extractor)), TestConfig::default());
        let input = pipeline.acquire().await.unwrap();
        let result = pipeline.enrich(input).await.unwrap();

        let value = &result.output.rows[0][2];
        assert!(value.starts_with("Error: Something went wrong"));
        assert!(value.contains("rate limited"));
    }

    #[tokio::test]
    async fn test_email_mode_uses_search_columns_plus_email() {
        let searcher = ScriptedSearcher {
            responses: HashMap::from([(
                "Find the email address of Acme".to_string(),
                vec![hit("Reach sales@acme.example now")],
            )]),
            failing_queries: vec![],
        };
        let config = TestConfig {
            mode: ExtractorMode::Email,
            ..TestConfig::default()
        };

        let pipeline = pipeline(
            searcher,
            Some(Arc::new(crate::adapters::EmailExtractor::new())),
            config,
        );
        let input = pipeline.acquire().await.unwrap();
        let result = pipeline.enrich(input).await.unwrap();

        assert_eq!(
            result.output.columns,
            vec!["Entity", "Title", "Link", "Snippet", "Email"]
        );
        assert_eq!(result.output.rows[0][4], "sales@acme.example");
    }

    #[tokio::test]
    async fn test_none_mode_skips_extraction() {
        let searcher = ScriptedSearcher {
            responses: HashMap::from([(
                "Find the email address of Acme".to_string(),
                vec![SearchHit {
                    title: None,
                    link: Some("https://acme.example".to_string()),
                    snippet: None,
                }],
            )]),
            failing_queries: vec![],
        };
        let config = TestConfig {
            mode: ExtractorMode::None,
            ..TestConfig::default()
        };

        let pipeline = pipeline(searcher, None, config);
        let input = pipeline.acquire().await.unwrap();
        let result = pipeline.enrich(input).await.unwrap();

        assert_eq!(
            result.output.columns,
            vec!["Entity", "Title", "Snippet", "Link"]
        );
        assert_eq!(result.output.rows[0][1], NO_TITLE);
        assert_eq!(result.output.rows[0][2], NO_SNIPPET);
    }

    #[tokio::test]
    async fn test_export_writes_through_storage() {
        let searcher = ScriptedSearcher {
            responses: HashMap::new(),
            failing_queries: vec![],
        };
        let storage = MemoryStorage::default();
        let pipeline = EnrichPipeline::new(
            Arc::new(FixedSource {
                table: table(&["Acme"]),
            }),
            Arc::new(searcher),
            None,
            storage.clone(),
            TestConfig {
                mode: ExtractorMode::None,
                ..TestConfig::default()
            },
        );

        let mut output = OutputTable::new(ExtractorMode::None);
        output.push(vec![
            "Acme".to_string(),
            "Title".to_string(),
            "Snippet".to_string(),
            "Link".to_string(),
        ]);
        let result = EnrichResult {
            records: vec![],
            output,
            entities_without_results: vec![],
        };

        let path = pipeline.export(result).await.unwrap();
        assert_eq!(path, "mem://extracted_results.csv");

        let files = storage.files.lock().unwrap();
        let data = files.get("extracted_results.csv").unwrap();
        let content = String::from_utf8(data.clone()).unwrap();
        assert!(content.starts_with("Entity,Title,Snippet,Link"));
    }
}
