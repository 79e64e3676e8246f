use crate::domain::model::{ExtractorMode, SearchHit, Table};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 資料來源：每次呼叫都重新讀取，不做快取
#[async_trait]
pub trait TableSource: Send + Sync {
    async fn fetch(&self) -> Result<Table>;
}

/// 搜尋供應商：一個 entity 發出一次請求，零筆結果不是錯誤
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}

/// 擷取器：回傳型別化結果，呼叫端決定失敗時如何呈現
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, snippet: &str, template: &str) -> Result<String>;
}

/// 輸出儲存：寫入成功時回傳實際落地的路徑
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn entity_column(&self) -> &str;
    fn query_template(&self) -> &str;
    fn extractor_mode(&self) -> ExtractorMode;
    fn search_language(&self) -> &str;
    fn search_region(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_filename(&self) -> String;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn acquire(&self) -> Result<Table>;
    async fn enrich(&self, table: Table) -> Result<crate::domain::model::EnrichResult>;
    async fn export(&self, result: crate::domain::model::EnrichResult) -> Result<String>;
}
