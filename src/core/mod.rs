pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{
    EnrichResult, ExtractorMode, OutputTable, Row, SearchHit, SearchRecord, Table,
};
pub use crate::domain::ports::{
    ConfigProvider, Extractor, Pipeline, SearchProvider, Storage, TableSource,
};
pub use crate::utils::error::Result;
