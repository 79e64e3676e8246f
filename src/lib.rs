pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{JobConfig, Secrets};

pub use adapters::{
    CsvSource, EmailExtractor, LocalStorage, OpenAiExtractor, SerpApiClient, SheetsSource,
};
pub use crate::core::{engine::RunEngine, pipeline::EnrichPipeline};
pub use utils::error::{EnrichError, Result};
