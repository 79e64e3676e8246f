// Adapters layer: concrete implementations for external systems (sources, providers, storage).

pub mod csv_file;
pub mod email;
pub mod google_sheets;
pub mod local_storage;
pub mod openai;
pub mod serpapi;

pub use csv_file::CsvSource;
pub use email::EmailExtractor;
pub use google_sheets::SheetsSource;
pub use local_storage::LocalStorage;
pub use openai::OpenAiExtractor;
pub use serpapi::SerpApiClient;
