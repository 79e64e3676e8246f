#[cfg(feature = "cli")]
pub mod cli;
pub mod job_config;
pub mod secrets;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use job_config::JobConfig;
pub use secrets::Secrets;
