#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::core::{client::EnrichClient, engine::Engine, pipeline::EnrichPipeline};
pub use crate::domain::model::{RunReport, RunStats, Verdict};
pub use crate::utils::error::{EtlError, Result};
