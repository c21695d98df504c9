pub mod client;
pub mod engine;
pub mod pipeline;
pub mod sanitizer;
pub mod validator;

pub use crate::domain::model::{EnrichOutcome, EventRow, OutputRow, RunReport, RunStats, Verdict};
pub use crate::domain::ports::{ConfigProvider, Enricher};
pub use crate::utils::error::Result;
