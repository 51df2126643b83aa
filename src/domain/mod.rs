//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - card records at each layer (`RawCard`, `RefinedCard`, `SummaryRow`)
//! - pipeline configuration (`PipelineConfig`)
//! - stage outcomes (`Stage`, `StageReport`, `PipelineReport`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
