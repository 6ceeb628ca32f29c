pub mod alignment;
pub mod clipping;
pub mod config;
pub mod error;
pub mod gap_fill;
pub mod ingestion;
pub mod merge;
pub mod pipelines;
pub mod repair;
pub mod report;
pub mod sensors;
pub mod series;
pub mod substitution;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use pipelines::{all_pipeline_descriptors, PipelineOutput, RepairPipeline};
pub use report::{PipelineReport, UnresolvedGap};
pub use sensors::{SensorCatalog, SensorId};
