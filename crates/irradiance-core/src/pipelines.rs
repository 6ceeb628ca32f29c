use once_cell::sync::Lazy;
use polars::prelude::DataFrame;
use tracing::info;

use crate::alignment::align;
use crate::clipping::clip_ranges;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::gap_fill::fill_gaps;
use crate::ingestion::ingest;
use crate::merge::{daily_means, merge_wide};
use crate::repair::RepairKind;
use crate::report::{PipelineReport, Stage, StageOutcome, UnresolvedGap};
use crate::sensors::SensorCatalog;
use crate::series::SensorGroup;

#[derive(Debug, Clone)]
pub struct PipelineDescriptor {
    pub code: &'static str,
    pub version: &'static str,
    pub stages: &'static [Stage],
    pub description: &'static str,
}

static PIPELINES: Lazy<Vec<PipelineDescriptor>> = Lazy::new(|| {
    vec![PipelineDescriptor {
        code: "irradiance_repair_v1",
        version: "0.1.0",
        stages: &Stage::ALL,
        description: "Alignment + gap filling + range clipping + stagnant/abrupt/zero repair",
    }]
});

pub fn all_pipeline_descriptors() -> &'static [PipelineDescriptor] {
    PIPELINES.as_slice()
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub wide: DataFrame,
    pub daily_means: DataFrame,
    pub unresolved: Vec<UnresolvedGap>,
    pub report: PipelineReport,
}

/// Fixed-order driver: ingest, align, fill gaps, clip, then the repair kinds, then merge.
#[derive(Debug, Clone)]
pub struct RepairPipeline {
    catalog: SensorCatalog,
    config: PipelineConfig,
}

impl RepairPipeline {
    pub fn new(catalog: SensorCatalog, config: PipelineConfig) -> Result<Self> {
        config.validate(&catalog)?;
        Ok(Self { catalog, config })
    }

    /// Standard station catalog with its per-quantity overrides.
    pub fn standard_station() -> Result<Self> {
        let catalog = SensorCatalog::standard_station();
        let config = PipelineConfig::standard_station(&catalog);
        Self::new(catalog, config)
    }

    pub fn catalog(&self) -> &SensorCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, table: &DataFrame) -> Result<PipelineOutput> {
        let (group, log) = self.repair(table)?;

        let wide = merge_wide(&group, &log.unresolved, self.config.hour_window)?;
        let daily_means = daily_means(&group, self.config.hour_window)?;

        info!(
            rows = wide.height(),
            days = daily_means.height(),
            corrected = log.report.total_corrected(),
            unresolved = log.unresolved.len(),
            "Merged repaired series"
        );

        Ok(PipelineOutput {
            wide,
            daily_means,
            unresolved: log.unresolved,
            report: log.report,
        })
    }

    /// Runs every stage up to, but not including, the merger.
    pub fn repair(&self, table: &DataFrame) -> Result<(SensorGroup, RunLog)> {
        let channels = ingest(table, &self.catalog)?;
        let group = align(&channels, &self.catalog, &self.config)?;
        let mut log = RunLog::default();

        let (group, outcome) = fill_gaps(group, &self.catalog);
        log.record(Stage::GapFill, outcome);

        let (mut group, outcome) = clip_ranges(group, &self.config);
        log.record(Stage::Clip, outcome);

        for kind in RepairKind::ALL {
            let (repaired, outcome) = kind.apply(group, &self.catalog, &self.config);
            log.record(kind.stage(), outcome);
            group = repaired;
        }

        Ok((group, log))
    }
}

/// Report plus every unresolved point, accumulated stage by stage.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    pub report: PipelineReport,
    pub unresolved: Vec<UnresolvedGap>,
}

impl RunLog {
    fn record(&mut self, stage: Stage, outcome: StageOutcome) {
        let corrected = outcome.corrections.len();
        let unresolved = self.report.record(stage, outcome);
        info!(
            stage = stage.as_str(),
            corrected,
            unresolved = unresolved.len(),
            "Completed stage"
        );
        self.unresolved.extend(unresolved);
    }
}
