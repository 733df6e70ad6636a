use std::io::Write;

use anyhow::{Context, Result};
use log::info;

use crate::chart::{
    render_connected_pattern, render_pattern_analysis, save_png, ChartError, ChartOptions,
    CONNECTED_PATTERN_FILE, PATTERN_ANALYSIS_FILE,
};
use crate::config::RunConfig;
use crate::data::loader::load_partitions;
use crate::data::model::CleanSubset;
use crate::report::RunSummary;
use crate::state::AnalysisState;

type RenderFn = fn(&CleanSubset, &ChartOptions) -> Result<Vec<u8>, ChartError>;

// ---------------------------------------------------------------------------
// Run driver
// ---------------------------------------------------------------------------

/// Load → filter → report → chart, once.
pub struct PatternProbeApp {
    pub config: RunConfig,
}

impl PatternProbeApp {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Execute the whole pipeline, writing the console report to `out`.
    /// Any load, parse or render failure ends the run.
    pub fn run(&self, out: &mut impl Write) -> Result<RunSummary> {
        let dataset =
            load_partitions(&self.config.partitions).context("loading dataset partitions")?;
        let state = AnalysisState::new(dataset, self.config.filter);
        let summary = state.summary();

        if self.config.render_charts {
            writeln!(out, "Creating visualizations...")?;
        }
        summary.write_counts(out)?;

        if self.config.render_charts {
            self.render_charts(&state, out)?;
        }

        summary.write_statistics(out)?;
        Ok(summary)
    }

    fn render_charts(&self, state: &AnalysisState, out: &mut impl Write) -> Result<()> {
        std::fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!(
                "creating output directory {}",
                self.config.output_dir.display()
            )
        })?;

        let charts = &self.config.charts;
        let figures: [(&str, RenderFn); 2] = [
            (PATTERN_ANALYSIS_FILE, render_pattern_analysis),
            (CONNECTED_PATTERN_FILE, render_connected_pattern),
        ];

        for (name, render) in figures {
            let png = render(&state.clean, charts).with_context(|| format!("rendering {name}"))?;
            let path = self.config.output_dir.join(name);
            save_png(&path, &png)?;
            info!("wrote {} ({} bytes)", path.display(), png.len());
            writeln!(out, "Saved: {name}")?;
        }
        Ok(())
    }
}
