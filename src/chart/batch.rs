use std::path::PathBuf;

use compact_str::CompactString;
use rayon::prelude::*;

use super::{render_chart_to_file, ChartConfig};
use crate::error::Result;
use crate::render::text::TextRenderer;

/// One dataset to chart: where to read it and where the PNG goes.
#[derive(Debug, Clone)]
pub struct ChartJob {
    pub name: CompactString,
    pub table: PathBuf,
    pub output: PathBuf,
    pub config: ChartConfig,
}

impl ChartJob {
    pub fn new(name: &str, table: PathBuf, output: PathBuf, config: ChartConfig) -> Self {
        Self {
            name: CompactString::new(name),
            table,
            output,
            config,
        }
    }
}

/// Render independent charts in parallel. Results come back in job order;
/// a failed job writes no file and does not affect the others.
pub fn render_batch(jobs: &[ChartJob], text: &TextRenderer) -> Vec<Result<PathBuf>> {
    jobs.par_iter()
        .map(|job| {
            let span = tracing::info_span!("chart", name = %job.name);
            let _enter = span.enter();
            match render_chart_to_file(&job.table, &job.output, &job.config, text.clone()) {
                Ok(()) => Ok(job.output.clone()),
                Err(e) => {
                    tracing::error!("Chart '{}' failed: {e}", job.name);
                    Err(e)
                }
            }
        })
        .collect()
}
