use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Parser;

use bluffing_charts::chart::{render_batch, ChartConfig, ChartJob};
use bluffing_charts::render::TextRenderer;

/// Stacked offer-distribution charts from simulation report tables
#[derive(Parser, Clone, Debug)]
#[command(name = "bluffing-charts")]
#[command(about = "Render one PNG chart per simulation report table")]
struct Args {
    /// Rounds in each report (2 or 3)
    #[arg(long, default_value_t = 2)]
    rounds: usize,

    /// Canvas scale multiplier
    #[arg(long, default_value_t = 1)]
    scale: u32,

    /// Split every round into revealed and hidden halves
    #[arg(long)]
    split: bool,

    /// Skip bucket index labels
    #[arg(long)]
    no_labels: bool,

    /// Skip the round header row
    #[arg(long)]
    no_headers: bool,

    /// Label font (TTF/OTF); system fonts are tried otherwise
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output directory; defaults to each table's own directory
    #[arg(long)]
    out: Option<PathBuf>,

    /// Report tables (CSV)
    #[arg(required = true)]
    tables: Vec<PathBuf>,
}

impl Args {
    fn chart_config(&self) -> ChartConfig {
        ChartConfig {
            rounds: self.rounds,
            scale: self.scale,
            reveal_split: self.split,
            draw_labels: !self.no_labels,
            round_headers: !self.no_headers,
            ..ChartConfig::default()
        }
    }

    fn job_for(&self, table: &Path) -> ChartJob {
        let stem = table
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "chart".to_string());
        let dir = self
            .out
            .clone()
            .or_else(|| table.parent().map(|p| p.to_path_buf()))
            .unwrap_or_default();
        ChartJob::new(
            &stem,
            table.to_path_buf(),
            dir.join(format!("{stem}.png")),
            self.chart_config(),
        )
    }

    fn text_renderer(&self) -> Result<TextRenderer> {
        match &self.font {
            Some(path) => {
                let mut text = TextRenderer::new();
                text.load_font_from_path(path)?;
                Ok(text)
            }
            None => Ok(TextRenderer::with_system_font()),
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bluffing_charts=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let jobs: Vec<ChartJob> = args.tables.iter().map(|t| args.job_for(t)).collect();

    tracing::info!("Rendering {} chart(s)", jobs.len());
    let text = args.text_renderer()?;
    let results = render_batch(&jobs, &text);

    let mut failed = 0;
    for (job, result) in jobs.iter().zip(&results) {
        match result {
            Ok(path) => println!("{} -> {}", job.name, path.display()),
            Err(e) => {
                eprintln!("{}: {e}", job.name);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} charts failed", jobs.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_chart_defaults() {
        let args = Args::try_parse_from(["bluffing-charts", "report.csv"]).unwrap();
        let config = args.chart_config();
        let defaults = ChartConfig::default();
        assert_eq!(config.rounds, defaults.rounds);
        assert_eq!(config.scale, defaults.scale);
        assert!(config.draw_labels && config.round_headers && !config.reveal_split);
    }

    #[test]
    fn flags_reach_the_config() {
        let args = Args::try_parse_from([
            "bluffing-charts",
            "--rounds",
            "3",
            "--scale",
            "2",
            "--split",
            "--no-labels",
            "--no-headers",
            "a.csv",
        ])
        .unwrap();
        let config = args.chart_config();
        assert_eq!((config.rounds, config.scale), (3, 2));
        assert!(config.reveal_split && !config.draw_labels && !config.round_headers);
    }

    #[test]
    fn option_without_value_is_rejected() {
        assert!(Args::try_parse_from(["bluffing-charts", "a.csv", "--rounds"]).is_err());
        assert!(Args::try_parse_from(["bluffing-charts", "--rounds", "two", "a.csv"]).is_err());
    }

    #[test]
    fn at_least_one_table_is_required() {
        assert!(Args::try_parse_from(["bluffing-charts", "--split"]).is_err());
    }

    #[test]
    fn output_goes_next_to_table_unless_redirected() {
        let args = Args::try_parse_from(["bluffing-charts", "data/r1.csv"]).unwrap();
        let job = args.job_for(Path::new("data/r1.csv"));
        assert_eq!(job.output, PathBuf::from("data/r1.png"));
        assert_eq!(job.name, "r1");

        let args =
            Args::try_parse_from(["bluffing-charts", "--out", "charts", "data/r1.csv"]).unwrap();
        let job = args.job_for(Path::new("data/r1.csv"));
        assert_eq!(job.output, PathBuf::from("charts/r1.png"));
    }
}
