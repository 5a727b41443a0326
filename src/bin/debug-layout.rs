/// Diagnostic tool to verify table → extraction → layout without rasterizing
use bluffing_charts::chart::{build_chart, extract_rounds, ChartConfig};
use bluffing_charts::layout::Region;
use bluffing_charts::render::{DrawCommand, RecordingSurface};
use bluffing_charts::table::Table;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "debug-layout")]
#[command(about = "Print extraction and layout results for one report table")]
struct Args {
    /// Report table (CSV)
    table: PathBuf,

    /// Rounds in the report (2 or 3)
    #[arg(default_value_t = 2)]
    rounds: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bluffing_charts=debug".parse()?),
        )
        .init();

    let Args {
        table: table_path,
        rounds,
    } = Args::parse();

    println!("=== DIAGNOSTIC: Table → Layout Pipeline ===");
    println!("Table: {}", table_path.display());

    let table = Table::from_path(&table_path)?;
    println!(
        "\n[1] Table loaded: {} columns, {} body rows",
        table.headers().len(),
        table.body_len()
    );

    let config = ChartConfig {
        rounds,
        ..ChartConfig::default()
    };
    let data = extract_rounds(&table, &config)?;
    println!("\n[2] Extracted {} rounds:", data.len());
    for (i, round) in data.iter().enumerate() {
        let absent_p = round.plaintiff.revealed.iter().filter(|d| d.is_absent()).count();
        let absent_d = round.defendant.revealed.iter().filter(|d| d.is_absent()).count();
        println!(
            "    Round {}: plaintiff {} bars ({} absent), defendant {} bars ({} absent)",
            i + 1,
            round.plaintiff.revealed.len(),
            absent_p,
            round.defendant.revealed.len(),
            absent_d
        );
    }

    let mut surface = RecordingSurface::new();
    build_chart(&mut surface, &table, &config)?;

    println!("\n[3] Headers:");
    for command in &surface.commands {
        if let DrawCommand::Text {
            text, transform, ..
        } = command
        {
            let (x, y) = transform.apply(0.0, 0.0);
            println!("    '{}' centered at ({:.1}, {:.1})", text, x, y);
        }
    }

    let strokes: Vec<&Region> = surface.strokes().collect();
    println!("\n[4] {} bucket rectangles", strokes.len());
    for rect in strokes.iter().take(10) {
        println!("    {}x{} at ({}, {})", rect.w + 1, rect.h + 1, rect.x, rect.y);
    }

    // Check for anomalies
    println!("\n[5] Checking for anomalies:");
    let canvas = Region::new(0, 0, config.width_px() as i32, config.height_px() as i32);
    let outside = strokes
        .iter()
        .filter(|r| {
            r.x < canvas.x || r.y < canvas.y || r.x + r.w >= canvas.w || r.y + r.h >= canvas.h
        })
        .count();
    let degenerate = strokes.iter().filter(|r| r.w < 0 || r.h < 0).count();
    println!("    Outside canvas: {}", outside);
    println!("    Degenerate:     {}", degenerate);

    Ok(())
}
