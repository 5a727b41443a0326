pub mod anchors;
pub mod batch;

use std::path::Path;

use crate::error::Result;
use crate::layout::{
    add_left_headers_with_further_subdivision, add_top_headers, partition, reserve_header_strip,
    Axis, HeaderLevel, Region,
};
use crate::render::bars::{render_set, BarStyle};
use crate::render::canvas::Canvas;
use crate::render::colors::Rgba;
use crate::render::surface::{draw_label, Surface, TextStyle};
use crate::render::text::TextRenderer;
use crate::table::{extract, DistributionSet, ExtractionRequest, Table};

pub use anchors::{Anchor, RoundAnchors};
pub use batch::{render_batch, ChartJob};

const PARTY_LABELS: [&str; 2] = ["P Signal", "D Signal"];
const SPLIT_LABELS: [&str; 2] = ["Revealed", "Hidden"];

/// Everything that shapes one chart. Pixel values are at scale 1 and get
/// multiplied by `scale`, except the edge margin.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub scale: u32,
    /// Blank border around the whole chart, in final pixels.
    pub edge_margin: i32,
    /// 2 or 3; picks the anchor table.
    pub rounds: usize,
    /// Bars per series, one per signal.
    pub signals: usize,
    /// Buckets per bar.
    pub buckets: usize,
    /// Gap between round columns and between the plaintiff and defendant rows.
    pub group_margin: i32,
    /// Gap between the revealed and hidden halves of a round.
    pub split_margin: i32,
    pub plaintiff_color: Rgba,
    pub defendant_color: Rgba,
    pub draw_labels: bool,
    pub round_headers: bool,
    /// Divide every round into revealed and hidden halves.
    pub reveal_split: bool,
    pub font_size: f32,
    pub party_header_width: i32,
    pub signal_header_width: i32,
    pub top_header_height: i32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            canvas_width: 300,
            canvas_height: 300,
            scale: 1,
            edge_margin: 10,
            rounds: 2,
            signals: 5,
            buckets: 5,
            group_margin: 10,
            split_margin: 4,
            plaintiff_color: Rgba::PLAINTIFF,
            defendant_color: Rgba::DEFENDANT,
            draw_labels: true,
            round_headers: true,
            reveal_split: false,
            font_size: 8.0,
            party_header_width: 18,
            signal_header_width: 14,
            top_header_height: 16,
        }
    }
}

impl ChartConfig {
    pub fn width_px(&self) -> u32 {
        self.canvas_width * self.scale
    }

    pub fn height_px(&self) -> u32 {
        self.canvas_height * self.scale
    }

    fn px(&self, base: i32) -> i32 {
        base * self.scale as i32
    }

    /// Gap between the bars of one set.
    pub fn set_margin(&self) -> i32 {
        self.px(2)
    }

    pub fn group_margin_px(&self) -> i32 {
        self.px(self.group_margin)
    }

    pub fn split_margin_px(&self) -> i32 {
        self.px(self.split_margin)
    }

    pub fn header_style(&self) -> TextStyle {
        TextStyle {
            size: self.font_size * self.scale as f32,
            color: Rgba::BLACK,
        }
    }

    pub fn bar_style(&self, color: Rgba) -> BarStyle {
        let mut style = BarStyle::new(color, self.scale);
        style.draw_labels = self.draw_labels;
        style.set_margin = self.set_margin();
        style.label.size = self.font_size * self.scale as f32;
        style
    }
}

/// One series' blocks for one round.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub revealed: DistributionSet,
    /// Only read when the chart is split.
    pub hidden: Option<DistributionSet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundData {
    pub plaintiff: SeriesData,
    pub defendant: SeriesData,
}

/// Read every block the chart needs. Fails before anything is drawn.
pub fn extract_rounds(table: &Table, config: &ChartConfig) -> Result<Vec<RoundData>> {
    let anchors = RoundAnchors::for_rounds(config.rounds)?;
    anchors
        .iter()
        .map(|round| {
            Ok(RoundData {
                plaintiff: extract_series(table, round.plaintiff, config)?,
                defendant: extract_series(table, round.defendant, config)?,
            })
        })
        .collect()
}

fn extract_series(table: &Table, anchor: Anchor, config: &ChartConfig) -> Result<SeriesData> {
    let revealed = extract(
        table,
        &ExtractionRequest::new(anchor.row, anchor.column, config.signals, config.buckets),
    )?;
    let hidden = if config.reveal_split {
        Some(extract(
            table,
            &ExtractionRequest::new(
                anchor.row + config.signals,
                anchor.column,
                config.signals,
                config.buckets,
            ),
        )?)
    } else {
        None
    };
    tracing::debug!(
        "Series at ({}, {}): {} of {} bars absent",
        anchor.row,
        anchor.column,
        revealed.iter().filter(|d| d.is_absent()).count(),
        revealed.len()
    );
    Ok(SeriesData { revealed, hidden })
}

/// Lay out and draw a full chart onto `surface`.
///
/// Top headers name the rounds, left headers name the party and signal of
/// every bar. Each round is a column holding a plaintiff row above a
/// defendant row; every row is one bar per signal, divided by bucket.
pub fn build_chart<S>(surface: &mut S, table: &Table, config: &ChartConfig) -> Result<()>
where
    S: Surface + ?Sized,
{
    let rounds = extract_rounds(table, config)?;
    tracing::info!(
        "Building {}-round chart, {} signals x {} buckets{}",
        config.rounds,
        config.signals,
        config.buckets,
        if config.reveal_split { ", split" } else { "" }
    );

    let canvas = Region::new(0, 0, config.width_px() as i32, config.height_px() as i32);
    let mut content = canvas.inset(config.edge_margin);
    let header_style = config.header_style();
    let group_margin = config.group_margin_px();

    let party = HeaderLevel {
        labels: &PARTY_LABELS,
        thickness: config.px(config.party_header_width),
        margin: group_margin,
    };
    let signal_labels: Vec<String> = (1..=config.signals).map(|i| i.to_string()).collect();
    let signal_refs: Vec<&str> = signal_labels.iter().map(String::as_str).collect();
    let signal = HeaderLevel {
        labels: &signal_refs,
        thickness: config.px(config.signal_header_width),
        margin: config.set_margin(),
    };

    if config.round_headers {
        let skip = left_header_width(content, party.thickness, signal.thickness)?;
        let round_labels: Vec<String> = (1..=config.rounds).map(|r| format!("Round {r}")).collect();
        let round_refs: Vec<&str> = round_labels.iter().map(String::as_str).collect();
        content = add_top_headers(
            surface,
            content,
            HeaderLevel {
                labels: &round_refs,
                thickness: config.px(config.top_header_height),
                margin: group_margin,
            },
            skip,
            &header_style,
        )?;
        if config.reveal_split {
            content = add_split_headers(surface, content, skip, config, &header_style)?;
        }
    }

    let body =
        add_left_headers_with_further_subdivision(surface, content, party, signal, &header_style)?;

    let columns = partition(body, Axis::Horizontal, rounds.len(), group_margin, None)?;
    let plaintiff_style = config.bar_style(config.plaintiff_color);
    let defendant_style = config.bar_style(config.defendant_color);

    for (column, round) in columns.into_iter().zip(&rounds) {
        let rows = partition(column, Axis::Vertical, 2, group_margin, None)?;
        render_series(surface, rows[0], &round.plaintiff, config, &plaintiff_style)?;
        render_series(surface, rows[1], &round.defendant, config, &defendant_style)?;
    }

    tracing::info!("Chart built: {} rounds drawn", rounds.len());
    Ok(())
}

/// Width the nested left headers will take out of `content`, computed the
/// same way the headers themselves reserve it.
fn left_header_width(content: Region, outer: i32, inner: i32) -> Result<i32> {
    let (_, after_outer) = reserve_header_strip(content, Axis::Horizontal, outer)?;
    let (_, after_inner) = reserve_header_strip(after_outer, Axis::Horizontal, inner)?;
    Ok(after_inner.x - content.x)
}

/// Second header row naming the revealed and hidden half of every round.
fn add_split_headers<S>(
    surface: &mut S,
    region: Region,
    skip: i32,
    config: &ChartConfig,
    style: &TextStyle,
) -> Result<Region>
where
    S: Surface + ?Sized,
{
    let (strip, remaining) =
        reserve_header_strip(region, Axis::Vertical, config.px(config.top_header_height))?;
    let strip = strip.skip_leading(Axis::Horizontal, skip);
    let rounds = partition(strip, Axis::Horizontal, config.rounds, config.group_margin_px(), None)?;
    for round in rounds {
        let halves = partition(round, Axis::Horizontal, 2, config.split_margin_px(), None)?;
        for (half, label) in halves.iter().zip(SPLIT_LABELS) {
            if !half.is_empty() {
                draw_label(surface, half.center(), 0.0, label, style);
            }
        }
    }
    Ok(remaining)
}

fn render_series<S>(
    surface: &mut S,
    region: Region,
    series: &SeriesData,
    config: &ChartConfig,
    style: &BarStyle,
) -> Result<()>
where
    S: Surface + ?Sized,
{
    match &series.hidden {
        Some(hidden) => {
            let halves = partition(region, Axis::Horizontal, 2, config.split_margin_px(), None)?;
            render_set(surface, halves[0], Axis::Horizontal, &series.revealed, style)?;
            render_set(surface, halves[1], Axis::Horizontal, hidden, style)
        }
        None => render_set(surface, region, Axis::Horizontal, &series.revealed, style),
    }
}

/// Rasterize a chart in memory.
pub fn render_chart(table: &Table, config: &ChartConfig, text: TextRenderer) -> Result<Canvas> {
    let mut canvas = Canvas::new(config.width_px(), config.height_px(), text);
    build_chart(&mut canvas, table, config)?;
    Ok(canvas)
}

/// Load a table, draw its chart and write it as PNG. Nothing is written
/// unless the whole chart was built.
pub fn render_chart_to_file(
    table_path: &Path,
    out_path: &Path,
    config: &ChartConfig,
    text: TextRenderer,
) -> Result<()> {
    let table = Table::from_path(table_path)?;
    let canvas = render_chart(&table, config, text)?;
    canvas.save_png(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartError;
    use crate::render::recording::RecordingSurface;

    /// Table with every block of a 2-round chart filled in. Columns 84..108
    /// hold count and values; everything else is blank.
    fn two_round_table(rows: usize, absent_row: Option<usize>) -> Table {
        let width = 110;
        let mut csv = (1..=width).map(|c| format!("c{c}")).collect::<Vec<_>>().join(",");
        csv.push('\n');
        for body in 0..rows {
            let spreadsheet_row = body + 2;
            let mut cells = vec![String::new(); width];
            for obs in [84, 90, 96, 102] {
                if Some(spreadsheet_row) != absent_row {
                    cells[obs - 1] = "12".into();
                }
                for v in 0..5 {
                    cells[obs + v] = "0.2".into();
                }
            }
            csv.push_str(&cells.join(","));
            csv.push('\n');
        }
        Table::from_reader(csv.as_bytes()).unwrap()
    }

    /// Same shape as `two_round_table`, with the third round's blocks and
    /// enough rows for the three-round anchors.
    fn three_round_table(rows: usize) -> Table {
        let width = 125;
        let mut csv = (1..=width).map(|c| format!("c{c}")).collect::<Vec<_>>().join(",");
        csv.push('\n');
        for _ in 0..rows {
            let mut cells = vec![String::new(); width];
            for obs in [84, 90, 96, 102, 108, 114] {
                cells[obs - 1] = "12".into();
                for v in 0..5 {
                    cells[obs + v] = "0.2".into();
                }
            }
            csv.push_str(&cells.join(","));
            csv.push('\n');
        }
        Table::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn three_rounds_draw_three_columns() {
        let table = three_round_table(160);
        let config = ChartConfig {
            rounds: 3,
            draw_labels: false,
            ..ChartConfig::default()
        };
        let rounds = extract_rounds(&table, &config).unwrap();
        assert_eq!(rounds.len(), 3);
        assert!(rounds
            .iter()
            .all(|r| r.plaintiff.revealed.iter().all(|d| !d.is_absent())
                && r.defendant.revealed.iter().all(|d| !d.is_absent())));

        let mut s = RecordingSurface::new();
        build_chart(&mut s, &table, &config).unwrap();
        // 3 rounds x 2 parties x 5 signals x 5 buckets.
        assert_eq!(s.strokes().count(), 150);
        assert!(s.texts().any(|t| t == "Round 3"));

        // The third column still fits inside the canvas.
        let right_edge = s.strokes().map(|r| r.x + r.w).max().unwrap();
        assert!(right_edge < config.width_px() as i32);
    }

    #[test]
    fn unsupported_round_count_fails_before_drawing() {
        let table = two_round_table(150, None);
        let config = ChartConfig {
            rounds: 4,
            ..ChartConfig::default()
        };
        let mut s = RecordingSurface::new();
        let err = build_chart(&mut s, &table, &config).unwrap_err();
        assert!(matches!(err, ChartError::UnsupportedRoundCount(4)));
        assert!(s.commands.is_empty());
    }

    #[test]
    fn short_table_is_row_not_found() {
        let table = two_round_table(100, None);
        let mut s = RecordingSurface::new();
        let err = build_chart(&mut s, &table, &ChartConfig::default()).unwrap_err();
        assert!(matches!(err, ChartError::RowNotFound { .. }));
        assert!(s.commands.is_empty());
    }

    #[test]
    fn draws_every_bucket_of_every_bar() {
        let table = two_round_table(150, None);
        let config = ChartConfig {
            draw_labels: false,
            ..ChartConfig::default()
        };
        let mut s = RecordingSurface::new();
        build_chart(&mut s, &table, &config).unwrap();
        // 2 rounds x 2 parties x 5 signals x 5 buckets.
        assert_eq!(s.strokes().count(), 100);
        let texts: Vec<&str> = s.texts().collect();
        assert!(texts.contains(&"Round 1") && texts.contains(&"Round 2"));
        assert_eq!(texts.iter().filter(|t| **t == "P Signal").count(), 1);
        assert_eq!(s.transform_depth(), 0);
    }

    #[test]
    fn absent_rows_leave_gaps() {
        // Spreadsheet row 140 is the first signal of every series.
        let table = two_round_table(150, Some(140));
        let config = ChartConfig {
            draw_labels: false,
            ..ChartConfig::default()
        };
        let mut s = RecordingSurface::new();
        build_chart(&mut s, &table, &config).unwrap();
        assert_eq!(s.strokes().count(), 80);
    }

    #[test]
    fn split_reads_hidden_block_below() {
        let table = two_round_table(150, None);
        let config = ChartConfig {
            draw_labels: false,
            reveal_split: true,
            ..ChartConfig::default()
        };
        let rounds = extract_rounds(&table, &config).unwrap();
        assert!(rounds.iter().all(|r| r.plaintiff.hidden.is_some()));

        let mut s = RecordingSurface::new();
        build_chart(&mut s, &table, &config).unwrap();
        assert_eq!(s.strokes().count(), 200);
        assert_eq!(s.texts().filter(|t| *t == "Hidden").count(), 2);
    }

    #[test]
    fn bars_line_up_with_signal_labels() {
        let table = two_round_table(150, None);
        let config = ChartConfig {
            draw_labels: false,
            round_headers: false,
            ..ChartConfig::default()
        };
        let mut s = RecordingSurface::new();
        build_chart(&mut s, &table, &config).unwrap();

        let first_bar = *s.strokes().next().unwrap();
        let label_center_y = s
            .commands
            .iter()
            .find_map(|c| match c {
                crate::render::recording::DrawCommand::Text {
                    text, transform, ..
                } if text == "1" => Some(transform.apply(0.0, 0.0).1),
                _ => None,
            })
            .unwrap();
        let bar_center_y = first_bar.y as f32 + (first_bar.h + 1) as f32 / 2.0;
        assert!((label_center_y - bar_center_y).abs() <= 1.0);
    }
}
