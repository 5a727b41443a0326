pub mod extract;

use std::io::Read;
use std::path::Path;

use compact_str::CompactString;

use crate::error::{ChartError, Result};

pub use extract::{extract, ExtractionRequest, MATERIALITY_THRESHOLD, SUM_TOLERANCE};

/// One bar's worth of data: bucket shares summing to 1, or nothing recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    /// No observations for this row, e.g. a round that was never reached.
    Absent,
    Observed(Vec<f64>),
}

impl Distribution {
    pub fn is_absent(&self) -> bool {
        matches!(self, Distribution::Absent)
    }

    pub fn values(&self) -> Option<&[f64]> {
        match self {
            Distribution::Absent => None,
            Distribution::Observed(v) => Some(v),
        }
    }
}

/// Distributions read from one contiguous table block, in row order.
pub type DistributionSet = Vec<Distribution>;

/// A header row plus body rows of raw cell text.
///
/// Body row `i` is spreadsheet row `i + 2`; column `j` is spreadsheet
/// column `j + 1`. Cells are kept as text and parsed when read.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<CompactString>,
    rows: Vec<Vec<CompactString>>,
}

impl Table {
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        let table = Self::from_csv(reader)?;
        tracing::debug!(
            "Loaded {} ({} columns, {} body rows)",
            path.display(),
            table.headers.len(),
            table.rows.len()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers()?.iter().map(CompactString::new).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(CompactString::new).collect());
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[CompactString] {
        &self.headers
    }

    /// Number of rows after the header.
    pub fn body_len(&self) -> usize {
        self.rows.len()
    }

    /// Raw text of a body cell (0-based); `None` past the end of the row.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|c| c.as_str())
    }

    /// Numeric value of a body cell (0-based). Missing and blank cells are
    /// `None`; anything else must parse as a number.
    pub fn number(&self, row: usize, column: usize) -> Result<Option<f64>> {
        let Some(raw) = self.cell(row, column) else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ChartError::InvalidCell {
                row: row + 2,
                column: column + 1,
                value: raw.to_string(),
            })
    }
}
