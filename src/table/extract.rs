use super::{Distribution, DistributionSet, Table};
use crate::error::{ChartError, Result};

/// Observation counts below this mean the row was never really reached.
pub const MATERIALITY_THRESHOLD: f64 = 0.005;

/// Allowed distance of a row's sum from 1.0.
pub const SUM_TOLERANCE: f64 = 0.01;

/// A block of cells to read, in 1-based spreadsheet coordinates where row 1
/// is the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub first_row: usize,
    pub first_column: usize,
    pub num_rows: usize,
    pub num_columns: usize,
    /// Column holding each row's observation count.
    pub observation_column: usize,
}

impl ExtractionRequest {
    /// Request whose observation count sits just left of the first value.
    pub fn new(first_row: usize, first_column: usize, num_rows: usize, num_columns: usize) -> Self {
        Self {
            first_row,
            first_column,
            num_rows,
            num_columns,
            observation_column: first_column.saturating_sub(1),
        }
    }

    pub fn with_observation_column(mut self, column: usize) -> Self {
        self.observation_column = column;
        self
    }

    /// 0-based body row and column of the block's first value cell.
    pub fn body_origin(&self) -> Result<(usize, usize)> {
        if self.first_row < 2 || self.first_column < 1 {
            return Err(ChartError::InvalidCoordinate {
                row: self.first_row,
                column: self.first_column,
            });
        }
        Ok((self.first_row - 2, self.first_column - 1))
    }

    fn observation_index(&self) -> Result<usize> {
        if self.observation_column < 1 {
            return Err(ChartError::InvalidCoordinate {
                row: self.first_row,
                column: self.observation_column,
            });
        }
        Ok(self.observation_column - 1)
    }
}

/// Read `request.num_rows` distributions from `table`.
///
/// A row is [`Distribution::Absent`] when its observation count is blank or
/// below [`MATERIALITY_THRESHOLD`], or when any value cell is blank. Every
/// other row must hold finite, non-negative values summing to 1 within
/// [`SUM_TOLERANCE`].
pub fn extract(table: &Table, request: &ExtractionRequest) -> Result<DistributionSet> {
    let (body_row, body_column) = request.body_origin()?;
    let observation = request.observation_index()?;

    let needed = body_row + request.num_rows;
    if table.body_len() < needed {
        return Err(ChartError::RowNotFound {
            requested: needed,
            available: table.body_len(),
        });
    }

    let mut set = Vec::with_capacity(request.num_rows);
    for row in body_row..needed {
        let spreadsheet_row = row + 2;

        let reached = matches!(
            table.number(row, observation)?,
            Some(count) if count >= MATERIALITY_THRESHOLD
        );
        if !reached {
            tracing::debug!("Row {spreadsheet_row}: no observations, treating as absent");
            set.push(Distribution::Absent);
            continue;
        }

        let mut values = Vec::with_capacity(request.num_columns);
        for column in body_column..body_column + request.num_columns {
            match table.number(row, column)? {
                Some(v) => values.push(v),
                None => break,
            }
        }
        if values.len() < request.num_columns {
            tracing::debug!("Row {spreadsheet_row}: blank value cell, treating as absent");
            set.push(Distribution::Absent);
            continue;
        }

        let sum: f64 = values.iter().sum();
        let in_range = values.iter().all(|v| v.is_finite() && *v >= 0.0);
        let sums_to_one = (sum - 1.0).abs() <= SUM_TOLERANCE;
        if !in_range || !sums_to_one {
            return Err(ChartError::MalformedDistribution {
                row: spreadsheet_row,
                sum,
            });
        }
        set.push(Distribution::Observed(values));
    }

    Ok(set)
}
