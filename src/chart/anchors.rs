use crate::error::{ChartError, Result};

/// Top-left value cell of a block, in 1-based spreadsheet coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub row: usize,
    pub column: usize,
}

const fn at(row: usize, column: usize) -> Anchor {
    Anchor { row, column }
}

/// Where one round's plaintiff and defendant blocks start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundAnchors {
    pub plaintiff: Anchor,
    pub defendant: Anchor,
}

/// Simulation reports with two rounds put every round's blocks side by side
/// on one band of rows.
const TWO_ROUNDS: [RoundAnchors; 2] = [
    RoundAnchors {
        plaintiff: at(140, 85),
        defendant: at(140, 91),
    },
    RoundAnchors {
        plaintiff: at(140, 97),
        defendant: at(140, 103),
    },
];

/// Three-round reports have more columns per round and start further down.
const THREE_ROUNDS: [RoundAnchors; 3] = [
    RoundAnchors {
        plaintiff: at(152, 85),
        defendant: at(152, 91),
    },
    RoundAnchors {
        plaintiff: at(152, 97),
        defendant: at(152, 103),
    },
    RoundAnchors {
        plaintiff: at(152, 109),
        defendant: at(152, 115),
    },
];

impl RoundAnchors {
    /// Anchor table for a dataset with `rounds` rounds, earliest first.
    pub fn for_rounds(rounds: usize) -> Result<&'static [RoundAnchors]> {
        match rounds {
            2 => Ok(&TWO_ROUNDS),
            3 => Ok(&THREE_ROUNDS),
            other => Err(ChartError::UnsupportedRoundCount(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_length_matches_round_count() {
        assert_eq!(RoundAnchors::for_rounds(2).unwrap().len(), 2);
        assert_eq!(RoundAnchors::for_rounds(3).unwrap().len(), 3);
    }

    #[test]
    fn other_round_counts_are_rejected() {
        for n in [0, 1, 4] {
            assert!(matches!(
                RoundAnchors::for_rounds(n),
                Err(ChartError::UnsupportedRoundCount(m)) if m == n
            ));
        }
    }

    #[test]
    fn first_round_starts_at_the_report_anchor() {
        let rounds = RoundAnchors::for_rounds(2).unwrap();
        assert_eq!(rounds[0].plaintiff, Anchor { row: 140, column: 85 });
    }
}
