//! Collapsing long unchanged runs into a single separator row.

use std::num::NonZeroUsize;
use tracing::debug;

/// Unchanged runs of more rows than this are collapsed
pub const COLLAPSE_AFTER: usize = 5;

/// Separator width when rows are not wrapped
pub const SEPARATOR_WIDTH: usize = 20;

/// Rows `start..end` of a table, to be replaced by one separator row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OmitRange {
    pub start: usize,
    pub end: usize,
}

impl OmitRange {
    /// Range to hide for an unchanged run of `pieces` rows.
    ///
    /// `finalized` is the number of closed rows once the run is aligned. The
    /// run's last row is still open at that point, so the run covers
    /// `finalized + 1 - pieces..=finalized`. The first three rows and the last
    /// three (open row included) stay visible.
    pub fn for_equal_run(finalized: usize, pieces: usize) -> Option<Self> {
        (pieces > COLLAPSE_AFTER).then(|| OmitRange {
            start: (finalized + 4).saturating_sub(pieces),
            end: finalized.saturating_sub(2),
        })
    }
}

/// The filler shown in place of a collapsed run
pub fn separator(wrap: Option<NonZeroUsize>) -> String {
    "~".repeat(wrap.map_or(SEPARATOR_WIDTH, NonZeroUsize::get))
}

/// Replace every range in `ranges` with one row from `separator`.
///
/// Ranges are applied last to first so earlier indices stay valid.
pub fn collapse<T>(rows: &mut Vec<T>, ranges: &[OmitRange], mut separator: impl FnMut() -> T) {
    for range in ranges.iter().rev() {
        let end = range.end.min(rows.len());
        let start = range.start.min(end);
        rows.splice(start..end, std::iter::once(separator()));
    }
    if !ranges.is_empty() {
        debug!(ranges = ranges.len(), rows = rows.len(), "collapsed unchanged runs");
    }
}
