//! Mapping aligned rows back to source line numbers.
//!
//! Rows and source lines are matched greedily with a cursor that only moves
//! forward. A row takes the cursor line's number when its text is that line,
//! or a non-empty prefix of it (the first piece of a wrapped line). Padding
//! rows and rows that match nothing get no number and leave the cursor where
//! it is.

use crate::text::OriginalLines;
use std::num::NonZeroUsize;

/// Assign 1-based line numbers to `rows`; `None` rows are padding.
pub fn line_numbers<'a, I>(original: &OriginalLines, rows: I) -> Vec<Option<NonZeroUsize>>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut cursor = 0;
    rows.into_iter()
        .map(|row| {
            let row = row?;
            let source = original.get(cursor)?;
            if row == source || (!row.is_empty() && source.starts_with(row)) {
                cursor += 1;
                Some(NonZeroUsize::MIN.saturating_add(cursor - 1))
            } else {
                None
            }
        })
        .collect()
}
