//! Folding diff operations into two row-aligned columns.
//!
//! Each op's text is cut into pieces (see [`wrap`]). The first piece of an op
//! extends the side's open row, since the previous op may have stopped in
//! the middle of a line; every later piece closes the open row and starts a
//! new one. Deletions only touch the old column and insertions only the new
//! one, so the columns drift apart inside a change block. Every equality
//! first pads the shorter column with absent rows, which brings them back in
//! step.

pub mod wrap;

use crate::context::OmitRange;
use crate::ops::{DiffOp, OpKind};
use crate::text;
use error_set::error_set;
use std::num::NonZeroUsize;
use tracing::{debug, trace};

error_set! {
    /// Errors from aligning rows
    AlignError := {
        /// The two columns ended with different row counts. Final padding
        /// rules this out in [`Aligner::finish`], which asserts it in debug
        /// builds; the variant stays part of the `align` signature.
        #[display("Columns out of step: {old} old rows, {new} new rows")]
        Misaligned { old: usize, new: usize },
    }
}

/// Change highlight of a span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    Added,
    Removed,
}

impl From<OpKind> for Marker {
    fn from(kind: OpKind) -> Self {
        match kind {
            OpKind::Equal => Marker::None,
            OpKind::Insert => Marker::Added,
            OpKind::Delete => Marker::Removed,
        }
    }
}

/// A run of row text with one highlight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub marker: Marker,
    pub text: String,
}

/// One side of a rendered row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    plain: String,
    spans: Vec<Span>,
}

impl Line {
    /// The row text without highlighting
    pub fn plain(&self) -> &str {
        &self.plain
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Width in chars
    pub fn width(&self) -> usize {
        self.plain.chars().count()
    }

    /// Whether any span is highlighted as added or removed
    pub fn has_changes(&self) -> bool {
        self.spans.iter().any(|span| span.marker != Marker::None)
    }

    fn push(&mut self, marker: Marker, text: &str) {
        self.plain.push_str(text);
        if text.is_empty() && marker == Marker::None {
            return;
        }
        self.spans.push(Span {
            marker,
            text: text.to_owned(),
        });
    }

    /// Finish the row. An empty highlighted span only matters on an
    /// otherwise empty row, where it is what marks the row as changed.
    fn closed(mut self) -> Self {
        if !self.plain.is_empty() {
            self.spans.retain(|span| !span.text.is_empty());
        }
        self
    }
}

/// A column of rows; `None` is a padding row
pub type Column = Vec<Option<Line>>;

/// Output of the alignment pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aligned {
    pub old: Column,
    pub new: Column,
    /// Unchanged runs to collapse, in discovery order
    pub omitted: Vec<OmitRange>,
}

/// Align `ops` into two columns of equal length.
///
/// `wrap` cuts rows at that many chars. Unless `full_context` is set, long
/// unchanged runs are recorded in [`Aligned::omitted`].
pub fn align(
    ops: &[DiffOp],
    wrap: Option<NonZeroUsize>,
    full_context: bool,
) -> Result<Aligned, AlignError> {
    ops.iter()
        .fold(Aligner::new(wrap, full_context), Aligner::push)
        .finish()
}

/// Incremental form of [`align`]
#[derive(Debug, Clone)]
pub struct Aligner {
    wrap: Option<NonZeroUsize>,
    full_context: bool,
    old: Column,
    new: Column,
    open_old: Line,
    open_new: Line,
    omitted: Vec<OmitRange>,
}

impl Aligner {
    pub fn new(wrap: Option<NonZeroUsize>, full_context: bool) -> Self {
        Self {
            wrap,
            full_context,
            old: Vec::new(),
            new: Vec::new(),
            open_old: Line::default(),
            open_new: Line::default(),
            omitted: Vec::new(),
        }
    }

    /// Fold one op into the columns
    #[must_use]
    pub fn push(mut self, op: &DiffOp) -> Self {
        let segments = text::segments(&op.text);
        if segments.is_empty() {
            return self;
        }

        let pieces = wrap::pieces(
            &segments,
            self.wrap,
            self.open_old.width(),
            self.open_new.width(),
        );
        let marker = Marker::from(op.kind);
        trace!(kind = ?op.kind, pieces = pieces.len(), "aligning op");

        match op.kind {
            OpKind::Delete => {
                let open = std::mem::take(&mut self.open_old);
                self.open_old = extend(&mut self.old, open, &pieces.old, marker);
            }
            OpKind::Insert => {
                let open = std::mem::take(&mut self.open_new);
                self.open_new = extend(&mut self.new, open, &pieces.new, marker);
            }
            OpKind::Equal => {
                pad(&mut self.old, &mut self.new);
                let open = std::mem::take(&mut self.open_old);
                self.open_old = extend(&mut self.old, open, &pieces.old, marker);
                let open = std::mem::take(&mut self.open_new);
                self.open_new = extend(&mut self.new, open, &pieces.new, marker);

                if !self.full_context
                    && let Some(range) = OmitRange::for_equal_run(self.old.len(), pieces.len())
                {
                    self.omitted.push(range);
                }
            }
        }
        self
    }

    /// Close the open rows and check the columns line up
    pub fn finish(self) -> Result<Aligned, AlignError> {
        let Aligner {
            mut old,
            mut new,
            open_old,
            open_new,
            omitted,
            ..
        } = self;

        // An empty open row only records that the text ended with a newline
        if !open_old.plain().is_empty() {
            old.push(Some(open_old.closed()));
        }
        if !open_new.plain().is_empty() {
            new.push(Some(open_new.closed()));
        }
        pad(&mut old, &mut new);
        debug_assert_eq!(old.len(), new.len(), "padding leaves the columns in step");

        debug!(rows = old.len(), omitted = omitted.len(), "aligned columns");
        Ok(Aligned { old, new, omitted })
    }
}

/// Append `pieces` to one column, returning the new open row
fn extend(column: &mut Column, mut open: Line, pieces: &[&str], marker: Marker) -> Line {
    let mut pieces = pieces.iter();
    if let Some(first) = pieces.next() {
        open.push(marker, first);
    }
    for piece in pieces {
        column.push(Some(std::mem::take(&mut open).closed()));
        open.push(marker, piece);
    }
    open
}

fn pad(old: &mut Column, new: &mut Column) {
    let len = old.len().max(new.len());
    old.resize(len, None);
    new.resize(len, None);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn plain(column: &Column) -> Vec<Option<&str>> {
        column
            .iter()
            .map(|row| row.as_ref().map(Line::plain))
            .collect()
    }

    fn full(ops: &[DiffOp]) -> Aligned {
        align(ops, None, true).unwrap()
    }

    #[test]
    fn replaced_line_shares_a_row() {
        let aligned = full(&[
            DiffOp::equal("a\n"),
            DiffOp::delete("b"),
            DiffOp::insert("x"),
            DiffOp::equal("\nc\n"),
        ]);
        assert_eq!(plain(&aligned.old), vec![Some("a"), Some("b"), Some("c")]);
        assert_eq!(plain(&aligned.new), vec![Some("a"), Some("x"), Some("c")]);

        let removed = aligned.old[1].as_ref().unwrap();
        assert_eq!(
            removed.spans(),
            &[Span {
                marker: Marker::Removed,
                text: "b".to_string()
            }]
        );
        assert!(!aligned.old[0].as_ref().unwrap().has_changes());
    }

    #[test]
    fn identical_text_has_no_markers() {
        let aligned = full(&[DiffOp::equal("same\ntext\n")]);
        assert_eq!(plain(&aligned.old), vec![Some("same"), Some("text")]);
        assert_eq!(aligned.old, aligned.new);
        assert!(aligned.old.iter().flatten().all(|line| !line.has_changes()));
    }

    #[test]
    fn insertion_into_empty_text() {
        let aligned = full(&[DiffOp::insert("hello\n")]);
        assert_eq!(plain(&aligned.old), vec![None]);
        assert_eq!(plain(&aligned.new), vec![Some("hello")]);
        assert!(aligned.new[0].as_ref().unwrap().has_changes());
    }

    #[test]
    fn no_ops_no_rows() {
        let aligned = full(&[]);
        assert!(aligned.old.is_empty());
        assert!(aligned.new.is_empty());
    }

    #[test]
    fn empty_op_is_ignored() {
        let aligned = full(&[DiffOp::equal("a\n"), DiffOp::delete(""), DiffOp::equal("b")]);
        assert_eq!(plain(&aligned.old), vec![Some("a"), Some("b")]);
    }

    #[test]
    fn uneven_blocks_are_padded_at_next_equality() {
        let aligned = full(&[
            DiffOp::delete("p\nq\nr\n"),
            DiffOp::insert("s\n"),
            DiffOp::equal("end\n"),
        ]);
        assert_eq!(
            plain(&aligned.old),
            vec![Some("p"), Some("q"), Some("r"), Some("end")]
        );
        assert_eq!(
            plain(&aligned.new),
            vec![Some("s"), None, None, Some("end")]
        );
    }

    #[test]
    fn intra_line_edit_stays_on_one_row() {
        let aligned = full(&[
            DiffOp::equal("a"),
            DiffOp::insert("X"),
            DiffOp::equal("bc"),
        ]);
        assert_eq!(plain(&aligned.old), vec![Some("abc")]);
        assert_eq!(plain(&aligned.new), vec![Some("aXbc")]);

        let markers: Vec<Marker> = aligned.new[0]
            .as_ref()
            .unwrap()
            .spans()
            .iter()
            .map(|span| span.marker)
            .collect();
        assert_eq!(markers, vec![Marker::None, Marker::Added, Marker::None]);
    }

    #[test]
    fn inserted_blank_line_keeps_its_marker() {
        let aligned = full(&[DiffOp::equal("a\n"), DiffOp::insert("\n"), DiffOp::equal("b\n")]);
        assert_eq!(plain(&aligned.old), vec![Some("a"), None, Some("b")]);
        assert_eq!(plain(&aligned.new), vec![Some("a"), Some(""), Some("b")]);
        assert!(aligned.new[1].as_ref().unwrap().has_changes());
        assert!(!aligned.new[2].as_ref().unwrap().has_changes());
    }

    #[test]
    fn empty_edit_piece_does_not_mark_following_text() {
        // The deletion leaves an empty removed span in the open row
        let aligned = full(&[DiffOp::delete("x\n"), DiffOp::equal("y\n")]);
        assert_eq!(plain(&aligned.old), vec![Some("x"), Some("y")]);
        assert_eq!(plain(&aligned.new), vec![None, Some("y")]);
        assert!(!aligned.old[1].as_ref().unwrap().has_changes());
        assert_eq!(aligned.old[1], aligned.new[1]);
    }

    #[test]
    fn trailing_change_block_is_padded() {
        let aligned = full(&[DiffOp::equal("a\n"), DiffOp::delete("b\nc\nd\n")]);
        assert_eq!(
            plain(&aligned.old),
            vec![Some("a"), Some("b"), Some("c"), Some("d")]
        );
        assert_eq!(plain(&aligned.new), vec![Some("a"), None, None, None]);
    }

    #[test]
    fn wrapped_rows_stay_aligned() {
        let wrap = NonZeroUsize::new(4);
        let aligned = align(
            &[
                DiffOp::equal("ab"),
                DiffOp::insert("XYZ"),
                DiffOp::equal("cdef"),
            ],
            wrap,
            true,
        )
        .unwrap();
        assert_eq!(
            plain(&aligned.old),
            vec![None, Some("abcd"), Some("ef")]
        );
        assert_eq!(
            plain(&aligned.new),
            vec![Some("abXY"), Some("Zcde"), Some("f")]
        );
    }

    #[test]
    fn long_equal_run_is_recorded_for_collapsing() {
        let ops = [
            DiffOp::delete("x\n"),
            DiffOp::equal("1\n2\n3\n4\n5\n6\n7\n8\n"),
            DiffOp::insert("y"),
        ];
        let aligned = align(&ops, None, false).unwrap();
        assert_eq!(aligned.omitted, vec![OmitRange { start: 4, end: 7 }]);
        assert_eq!(aligned.old.len(), 10);

        let full = align(&ops, None, true).unwrap();
        assert!(full.omitted.is_empty());
    }

    #[test]
    fn short_equal_run_is_kept() {
        let aligned = align(&[DiffOp::equal("1\n2\n3\n4\n")], None, false).unwrap();
        assert!(aligned.omitted.is_empty());
    }
}
