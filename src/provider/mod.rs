//! Diff providers turn two texts into a cleaned-up edit script.

pub mod cleanup;

use crate::ops::{DiffOp, OpKind};
use similar::{Algorithm, ChangeTag, TextDiff, TextDiffConfig};
use std::time::Duration;
use tracing::{debug, trace};

/// When both texts are longer than this many chars, lines are diffed first
/// and only the replaced blocks are diffed char by char.
pub const LINE_MODE_THRESHOLD: usize = 100;

/// Source of edit scripts for the report pipeline.
///
/// Implementations must return operations that reconstruct `old` from the
/// `Equal` and `Delete` texts and `new` from the `Equal` and `Insert` texts,
/// already merged into legible hunks.
pub trait DiffProvider {
    fn diff(&self, old: &str, new: &str) -> Vec<DiffOp>;
}

impl<F> DiffProvider for F
where
    F: Fn(&str, &str) -> Vec<DiffOp>,
{
    fn diff(&self, old: &str, new: &str) -> Vec<DiffOp> {
        self(old, new)
    }
}

/// Character-level Myers diff followed by semantic cleanup.
///
/// Long inputs go through a line-level pass first (see
/// [`LINE_MODE_THRESHOLD`]), which keeps hunks on whole lines and bounds the
/// char-level work to the blocks that actually changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharDiff {
    timeout: Option<Duration>,
}

impl CharDiff {
    /// Diff engine that gives up refining after `timeout`.
    ///
    /// A timed-out diff is still a valid edit script, just a coarser one.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl Default for CharDiff {
    fn default() -> Self {
        Self::new(Some(Duration::from_secs(1)))
    }
}

impl DiffProvider for CharDiff {
    fn diff(&self, old: &str, new: &str) -> Vec<DiffOp> {
        let line_mode = old.chars().count() > LINE_MODE_THRESHOLD
            && new.chars().count() > LINE_MODE_THRESHOLD;
        let mut ops = if line_mode {
            self.line_ops(old, new)
        } else {
            self.char_ops(old, new)
        };

        let raw = ops.len();
        cleanup::semantic(&mut ops);
        debug!(line_mode, raw, cleaned = ops.len(), "computed character diff");
        ops
    }
}

impl CharDiff {
    fn config(&self) -> TextDiffConfig {
        let mut config = TextDiff::configure();
        config.algorithm(Algorithm::Myers);
        if let Some(timeout) = self.timeout {
            config.timeout(timeout);
        }
        config
    }

    fn char_ops(&self, old: &str, new: &str) -> Vec<DiffOp> {
        collect_ops(&self.config().diff_chars(old, new))
    }

    /// Diff whole lines, then rediff each replaced block char by char
    fn line_ops(&self, old: &str, new: &str) -> Vec<DiffOp> {
        let mut lines = collect_ops(&self.config().diff_lines(old, new));
        cleanup::semantic(&mut lines);
        trace!(blocks = lines.len(), "line diff");

        let mut ops = Vec::with_capacity(lines.len());
        let mut deleted = String::new();
        let mut inserted = String::new();
        for op in lines {
            match op.kind {
                OpKind::Delete => deleted.push_str(&op.text),
                OpKind::Insert => inserted.push_str(&op.text),
                OpKind::Equal => {
                    self.refine(&mut ops, &mut deleted, &mut inserted);
                    ops.push(op);
                }
            }
        }
        self.refine(&mut ops, &mut deleted, &mut inserted);

        cleanup::merge(&mut ops);
        ops
    }

    /// Append a replaced block, char-diffed when it both deletes and inserts
    fn refine(&self, ops: &mut Vec<DiffOp>, deleted: &mut String, inserted: &mut String) {
        if !deleted.is_empty() && !inserted.is_empty() {
            ops.extend(self.char_ops(deleted, inserted));
            deleted.clear();
            inserted.clear();
            return;
        }
        if !deleted.is_empty() {
            ops.push(DiffOp::delete(std::mem::take(deleted)));
        }
        if !inserted.is_empty() {
            ops.push(DiffOp::insert(std::mem::take(inserted)));
        }
    }
}

/// Group consecutive changes with the same tag into ops
fn collect_ops<'a>(diff: &TextDiff<'a, 'a, 'a, str>) -> Vec<DiffOp> {
    let mut ops: Vec<DiffOp> = Vec::new();
    for change in diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => OpKind::Equal,
            ChangeTag::Delete => OpKind::Delete,
            ChangeTag::Insert => OpKind::Insert,
        };
        match ops.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(change.value()),
            _ => ops.push(DiffOp::new(kind, change.value())),
        }
    }
    ops
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ops::{new_text, old_text};
    use similar_asserts::assert_eq;

    #[test]
    fn identical_texts_are_one_equality() {
        let ops = CharDiff::default().diff("same\ntext\n", "same\ntext\n");
        assert_eq!(ops, vec![DiffOp::equal("same\ntext\n")]);
    }

    #[test]
    fn empty_old_is_one_insertion() {
        let ops = CharDiff::default().diff("", "hello\n");
        assert_eq!(ops, vec![DiffOp::insert("hello\n")]);
    }

    #[test]
    fn single_line_replacement() {
        let ops = CharDiff::default().diff("a\nb\nc\n", "a\nx\nc\n");
        assert_eq!(
            ops,
            vec![
                DiffOp::equal("a\n"),
                DiffOp::delete("b"),
                DiffOp::insert("x"),
                DiffOp::equal("\nc\n"),
            ]
        );
    }

    #[test]
    fn reconstructs_inputs() {
        let old = "The quick brown fox\njumps over\nthe lazy dog.\n";
        let new = "The quick red fox\nleaps over\nthe lazy dog!\nDone.\n";
        let ops = CharDiff::new(None).diff(old, new);
        assert_eq!(old_text(&ops), old);
        assert_eq!(new_text(&ops), new);
    }

    fn numbered(word: &str, lines: std::ops::RangeInclusive<u32>) -> String {
        lines.map(|i| format!("{word} {i}\n")).collect()
    }

    #[test]
    fn long_texts_change_inside_lines_only() {
        let old = numbered("alpha", 1..=20);
        let new = format!(
            "{}omega 10\n{}",
            numbered("alpha", 1..=9),
            numbered("alpha", 11..=20)
        );
        assert!(old.len() > LINE_MODE_THRESHOLD);

        let ops = CharDiff::default().diff(&old, &new);
        assert_eq!(old_text(&ops), old);
        assert_eq!(new_text(&ops), new);

        let first = ops.first().unwrap();
        let last = ops.last().unwrap();
        assert_eq!(first.kind, OpKind::Equal);
        assert!(first.text.starts_with(&numbered("alpha", 1..=9)));
        assert_eq!(last.kind, OpKind::Equal);
        assert!(last.text.ends_with(&numbered("alpha", 11..=20)));
        assert!(
            ops.iter()
                .filter(|op| op.kind != OpKind::Equal)
                .all(|op| !op.text.contains('\n')),
            "{ops:?}"
        );
    }

    #[test]
    fn long_texts_with_added_lines_insert_whole_lines() {
        let old = numbered("line", 1..=20);
        let new = format!("{}extra\n{}", numbered("line", 1..=10), numbered("line", 11..=20));
        let ops = CharDiff::default().diff(&old, &new);
        assert_eq!(
            ops,
            vec![
                DiffOp::equal(numbered("line", 1..=10)),
                DiffOp::insert("extra\n"),
                DiffOp::equal(numbered("line", 11..=20)),
            ]
        );
    }

    #[test]
    fn closures_are_providers() {
        let provider = |old: &str, _new: &str| vec![DiffOp::delete(old)];
        assert_eq!(provider.diff("gone", ""), vec![DiffOp::delete("gone")]);
    }
}
