//! Semantic cleanup of character-level edit scripts.
//!
//! Raw character diffs are minimal but hard to read: two sentences that share
//! a handful of letters come out as dozens of one-char edits. The cleanup
//! folds every equality that is no longer than the edits on both of its sides
//! into those edits, then merges each run of edits into one delete followed
//! by one insert with their common prefix and suffix moved back into the
//! surrounding equalities. Finally every edit sitting alone between two
//! equalities slides sideways to the most natural boundary (a blank line, a
//! line break, the end of a sentence or word) without changing what it
//! deletes or inserts.

use crate::ops::{DiffOp, OpKind};

/// Chars inserted and deleted on one side of an equality
#[derive(Debug, Clone, Copy, Default)]
struct EditLens {
    inserted: usize,
    deleted: usize,
}

impl EditLens {
    fn add(&mut self, kind: OpKind, len: usize) {
        match kind {
            OpKind::Insert => self.inserted += len,
            OpKind::Delete => self.deleted += len,
            OpKind::Equal => {}
        }
    }

    fn max(self) -> usize {
        self.inserted.max(self.deleted)
    }
}

/// Eliminate semantically trivial equalities, [`merge`], then shift edits
/// onto boundaries with [`lossless`].
pub fn semantic(ops: &mut Vec<DiffOp>) {
    let mut changed = false;
    // Indices of equalities that are still candidates
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<usize> = None;
    let mut before = EditLens::default();
    let mut after = EditLens::default();
    let mut pointer = 0;

    while pointer < ops.len() {
        let op = &ops[pointer];
        if op.kind == OpKind::Equal {
            equalities.push(pointer);
            before = after;
            after = EditLens::default();
            last_equality = Some(op.len());
            pointer += 1;
            continue;
        }

        after.add(op.kind, op.len());
        if let Some(len) = last_equality
            && len > 0
            && len <= before.max()
            && len <= after.max()
            && let Some(&index) = equalities.last()
        {
            let text = std::mem::take(&mut ops[index].text);
            ops[index] = DiffOp::insert(text.clone());
            ops.insert(index, DiffOp::delete(text));

            // The equality before this one may have become trivial too
            equalities.pop();
            equalities.pop();
            pointer = equalities.last().map_or(0, |&i| i + 1);
            before = EditLens::default();
            after = EditLens::default();
            last_equality = None;
            changed = true;
            continue;
        }
        pointer += 1;
    }

    if changed {
        merge(ops);
    }
    lossless(ops);
}

/// Slide each single edit surrounded by equalities to the position with the
/// best [`boundary_score`] on both ends.
///
/// `The c<ins>ow and the c</ins>at.` becomes `The <ins>cow and the </ins>cat.`
pub fn lossless(ops: &mut Vec<DiffOp>) {
    let mut pointer = 1;
    while pointer + 1 < ops.len() {
        if ops[pointer - 1].kind != OpKind::Equal
            || ops[pointer].kind == OpKind::Equal
            || ops[pointer + 1].kind != OpKind::Equal
        {
            pointer += 1;
            continue;
        }

        let mut before = ops[pointer - 1].text.clone();
        let mut edit = ops[pointer].text.clone();
        let mut after = ops[pointer + 1].text.clone();

        // Start from the leftmost position
        let suffix = common_suffix(&before, &edit);
        if suffix > 0 {
            let common = edit[edit.len() - suffix..].to_owned();
            before.truncate(before.len() - suffix);
            edit.truncate(edit.len() - suffix);
            edit.insert_str(0, &common);
            after.insert_str(0, &common);
        }

        let mut best_score = boundary_score(&before, &edit) + boundary_score(&edit, &after);
        let mut best = (before.clone(), edit.clone(), after.clone());
        while let Some(c) = edit.chars().next().filter(|&c| after.starts_with(c)) {
            before.push(c);
            edit.remove(0);
            edit.push(c);
            after.remove(0);

            let score = boundary_score(&before, &edit) + boundary_score(&edit, &after);
            // Ties go right
            if score >= best_score {
                best_score = score;
                best = (before.clone(), edit.clone(), after.clone());
            }
        }

        let (best_before, best_edit, best_after) = best;
        if ops[pointer - 1].text != best_before {
            ops[pointer].text = best_edit;
            let mut removed = 0;
            if best_after.is_empty() {
                ops.remove(pointer + 1);
                removed += 1;
            } else {
                ops[pointer + 1].text = best_after;
            }
            if best_before.is_empty() {
                ops.remove(pointer - 1);
                removed += 1;
            } else {
                ops[pointer - 1].text = best_before;
            }
            pointer = (pointer + 1).saturating_sub(removed).max(1);
        } else {
            pointer += 1;
        }
    }
}

/// How good a place the seam between `one` and `two` is for an edit to start
/// or end, from 0 (inside a word) to 6 (edge of the text).
fn boundary_score(one: &str, two: &str) -> u8 {
    let (Some(last), Some(first)) = (one.chars().next_back(), two.chars().next()) else {
        return 6;
    };

    let non_alphanumeric_1 = !last.is_alphanumeric();
    let non_alphanumeric_2 = !first.is_alphanumeric();
    let whitespace_1 = non_alphanumeric_1 && last.is_whitespace();
    let whitespace_2 = non_alphanumeric_2 && first.is_whitespace();
    let line_break_1 = whitespace_1 && matches!(last, '\r' | '\n');
    let line_break_2 = whitespace_2 && matches!(first, '\r' | '\n');
    let blank_line_1 = line_break_1 && ends_with_blank_line(one);
    let blank_line_2 = line_break_2 && starts_with_blank_line(two);

    if blank_line_1 || blank_line_2 {
        5
    } else if line_break_1 || line_break_2 {
        4
    } else if non_alphanumeric_1 && !whitespace_1 && whitespace_2 {
        // End of a sentence
        3
    } else if whitespace_1 || whitespace_2 {
        2
    } else if non_alphanumeric_1 || non_alphanumeric_2 {
        1
    } else {
        0
    }
}

fn ends_with_blank_line(text: &str) -> bool {
    text.ends_with("\n\n") || text.ends_with("\n\r\n")
}

fn starts_with_blank_line(text: &str) -> bool {
    let text = text.strip_prefix('\r').unwrap_or(text);
    let Some(rest) = text.strip_prefix('\n') else {
        return false;
    };
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    rest.starts_with('\n')
}

/// Normalize an edit script.
///
/// Adjacent equalities are joined, every run of edits between two equalities
/// becomes at most one delete followed by one insert, text common to the
/// start or end of both edits moves into the neighbouring equality, and empty
/// operations disappear. A single edit that can slide over a whole
/// neighbouring equality (`a<ins>ba</ins>c` is `<ins>ab</ins>ac`) is slid so
/// the equalities join, and the script is normalized again.
pub fn merge(ops: &mut Vec<DiffOp>) {
    merge_runs(ops);
    while shift_single_edits(ops) {
        merge_runs(ops);
    }
}

fn merge_runs(ops: &mut Vec<DiffOp>) {
    let mut merged: Vec<DiffOp> = Vec::with_capacity(ops.len());
    let mut deleted = String::new();
    let mut inserted = String::new();

    for op in ops.drain(..) {
        match op.kind {
            OpKind::Delete => deleted.push_str(&op.text),
            OpKind::Insert => inserted.push_str(&op.text),
            OpKind::Equal if op.text.is_empty() => {}
            OpKind::Equal => {
                let mut equal = op.text;
                flush_edits(&mut merged, &mut deleted, &mut inserted, &mut equal);
                push_equal(&mut merged, &equal);
            }
        }
    }

    let mut tail = String::new();
    flush_edits(&mut merged, &mut deleted, &mut inserted, &mut tail);
    push_equal(&mut merged, &tail);

    *ops = merged;
}

/// Slide single edits over an entire neighbouring equality. Returns whether
/// anything moved.
fn shift_single_edits(ops: &mut Vec<DiffOp>) -> bool {
    let mut changed = false;
    let mut pointer = 1;
    while pointer + 1 < ops.len() {
        if ops[pointer - 1].kind == OpKind::Equal && ops[pointer + 1].kind == OpKind::Equal {
            if ops[pointer].text.ends_with(ops[pointer - 1].text.as_str()) {
                // a<ins>ba</ins>c -> <ins>ab</ins>ac
                let previous = ops.remove(pointer - 1).text;
                let edit = &mut ops[pointer - 1].text;
                edit.truncate(edit.len() - previous.len());
                edit.insert_str(0, &previous);
                ops[pointer].text.insert_str(0, &previous);
                changed = true;
            } else if ops[pointer].text.starts_with(ops[pointer + 1].text.as_str()) {
                // a<ins>cb</ins>c -> ac<ins>bc</ins>
                let next = ops.remove(pointer + 1).text;
                ops[pointer - 1].text.push_str(&next);
                let edit = &mut ops[pointer].text;
                edit.replace_range(..next.len(), "");
                edit.push_str(&next);
                changed = true;
            }
        }
        pointer += 1;
    }
    changed
}

fn flush_edits(
    merged: &mut Vec<DiffOp>,
    deleted: &mut String,
    inserted: &mut String,
    next_equal: &mut String,
) {
    if !deleted.is_empty() && !inserted.is_empty() {
        let prefix = common_prefix(deleted, inserted);
        if prefix > 0 {
            push_equal(merged, &deleted[..prefix]);
            deleted.drain(..prefix);
            inserted.drain(..prefix);
        }

        let suffix = common_suffix(deleted, inserted);
        if suffix > 0 {
            next_equal.insert_str(0, &inserted[inserted.len() - suffix..]);
            deleted.truncate(deleted.len() - suffix);
            inserted.truncate(inserted.len() - suffix);
        }
    }

    if !deleted.is_empty() {
        merged.push(DiffOp::delete(std::mem::take(deleted)));
    }
    if !inserted.is_empty() {
        merged.push(DiffOp::insert(std::mem::take(inserted)));
    }
}

fn push_equal(merged: &mut Vec<DiffOp>, text: &str) {
    if text.is_empty() {
        return;
    }
    match merged.last_mut() {
        Some(last) if last.kind == OpKind::Equal => last.text.push_str(text),
        _ => merged.push(DiffOp::equal(text)),
    }
}

/// Byte length of the longest common prefix
fn common_prefix(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map_or_else(|| a.len().min(b.len()), |((i, _), _)| i)
}

/// Byte length of the longest common suffix
fn common_suffix(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum()
}
