//! Cutting op text into per-row pieces.

use std::num::NonZeroUsize;

/// Row pieces for one op, one list per side.
///
/// Both lists always have the same length; the first piece of each side
/// continues that side's open row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pieces<'a> {
    pub old: Vec<&'a str>,
    pub new: Vec<&'a str>,
}

impl Pieces<'_> {
    pub fn len(&self) -> usize {
        self.old.len()
    }

    pub fn is_empty(&self) -> bool {
        self.old.is_empty()
    }
}

/// Cut `segments` into row pieces.
///
/// Without a wrap width every segment is one piece. With one, the first
/// segment fills what is left of each side's open row (`open_old` and
/// `open_new` chars already used) before wrapping, so the two sides can
/// disagree on the piece count; the shorter side gets empty pieces. Later
/// segments start fresh rows and wrap the same way on both sides.
pub fn pieces<'a>(
    segments: &[&'a str],
    wrap: Option<NonZeroUsize>,
    open_old: usize,
    open_new: usize,
) -> Pieces<'a> {
    let Some(width) = wrap.map(NonZeroUsize::get) else {
        return Pieces {
            old: segments.to_vec(),
            new: segments.to_vec(),
        };
    };

    let mut old = Vec::new();
    let mut new = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        if i == 0 {
            let mut first_old = continue_row(segment, width, open_old);
            let mut first_new = continue_row(segment, width, open_new);
            let count = first_old.len().max(first_new.len());
            first_old.resize(count, "");
            first_new.resize(count, "");
            old.extend(first_old);
            new.extend(first_new);
        } else {
            let chunks = chunk(segment, width);
            old.extend(&chunks);
            new.extend(chunks);
        }
    }
    Pieces { old, new }
}

/// Cut `segment` so its head fills a row that already has `used` chars
fn continue_row(segment: &str, width: usize, used: usize) -> Vec<&str> {
    let (head, rest) = split_at_char(segment, width.saturating_sub(used));
    let mut out = vec![head];
    if !rest.is_empty() {
        out.extend(chunk(rest, width));
    }
    out
}

/// Cut `text` into pieces of at most `width` chars; empty text is one empty
/// piece
pub fn chunk(text: &str, width: usize) -> Vec<&str> {
    if text.is_empty() {
        return vec![""];
    }
    let mut out = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let (head, tail) = split_at_char(rest, width.max(1));
        out.push(head);
        rest = tail;
    }
    out
}

fn split_at_char(text: &str, chars: usize) -> (&str, &str) {
    let at = text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i);
    text.split_at(at)
}
