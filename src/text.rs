//! Line splitting shared by the aligner and the line number mapper.

/// Split `text` on `\n`, `\r\n` and lone `\r`.
///
/// A terminator at the very end does not open an empty final line, so
/// `"a\nb\n"` gives `["a", "b"]` and `""` gives nothing.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(['\n', '\r']) {
            Some(end) => {
                lines.push(&rest[..end]);
                let skip = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + skip..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}

/// Whether `text` ends with a line terminator
pub fn ends_with_newline(text: &str) -> bool {
    text.ends_with(['\n', '\r'])
}

/// Split `text` into segments, keeping a trailing terminator as one empty
/// final segment.
///
/// `"a\n"` gives `["a", ""]`: the empty segment is where the next text
/// continues.
pub fn segments(text: &str) -> Vec<&str> {
    let mut lines = split_lines(text);
    if ends_with_newline(text) {
        lines.push("");
    }
    lines
}

/// The source lines of one side of the diff, read front to back by the line
/// number mapper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginalLines {
    lines: Vec<String>,
}

impl OriginalLines {
    pub fn new(text: &str) -> Self {
        Self {
            lines: segments(text).into_iter().map(str::to_owned).collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
