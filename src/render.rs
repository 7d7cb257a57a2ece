//! HTML output using maud.

use crate::ReportOptions;
use crate::align::{Line, Marker, Span};
use crate::nav::NavLink;
use crate::table::{Cell, Row, Table};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::num::NonZeroUsize;
use tracing::debug;

pub const STYLESHEET: &str = "
table.diff {font-family:Courier; border:medium;}
.diff_header {background-color:#e0e0e0}
td.diff_header {text-align:right}
.diff_next {background-color:#c0c0c0}
.diff_add {background-color:#aaffaa}
.diff_chg {background-color:#ffff77}
.diff_sub {background-color:#ffaaaa}
";

/// Escape text for a table cell. Spaces become `&nbsp;` so runs of
/// whitespace survive.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            ' ' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
    out
}

fn span_markup(span: &Span) -> Markup {
    let text = PreEscaped(escape(&span.text));
    match span.marker {
        Marker::None => text,
        Marker::Added => html! { ins class="diff_add" { (text) } },
        Marker::Removed => html! { del class="diff_sub" { (text) } },
    }
}

/// Highlighted content of one side of a row; padding renders empty
pub fn line_markup(line: Option<&Line>) -> Markup {
    html! {
        @if let Some(line) = line {
            @for span in line.spans() {
                (span_markup(span))
            }
        }
    }
}

fn anchor_id(prefix: &str, anchor: usize) -> String {
    format!("{prefix}{anchor}")
}

fn nav_cell(link: Option<&NavLink>, prefix: &str) -> Markup {
    html! {
        @if let Some(link) = link {
            td class="diff_next" id=(anchor_id(prefix, link.anchor)) {
                a href={ "#" (anchor_id(prefix, link.target)) } { (link.label.as_str()) }
            }
        } @else {
            td class="diff_next" {}
        }
    }
}

fn side_cells(number: Option<NonZeroUsize>, content: Markup) -> Markup {
    html! {
        td class="diff_header" {
            @if let Some(number) = number {
                (number.get())
            }
        }
        td nowrap="nowrap" { (content) }
    }
}

fn row_markup(row: &Row, link: Option<&NavLink>, prefix: &str) -> Markup {
    let (old, new) = match row {
        Row::Lines { old, new } => (cell_parts(old), cell_parts(new)),
        Row::Separator(filler) => (
            (None, PreEscaped(escape(filler))),
            (None, PreEscaped(escape(filler))),
        ),
    };
    html! {
        tr {
            (side_cells(old.0, old.1))
            (nav_cell(link, prefix))
            (side_cells(new.0, new.1))
        }
    }
}

fn cell_parts(cell: &Cell) -> (Option<NonZeroUsize>, Markup) {
    (cell.number, line_markup(cell.line.as_ref()))
}

/// The diff table: old number, old text, navigation, new number, new text
pub fn table_markup(table: &Table, anchor_prefix: &str) -> Markup {
    debug!(rows = table.len(), "rendering diff table");
    html! {
        table class="diff" cellspacing="0" cellpadding="0" rules="groups" {
            @for _column in 0..5 {
                colgroup {}
            }
            tbody {
                @for (row, link) in table.rows().iter().zip(table.links()) {
                    (row_markup(row, link.as_ref(), anchor_prefix))
                }
            }
        }
    }
}

/// A standalone page around [`table_markup`] with the stylesheet inlined
pub fn document_markup(table: &Table, options: &ReportOptions) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                title { (options.title) }
                meta charset="utf-8";
                style { (PreEscaped(STYLESHEET)) }
            }
            body {
                (table_markup(table, &options.anchor_prefix))
            }
        }
    }
}
