//! "Next difference" links.
//!
//! Row 0 and the first row of every changed region form a ring: each links
//! to the next, and the last one links back to row 0.

use crate::render;
use crate::table::Row;

/// How a row compares across the two sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Unchanged,
    Changed,
    /// Both sides blank; belongs to whatever region it sits in
    Boundary,
}

pub fn classify(row: &Row) -> Class {
    let Some((old, new)) = row.cells() else {
        return Class::Boundary;
    };
    let old = render::line_markup(old.line.as_ref()).into_string();
    let new = render::line_markup(new.line.as_ref()).into_string();
    if old.is_empty() && new.is_empty() {
        Class::Boundary
    } else if old != new {
        Class::Changed
    } else {
        Class::Unchanged
    }
}

/// Rows where a changed region begins
pub fn group_starts(classes: &[Class]) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut previous = Class::Unchanged;
    for (i, &class) in classes.iter().enumerate() {
        let current = match class {
            Class::Boundary => previous,
            class => class,
        };
        if current == Class::Changed && previous != Class::Changed {
            starts.push(i);
        }
        previous = current;
    }
    starts
}

/// Link text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// Row 0, pointing at the first difference
    First,
    Next,
    /// Last difference, pointing back at row 0
    Top,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::First => "f",
            Label::Next => "n",
            Label::Top => "t",
        }
    }
}

/// A navigation cell: this row is anchor `anchor` and links to `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub anchor: usize,
    pub target: usize,
    pub label: Label,
}

/// Navigation cell for every row of `rows`
pub fn links(rows: &[Row]) -> Vec<Option<NavLink>> {
    let mut out = vec![None; rows.len()];
    if rows.is_empty() {
        return out;
    }

    let classes: Vec<Class> = rows.iter().map(classify).collect();
    let mut ring = vec![0];
    ring.extend(group_starts(&classes).into_iter().filter(|&row| row != 0));

    let last = ring.len() - 1;
    for (anchor, &row) in ring.iter().enumerate() {
        let label = if anchor == 0 {
            Label::First
        } else if anchor == last {
            Label::Top
        } else {
            Label::Next
        };
        out[row] = Some(NavLink {
            anchor,
            target: (anchor + 1) % ring.len(),
            label,
        });
    }
    out
}
