//! The finished side-by-side view: aligned, numbered, collapsed and linked.

use crate::align::{self, AlignError, Column, Line};
use crate::context;
use crate::nav::{self, NavLink};
use crate::numbers::line_numbers;
use crate::ops::{self, DiffOp};
use crate::text::OriginalLines;
use crate::{ReportError, ReportOptions};
use std::num::NonZeroUsize;

/// One side of a table row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub number: Option<NonZeroUsize>,
    /// `None` on padding rows
    pub line: Option<Line>,
}

impl Cell {
    pub fn plain(&self) -> Option<&str> {
        self.line.as_ref().map(Line::plain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Lines { old: Cell, new: Cell },
    /// Stands in for a collapsed unchanged run
    Separator(String),
}

impl Row {
    pub fn cells(&self) -> Option<(&Cell, &Cell)> {
        match self {
            Row::Lines { old, new } => Some((old, new)),
            Row::Separator(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
    links: Vec<Option<NavLink>>,
}

impl Table {
    /// Build the view of `old` against `new` from a precomputed edit script
    pub fn from_ops(
        ops: &[DiffOp],
        old: &str,
        new: &str,
        options: &ReportOptions,
    ) -> Result<Self, AlignError> {
        let aligned = align::align(ops, options.wrap_column, options.full_context)?;
        let old_numbers = numbers_for(old, &aligned.old);
        let new_numbers = numbers_for(new, &aligned.new);

        let old_cells = aligned.old.into_iter().zip(old_numbers);
        let new_cells = aligned.new.into_iter().zip(new_numbers);
        let mut rows: Vec<Row> = old_cells
            .zip(new_cells)
            .map(|((old_line, old_number), (new_line, new_number))| Row::Lines {
                old: Cell {
                    number: old_number,
                    line: old_line,
                },
                new: Cell {
                    number: new_number,
                    line: new_line,
                },
            })
            .collect();

        if !options.full_context {
            let filler = context::separator(options.wrap_column);
            context::collapse(&mut rows, &aligned.omitted, || {
                Row::Separator(filler.clone())
            });
        }

        let links = nav::links(&rows);
        Ok(Self { rows, links })
    }

    /// Like [`Table::from_ops`], for edit scripts labelled with
    /// diff-match-patch codes
    pub fn from_codes<I, S>(
        codes: I,
        old: &str,
        new: &str,
        options: &ReportOptions,
    ) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = (i8, S)>,
        S: Into<String>,
    {
        let ops = ops::from_codes(codes)?;
        Ok(Self::from_ops(&ops, old, new, options)?)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Navigation cell of each row
    pub fn links(&self) -> &[Option<NavLink>] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any row shows an addition or removal
    pub fn has_changes(&self) -> bool {
        self.rows
            .iter()
            .filter_map(Row::cells)
            .flat_map(|(old, new)| [old, new])
            .filter_map(|cell| cell.line.as_ref())
            .any(Line::has_changes)
    }
}

fn numbers_for(text: &str, column: &Column) -> Vec<Option<NonZeroUsize>> {
    line_numbers(
        &OriginalLines::new(text),
        column.iter().map(|row| row.as_ref().map(Line::plain)),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::nav::Label;
    use similar_asserts::assert_eq;

    fn sides(table: &Table) -> Vec<(Option<usize>, Option<&str>, Option<usize>, Option<&str>)> {
        table
            .rows()
            .iter()
            .filter_map(Row::cells)
            .map(|(old, new)| {
                (
                    old.number.map(NonZeroUsize::get),
                    old.plain(),
                    new.number.map(NonZeroUsize::get),
                    new.plain(),
                )
            })
            .collect()
    }

    #[test]
    fn replaced_line_is_one_linked_row() {
        let table = Table::from_ops(
            &[
                DiffOp::equal("a\n"),
                DiffOp::delete("b"),
                DiffOp::insert("x"),
                DiffOp::equal("\nc\n"),
            ],
            "a\nb\nc\n",
            "a\nx\nc\n",
            &ReportOptions::default(),
        )
        .unwrap();

        assert_eq!(
            sides(&table),
            vec![
                (Some(1), Some("a"), Some(1), Some("a")),
                (Some(2), Some("b"), Some(2), Some("x")),
                (Some(3), Some("c"), Some(3), Some("c")),
            ]
        );
        let labels: Vec<Option<Label>> = table
            .links()
            .iter()
            .map(|link| link.as_ref().map(|link| link.label))
            .collect();
        assert_eq!(labels, vec![Some(Label::First), Some(Label::Top), None]);
        assert!(table.has_changes());
    }

    #[test]
    fn insertion_into_empty_text() {
        let table = Table::from_ops(
            &[DiffOp::insert("hello\n")],
            "",
            "hello\n",
            &ReportOptions::default(),
        )
        .unwrap();
        assert_eq!(sides(&table), vec![(None, None, Some(1), Some("hello"))]);
    }

    #[test]
    fn collapsed_run_becomes_one_separator() {
        let old: String = (1..=12).map(|i| format!("line {i}\n")).collect();
        let new = format!("first{}", old.strip_prefix("line 1").unwrap());
        let ops = [
            DiffOp::delete("line 1"),
            DiffOp::insert("first"),
            DiffOp::equal(old.strip_prefix("line 1").unwrap()),
        ];
        let options = ReportOptions {
            full_context: false,
            ..ReportOptions::default()
        };
        let table = Table::from_ops(&ops, &old, &new, &options).unwrap();

        // Changed line, two context rows, separator, two context rows. The
        // trailing empty open row is dropped.
        let separators: Vec<usize> = table
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| matches!(row, Row::Separator(_)))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(separators, vec![3]);
        assert_eq!(table.len(), 6);
        assert_eq!(
            table.rows()[3],
            Row::Separator("~".repeat(context::SEPARATOR_WIDTH))
        );

        let (old_cell, _) = table.rows()[4].cells().unwrap();
        assert_eq!(old_cell.plain(), Some("line 11"));
        assert_eq!(old_cell.number.map(NonZeroUsize::get), Some(11));
    }

    #[test]
    fn invalid_code_is_reported() {
        let result = Table::from_codes([(0, "a"), (3, "b")], "a", "ab", &ReportOptions::default());
        assert!(matches!(result, Err(ReportError::OpError(_))));
    }

    #[test]
    fn codes_build_the_same_table() {
        let from_codes = Table::from_codes(
            [(0, "a\n"), (-1, "b"), (1, "x"), (0, "\nc\n")],
            "a\nb\nc\n",
            "a\nx\nc\n",
            &ReportOptions::default(),
        )
        .unwrap();
        assert_eq!(from_codes.len(), 3);
    }
}
