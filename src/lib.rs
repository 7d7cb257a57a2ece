//! Side-by-side HTML diff reports.
//!
//! A [`DiffProvider`] turns two texts into an edit script. The script is
//! aligned into paired rows, numbered against the source lines, optionally
//! wrapped and collapsed, linked for "next difference" navigation and
//! rendered as an HTML table.
//!
//! ```
//! use side_diff::{DiffReport, ReportOptions};
//!
//! let report = DiffReport::new(ReportOptions::default());
//! let html = report.render_table("a\nb\nc\n", "a\nx\nc\n").unwrap();
//! assert!(html.contains(r#"<del class="diff_sub">b</del>"#));
//! assert!(html.contains(r#"<ins class="diff_add">x</ins>"#));
//! ```

use error_set::error_set;
use std::num::NonZeroUsize;
use std::time::Duration;
use tracing::debug;

pub mod align;
pub mod context;
pub mod nav;
pub mod numbers;
pub mod ops;
pub mod provider;
pub mod render;
pub mod table;
pub mod text;

pub use align::AlignError;
pub use ops::{DiffOp, OpError, OpKind};
pub use provider::{CharDiff, DiffProvider};
pub use table::{Cell, Row, Table};

error_set! {
    /// Top-level error for report generation
    ReportError := {
        OpError(OpError),
        AlignError(AlignError),
    }
}

/// Report settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Show every unchanged line instead of collapsing long runs
    pub full_context: bool,
    /// Cut rows at this many chars
    pub wrap_column: Option<NonZeroUsize>,
    /// Document title
    pub title: String,
    /// Prefix of navigation anchor ids
    pub anchor_prefix: String,
    /// Give up refining the diff after this long
    pub timeout: Option<Duration>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            full_context: true,
            wrap_column: None,
            title: "Diff".to_string(),
            anchor_prefix: "chg_".to_string(),
            timeout: Some(Duration::from_secs(1)),
        }
    }
}

/// Main interface: diff two texts and render the result
#[derive(Debug, Clone)]
pub struct DiffReport<P = CharDiff> {
    options: ReportOptions,
    provider: P,
}

impl DiffReport<CharDiff> {
    /// Report using the built-in character diff
    pub fn new(options: ReportOptions) -> Self {
        let provider = CharDiff::new(options.timeout);
        Self { options, provider }
    }
}

impl<P: DiffProvider> DiffReport<P> {
    /// Report using another source of edit scripts
    ///
    /// # Examples
    /// ```
    /// # use side_diff::{DiffOp, DiffReport, ReportOptions};
    /// // Whole-text replacement, no refinement
    /// let report = DiffReport::with_provider(ReportOptions::default(), |old: &str, new: &str| {
    ///     vec![DiffOp::delete(old), DiffOp::insert(new)]
    /// });
    /// let table = report.table("a\n", "b\n").unwrap();
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn with_provider(options: ReportOptions, provider: P) -> Self {
        Self { options, provider }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Diff `old` against `new` and build the table
    pub fn table(&self, old: &str, new: &str) -> Result<Table, ReportError> {
        let ops = self.provider.diff(old, new);
        debug!(ops = ops.len(), "computed edit script");
        Ok(Table::from_ops(&ops, old, new, &self.options)?)
    }

    /// The diff as a bare `<table>` element
    pub fn render_table(&self, old: &str, new: &str) -> Result<String, ReportError> {
        let table = self.table(old, new)?;
        Ok(render::table_markup(&table, &self.options.anchor_prefix).into_string())
    }

    /// The diff as a standalone HTML page
    pub fn render_document(&self, old: &str, new: &str) -> Result<String, ReportError> {
        let table = self.table(old, new)?;
        Ok(render::document_markup(&table, &self.options).into_string())
    }
}
