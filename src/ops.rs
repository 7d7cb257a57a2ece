//! Diff operations consumed by the report pipeline.
//!
//! A diff between two texts is an ordered list of [`DiffOp`]s. Taking the
//! text of every `Equal` and `Delete` op in order reconstructs the old text;
//! taking `Equal` and `Insert` reconstructs the new text.
//!
//! Diff engines in the diff-match-patch family label their operations with
//! small integer codes (`-1` delete, `0` equal, `1` insert). Those convert
//! through [`OpKind::try_from`], which is the only place an unknown kind can
//! enter the pipeline.
//!
//! ```
//! use side_diff::ops::{from_codes, DiffOp};
//!
//! let ops = from_codes([(0, "a\n"), (-1, "b"), (1, "x")]).unwrap();
//! assert_eq!(ops[1], DiffOp::delete("b"));
//! assert!(from_codes([(2, "?")]).is_err());
//! ```

use error_set::error_set;

error_set! {
    /// Errors from converting raw diff operations
    OpError := {
        /// Operation code outside the delete/equal/insert range
        #[display("Invalid operation kind {code}")]
        InvalidOpKind { code: i8 },
    }
}

/// What a [`DiffOp`] does to the old text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Text present in both old and new
    Equal,
    /// Text only present in new
    Insert,
    /// Text only present in old
    Delete,
}

impl TryFrom<i8> for OpKind {
    type Error = OpError;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(OpKind::Delete),
            0 => Ok(OpKind::Equal),
            1 => Ok(OpKind::Insert),
            code => Err(OpError::InvalidOpKind { code }),
        }
    }
}

/// One labelled span of an edit script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOp {
    pub kind: OpKind,
    pub text: String,
}

impl DiffOp {
    pub fn new(kind: OpKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn equal(text: impl Into<String>) -> Self {
        Self::new(OpKind::Equal, text)
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self::new(OpKind::Insert, text)
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self::new(OpKind::Delete, text)
    }

    /// Length of the op text in chars
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Convert `(code, text)` pairs into typed operations.
///
/// # Errors
///
/// Returns [`OpError::InvalidOpKind`] on the first code that is not `-1`, `0`
/// or `1`.
pub fn from_codes<I, S>(ops: I) -> Result<Vec<DiffOp>, OpError>
where
    I: IntoIterator<Item = (i8, S)>,
    S: Into<String>,
{
    ops.into_iter()
        .map(|(code, text)| Ok(DiffOp::new(OpKind::try_from(code)?, text)))
        .collect()
}

/// Rebuild the old text from an edit script
pub fn old_text(ops: &[DiffOp]) -> String {
    ops.iter()
        .filter(|op| op.kind != OpKind::Insert)
        .map(|op| op.text.as_str())
        .collect()
}

/// Rebuild the new text from an edit script
pub fn new_text(ops: &[DiffOp]) -> String {
    ops.iter()
        .filter(|op| op.kind != OpKind::Delete)
        .map(|op| op.text.as_str())
        .collect()
}
