//! # Result Binding
//!
//! `ScanTargets` matches a cursor's column list against a resolved field
//! index, once per scan. Per row, the cursor decodes into a positional
//! value buffer (one slot per column, in column order) and the targets
//! route each value to its field.
//!
//! Columns without a destination field are an error by default; with
//! unknown-column tolerance enabled they get a discard slot whose value is
//! dropped after decoding. The slot list always has exactly one entry per
//! input column, in input order.
//!
//! Incoming column names are ASCII-lower-cased before lookup (column names
//! are case-normalized throughout); error messages keep the original
//! spelling.

use std::fmt;
use std::mem;
use std::sync::Arc;

use eyre::{bail, Result};

use crate::describe::{Access, Bindable};
use crate::index::FieldIndex;
use crate::rows::Rows;
use crate::value::Value;

/// Per-scan binding of result columns to destination fields.
pub struct ScanTargets<T> {
    slots: Vec<Option<Access<T>>>,
    buf: Vec<Value>,
}

impl<T: Bindable> ScanTargets<T> {
    /// Resolves `columns` against `index`. With `ignore_unknown` off, a
    /// column that maps to no field fails with an error naming the column.
    pub fn resolve(
        columns: &[String],
        index: &FieldIndex<T>,
        ignore_unknown: bool,
    ) -> Result<Self> {
        let mut slots = Vec::with_capacity(columns.len());
        for column in columns {
            match index.entry(&column.to_ascii_lowercase()) {
                Some(entry) => slots.push(Some(Arc::clone(&entry.access))),
                None if ignore_unknown => slots.push(None),
                None => bail!("no destination field for column {:?}", column),
            }
        }
        Ok(Self {
            buf: vec![Value::Null; slots.len()],
            slots,
        })
    }

    /// Number of bound columns (including discard slots).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Decodes the cursor's current row and binds it into `dest`.
    pub fn read_row<R: Rows + ?Sized>(&mut self, rows: &mut R, dest: &mut T) -> Result<()> {
        rows.bind_row(&mut self.buf)?;
        for (slot, value) in self.slots.iter().zip(self.buf.iter_mut()) {
            let value = mem::take(value);
            if let Some(access) = slot {
                access(dest).bind(value)?;
            }
        }
        Ok(())
    }
}

// the accessor slots are opaque closures; report arity only
impl<T> fmt::Debug for ScanTargets<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanTargets")
            .field("columns", &self.slots.len())
            .field(
                "discarded",
                &self.slots.iter().filter(|s| s.is_none()).count(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    bindable! {
        struct Target {
            id: i64,
            name: String,
        }
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unknown_column_is_an_error_by_default() {
        let index = FieldIndex::<Target>::resolve();
        let err = ScanTargets::resolve(&columns(&["id", "nickname"]), &index, false).unwrap_err();
        assert!(err.to_string().contains("nickname"));
    }

    #[test]
    fn test_unknown_column_tolerated_with_discard_slot() {
        let index = FieldIndex::<Target>::resolve();
        let targets = ScanTargets::resolve(&columns(&["id", "nickname", "name"]), &index, true)
            .unwrap();
        assert_eq!(targets.len(), 3);
        assert!(targets.slots[1].is_none());
    }

    #[test]
    fn test_debug_reports_arity_not_accessors() {
        let index = FieldIndex::<Target>::resolve();
        let targets =
            ScanTargets::resolve(&columns(&["id", "nickname"]), &index, true).unwrap();
        assert_eq!(
            format!("{:?}", targets),
            "ScanTargets { columns: 2, discarded: 1 }"
        );
    }

    #[test]
    fn test_lookup_is_case_normalized() {
        let index = FieldIndex::<Target>::resolve();
        let targets = ScanTargets::resolve(&columns(&["ID", "Name"]), &index, false).unwrap();
        assert_eq!(targets.len(), 2);
    }
}
