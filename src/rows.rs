//! # Result Cursor Interface
//!
//! The collaborator interface the scanner drives. Adapters over concrete
//! drivers implement this for their row type; the core only ever advances
//! the cursor and asks it to decode the current row positionally.

use eyre::{Report, Result};

use crate::value::Value;

/// A live result cursor over the rows of a query.
pub trait Rows {
    /// The ordered column names of the result set.
    fn columns(&mut self) -> Result<Vec<String>>;

    /// Advances to the next row. Returns false when the result set is
    /// exhausted or an error occurred; consult [`Rows::last_error`] to
    /// distinguish the two.
    fn advance(&mut self) -> bool;

    /// The error that stopped iteration, if any. Only meaningful after
    /// `advance` returned false; takes the error out of the cursor.
    fn last_error(&mut self) -> Option<Report>;

    /// Decodes the current row into `row`, positionally: `row[i]` receives
    /// the value of column `i`. `row.len()` always equals the column count
    /// reported by [`Rows::columns`].
    fn bind_row(&mut self, row: &mut [Value]) -> Result<()>;
}
