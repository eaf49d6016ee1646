//! # Sentinel Conditions
//!
//! Recoverable conditions a caller may want to match on. Both are plain
//! error types carried inside [`eyre::Report`]; identify them with
//! `report.is::<NoRows>()` or `report.downcast_ref`.
//!
//! Configuration mistakes (wrong destination shape, embedded pointers) use
//! the panic channel instead, so catching recoverable errors never masks a
//! programming error.

use std::error::Error;
use std::fmt;

/// A record-shape scan found zero rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoRows;

impl fmt::Display for NoRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no rows in result set")
    }
}

impl Error for NoRows {}

/// A stream-shape scan observed cancellation before the result set was
/// exhausted. The pending record was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scan cancelled")
    }
}

impl Error for Cancelled {}
