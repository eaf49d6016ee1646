//! # Scan Orchestration
//!
//! The public entry point. A [`Scanner`] owns a [`BindingCache`] and drives
//! a cursor to completion, routing decoded records to the destination per
//! its shape. The zero-configuration [`scan`]/[`purge_cache`] free
//! functions wrap a process-wide default `Scanner`.
//!
//! ## Destination shapes
//!
//! The destination is an explicit tagged union built by the caller:
//!
//! - **Record** (`Dest::record`): exactly one row is consumed. Zero rows
//!   yield the [`NoRows`] sentinel (after propagating any cursor error).
//! - **Collection** (`Dest::collection`): rows are staged into a fresh
//!   buffer and appended to the destination only after the cursor finishes
//!   cleanly; on any error the destination is left untouched.
//! - **Stream** (`Dest::stream`): each decoded record is sent over the
//!   channel, racing the send against the cancellation token. Cancellation
//!   yields the [`Cancelled`] sentinel without sending the pending record.
//!   The scan never signals completion itself; it only drops its sender
//!   handle on return, so callers keep a clone when the channel must
//!   outlive the scan. A disconnected consumer is reported as an error
//!   rather than blocking forever.
//!
//! ## Concurrency
//!
//! The scanner creates no threads: it runs on the caller's thread, and only
//! stream consumers run elsewhere. The binding cache is the only cross-scan
//! shared state; no lock is held across a cursor advance or a channel send.
//! Cancellation is cooperative and checked only at the send boundary.

use std::mem;
use std::sync::OnceLock;

use crossbeam_channel::{select, Sender};
use eyre::{bail, Report, Result};

use crate::binder::ScanTargets;
use crate::cache::BindingCache;
use crate::cancel::CancellationToken;
use crate::describe::Bindable;
use crate::error::{Cancelled, NoRows};
use crate::rows::Rows;

/// A growable destination a collection scan can append to.
pub trait Collect<T> {
    /// Appends the staged records. Called once, only on full success.
    fn absorb(&mut self, staged: Vec<T>);
}

impl<T> Collect<T> for Vec<T> {
    fn absorb(&mut self, mut staged: Vec<T>) {
        if self.is_empty() {
            *self = staged;
        } else {
            self.append(&mut staged);
        }
    }
}

impl<T> Collect<T> for Vec<Box<T>> {
    fn absorb(&mut self, staged: Vec<T>) {
        self.reserve(staged.len());
        self.extend(staged.into_iter().map(Box::new));
    }
}

/// The destination of a scan: one record, a collection, or a stream.
pub enum Dest<'a, T: Bindable> {
    Record(&'a mut T),
    Collection(&'a mut dyn Collect<T>),
    Stream(Sender<T>),
}

impl<'a, T: Bindable> Dest<'a, T> {
    /// A single-record destination. The scan consumes exactly one row.
    pub fn record(dest: &'a mut T) -> Self {
        Dest::Record(dest)
    }

    /// A collection destination; rows are appended in cursor order.
    pub fn collection<C: Collect<T>>(dest: &'a mut C) -> Self {
        Dest::Collection(dest)
    }

    /// A stream destination; each row is sent as soon as it decodes.
    pub fn stream(sink: Sender<T>) -> Self {
        Dest::Stream(sink)
    }
}

/// Scans result sets into typed destinations, memoizing field resolution
/// per record type. Safe for concurrent use; the zero value is ready to
/// use via `Scanner::new`.
#[derive(Debug, Default)]
pub struct Scanner {
    cache: BindingCache,
    ignore_unknown_columns: bool,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls whether result columns without a destination field are an
    /// error (default) or silently discarded.
    pub fn ignore_unknown_columns(mut self, ignore: bool) -> Self {
        self.ignore_unknown_columns = ignore;
        self
    }

    /// Scans the result set from `rows` into `dest`, blocking until the
    /// cursor is exhausted, an error occurs, or (stream destinations only)
    /// `token` fires.
    pub fn scan<T, R>(&self, token: &CancellationToken, rows: &mut R, dest: Dest<'_, T>) -> Result<()>
    where
        T: Bindable,
        R: Rows,
    {
        let columns = rows.columns()?;
        let index = self.cache.resolve::<T>();
        let mut targets =
            ScanTargets::resolve(&columns, &index, self.ignore_unknown_columns)?;
        match dest {
            Dest::Record(record) => scan_record(rows, &mut targets, record),
            Dest::Collection(out) => scan_collection(rows, &mut targets, out),
            Dest::Stream(sink) => scan_stream(token, rows, &mut targets, &sink),
        }
    }

    /// Clears the memoized field indices of this scanner.
    pub fn purge_cache(&self) {
        self.cache.purge();
    }

    /// The scanner's binding cache.
    pub fn cache(&self) -> &BindingCache {
        &self.cache
    }
}

fn scan_record<T, R>(rows: &mut R, targets: &mut ScanTargets<T>, dest: &mut T) -> Result<()>
where
    T: Bindable,
    R: Rows,
{
    if !rows.advance() {
        if let Some(err) = rows.last_error() {
            return Err(err);
        }
        return Err(Report::new(NoRows));
    }
    targets.read_row(rows, dest)
}

fn scan_collection<T, R>(
    rows: &mut R,
    targets: &mut ScanTargets<T>,
    out: &mut dyn Collect<T>,
) -> Result<()>
where
    T: Bindable,
    R: Rows,
{
    let mut staged = Vec::new();
    let mut scratch = T::default();
    while rows.advance() {
        targets.read_row(rows, &mut scratch)?;
        // take() resets the scratch record to its zero state
        staged.push(mem::take(&mut scratch));
    }
    if let Some(err) = rows.last_error() {
        return Err(err);
    }
    out.absorb(staged);
    Ok(())
}

fn scan_stream<T, R>(
    token: &CancellationToken,
    rows: &mut R,
    targets: &mut ScanTargets<T>,
    sink: &Sender<T>,
) -> Result<()>
where
    T: Bindable,
    R: Rows,
{
    let mut scratch = T::default();
    while rows.advance() {
        targets.read_row(rows, &mut scratch)?;
        let record = mem::take(&mut scratch);
        // an already-fired token must win even when the consumer is ready
        if token.is_cancelled() {
            return Err(Report::new(Cancelled));
        }
        select! {
            send(sink, record) -> sent => {
                if sent.is_err() {
                    bail!("stream consumer disconnected before the result set was exhausted");
                }
            }
            recv(token.done()) -> _ => return Err(Report::new(Cancelled)),
        }
    }
    if let Some(err) = rows.last_error() {
        return Err(err);
    }
    Ok(())
}

static DEFAULT_SCANNER: OnceLock<Scanner> = OnceLock::new();

fn default_scanner() -> &'static Scanner {
    DEFAULT_SCANNER.get_or_init(Scanner::new)
}

/// Scans using the process-wide default [`Scanner`] (unknown-column
/// tolerance off). See [`Scanner::scan`].
pub fn scan<T, R>(token: &CancellationToken, rows: &mut R, dest: Dest<'_, T>) -> Result<()>
where
    T: Bindable,
    R: Rows,
{
    default_scanner().scan(token, rows, dest)
}

/// Clears the memoized field indices of the process-wide default scanner.
pub fn purge_cache() {
    default_scanner().purge_cache();
}
