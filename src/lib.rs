//! # rowbind - Typed Result-Set Binding
//!
//! rowbind maps tabular query result sets onto typed record structs,
//! eliminating manual column-by-column binding code. A query's rows can be
//! delivered as a single record, a growable collection of records, or a live
//! stream of records consumed concurrently with query execution.
//!
//! ## Quick Start
//!
//! ```ignore
//! use rowbind::{bindable, CancellationToken, Dest, Scanner};
//!
//! bindable! {
//!     pub struct User {
//!         id: i64,
//!         first_name: String => "first_name",
//!         email: String,
//!         password: Vec<u8> => -,
//!     }
//! }
//!
//! let scanner = Scanner::new();
//! let mut users: Vec<User> = Vec::new();
//! scanner.scan(
//!     &CancellationToken::never(),
//!     &mut rows, // anything implementing rowbind::Rows
//!     Dest::collection(&mut users),
//! )?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Scanner (orchestrator)        │  scan.rs
//! ├─────────────────────────────────────┤
//! │   ScanTargets (per-call binder)      │  binder.rs
//! ├─────────────────────────────────────┤
//! │   BindingCache (TypeId → index)      │  cache.rs
//! ├─────────────────────────────────────┤
//! │   FieldIndex (column → field path)   │  index.rs
//! ├─────────────────────────────────────┤
//! │   Bindable descriptors / bindable!   │  describe.rs, macros.rs
//! └─────────────────────────────────────┘
//! ```
//!
//! The scanner resolves a destination type's column-to-field mapping once
//! (memoized process-wide or per `Scanner`), then reuses it for every row.
//! Field resolution flattens embedded records, honors per-field naming
//! overrides and exclusion markers, and fails fast on embedded pointers.
//!
//! ## Destination Shapes
//!
//! - [`Dest::record`]: exactly one row; zero rows yields the [`NoRows`]
//!   sentinel.
//! - [`Dest::collection`]: all rows appended in cursor order; on error the
//!   destination is left untouched.
//! - [`Dest::stream`]: each row sent over a channel, racing every send
//!   against a [`CancellationToken`]; cancellation yields the [`Cancelled`]
//!   sentinel.
//!
//! ## Error Channels
//!
//! Recoverable conditions (cursor errors, unmapped columns, [`NoRows`],
//! [`Cancelled`]) surface as [`eyre::Report`] values; sentinels are
//! identifiable via `report.is::<NoRows>()`. Configuration mistakes
//! (embedding through a pointer) are programmer errors and panic.

#[macro_use]
mod macros;

pub mod binder;
pub mod cache;
pub mod cancel;
pub mod describe;
pub mod error;
pub mod index;
pub mod null;
pub mod rows;
pub mod scan;
pub mod value;

pub use binder::ScanTargets;
pub use cache::BindingCache;
pub use cancel::{CancellationToken, Canceller};
pub use describe::{Bindable, StructDescriptor};
pub use error::{Cancelled, NoRows};
pub use index::{FieldIndex, FieldPath};
pub use null::Null;
pub use rows::Rows;
pub use scan::{purge_cache, scan, Collect, Dest, Scanner};
pub use value::{Bind, Value};
