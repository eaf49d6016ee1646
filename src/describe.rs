//! # Binding Descriptors
//!
//! This module provides the `Bindable` trait and `StructDescriptor`, the
//! compile-time replacement for runtime field reflection. A record type
//! declares its fields once, in declaration order; the resolver in
//! [`crate::index`] turns those declarations into a column-to-field index
//! that is memoized per type.
//!
//! ## Design
//!
//! Field access is type-erased into `Arc<dyn Fn(&mut T) -> &mut dyn Bind>`
//! closures so a resolved index can be cached and shared across scans
//! without knowing field types. Embedded records compose accessors: the
//! embed projection is chained in front of every accessor discovered inside
//! the embedded type.
//!
//! ## Declaring types
//!
//! Most callers use the [`bindable!`](crate::bindable) macro. Implementing
//! `Bindable` by hand is the manual-descriptor route:
//!
//! ```ignore
//! impl Bindable for User {
//!     fn describe(d: &mut StructDescriptor<Self>) {
//!         d.column("id", |s| &mut s.id);
//!         d.column("first_name", |s| &mut s.first_name);
//!         d.exclude(); // password, never bound
//!         d.embed("addr_", |s| &mut s.address);
//!     }
//! }
//! ```

use std::sync::Arc;

use crate::index::{FieldIndex, FieldPath};
use crate::value::Bind;

/// Type-erased accessor from a record to one of its (possibly nested)
/// fields, viewed as a bind sink.
pub(crate) type Access<T> =
    Arc<dyn for<'a> Fn(&'a mut T) -> &'a mut (dyn Bind + 'a) + Send + Sync>;

pub(crate) type ExpandFn<T> = Box<dyn Fn() -> Vec<(String, FieldPath, Access<T>)>>;

/// A record type whose fields can be bound from result-set columns.
///
/// `Default` provides the zero value used for scratch instances during
/// collection and stream scans.
pub trait Bindable: Default + 'static {
    /// Declares the type's fields, in declaration order.
    fn describe(d: &mut StructDescriptor<Self>);
}

/// One field declaration. Ordinals into the declaration list form the
/// [`FieldPath`] of each resolved column.
pub(crate) enum FieldDecl<T> {
    /// A plain bound field.
    Column { name: String, access: Access<T> },
    /// An embedded record whose columns are promoted with a prefix.
    Embedded { prefix: String, expand: ExpandFn<T> },
    /// An embedded field declared behind a pointer; always a fatal
    /// configuration error at resolution time.
    EmbeddedPointer { field: &'static str },
    /// A field excluded from binding. Present only to keep ordinals
    /// aligned with the struct definition.
    Excluded,
}

/// Collects field declarations for a record type `T`.
pub struct StructDescriptor<T> {
    pub(crate) decls: Vec<FieldDecl<T>>,
}

impl<T: Bindable> StructDescriptor<T> {
    pub(crate) fn new() -> Self {
        Self { decls: Vec::new() }
    }

    /// Declares a bound field. The column name is ASCII-lower-cased, so an
    /// uppercase override is indistinguishable from its lowercase form
    /// (column names are case-normalized throughout; the binder folds
    /// incoming cursor columns the same way). Pass the field name itself
    /// when there is no naming override.
    pub fn column<V: Bind + 'static>(&mut self, name: &str, access: fn(&mut T) -> &mut V) {
        self.decls.push(FieldDecl::Column {
            name: name.to_ascii_lowercase(),
            access: erase(access),
        });
    }

    /// Declares a field that never participates in binding.
    pub fn exclude(&mut self) {
        self.decls.push(FieldDecl::Excluded);
    }

    /// Declares an embedded record field. Columns resolved inside `U` are
    /// promoted into `T`'s index with `prefix` prepended (raw
    /// concatenation, no separator is inserted).
    pub fn embed<U: Bindable>(&mut self, prefix: &str, access: fn(&mut T) -> &mut U) {
        self.decls.push(FieldDecl::Embedded {
            prefix: prefix.to_ascii_lowercase(),
            expand: Box::new(move || {
                FieldIndex::<U>::resolve()
                    .into_entries()
                    .map(|(name, entry)| {
                        let inner = entry.access;
                        let lifted: Access<T> = Arc::new(move |t| inner(access(t)));
                        (name, entry.path, lifted)
                    })
                    .collect()
            }),
        });
    }

    /// Declares an embedded field that sits behind a pointer
    /// (`Box`/`Option`). Binding cannot allocate into a null embedded
    /// pointer, so resolving a type with such a declaration panics.
    pub fn embed_pointer(&mut self, field: &'static str) {
        self.decls.push(FieldDecl::EmbeddedPointer { field });
    }
}

fn erase<T, V>(access: fn(&mut T) -> &mut V) -> Access<T>
where
    T: 'static,
    V: Bind + 'static,
{
    Arc::new(move |t| access(t) as &mut dyn Bind)
}
