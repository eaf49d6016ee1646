//! # Field-Index Resolution
//!
//! This module resolves a record type's declarations into a `FieldIndex`:
//! the mapping from column name to the field path (and accessor) that
//! reaches the field, flattening embedded records along the way.
//!
//! ## Resolution rules
//!
//! Declarations are walked in order:
//!
//! - Excluded declarations are skipped entirely.
//! - Embedded records are recursed into; every column discovered inside is
//!   promoted with the embed prefix prepended and its path nested under the
//!   embed's ordinal.
//! - Embedded pointers are a fatal configuration error: resolution panics
//!   immediately, since binding could never allocate into a null pointer.
//! - Plain columns map their (lower-cased) name to a single-ordinal path.
//!
//! Two declarations resolving to the same column name (via embedding paths
//! or explicit overrides) are not an error: the last one processed in
//! declaration order wins silently.
//!
//! A `FieldIndex` is immutable after construction and safe for unlimited
//! concurrent reads; [`crate::cache::BindingCache`] memoizes one per type.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::describe::{Access, Bindable, FieldDecl, StructDescriptor};

/// Ordered declaration ordinals locating a (possibly nested) field inside a
/// record instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(SmallVec<[u16; 4]>);

impl FieldPath {
    fn root(ordinal: u16) -> Self {
        let mut path = SmallVec::new();
        path.push(ordinal);
        FieldPath(path)
    }

    fn nest(mut self, ordinal: u16) -> Self {
        self.0.insert(0, ordinal);
        self
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }
}

pub(crate) struct FieldEntry<T> {
    pub(crate) path: FieldPath,
    pub(crate) access: Access<T>,
}

/// Per-type mapping from column name to field path; built once, reused for
/// every row of that type.
pub struct FieldIndex<T> {
    entries: HashMap<String, FieldEntry<T>>,
}

impl<T: Bindable> FieldIndex<T> {
    /// Resolves `T`'s declarations into a field index.
    ///
    /// # Panics
    ///
    /// Panics if `T` (or any embedded record) declares an embedded pointer
    /// field. This signals a programming mistake, not a runtime condition.
    pub fn resolve() -> Self {
        let mut d = StructDescriptor::new();
        T::describe(&mut d);
        let mut entries = HashMap::with_capacity(d.decls.len());
        for (i, decl) in d.decls.into_iter().enumerate() {
            // a descriptor with more than 65536 declarations is not realistic
            let ordinal = i as u16;
            match decl {
                FieldDecl::Excluded => {}
                FieldDecl::Column { name, access } => {
                    entries.insert(
                        name,
                        FieldEntry {
                            path: FieldPath::root(ordinal),
                            access,
                        },
                    );
                }
                FieldDecl::Embedded { prefix, expand } => {
                    for (name, path, access) in expand() {
                        entries.insert(
                            format!("{prefix}{name}"),
                            FieldEntry {
                                path: path.nest(ordinal),
                                access,
                            },
                        );
                    }
                }
                FieldDecl::EmbeddedPointer { field } => {
                    panic!(
                        "rowbind: cannot bind through embedded pointer field `{}` of `{}`; \
                         embed the record by value or exclude the field",
                        field,
                        std::any::type_name::<T>(),
                    );
                }
            }
        }
        FieldIndex { entries }
    }

    /// Number of resolved columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The field path resolved for a column name, if any.
    pub fn path(&self, column: &str) -> Option<&FieldPath> {
        self.entries.get(column).map(|e| &e.path)
    }

    /// Resolved column names, in no particular order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub(crate) fn entry(&self, column: &str) -> Option<&FieldEntry<T>> {
        self.entries.get(column)
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (String, FieldEntry<T>)> {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    bindable! {
        struct Plain {
            id: i64,
            first_name: String => "first_name",
            email: String,
            password: Vec<u8> => -,
        }
    }

    bindable! {
        struct Address {
            street: String,
            zip: String => "postal_code",
        }
    }

    bindable! {
        struct Customer {
            inner: Plain => flat,
            home: Address => flat("home_"),
            created_at: i64,
        }
    }

    fn paths<T: Bindable>(index: &FieldIndex<T>) -> BTreeMap<String, Vec<u16>> {
        index
            .entries
            .iter()
            .map(|(name, e)| (name.clone(), e.path.as_slice().to_vec()))
            .collect()
    }

    #[test]
    fn test_plain_struct_one_entry_per_bound_field() {
        let index = FieldIndex::<Plain>::resolve();
        assert_eq!(index.len(), 3);
        assert_eq!(index.path("id").unwrap().as_slice(), &[0]);
        assert_eq!(index.path("first_name").unwrap().as_slice(), &[1]);
        assert_eq!(index.path("email").unwrap().as_slice(), &[2]);
        assert!(index.path("password").is_none());
    }

    #[test]
    fn test_embedded_fields_promoted_with_prefix() {
        let index = FieldIndex::<Customer>::resolve();
        let got = paths(&index);
        let want: BTreeMap<String, Vec<u16>> = [
            ("id".to_string(), vec![0, 0]),
            ("first_name".to_string(), vec![0, 1]),
            ("email".to_string(), vec![0, 2]),
            ("home_street".to_string(), vec![1, 0]),
            ("home_postal_code".to_string(), vec![1, 1]),
            ("created_at".to_string(), vec![2]),
        ]
        .into();
        assert_eq!(got, want);
    }

    #[test]
    fn test_duplicate_column_last_declaration_wins() {
        bindable! {
            struct Shadowed {
                id: i64,
                other: i64 => "id",
            }
        }
        let index = FieldIndex::<Shadowed>::resolve();
        assert_eq!(index.len(), 1);
        assert_eq!(index.path("id").unwrap().as_slice(), &[1]);
    }

    #[test]
    fn test_embedded_column_shadowed_by_later_field() {
        bindable! {
            struct Wrapper {
                inner: Plain => flat,
                id: i64,
            }
        }
        let index = FieldIndex::<Wrapper>::resolve();
        assert_eq!(index.path("id").unwrap().as_slice(), &[1]);
        assert_eq!(index.path("email").unwrap().as_slice(), &[0, 2]);
    }

    #[test]
    #[should_panic(expected = "embedded pointer")]
    fn test_embedded_pointer_is_fatal() {
        #[derive(Debug, Default, Clone)]
        struct Broken {
            #[allow(dead_code)]
            addr: Option<Box<Address>>,
        }

        impl Bindable for Broken {
            fn describe(d: &mut StructDescriptor<Self>) {
                d.embed_pointer("addr");
            }
        }

        let _ = FieldIndex::<Broken>::resolve();
    }

    #[test]
    fn test_manual_descriptor_matches_macro() {
        #[derive(Debug, Default, Clone)]
        struct Manual {
            id: i64,
            first_name: String,
            email: String,
            #[allow(dead_code)]
            password: Vec<u8>,
        }

        impl Bindable for Manual {
            fn describe(d: &mut StructDescriptor<Self>) {
                d.column("id", |s| &mut s.id);
                d.column("first_name", |s| &mut s.first_name);
                d.column("email", |s| &mut s.email);
                d.exclude();
            }
        }

        let manual = FieldIndex::<Manual>::resolve();
        let generated = FieldIndex::<Plain>::resolve();
        assert_eq!(paths(&manual), paths(&generated));
    }

    #[test]
    fn test_column_names_are_lowercased() {
        bindable! {
            struct Mixed {
                id: i64 => "ID",
            }
        }
        let index = FieldIndex::<Mixed>::resolve();
        assert!(index.path("id").is_some());
        assert!(index.path("ID").is_none());
    }
}
