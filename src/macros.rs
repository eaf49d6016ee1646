//! # Record Declaration Macro
//!
//! This module provides `bindable!`, which declares a record struct together
//! with its [`Bindable`](crate::Bindable) implementation from a single field
//! list.
//!
//! ## Usage
//!
//! ```ignore
//! rowbind::bindable! {
//!     pub struct User {
//!         id: i64,                              // bound to column "id"
//!         first_name: String => "first_name",   // explicit column name
//!         password: Vec<u8> => -,               // excluded from binding
//!         address: Address => flat,             // embedded, columns promoted
//!         home: Address => flat("home_"),       // embedded with name prefix
//!     }
//! }
//! ```
//!
//! The struct is emitted with `#[derive(Debug, Default, Clone)]`; further
//! attributes written above the struct are passed through. A field without
//! an `=>` marker binds to its own name, ASCII-lower-cased. Embedded record
//! types must implement `Bindable` themselves; embedding through a pointer
//! (`Box`, `Option`) is rejected; declare such fields with
//! [`StructDescriptor::embed_pointer`](crate::StructDescriptor::embed_pointer)
//! in a manual impl if the fail-fast behavior is wanted at run time.

/// Declares a record struct and derives its binding descriptor.
#[macro_export]
macro_rules! bindable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $fvis:vis $field:ident : $ty:ty $(=> $spec:tt $( ($prefix:literal) )? )?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone)]
        $vis struct $name {
            $( $fvis $field: $ty, )+
        }

        impl $crate::Bindable for $name {
            fn describe(d: &mut $crate::StructDescriptor<Self>) {
                $(
                    $crate::bindable!(@field d, $field : $ty $(=> $spec $( ($prefix) )? )?);
                )+
            }
        }
    };

    // bound to the lower-cased field name
    (@field $d:ident, $field:ident : $ty:ty) => {
        $d.column(stringify!($field), |s: &mut Self| &mut s.$field);
    };
    // excluded from binding
    (@field $d:ident, $field:ident : $ty:ty => -) => {
        $d.exclude();
    };
    // embedded record, columns promoted unprefixed
    (@field $d:ident, $field:ident : $ty:ty => flat) => {
        $d.embed::<$ty>("", |s: &mut Self| &mut s.$field);
    };
    // embedded record with name prefix
    (@field $d:ident, $field:ident : $ty:ty => flat ($prefix:literal)) => {
        $d.embed::<$ty>($prefix, |s: &mut Self| &mut s.$field);
    };
    // explicit column name override
    (@field $d:ident, $field:ident : $ty:ty => $name:literal) => {
        $d.column($name, |s: &mut Self| &mut s.$field);
    };
}
