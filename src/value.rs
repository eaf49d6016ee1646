//! # Column Values and Field Sinks
//!
//! This module provides `Value`, the owned representation of one column of
//! one result-set row, and `Bind`, the trait a destination field implements
//! to accept such a value.
//!
//! ## Design
//!
//! Cursors decode rows into positional `Value` buffers (see
//! [`crate::rows::Rows::bind_row`]); the resolved field accessors then route
//! each value into the matching field, which consumes it through `Bind`.
//! A kind mismatch (e.g. TEXT into an `i64` field) is a recoverable bind
//! error naming both sides.

use eyre::{bail, Result};

use crate::null::Null;

/// Fully-owned value of a single result-set column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short kind name, used in bind error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOL",
            Value::Int(_) => "INT",
            Value::Float(_) => "FLOAT",
            Value::Text(_) => "TEXT",
            Value::Blob(_) => "BLOB",
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

/// A destination field slot that accepts one decoded column value.
///
/// Implemented for the primitive column types, `Option<T>`, [`Null<T>`]
/// and `Value` itself (raw capture).
pub trait Bind {
    fn bind(&mut self, value: Value) -> Result<()>;
}

impl Bind for i64 {
    fn bind(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Int(i) => {
                *self = i;
                Ok(())
            }
            other => bail!("cannot bind {} into i64 field", other.kind()),
        }
    }
}

impl Bind for i32 {
    fn bind(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Int(i) => match i32::try_from(i) {
                Ok(v) => {
                    *self = v;
                    Ok(())
                }
                Err(_) => bail!("INT value {} overflows i32 field", i),
            },
            other => bail!("cannot bind {} into i32 field", other.kind()),
        }
    }
}

impl Bind for f64 {
    fn bind(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Float(f) => {
                *self = f;
                Ok(())
            }
            // integer columns widen losslessly enough for binding purposes
            Value::Int(i) => {
                *self = i as f64;
                Ok(())
            }
            other => bail!("cannot bind {} into f64 field", other.kind()),
        }
    }
}

impl Bind for f32 {
    fn bind(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Float(f) => {
                *self = f as f32;
                Ok(())
            }
            Value::Int(i) => {
                *self = i as f32;
                Ok(())
            }
            other => bail!("cannot bind {} into f32 field", other.kind()),
        }
    }
}

impl Bind for bool {
    fn bind(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Bool(b) => {
                *self = b;
                Ok(())
            }
            Value::Int(0) => {
                *self = false;
                Ok(())
            }
            Value::Int(1) => {
                *self = true;
                Ok(())
            }
            Value::Int(i) => bail!("INT value {} is not a valid bool", i),
            other => bail!("cannot bind {} into bool field", other.kind()),
        }
    }
}

impl Bind for String {
    fn bind(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Text(s) => {
                *self = s;
                Ok(())
            }
            other => bail!("cannot bind {} into String field", other.kind()),
        }
    }
}

impl Bind for Vec<u8> {
    fn bind(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Blob(b) => {
                *self = b;
                Ok(())
            }
            Value::Text(s) => {
                *self = s.into_bytes();
                Ok(())
            }
            other => bail!("cannot bind {} into Vec<u8> field", other.kind()),
        }
    }
}

impl Bind for Value {
    fn bind(&mut self, value: Value) -> Result<()> {
        *self = value;
        Ok(())
    }
}

// plain (non-embedded) pointer fields bind like their pointee
impl<T: Bind> Bind for Box<T> {
    fn bind(&mut self, value: Value) -> Result<()> {
        self.as_mut().bind(value)
    }
}

impl<T: Bind + Default> Bind for Option<T> {
    fn bind(&mut self, value: Value) -> Result<()> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        self.get_or_insert_with(T::default).bind(value)
    }
}

impl<T: Bind + Default> Bind for Null<T> {
    fn bind(&mut self, value: Value) -> Result<()> {
        if value.is_null() {
            self.invalidate();
            return Ok(());
        }
        self.some.bind(value)?;
        self.valid = true;
        Ok(())
    }
}
