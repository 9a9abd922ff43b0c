//! Literal values.
//!
//! Literals are the constant values appearing in an IDL declaration, such
//! as union case labels. A literal is immutable once built and owned by
//! whichever node holds it; it is dropped with its owner.

use crate::TypeFlags;
use std::fmt;

/// A constant value with its kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// Boolean value.
    Bool(bool),
    /// Character value.
    Char(char),
    /// Wide character value.
    WideChar(char),
    /// String value.
    Str(Box<str>),
    /// Unsigned integer value.
    UInt(u64),
    /// Signed integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
}

impl Literal {
    /// The kind flags matching this literal's value.
    pub const fn flags(&self) -> TypeFlags {
        match self {
            Literal::Bool(_) => TypeFlags::BOOLEAN,
            Literal::Char(_) => TypeFlags::CHAR,
            Literal::WideChar(_) => TypeFlags::CHAR.union(TypeFlags::WIDE),
            Literal::Str(_) => TypeFlags::STRING,
            Literal::UInt(_) => TypeFlags::INT64.union(TypeFlags::UNSIGNED),
            Literal::Int(_) => TypeFlags::INT64,
            Literal::Float(_) => TypeFlags::LONG_DOUBLE,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(v) => write!(f, "{v}"),
            Literal::Char(v) => write!(f, "'{v}'"),
            Literal::WideChar(v) => write!(f, "L'{v}'"),
            Literal::Str(v) => write!(f, "\"{v}\""),
            Literal::UInt(v) => write!(f, "{v}"),
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Float(v) => write!(f, "{v}"),
        }
    }
}
