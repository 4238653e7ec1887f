//! Types as the backend sees them: fully resolved, no inference variables.

use serde::Serialize;

use crate::ClassId;

/// A resolved type reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Type {
    Unit,
    Bool,
    Int,
    Str,
    /// A class or interface type.
    Class(ClassId),
    /// A reference to the enclosing function's type parameter by index.
    Param(usize),
}

/// A named, typed parameter slot on a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}
