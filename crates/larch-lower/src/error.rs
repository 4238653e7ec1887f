//! Lowering errors.
//!
//! Only internal-consistency violations surface as errors: the declaration
//! factory being asked for a companion body it cannot build means an earlier
//! stage handed over an IR that breaks its invariants, and lowering of the
//! unit aborts. A placeholder whose override chain resolves to no body, or a
//! declaration matching one of the exclusion rules, is not an error -- those
//! route to "no redirection".

use std::fmt;

use serde::Serialize;

/// An unrecoverable inconsistency discovered while lowering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LowerError {
    /// A companion body was requested for a method that has no body to
    /// relocate.
    MissingDefaultBody { function: String },
    /// A companion body was requested for a declaration that is not an
    /// interface member.
    NotAnInterfaceMethod { function: String },
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDefaultBody { function } => {
                write!(f, "no default body to relocate for `{}`", function)
            }
            Self::NotAnInterfaceMethod { function } => {
                write!(
                    f,
                    "companion body requested for non-interface declaration `{}`",
                    function
                )
            }
        }
    }
}

impl std::error::Error for LowerError {}
