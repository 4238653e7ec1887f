//! Expression trees nested inside function bodies.
//!
//! The backend only rewrites call expressions; the remaining kinds exist so
//! that bodies are representable at all (parameter reads, returns, blocks,
//! and the literals needed by synthesized code).

use crate::ty::Type;
use crate::{ClassId, FuncId};

/// Which of the enclosing function's parameters a [`Expr::GetParam`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSlot {
    Dispatch,
    Extension,
    Value(usize),
}

/// A body expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Unit,
    IntLit(i64),
    /// Read one of the enclosing function's parameters.
    GetParam(ParamSlot),
    Call(CallExpr),
    Return(Box<Expr>),
    Block(Vec<Expr>),
}

/// A call to a function symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: FuncId,
    /// Present when the call syntactically targets a named supertype,
    /// e.g. `super<Greeter>.greet()`.
    pub super_qualifier: Option<ClassId>,
    pub dispatch_receiver: Option<Box<Expr>>,
    pub extension_receiver: Option<Box<Expr>>,
    /// Ordinary positional arguments.
    pub args: Vec<Expr>,
    pub type_args: Vec<Type>,
}

impl CallExpr {
    /// A plain call with no qualifier, no receivers, and no type arguments.
    pub fn new(callee: FuncId) -> Self {
        Self {
            callee,
            super_qualifier: None,
            dispatch_receiver: None,
            extension_receiver: None,
            args: Vec::new(),
            type_args: Vec::new(),
        }
    }
}
