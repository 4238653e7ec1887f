//! Shared traversal and call-rewrite helpers for the file-scoped passes.

use larch_ir::{CallExpr, Expr, FileId, FuncId, IrStore, Member};

use crate::LowerError;

/// Every member function reachable from the file's classes, in declaration
/// order: plain members first, then property accessors; nested classes
/// included.
pub(crate) fn member_functions(store: &IrStore, file: FileId) -> Vec<FuncId> {
    let mut out = Vec::new();
    for class in store.classes_in_file(file) {
        for member in &store.class(class).members {
            match *member {
                Member::Function(f) => out.push(f),
                Member::Property(p) => {
                    let prop = store.prop(p);
                    out.extend(prop.getter);
                    out.extend(prop.setter);
                }
                Member::Class(_) => {}
            }
        }
    }
    out
}

/// Apply `rewrite` to every call expression under `expr`, innermost first.
pub(crate) fn rewrite_calls<F>(expr: &mut Expr, rewrite: &mut F) -> Result<(), LowerError>
where
    F: FnMut(&mut CallExpr) -> Result<(), LowerError>,
{
    match expr {
        Expr::Call(call) => {
            if let Some(receiver) = &mut call.dispatch_receiver {
                rewrite_calls(receiver, rewrite)?;
            }
            if let Some(receiver) = &mut call.extension_receiver {
                rewrite_calls(receiver, rewrite)?;
            }
            for arg in &mut call.args {
                rewrite_calls(arg, rewrite)?;
            }
            rewrite(call)
        }
        Expr::Return(inner) => rewrite_calls(inner, rewrite),
        Expr::Block(exprs) => {
            for e in exprs {
                rewrite_calls(e, rewrite)?;
            }
            Ok(())
        }
        Expr::Unit | Expr::IntLit(_) | Expr::GetParam(_) => Ok(()),
    }
}

/// Retarget a call at a free-standing function: the dispatch and extension
/// receivers become leading positional arguments, everything else keeps its
/// position, and the super-qualifier is cleared.
pub(crate) fn receivers_as_arguments(call: &mut CallExpr, target: FuncId) {
    let mut args = Vec::with_capacity(
        call.args.len()
            + call.dispatch_receiver.is_some() as usize
            + call.extension_receiver.is_some() as usize,
    );
    if let Some(receiver) = call.dispatch_receiver.take() {
        args.push(*receiver);
    }
    if let Some(receiver) = call.extension_receiver.take() {
        args.push(*receiver);
    }
    args.append(&mut call.args);
    call.args = args;
    call.callee = target;
    call.super_qualifier = None;
}
