//! Root-method call resolution: equality, hashing and string conversion
//! exist on every object, but statically dispatching them through an
//! interface slot is ambiguous on the target runtime. Calls that resolve to
//! one of `Any`'s operations are retargeted at the resolved implementation;
//! the call stays virtual and the receivers stay in place.

use larch_ir::{CallExpr, FileId, FuncId, IrStore};

use crate::{traverse, LowerError};

pub(crate) fn run(store: &mut IrStore, file: FileId) -> Result<(), LowerError> {
    for func in traverse::member_functions(store, file) {
        rewrite_function(store, func)?;
    }
    let mut i = 0;
    while i < store.file(file).functions.len() {
        let func = store.file(file).functions[i];
        rewrite_function(store, func)?;
        i += 1;
    }
    Ok(())
}

fn rewrite_function(store: &mut IrStore, func: FuncId) -> Result<(), LowerError> {
    let Some(mut body) = store.func_mut(func).body.take() else {
        return Ok(());
    };
    let result = traverse::rewrite_calls(&mut body, &mut |call| {
        rewrite_call(store, call);
        Ok(())
    });
    store.func_mut(func).body = Some(body);
    result
}

fn rewrite_call(store: &IrStore, call: &mut CallExpr) {
    if let Some(qualifier) = call.super_qualifier {
        if qualifier != store.builtins.any {
            return;
        }
    }
    if !store.is_interface_member(call.callee) {
        return;
    }
    let Some(resolved) = store.resolve_fake_override(call.callee) else {
        return;
    };
    if !store.is_root_operation(resolved) {
        return;
    }

    call.callee = resolved;
    if call.super_qualifier.is_some() {
        call.super_qualifier = Some(store.builtins.any);
    }
}
