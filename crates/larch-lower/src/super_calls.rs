//! Super-interface call redirection: `super<Interface>.m(...)` cannot
//! dispatch to an in-interface body on the target runtime, so eligible
//! calls are retargeted at the companion body with the receivers converted
//! to leading arguments.

use larch_ir::{CallExpr, ClassKind, FileId, FuncId, IrStore};

use crate::oracle::excluded_from_companion;
use crate::{traverse, LowerError, LoweringContext};

pub(crate) fn run(
    store: &mut IrStore,
    ctx: &mut LoweringContext,
    file: FileId,
) -> Result<(), LowerError> {
    for func in traverse::member_functions(store, file) {
        rewrite_function(store, ctx, func)?;
    }
    // Companions synthesized while rewriting are appended to the file's
    // function list; the index loop picks them up too.
    let mut i = 0;
    while i < store.file(file).functions.len() {
        let func = store.file(file).functions[i];
        rewrite_function(store, ctx, func)?;
        i += 1;
    }
    Ok(())
}

fn rewrite_function(
    store: &mut IrStore,
    ctx: &mut LoweringContext,
    func: FuncId,
) -> Result<(), LowerError> {
    let Some(mut body) = store.func_mut(func).body.take() else {
        return Ok(());
    };
    let result = traverse::rewrite_calls(&mut body, &mut |call| rewrite_call(store, ctx, call));
    store.func_mut(func).body = Some(body);
    result
}

fn rewrite_call(
    store: &mut IrStore,
    ctx: &mut LoweringContext,
    call: &mut CallExpr,
) -> Result<(), LowerError> {
    let Some(qualifier) = call.super_qualifier else {
        return Ok(());
    };
    // `super<Any>` is not an interface call; root-method resolution owns it.
    if store.class(qualifier).kind != ClassKind::Interface {
        return Ok(());
    }

    let Some(resolved) = store.resolve_fake_override(call.callee) else {
        return Ok(());
    };
    if excluded_from_companion(store, resolved).is_some()
        || ctx.mode.retains_body_on_interface(store.func(resolved))
    {
        return Ok(());
    }
    // `Any`'s operations never live in a companion; root-method resolution
    // handles calls that reach them.
    if store.is_root_operation(resolved) {
        return Ok(());
    }

    let target = ctx.factory.canonical_location_for(store, resolved)?;
    traverse::receivers_as_arguments(call, target);
    Ok(())
}
