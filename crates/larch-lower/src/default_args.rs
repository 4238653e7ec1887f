//! Default-argument call redirection: calls to an interface's synthesized
//! default-argument dispatcher are retargeted at the dispatcher's companion
//! body, except where doing so would make the companion call itself.
//!
//! Bridge generation puts forwarding bodies on companions in compatibility
//! mode; without the guard, the dispatcher call inside such a body would be
//! redirected to the very function that contains it, an infinite cycle.
//
// TODO: when an interface declares no default bodies at all, the companion
// could be avoided entirely by moving the default-argument dispatchers onto
// the interface itself; today every dispatcher routes through a companion.

use larch_ir::{CallExpr, FileId, FuncId, IrStore, Origin};

use crate::{traverse, LowerError, LoweringContext};

pub(crate) fn run(
    store: &mut IrStore,
    ctx: &mut LoweringContext,
    file: FileId,
) -> Result<(), LowerError> {
    let mut pass = DefaultArgCallRedirector { active: Vec::new() };
    for func in traverse::member_functions(store, file) {
        pass.lower_function(store, ctx, func)?;
    }
    let mut i = 0;
    while i < store.file(file).functions.len() {
        let func = store.file(file).functions[i];
        pass.lower_function(store, ctx, func)?;
        i += 1;
    }
    Ok(())
}

struct DefaultArgCallRedirector {
    /// Stack of functions currently being lowered, innermost last. The
    /// self-recursion guard compares redirect targets against its top.
    active: Vec<FuncId>,
}

impl DefaultArgCallRedirector {
    fn lower_function(
        &mut self,
        store: &mut IrStore,
        ctx: &mut LoweringContext,
        func: FuncId,
    ) -> Result<(), LowerError> {
        let Some(mut body) = store.func_mut(func).body.take() else {
            return Ok(());
        };
        self.active.push(func);
        let result = traverse::rewrite_calls(&mut body, &mut |call| {
            Self::rewrite_call(&self.active, store, ctx, call)
        });
        // Popped before the error propagates so no stale context leaks into
        // sibling functions.
        self.active.pop();
        store.func_mut(func).body = Some(body);
        result
    }

    fn rewrite_call(
        active: &[FuncId],
        store: &mut IrStore,
        ctx: &mut LoweringContext,
        call: &mut CallExpr,
    ) -> Result<(), LowerError> {
        let callee = call.callee;
        if !store.is_interface_member(callee)
            || store.func(callee).origin != Origin::DefaultArgDispatcher
        {
            return Ok(());
        }
        if ctx.mode.retains_body_on_interface(store.func(callee)) && !ctx.mode.is_compatibility() {
            return Ok(());
        }

        let target = ctx.factory.canonical_location_for(store, callee)?;
        if active.last() == Some(&target) {
            // The bridge on the companion calls the dispatcher it stands in
            // for; redirecting would make the companion call itself.
            return Ok(());
        }

        traverse::receivers_as_arguments(call, target);
        Ok(())
    }
}
