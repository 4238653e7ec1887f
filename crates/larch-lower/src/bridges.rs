//! Bridge generation: classes that inherit an interface default method
//! without overriding it get a concrete member that forwards to the
//! companion body.
//!
//! The pass is class-scoped. For every class it first patches the
//! overridden-symbol lists of the existing members (functions introduced by
//! this pass may be inherited lower in the hierarchy, so references to
//! placeholders that will be replaced must point at their bridges instead),
//! then replaces each eligible placeholder member with a filled-in bridge.
//! Interfaces get the patching but never bridges.

use larch_ir::{
    CallExpr, ClassId, ClassKind, Expr, FileId, FuncId, IrStore, Member, ParamSlot, Type,
};

use crate::oracle::redirection_target;
use crate::{LowerError, LoweringContext};

pub(crate) fn run(
    store: &mut IrStore,
    ctx: &mut LoweringContext,
    file: FileId,
) -> Result<(), LowerError> {
    for class in store.classes_in_file(file) {
        patch_class_overrides(store, ctx, class);
        if store.class(class).kind == ClassKind::Interface {
            continue;
        }
        generate_class_bridges(store, ctx, class)?;
    }
    Ok(())
}

/// Replace every overridden symbol that will be (or has been) replaced by a
/// bridge in its own class with that bridge, so override resolution below
/// this class stays consistent.
fn patch_class_overrides(store: &mut IrStore, ctx: &mut LoweringContext, class: ClassId) {
    for member in store.class(class).members.clone() {
        match member {
            Member::Function(f) => patch_overridden(store, ctx, f),
            Member::Property(p) => {
                let prop = store.prop(p).clone();
                if let Some(getter) = prop.getter {
                    patch_overridden(store, ctx, getter);
                }
                if let Some(setter) = prop.setter {
                    patch_overridden(store, ctx, setter);
                }
            }
            // Visited by the outer class walk.
            Member::Class(_) => {}
        }
    }
}

fn patch_overridden(store: &mut IrStore, ctx: &mut LoweringContext, func: FuncId) {
    let overridden = store.func(func).overridden.clone();
    let mut patched = Vec::with_capacity(overridden.len());
    for symbol in overridden {
        if redirection_target(store, ctx.mode, symbol).is_some() {
            patched.push(ctx.factory.bridge_declaration_for(store, symbol));
        } else {
            patched.push(symbol);
        }
    }
    store.func_mut(func).overridden = patched;
}

fn generate_class_bridges(
    store: &mut IrStore,
    ctx: &mut LoweringContext,
    class: ClassId,
) -> Result<(), LowerError> {
    let members = store.class(class).members.clone();
    for (index, member) in members.into_iter().enumerate() {
        match member {
            Member::Function(f) => {
                if let Some(bridge) = delegate_to_companion(store, ctx, f)? {
                    store.class_mut(class).members[index] = Member::Function(bridge);
                }
            }
            Member::Property(p) => {
                let prop = store.prop(p).clone();
                if let Some(getter) = prop.getter {
                    if let Some(bridge) = delegate_to_companion(store, ctx, getter)? {
                        store.prop_mut(p).getter = Some(bridge);
                    }
                }
                if let Some(setter) = prop.setter {
                    if let Some(bridge) = delegate_to_companion(store, ctx, setter)? {
                        store.prop_mut(p).setter = Some(bridge);
                    }
                }
            }
            Member::Class(_) => {}
        }
    }
    Ok(())
}

/// Build the bridge for one placeholder, or `None` when the oracle yields
/// no target. The bridge's body is a single return of a call to the
/// companion, forwarding every parameter positionally unchanged.
fn delegate_to_companion(
    store: &mut IrStore,
    ctx: &mut LoweringContext,
    placeholder: FuncId,
) -> Result<Option<FuncId>, LowerError> {
    let Some(target) = redirection_target(store, ctx.mode, placeholder) else {
        return Ok(None);
    };

    let bridge = ctx.factory.bridge_declaration_for(store, placeholder);
    patch_overridden(store, ctx, bridge);
    let companion = ctx.factory.canonical_location_for(store, target)?;

    let (has_dispatch, has_extension, value_count, type_param_count) = {
        let b = store.func(bridge);
        (
            b.dispatch_receiver.is_some(),
            b.extension_receiver.is_some(),
            b.value_params.len(),
            b.type_params.len(),
        )
    };
    let mut call = CallExpr::new(companion);
    if has_dispatch {
        call.args.push(Expr::GetParam(ParamSlot::Dispatch));
    }
    if has_extension {
        call.args.push(Expr::GetParam(ParamSlot::Extension));
    }
    for i in 0..value_count {
        call.args.push(Expr::GetParam(ParamSlot::Value(i)));
    }
    call.type_args = (0..type_param_count).map(Type::Param).collect();

    store.func_mut(bridge).body = Some(Expr::Return(Box::new(Expr::Call(call))));
    Ok(Some(bridge))
}
