//! The redirection-target oracle shared by all four passes.
//!
//! Given a member function of a concrete class, [`redirection_target`]
//! decides whether the function needs a bridge and, if so, which interface
//! method supplies its body. The exclusion rules are kept as a named,
//! closed list rather than one boolean expression so each rule stays
//! independently testable.

use serde::Serialize;

use larch_ir::{ClassKind, FuncId, IrStore, Modality, Origin, Visibility};

use crate::DefaultMethodMode;

/// A reason a resolved implementation can never serve as a redirection
/// target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExclusionRule {
    /// The body lives in a separately compiled, non-source dependency.
    ExternalStub,
    /// Synthesized default-argument dispatchers are redirected by their own
    /// pass, never bridged.
    DefaultArgDispatcher,
    /// The body is supplied by the target platform, not by source.
    PlatformDependent,
    /// The zero-argument `clone` on the `Cloneable` marker interface; the
    /// target runtime special-cases it.
    CloneOnCloneable,
}

impl ExclusionRule {
    pub const ALL: [ExclusionRule; 4] = [
        ExclusionRule::ExternalStub,
        ExclusionRule::DefaultArgDispatcher,
        ExclusionRule::PlatformDependent,
        ExclusionRule::CloneOnCloneable,
    ];

    /// Whether this rule excludes the given function.
    pub fn applies(self, store: &IrStore, func: FuncId) -> bool {
        let f = store.func(func);
        match self {
            Self::ExternalStub => f.origin == Origin::ExternalStub,
            Self::DefaultArgDispatcher => f.origin == Origin::DefaultArgDispatcher,
            Self::PlatformDependent => f.platform_dependent,
            Self::CloneOnCloneable => {
                f.name == "clone"
                    && f.value_params.is_empty()
                    && f.extension_receiver.is_none()
                    && store.parent_class(func) == Some(store.builtins.cloneable)
            }
        }
    }
}

/// The first exclusion rule matching `func`, if any.
pub fn excluded_from_companion(store: &IrStore, func: FuncId) -> Option<ExclusionRule> {
    ExclusionRule::ALL
        .into_iter()
        .find(|rule| rule.applies(store, func))
}

/// Decide whether `func` stands in for an inherited interface default
/// method that must be bridged, and if so return the implementation whose
/// companion body the bridge forwards to.
///
/// Returns `None` for everything the lowering leaves alone: user-written
/// members, interface members, placeholders already bridged by a concrete
/// ancestor, unresolvable or body-less chains, restricted visibility, the
/// exclusion rules, root-type operations, and methods whose bodies stay on
/// the interface natively.
pub fn redirection_target(
    store: &IrStore,
    mode: DefaultMethodMode,
    func: FuncId,
) -> Option<FuncId> {
    let f = store.func(func);
    if f.origin != Origin::InheritedPlaceholder {
        return None;
    }
    let parent = store.parent_class(func)?;
    if store.class(parent).kind == ClassKind::Interface {
        return None;
    }

    // Only bridge members immediately inherited from an interface. A
    // non-abstract overridden symbol in a concrete ancestor means that
    // ancestor already carries (or will carry) the bridge.
    let already_bridged_above = f.overridden.iter().any(|&overridden| {
        let o = store.func(overridden);
        o.modality != Modality::Abstract
            && store
                .parent_class(overridden)
                .is_some_and(|c| store.class(c).kind != ClassKind::Interface)
    });
    if already_bridged_above {
        return None;
    }

    let resolved = store.resolve_fake_override(func)?;
    let imp = store.func(resolved);
    if imp.body.is_none() {
        // Legitimately abstract; resolved transparently elsewhere.
        return None;
    }
    if !store.is_interface_member(resolved) {
        return None;
    }
    if imp.visibility == Visibility::Private {
        return None;
    }
    if excluded_from_companion(store, resolved).is_some() {
        return None;
    }
    if store.is_root_operation(resolved) {
        return None;
    }
    if mode.retains_body_on_interface(imp) {
        return None;
    }

    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use larch_ir::{Class, Expr, Function, FunctionParent, Param, ParamSlot, Type};

    struct Fixture {
        store: IrStore,
        file: larch_ir::FileId,
        iface: larch_ir::ClassId,
        default_method: FuncId,
        class: larch_ir::ClassId,
        placeholder: FuncId,
    }

    fn fixture() -> Fixture {
        let mut store = IrStore::new();
        let file = store.add_file("demo", "main");
        let iface = store.add_class(Class::new("Greeter", file, ClassKind::Interface));
        let mut greet = Function::new("greet", FunctionParent::Class(iface));
        greet.dispatch_receiver = Some(Param::new("this", Type::Class(iface)));
        greet.return_type = Type::Str;
        greet.body = Some(Expr::Return(Box::new(Expr::GetParam(ParamSlot::Dispatch))));
        let default_method = store.add_function(greet);

        let class = store.add_class(Class::new("Hello", file, ClassKind::Class));
        store.class_mut(class).supertypes.push(iface);
        let mut ph = Function::new("greet", FunctionParent::Class(class));
        ph.origin = Origin::InheritedPlaceholder;
        ph.dispatch_receiver = Some(Param::new("this", Type::Class(class)));
        ph.return_type = Type::Str;
        ph.overridden = vec![default_method];
        let placeholder = store.add_function(ph);

        Fixture {
            store,
            file,
            iface,
            default_method,
            class,
            placeholder,
        }
    }

    #[test]
    fn accepts_an_inherited_interface_default() {
        let fx = fixture();
        assert_eq!(
            redirection_target(&fx.store, DefaultMethodMode::Disabled, fx.placeholder),
            Some(fx.default_method)
        );
    }

    #[test]
    fn rejects_user_written_members() {
        let fx = fixture();
        assert_eq!(
            redirection_target(&fx.store, DefaultMethodMode::Disabled, fx.default_method),
            None
        );
    }

    #[test]
    fn rejects_placeholders_on_interfaces() {
        let mut fx = fixture();
        let sub = fx
            .store
            .add_class(Class::new("Sub", fx.file, ClassKind::Interface));
        fx.store.class_mut(sub).supertypes.push(fx.iface);
        let mut ph = Function::new("greet", FunctionParent::Class(sub));
        ph.origin = Origin::InheritedPlaceholder;
        ph.overridden = vec![fx.default_method];
        let ph = fx.store.add_function(ph);

        assert_eq!(
            redirection_target(&fx.store, DefaultMethodMode::Disabled, ph),
            None
        );
    }

    #[test]
    fn rejects_when_a_concrete_ancestor_already_bridges() {
        let mut fx = fixture();
        let sub = fx
            .store
            .add_class(Class::new("Sub", fx.file, ClassKind::Class));
        fx.store.class_mut(sub).supertypes.push(fx.class);
        let mut ph = Function::new("greet", FunctionParent::Class(sub));
        ph.origin = Origin::InheritedPlaceholder;
        // The ancestor's member is concrete (an already-generated bridge).
        let mut ancestor_bridge = Function::new("greet", FunctionParent::Class(fx.class));
        ancestor_bridge.origin = Origin::DefaultBridge;
        ancestor_bridge.body = Some(Expr::Unit);
        let ancestor_bridge = fx.store.add_detached_function(ancestor_bridge);
        ph.overridden = vec![ancestor_bridge];
        let ph = fx.store.add_function(ph);

        assert_eq!(
            redirection_target(&fx.store, DefaultMethodMode::Disabled, ph),
            None
        );
    }

    #[test]
    fn rejects_body_less_resolutions() {
        let mut fx = fixture();
        fx.store.func_mut(fx.default_method).body = None;
        fx.store.func_mut(fx.default_method).modality = Modality::Abstract;
        assert_eq!(
            redirection_target(&fx.store, DefaultMethodMode::Disabled, fx.placeholder),
            None
        );
    }

    #[test]
    fn rejects_private_defaults() {
        let mut fx = fixture();
        fx.store.func_mut(fx.default_method).visibility = Visibility::Private;
        assert_eq!(
            redirection_target(&fx.store, DefaultMethodMode::Disabled, fx.placeholder),
            None
        );
    }

    #[test]
    fn rejects_root_type_operations() {
        let mut fx = fixture();
        let to_string = fx.store.builtins.any_to_string;
        fx.store.func_mut(to_string).body = Some(Expr::Unit);
        fx.store.func_mut(fx.placeholder).overridden = vec![to_string];
        assert_eq!(
            redirection_target(&fx.store, DefaultMethodMode::Disabled, fx.placeholder),
            None
        );
    }

    #[test]
    fn rejects_natively_retained_defaults() {
        let mut fx = fixture();
        assert_eq!(
            redirection_target(&fx.store, DefaultMethodMode::Native, fx.placeholder),
            None
        );
        // The per-function marker wins even when the global mode forces
        // redirection.
        fx.store.func_mut(fx.default_method).force_native_default = true;
        assert_eq!(
            redirection_target(&fx.store, DefaultMethodMode::Disabled, fx.placeholder),
            None
        );
    }

    #[test]
    fn accepts_in_compatibility_mode() {
        let fx = fixture();
        assert_eq!(
            redirection_target(&fx.store, DefaultMethodMode::Compatibility, fx.placeholder),
            Some(fx.default_method)
        );
    }

    #[test]
    fn external_stub_rule() {
        let mut fx = fixture();
        fx.store.func_mut(fx.default_method).origin = Origin::ExternalStub;
        assert_eq!(
            excluded_from_companion(&fx.store, fx.default_method),
            Some(ExclusionRule::ExternalStub)
        );
        assert_eq!(
            redirection_target(&fx.store, DefaultMethodMode::Disabled, fx.placeholder),
            None
        );
    }

    #[test]
    fn dispatcher_rule() {
        let mut fx = fixture();
        fx.store.func_mut(fx.default_method).origin = Origin::DefaultArgDispatcher;
        assert_eq!(
            excluded_from_companion(&fx.store, fx.default_method),
            Some(ExclusionRule::DefaultArgDispatcher)
        );
    }

    #[test]
    fn platform_dependent_rule() {
        let mut fx = fixture();
        fx.store.func_mut(fx.default_method).platform_dependent = true;
        assert_eq!(
            excluded_from_companion(&fx.store, fx.default_method),
            Some(ExclusionRule::PlatformDependent)
        );
        assert_eq!(
            redirection_target(&fx.store, DefaultMethodMode::Disabled, fx.placeholder),
            None
        );
    }

    #[test]
    fn clone_rule_only_matches_the_marker_interface() {
        let mut fx = fixture();
        let clone = fx.store.builtins.cloneable_clone;
        assert_eq!(
            excluded_from_companion(&fx.store, clone),
            Some(ExclusionRule::CloneOnCloneable)
        );

        // A `clone` on some other interface is fair game.
        let mut other_clone = Function::new("clone", FunctionParent::Class(fx.iface));
        other_clone.body = Some(Expr::Unit);
        let other_clone = fx.store.add_function(other_clone);
        assert_eq!(excluded_from_companion(&fx.store, other_clone), None);

        // So is a `clone` with parameters, even on the marker interface.
        let cloneable = fx.store.builtins.cloneable;
        let mut clone_with_arg = Function::new("clone", FunctionParent::Class(cloneable));
        clone_with_arg.value_params = vec![Param::new("deep", Type::Bool)];
        clone_with_arg.body = Some(Expr::Unit);
        let clone_with_arg = fx.store.add_function(clone_with_arg);
        assert_eq!(excluded_from_companion(&fx.store, clone_with_arg), None);
    }
}
