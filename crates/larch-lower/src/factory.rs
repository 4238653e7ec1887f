//! The declaration factory: memoized construction of companion bodies and
//! bridge declarations.
//!
//! Multiple passes and multiple call sites request the same mapping, so
//! both lookups are idempotent and creation happens at most once per
//! original declaration.

use rustc_hash::FxHashMap;

use larch_ir::{
    CallExpr, ClassKind, Expr, FuncId, Function, FunctionParent, IrStore, Modality, Origin, Param,
    ParamSlot, Type,
};

use crate::LowerError;

/// Builds and caches the synthesized declarations the lowering needs: for
/// every interface default method a single companion body, and for every
/// inherited placeholder a single bridge declaration.
#[derive(Debug, Default)]
pub struct DeclarationFactory {
    companions: FxHashMap<FuncId, FuncId>,
    bridges: FxHashMap<FuncId, FuncId>,
}

impl DeclarationFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical out-of-interface location of a default method's body.
    ///
    /// Created on first request as a free-standing function in the
    /// interface's file: the dispatch receiver becomes a leading value
    /// parameter typed as the interface, the extension receiver follows,
    /// then the method's own value parameters. The body is cloned from the
    /// interface method with parameter reads remapped accordingly.
    ///
    /// Errors when `original` is not an interface member or carries no
    /// body; the caller treats that as an unrecoverable IR inconsistency.
    pub fn canonical_location_for(
        &mut self,
        store: &mut IrStore,
        original: FuncId,
    ) -> Result<FuncId, LowerError> {
        if let Some(&existing) = self.companions.get(&original) {
            return Ok(existing);
        }

        let iface = match store.parent_class(original) {
            Some(class) if store.class(class).kind == ClassKind::Interface => class,
            _ => {
                return Err(LowerError::NotAnInterfaceMethod {
                    function: store.func(original).name.clone(),
                })
            }
        };
        let source = store.func(original).clone();
        let mut body = match source.body {
            Some(ref body) => body.clone(),
            None => {
                return Err(LowerError::MissingDefaultBody {
                    function: source.name,
                })
            }
        };

        let has_dispatch = source.dispatch_receiver.is_some();
        let value_offset =
            has_dispatch as usize + source.extension_receiver.is_some() as usize;
        remap_params(&mut body, has_dispatch, value_offset);

        let iface_name = store.class(iface).name.clone();
        let file = store.class(iface).file;
        let mut companion = Function::new(
            format!("{}${}$impl", iface_name, source.name),
            FunctionParent::File(file),
        );
        companion.origin = Origin::CompanionBody;
        companion.visibility = source.visibility;
        companion.modality = Modality::Final;
        companion.type_params = source.type_params;
        companion.return_type = source.return_type;
        if has_dispatch {
            companion
                .value_params
                .push(Param::new("$this", Type::Class(iface)));
        }
        if let Some(ext) = source.extension_receiver {
            companion
                .value_params
                .push(Param::new("$receiver", ext.ty));
        }
        companion.value_params.extend(source.value_params);
        companion.body = Some(body);

        let id = store.add_function(companion);
        self.companions.insert(original, id);
        Ok(id)
    }

    /// A fresh signature-matching bridge declaration for an inherited
    /// placeholder, with no body; bridge generation fills the body in.
    pub fn bridge_declaration_for(&mut self, store: &mut IrStore, placeholder: FuncId) -> FuncId {
        if let Some(&existing) = self.bridges.get(&placeholder) {
            return existing;
        }

        let source = store.func(placeholder).clone();
        let mut bridge = Function::new(source.name, source.parent);
        bridge.origin = Origin::DefaultBridge;
        bridge.visibility = source.visibility;
        bridge.modality = Modality::Open;
        bridge.type_params = source.type_params;
        bridge.dispatch_receiver = source.dispatch_receiver;
        bridge.extension_receiver = source.extension_receiver;
        bridge.value_params = source.value_params;
        bridge.return_type = source.return_type;
        bridge.overridden = source.overridden;

        let id = store.add_detached_function(bridge);
        self.bridges.insert(placeholder, id);
        id
    }
}

/// Remap parameter reads from member-function slots to the companion's
/// flat value-parameter list.
fn remap_params(expr: &mut Expr, has_dispatch: bool, value_offset: usize) {
    match expr {
        Expr::GetParam(slot) => {
            *slot = match *slot {
                ParamSlot::Dispatch => ParamSlot::Value(0),
                ParamSlot::Extension => ParamSlot::Value(has_dispatch as usize),
                ParamSlot::Value(i) => ParamSlot::Value(i + value_offset),
            };
        }
        Expr::Call(call) => remap_call(call, has_dispatch, value_offset),
        Expr::Return(inner) => remap_params(inner, has_dispatch, value_offset),
        Expr::Block(exprs) => {
            for e in exprs {
                remap_params(e, has_dispatch, value_offset);
            }
        }
        Expr::Unit | Expr::IntLit(_) => {}
    }
}

fn remap_call(call: &mut CallExpr, has_dispatch: bool, value_offset: usize) {
    if let Some(receiver) = &mut call.dispatch_receiver {
        remap_params(receiver, has_dispatch, value_offset);
    }
    if let Some(receiver) = &mut call.extension_receiver {
        remap_params(receiver, has_dispatch, value_offset);
    }
    for arg in &mut call.args {
        remap_params(arg, has_dispatch, value_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larch_ir::{Class, ClassKind};

    fn iface_with_default(store: &mut IrStore) -> (larch_ir::FileId, larch_ir::ClassId, FuncId) {
        let file = store.add_file("demo", "main");
        let iface = store.add_class(Class::new("Greeter", file, ClassKind::Interface));
        let mut greet = Function::new("greet", FunctionParent::Class(iface));
        greet.dispatch_receiver = Some(Param::new("this", Type::Class(iface)));
        greet.value_params = vec![Param::new("name", Type::Str)];
        greet.return_type = Type::Str;
        greet.body = Some(Expr::Return(Box::new(Expr::GetParam(ParamSlot::Value(0)))));
        let greet = store.add_function(greet);
        (file, iface, greet)
    }

    #[test]
    fn companion_converts_receivers_to_leading_params() {
        let mut store = IrStore::new();
        let (file, _iface, greet) = iface_with_default(&mut store);
        let mut factory = DeclarationFactory::new();

        let companion = factory.canonical_location_for(&mut store, greet).unwrap();
        let c = store.func(companion);
        assert_eq!(c.name, "Greeter$greet$impl");
        assert_eq!(c.origin, Origin::CompanionBody);
        assert!(matches!(c.parent, FunctionParent::File(f) if f == file));
        assert!(c.dispatch_receiver.is_none());
        assert_eq!(c.value_params.len(), 2);
        assert_eq!(c.value_params[0].name, "$this");
        assert_eq!(c.value_params[1].name, "name");
        // `return name` now reads value parameter 1 instead of 0.
        assert_eq!(
            c.body,
            Some(Expr::Return(Box::new(Expr::GetParam(ParamSlot::Value(1)))))
        );
    }

    #[test]
    fn companion_lookup_is_memoized() {
        let mut store = IrStore::new();
        let (file, _iface, greet) = iface_with_default(&mut store);
        let mut factory = DeclarationFactory::new();

        let first = factory.canonical_location_for(&mut store, greet).unwrap();
        let second = factory.canonical_location_for(&mut store, greet).unwrap();
        assert_eq!(first, second);
        // Created at most once: the file holds a single synthesized function.
        assert_eq!(store.file(file).functions, vec![first]);
    }

    #[test]
    fn companion_requires_a_body() {
        let mut store = IrStore::new();
        let file = store.add_file("demo", "main");
        let iface = store.add_class(Class::new("I", file, ClassKind::Interface));
        let abstract_m = store.add_function(Function::new("m", FunctionParent::Class(iface)));
        let mut factory = DeclarationFactory::new();

        assert_eq!(
            factory.canonical_location_for(&mut store, abstract_m),
            Err(LowerError::MissingDefaultBody {
                function: "m".to_string()
            })
        );
    }

    #[test]
    fn companion_requires_an_interface_parent() {
        let mut store = IrStore::new();
        let file = store.add_file("demo", "main");
        let class = store.add_class(Class::new("C", file, ClassKind::Class));
        let mut m = Function::new("m", FunctionParent::Class(class));
        m.body = Some(Expr::Unit);
        let m = store.add_function(m);
        let mut factory = DeclarationFactory::new();

        assert_eq!(
            factory.canonical_location_for(&mut store, m),
            Err(LowerError::NotAnInterfaceMethod {
                function: "m".to_string()
            })
        );
    }

    #[test]
    fn bridge_declaration_matches_placeholder_signature() {
        let mut store = IrStore::new();
        let (_file, iface, greet) = iface_with_default(&mut store);
        let file = store.class(iface).file;
        let class = store.add_class(Class::new("Hello", file, ClassKind::Class));
        let mut ph = Function::new("greet", FunctionParent::Class(class));
        ph.origin = Origin::InheritedPlaceholder;
        ph.dispatch_receiver = Some(Param::new("this", Type::Class(class)));
        ph.value_params = vec![Param::new("name", Type::Str)];
        ph.return_type = Type::Str;
        ph.overridden = vec![greet];
        let ph = store.add_function(ph);
        let mut factory = DeclarationFactory::new();

        let bridge = factory.bridge_declaration_for(&mut store, ph);
        assert_eq!(bridge, factory.bridge_declaration_for(&mut store, ph));
        let b = store.func(bridge);
        assert_eq!(b.origin, Origin::DefaultBridge);
        assert_eq!(b.name, "greet");
        assert_eq!(b.overridden, vec![greet]);
        assert_eq!(b.value_params.len(), 1);
        assert!(b.body.is_none());
        // Detached: the generator splices it into the member list itself.
        assert_eq!(store.class(class).members.len(), 1);
    }
}
