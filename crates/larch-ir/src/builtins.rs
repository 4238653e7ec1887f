//! Well-known core declarations every compilation unit can reach.
//!
//! `Any` is the universal root type; its three operations (equality,
//! hashing, string conversion) exist on every object regardless of
//! interface. `Cloneable` is a marker interface whose zero-argument
//! `clone` gets special treatment on the target runtime.

use crate::decl::{Class, ClassKind, Function, FunctionParent};
use crate::ty::{Param, Type};
use crate::{ClassId, FileId, FuncId, IrStore};

/// Ids of the core declarations installed by [`IrStore::new`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtins {
    pub core_file: FileId,
    pub any: ClassId,
    pub any_equals: FuncId,
    pub any_hash_code: FuncId,
    pub any_to_string: FuncId,
    pub cloneable: ClassId,
    pub cloneable_clone: FuncId,
}

/// Install the core declarations into an empty store.
pub(crate) fn install(store: &mut IrStore) -> Builtins {
    let core_file = store.add_file("larch", "core");

    let any = store.add_class(Class::new("Any", core_file, ClassKind::Class));

    let mut equals = Function::new("equals", FunctionParent::Class(any));
    equals.dispatch_receiver = Some(Param::new("this", Type::Class(any)));
    equals.value_params = vec![Param::new("other", Type::Class(any))];
    equals.return_type = Type::Bool;
    let any_equals = store.add_function(equals);

    let mut hash_code = Function::new("hash_code", FunctionParent::Class(any));
    hash_code.dispatch_receiver = Some(Param::new("this", Type::Class(any)));
    hash_code.return_type = Type::Int;
    let any_hash_code = store.add_function(hash_code);

    let mut to_string = Function::new("to_string", FunctionParent::Class(any));
    to_string.dispatch_receiver = Some(Param::new("this", Type::Class(any)));
    to_string.return_type = Type::Str;
    let any_to_string = store.add_function(to_string);

    let mut cloneable_class = Class::new("Cloneable", core_file, ClassKind::Interface);
    cloneable_class.supertypes.push(any);
    let cloneable = store.add_class(cloneable_class);

    // `clone` carries a default body on the marker interface, but is never
    // routed through a companion; the target runtime provides it.
    let mut clone = Function::new("clone", FunctionParent::Class(cloneable));
    clone.dispatch_receiver = Some(Param::new("this", Type::Class(cloneable)));
    clone.return_type = Type::Class(any);
    clone.body = Some(crate::expr::Expr::Unit);
    let cloneable_clone = store.add_function(clone);

    Builtins {
        core_file,
        any,
        any_equals,
        any_hash_code,
        any_to_string,
        cloneable,
        cloneable_clone,
    }
}
