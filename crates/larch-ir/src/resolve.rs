//! Fake-override resolution.
//!
//! A fake override is a body-less stand-in recorded on a class for a member
//! it inherits without overriding. Resolution walks the overridden chain to
//! the most-derived declaration that is not itself a stand-in.

use rustc_hash::FxHashSet;

use crate::decl::{Modality, Origin};
use crate::{FuncId, IrStore};

impl IrStore {
    /// Resolve a fake override to the real declaration it stands in for.
    ///
    /// Non-placeholder functions resolve to themselves. For placeholders the
    /// overridden chain is searched depth-first; a concrete, body-carrying
    /// candidate wins over an abstract one. Returns `None` when the chain
    /// contains no real declaration at all.
    pub fn resolve_fake_override(&self, func: FuncId) -> Option<FuncId> {
        if self.func(func).origin != Origin::InheritedPlaceholder {
            return Some(func);
        }
        let mut seen = FxHashSet::default();
        seen.insert(func);
        self.resolve_real_override(func, &mut seen)
    }

    fn resolve_real_override(&self, func: FuncId, seen: &mut FxHashSet<FuncId>) -> Option<FuncId> {
        let mut fallback = None;
        for &overridden in &self.func(func).overridden {
            if !seen.insert(overridden) {
                continue;
            }
            let real = if self.func(overridden).origin == Origin::InheritedPlaceholder {
                self.resolve_real_override(overridden, seen)
            } else {
                Some(overridden)
            };
            if let Some(real) = real {
                let decl = self.func(real);
                if decl.body.is_some() && decl.modality != Modality::Abstract {
                    return Some(real);
                }
                fallback.get_or_insert(real);
            }
        }
        fallback
    }
}

#[cfg(test)]
mod tests {
    use crate::decl::{Class, ClassKind, Function, FunctionParent, Modality, Origin};
    use crate::expr::Expr;
    use crate::{FuncId, IrStore};

    fn placeholder(store: &mut IrStore, class: crate::ClassId, overridden: Vec<FuncId>) -> FuncId {
        let mut f = Function::new("m", FunctionParent::Class(class));
        f.origin = Origin::InheritedPlaceholder;
        f.overridden = overridden;
        store.add_function(f)
    }

    #[test]
    fn real_function_resolves_to_itself() {
        let mut store = IrStore::new();
        let file = store.add_file("demo", "main");
        let class = store.add_class(Class::new("A", file, ClassKind::Class));
        let f = store.add_function(Function::new("m", FunctionParent::Class(class)));
        assert_eq!(store.resolve_fake_override(f), Some(f));
    }

    #[test]
    fn walks_a_chain_of_placeholders() {
        let mut store = IrStore::new();
        let file = store.add_file("demo", "main");
        let iface = store.add_class(Class::new("I", file, ClassKind::Interface));
        let mid = store.add_class(Class::new("Mid", file, ClassKind::Interface));
        let class = store.add_class(Class::new("C", file, ClassKind::Class));

        let mut real = Function::new("m", FunctionParent::Class(iface));
        real.body = Some(Expr::Unit);
        let real = store.add_function(real);
        let mid_ph = placeholder(&mut store, mid, vec![real]);
        let ph = placeholder(&mut store, class, vec![mid_ph]);

        assert_eq!(store.resolve_fake_override(ph), Some(real));
    }

    #[test]
    fn prefers_concrete_over_abstract_candidate() {
        let mut store = IrStore::new();
        let file = store.add_file("demo", "main");
        let a = store.add_class(Class::new("A", file, ClassKind::Interface));
        let b = store.add_class(Class::new("B", file, ClassKind::Interface));
        let class = store.add_class(Class::new("C", file, ClassKind::Class));

        let mut abs = Function::new("m", FunctionParent::Class(a));
        abs.modality = Modality::Abstract;
        let abs = store.add_function(abs);
        let mut conc = Function::new("m", FunctionParent::Class(b));
        conc.body = Some(Expr::Unit);
        let conc = store.add_function(conc);

        let ph = placeholder(&mut store, class, vec![abs, conc]);
        assert_eq!(store.resolve_fake_override(ph), Some(conc));
    }

    #[test]
    fn abstract_only_chain_yields_the_abstract_declaration() {
        let mut store = IrStore::new();
        let file = store.add_file("demo", "main");
        let iface = store.add_class(Class::new("I", file, ClassKind::Interface));
        let class = store.add_class(Class::new("C", file, ClassKind::Class));

        let mut abs = Function::new("m", FunctionParent::Class(iface));
        abs.modality = Modality::Abstract;
        let abs = store.add_function(abs);

        let ph = placeholder(&mut store, class, vec![abs]);
        assert_eq!(store.resolve_fake_override(ph), Some(abs));
    }

    #[test]
    fn cyclic_override_chains_terminate() {
        let mut store = IrStore::new();
        let file = store.add_file("demo", "main");
        let class = store.add_class(Class::new("C", file, ClassKind::Class));

        let a = placeholder(&mut store, class, Vec::new());
        let b = placeholder(&mut store, class, vec![a]);
        store.func_mut(a).overridden = vec![b];

        assert_eq!(store.resolve_fake_override(a), None);
    }
}
