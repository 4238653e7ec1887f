//! Deterministic textual rendering of a file's declaration tree.
//!
//! Used by tests for literal before/after comparisons: two dumps are equal
//! exactly when the rendered declarations and bodies are structurally equal.

use crate::decl::{ClassKind, Function, Member, Modality, Origin, Visibility};
use crate::expr::{CallExpr, Expr, ParamSlot};
use crate::ty::Type;
use crate::{ClassId, FileId, FuncId, IrStore};

/// Render a file and everything declared in it.
pub fn dump_file(store: &IrStore, file: FileId) -> String {
    let mut out = String::new();
    let f = store.file(file);
    out.push_str(&format!("file {}\n", f.name));
    for &class in &f.classes {
        dump_class(store, class, 1, &mut out);
    }
    for &func in &f.functions {
        dump_function(store, func, 1, &mut out);
    }
    out
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn dump_class(store: &IrStore, class: ClassId, depth: usize, out: &mut String) {
    let c = store.class(class);
    let modality = match c.modality {
        Modality::Open => "",
        Modality::Abstract => "abstract ",
        Modality::Final => "final ",
    };
    let kind = match c.kind {
        ClassKind::Class => "class",
        ClassKind::Interface => "interface",
    };
    let supers = if c.supertypes.is_empty() {
        String::new()
    } else {
        let names: Vec<&str> = c
            .supertypes
            .iter()
            .map(|&s| store.class(s).name.as_str())
            .collect();
        format!(" : {}", names.join(", "))
    };
    out.push_str(&format!(
        "{}{}{} {}{}\n",
        indent(depth),
        modality,
        kind,
        c.name,
        supers
    ));
    for member in &c.members {
        match *member {
            Member::Function(f) => dump_function(store, f, depth + 1, out),
            Member::Property(p) => {
                let prop = store.prop(p);
                out.push_str(&format!("{}prop {}\n", indent(depth + 1), prop.name));
                if let Some(getter) = prop.getter {
                    dump_function(store, getter, depth + 2, out);
                }
                if let Some(setter) = prop.setter {
                    dump_function(store, setter, depth + 2, out);
                }
            }
            Member::Class(nested) => dump_class(store, nested, depth + 1, out),
        }
    }
}

fn dump_function(store: &IrStore, func: FuncId, depth: usize, out: &mut String) {
    let f = store.func(func);
    let vis = match f.visibility {
        Visibility::Public => "",
        Visibility::Internal => "internal ",
        Visibility::Private => "private ",
    };
    let tps = if f.type_params.is_empty() {
        String::new()
    } else {
        format!("<{}>", f.type_params.join(", "))
    };
    let mut params = Vec::new();
    if let Some(d) = &f.dispatch_receiver {
        params.push(format!("this: {}", type_str(store, f, &d.ty)));
    }
    if let Some(e) = &f.extension_receiver {
        params.push(format!("recv: {}", type_str(store, f, &e.ty)));
    }
    for p in &f.value_params {
        params.push(format!("{}: {}", p.name, type_str(store, f, &p.ty)));
    }
    let mut tags = vec![origin_tag(f.origin)];
    if f.platform_dependent {
        tags.push("platform");
    }
    if f.force_native_default {
        tags.push("native");
    }
    let body = match &f.body {
        Some(expr) => format!(" = {}", expr_str(store, f, expr)),
        None => String::new(),
    };
    out.push_str(&format!(
        "{}{}fun {}{}({}): {} [{}]{}\n",
        indent(depth),
        vis,
        f.name,
        tps,
        params.join(", "),
        type_str(store, f, &f.return_type),
        tags.join(", "),
        body
    ));
}

fn origin_tag(origin: Origin) -> &'static str {
    match origin {
        Origin::Source => "source",
        Origin::InheritedPlaceholder => "placeholder",
        Origin::DefaultArgDispatcher => "dispatcher",
        Origin::ExternalStub => "stub",
        Origin::DefaultBridge => "bridge",
        Origin::CompanionBody => "companion",
    }
}

fn type_str(store: &IrStore, func: &Function, ty: &Type) -> String {
    match ty {
        Type::Unit => "Unit".to_string(),
        Type::Bool => "Bool".to_string(),
        Type::Int => "Int".to_string(),
        Type::Str => "Str".to_string(),
        Type::Class(class) => store.class(*class).name.clone(),
        Type::Param(i) => func
            .type_params
            .get(*i)
            .cloned()
            .unwrap_or_else(|| format!("T{}", i)),
    }
}

fn expr_str(store: &IrStore, func: &Function, expr: &Expr) -> String {
    match expr {
        Expr::Unit => "()".to_string(),
        Expr::IntLit(n) => n.to_string(),
        Expr::GetParam(slot) => param_str(func, *slot),
        Expr::Call(call) => call_str(store, func, call),
        Expr::Return(inner) => format!("return {}", expr_str(store, func, inner)),
        Expr::Block(exprs) => {
            let parts: Vec<String> = exprs.iter().map(|e| expr_str(store, func, e)).collect();
            format!("{{ {} }}", parts.join("; "))
        }
    }
}

fn param_str(func: &Function, slot: ParamSlot) -> String {
    match slot {
        ParamSlot::Dispatch => "this".to_string(),
        ParamSlot::Extension => "recv".to_string(),
        ParamSlot::Value(i) => func
            .value_params
            .get(i)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("p{}", i)),
    }
}

fn call_str(store: &IrStore, func: &Function, call: &CallExpr) -> String {
    let prefix = match call.super_qualifier {
        Some(class) => format!("super<{}>.", store.class(class).name),
        None => String::new(),
    };
    let targs = if call.type_args.is_empty() {
        String::new()
    } else {
        let parts: Vec<String> = call
            .type_args
            .iter()
            .map(|t| type_str(store, func, t))
            .collect();
        format!("<{}>", parts.join(", "))
    };
    let mut parts = Vec::new();
    if let Some(d) = &call.dispatch_receiver {
        parts.push(format!("this={}", expr_str(store, func, d)));
    }
    if let Some(e) = &call.extension_receiver {
        parts.push(format!("recv={}", expr_str(store, func, e)));
    }
    for arg in &call.args {
        parts.push(expr_str(store, func, arg));
    }
    format!(
        "{}{}{}({})",
        prefix,
        store.func(call.callee).name,
        targs,
        parts.join(", ")
    )
}
