//! Declaration kinds: files, classes, functions, properties.

use serde::Serialize;

use crate::expr::Expr;
use crate::ty::{Param, Type};
use crate::{ClassId, FileId, FuncId, PropId};

/// A source file: a list of top-level classes and free-standing functions
/// under a package path.
#[derive(Debug, Clone)]
pub struct File {
    /// Dot-separated package path, e.g. `"larch.core"`.
    pub package: String,
    /// File name without extension.
    pub name: String,
    /// Top-level classes, in declaration order.
    pub classes: Vec<ClassId>,
    /// File-level functions, in declaration order. Synthesized companion
    /// bodies for interface default methods are appended here.
    pub functions: Vec<FuncId>,
}

/// Whether a class declaration is a concrete class or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassKind {
    Class,
    Interface,
}

/// Inheritance modality of a class or function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Modality {
    Open,
    Abstract,
    Final,
}

/// Declaration visibility. Only `Private` is invisible outside its
/// declaring scope; `Internal` is module-local but still exported in
/// compiled output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Public,
    Internal,
    Private,
}

/// Where a declaration came from. Lowering decisions key off this tag:
/// user-written code is `Source`, everything else is compiler-synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Origin {
    /// Written by the user.
    Source,
    /// A fake override: a body-less stand-in recorded on a class for a
    /// member it inherits without overriding.
    InheritedPlaceholder,
    /// A synthesized dispatcher that fills in default argument values
    /// before calling the real method.
    DefaultArgDispatcher,
    /// A stub for a declaration whose body lives in a separately compiled,
    /// non-source dependency.
    ExternalStub,
    /// A bridge generated on a class, forwarding to the companion body of
    /// an inherited interface default method.
    DefaultBridge,
    /// The companion body itself: the canonical out-of-interface location
    /// of a default method's implementation.
    CompanionBody,
}

/// A class member. Closed so that every decision point matches
/// exhaustively; adding a member kind is a compile-time obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    Function(FuncId),
    Property(PropId),
    Class(ClassId),
}

/// A class or interface declaration.
#[derive(Debug, Clone)]
pub struct Class {
    pub name: String,
    /// The file this class is declared in (also set for nested classes).
    pub file: FileId,
    pub kind: ClassKind,
    pub modality: Modality,
    /// Directly extended/implemented supertypes.
    pub supertypes: Vec<ClassId>,
    /// Ordered member list. Mutated in place by bridge generation.
    pub members: Vec<Member>,
}

impl Class {
    /// Create an open class with no supertypes and no members.
    pub fn new(name: impl Into<String>, file: FileId, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            file,
            kind,
            modality: Modality::Open,
            supertypes: Vec::new(),
            members: Vec::new(),
        }
    }
}

/// The declaration a function is a member of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionParent {
    Class(ClassId),
    File(FileId),
}

/// A function declaration.
///
/// Receivers are modeled as two optional slots next to the ordinary value
/// parameters: the dispatch receiver (the `this` of a virtual member) and
/// the extension receiver. File-level functions carry neither.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub parent: FunctionParent,
    pub origin: Origin,
    pub visibility: Visibility,
    pub modality: Modality,
    /// Type parameter names; referenced by index from [`Type::Param`].
    pub type_params: Vec<String>,
    pub dispatch_receiver: Option<Param>,
    pub extension_receiver: Option<Param>,
    pub value_params: Vec<Param>,
    pub return_type: Type,
    /// The function(s) in supertypes this declaration overrides or stands
    /// in for.
    pub overridden: Vec<FuncId>,
    pub body: Option<Expr>,
    /// The body is supplied by the target platform, not by source.
    pub platform_dependent: bool,
    /// Per-function override: treat this interface method as natively
    /// supported by the target runtime regardless of the global mode.
    pub force_native_default: bool,
}

impl Function {
    /// Create a public, open, source-origin function with no parameters,
    /// no body, and a `Unit` return type.
    pub fn new(name: impl Into<String>, parent: FunctionParent) -> Self {
        Self {
            name: name.into(),
            parent,
            origin: Origin::Source,
            visibility: Visibility::Public,
            modality: Modality::Open,
            type_params: Vec::new(),
            dispatch_receiver: None,
            extension_receiver: None,
            value_params: Vec::new(),
            return_type: Type::Unit,
            overridden: Vec::new(),
            body: None,
            platform_dependent: false,
            force_native_default: false,
        }
    }
}

/// A property declaration: an optional getter and an optional setter, each
/// an independent function. The lowering passes never treat a property as a
/// unit; accessors are visited separately.
#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    /// The class this property is a member of.
    pub class: ClassId,
    pub getter: Option<FuncId>,
    pub setter: Option<FuncId>,
}
