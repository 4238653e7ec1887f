//! Declaration-tree IR for the Larch compiler backend.
//!
//! The backend operates on a tree of declarations (file -> class -> member)
//! plus the expression trees nested inside function bodies. Declarations live
//! in an arena, [`IrStore`], and refer to each other through copyable ids
//! ([`FileId`], [`ClassId`], [`FuncId`], [`PropId`]). The store is passed
//! explicitly to every phase that reads or rewrites the tree; there is no
//! ambient global state.
//!
//! A fresh store always contains the well-known core declarations (the
//! universal root class `Any` and the `Cloneable` marker interface), exposed
//! through [`Builtins`].

pub mod builtins;
pub mod decl;
pub mod dump;
pub mod expr;
mod resolve;
pub mod ty;

pub use builtins::Builtins;
pub use decl::{
    Class, ClassKind, File, Function, FunctionParent, Member, Modality, Origin, Property,
    Visibility,
};
pub use expr::{CallExpr, Expr, ParamSlot};
pub use ty::{Param, Type};

use serde::Serialize;

/// A unique identifier for a source file within a compilation unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FileId(pub u32);

/// A unique identifier for a class or interface declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ClassId(pub u32);

/// A unique identifier for a function declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FuncId(pub u32);

/// A unique identifier for a property declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PropId(pub u32);

/// Arena holding every declaration of a compilation unit.
///
/// Declarations are stored in insertion order and addressed by id; ids are
/// never invalidated. Lowering phases mutate declarations in place through
/// the `*_mut` accessors and append synthesized declarations with the `add_*`
/// methods.
#[derive(Debug)]
pub struct IrStore {
    files: Vec<File>,
    classes: Vec<Class>,
    functions: Vec<Function>,
    properties: Vec<Property>,
    /// Well-known core declarations, installed by [`IrStore::new`].
    pub builtins: Builtins,
}

impl IrStore {
    /// Create a store with the core declarations (`Any`, `Cloneable`)
    /// already installed.
    pub fn new() -> Self {
        let mut store = Self {
            files: Vec::new(),
            classes: Vec::new(),
            functions: Vec::new(),
            properties: Vec::new(),
            builtins: Builtins::default(),
        };
        store.builtins = builtins::install(&mut store);
        store
    }

    pub fn file(&self, id: FileId) -> &File {
        &self.files[id.0 as usize]
    }

    pub fn file_mut(&mut self, id: FileId) -> &mut File {
        &mut self.files[id.0 as usize]
    }

    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.0 as usize]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.classes[id.0 as usize]
    }

    pub fn func(&self, id: FuncId) -> &Function {
        &self.functions[id.0 as usize]
    }

    pub fn func_mut(&mut self, id: FuncId) -> &mut Function {
        &mut self.functions[id.0 as usize]
    }

    pub fn prop(&self, id: PropId) -> &Property {
        &self.properties[id.0 as usize]
    }

    pub fn prop_mut(&mut self, id: PropId) -> &mut Property {
        &mut self.properties[id.0 as usize]
    }

    /// Add a source file and return its assigned id.
    pub fn add_file(&mut self, package: &str, name: &str) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(File {
            package: package.to_string(),
            name: name.to_string(),
            classes: Vec::new(),
            functions: Vec::new(),
        });
        id
    }

    /// Add a top-level class and record it in its file's class list.
    pub fn add_class(&mut self, class: Class) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        let file = class.file;
        self.classes.push(class);
        self.file_mut(file).classes.push(id);
        id
    }

    /// Add a class nested inside `parent`, recording it as a member.
    pub fn add_nested_class(&mut self, parent: ClassId, class: Class) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(class);
        self.class_mut(parent).members.push(Member::Class(id));
        id
    }

    /// Add a function and attach it to its parent declaration: class members
    /// are appended to the class's member list, file-level functions to the
    /// file's function list.
    pub fn add_function(&mut self, func: Function) -> FuncId {
        let id = FuncId(self.functions.len() as u32);
        let parent = func.parent;
        self.functions.push(func);
        match parent {
            FunctionParent::Class(class) => {
                self.class_mut(class).members.push(Member::Function(id));
            }
            FunctionParent::File(file) => {
                self.file_mut(file).functions.push(id);
            }
        }
        id
    }

    /// Add a function without attaching it anywhere. Used for property
    /// accessors (owned by their [`Property`]) and for declarations that a
    /// later step splices into a member list itself.
    pub fn add_detached_function(&mut self, func: Function) -> FuncId {
        let id = FuncId(self.functions.len() as u32);
        self.functions.push(func);
        id
    }

    /// Add a property and record it as a member of its class.
    pub fn add_property(&mut self, prop: Property) -> PropId {
        let id = PropId(self.properties.len() as u32);
        let class = prop.class;
        self.properties.push(prop);
        self.class_mut(class).members.push(Member::Property(id));
        id
    }

    /// The class a function is a member of, or `None` for file-level
    /// functions.
    pub fn parent_class(&self, func: FuncId) -> Option<ClassId> {
        match self.func(func).parent {
            FunctionParent::Class(class) => Some(class),
            FunctionParent::File(_) => None,
        }
    }

    /// Whether a function is declared as a member of an interface.
    pub fn is_interface_member(&self, func: FuncId) -> bool {
        self.parent_class(func)
            .is_some_and(|class| self.class(class).kind == ClassKind::Interface)
    }

    /// Whether a function is one of the root-type operations declared on
    /// `Any`: equality, hashing, or string conversion.
    pub fn is_root_operation(&self, func: FuncId) -> bool {
        func == self.builtins.any_equals
            || func == self.builtins.any_hash_code
            || func == self.builtins.any_to_string
    }

    /// All classes declared in a file, nested classes included, in
    /// declaration order.
    pub fn classes_in_file(&self, file: FileId) -> Vec<ClassId> {
        let mut out = self.file(file).classes.clone();
        let mut i = 0;
        while i < out.len() {
            for member in &self.class(out[i]).members {
                if let Member::Class(nested) = member {
                    out.push(*nested);
                }
            }
            i += 1;
        }
        out
    }
}

impl Default for IrStore {
    fn default() -> Self {
        Self::new()
    }
}
