//! Interface default-method lowering for the Larch backend.
//!
//! The target runtime's object model cannot carry method bodies inside
//! interfaces (or must not rely on that support in compatibility mode).
//! Four passes make the source language's default methods executable
//! anyway:
//!
//! 1. [`bridges`] -- generate a concrete forwarding function on every class
//!    that inherits, but does not override, an interface default method.
//! 2. [`super_calls`] -- redirect explicit `super<Interface>.m()` calls to
//!    the companion body.
//! 3. [`default_args`] -- redirect calls to interface default-argument
//!    dispatchers to the companion body, guarding against self-recursion.
//! 4. [`root_calls`] -- resolve calls to `Any`'s operations made through an
//!    interface-typed value to the concrete implementation.
//!
//! All four share one oracle, [`oracle::redirection_target`], so the
//! decision "does this function have a usable default implementation, and
//! where" is computed identically everywhere.

mod bridges;
mod default_args;
mod error;
mod factory;
pub mod oracle;
mod root_calls;
mod super_calls;
mod traverse;

pub use error::LowerError;
pub use factory::DeclarationFactory;
pub use oracle::{excluded_from_companion, redirection_target, ExclusionRule};

use larch_ir::{FileId, Function, IrStore};
use serde::Serialize;

/// How the target runtime's native in-interface method bodies are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DefaultMethodMode {
    /// Trust native support: default bodies stay on the interface and no
    /// redirection happens.
    Native,
    /// Native bodies exist, but companions and bridges are still emitted so
    /// separately compiled clients that predate native support keep working.
    Compatibility,
    /// No native support: everything is routed through companions.
    Disabled,
}

impl DefaultMethodMode {
    pub fn is_compatibility(self) -> bool {
        matches!(self, Self::Compatibility)
    }

    /// Whether a function's default body is kept directly on its interface,
    /// so no companion body exists to call. An explicit per-function marker
    /// wins over the global mode.
    pub fn retains_body_on_interface(self, func: &Function) -> bool {
        func.force_native_default || self == Self::Native
    }
}

/// Mutable state threaded through every pass: the global mode and the
/// memoized declaration factory. Passing it explicitly (rather than keeping
/// factory state ambient) makes the ordering dependency between passes
/// visible in their signatures.
#[derive(Debug)]
pub struct LoweringContext {
    pub mode: DefaultMethodMode,
    pub factory: DeclarationFactory,
}

impl LoweringContext {
    pub fn new(mode: DefaultMethodMode) -> Self {
        Self {
            mode,
            factory: DeclarationFactory::new(),
        }
    }
}

/// Run the full lowering sequence over one file.
///
/// Pass order is load-bearing: bridge generation patches the override graph
/// that the call-redirection passes then observe, and the default-argument
/// redirector's self-recursion guard assumes companions already exist for
/// everything bridge generation touched. The sequence is idempotent; running
/// it again over an already-lowered file changes nothing.
pub fn lower_file(
    store: &mut IrStore,
    ctx: &mut LoweringContext,
    file: FileId,
) -> Result<(), LowerError> {
    bridges::run(store, ctx, file)?;
    super_calls::run(store, ctx, file)?;
    default_args::run(store, ctx, file)?;
    root_calls::run(store, file)?;
    Ok(())
}
