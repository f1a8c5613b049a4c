//! Code generation state and emission
//!
//! Tag handlers build the generated class through a [`TranslationContext`]; the
//! [`emitter`] turns the finished context into Java source.

pub mod emitter;
pub mod import;
pub mod method_context;
pub mod names;
pub mod translation_context;
pub mod variable;

pub use emitter::{emit, SourceEmitter};
pub use import::ImportSet;
pub use method_context::MethodContext;
pub use translation_context::{derive_identity, generated_identity, Identity, TranslationContext};
pub use variable::{MethodId, VarId, Variable};
