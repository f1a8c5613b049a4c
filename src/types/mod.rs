//! Type descriptor model
//!
//! Types referenced by generated code are described by fully qualified names plus
//! array dimension and optional generic arguments. Descriptors come either from
//! textual specs (tag attributes) or from statically declared [`NativeType`]
//! references supplied by tag handlers.

mod argument;
mod descriptor;
mod native;

pub use argument::*;
pub use descriptor::*;
pub use native::*;
