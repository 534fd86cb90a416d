//! C emission from an analyzed translation unit.
//!
//! The emitter assumes a clean semantic pass; callers gate it on the
//! diagnostics sink. Any invariant violation inside the emitter is a defect
//! and panics with the failing construct.

mod emitter;
mod runtime;


pub use emitter::emit;
pub use runtime::{ExternForm, runtime_entry};

/// Errors that stop emission before any output is produced.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EmitError {
    /// The unit has error diagnostics; no IR is produced.
    #[error("translation unit has errors; no output emitted")]
    InvalidUnit,
}
