//! Semantic analysis.
//!
//! Resolves names against lexically chained scopes, classifies every
//! reference, validates lvalue usage, checks goto targets and switch
//! structure, and assigns frame slots. Output is an [`Analysis`] of side
//! tables; the tree itself is never mutated.

mod analysis;
mod consts;
mod resolve;

#[cfg(test)]
mod consts_tests;
#[cfg(test)]
mod resolve_tests;

pub use analysis::{
    Analysis, Binding, BindingId, BindingKind, CaseInfo, FunctionInfo, SwitchInfo,
};
pub use consts::{eval_const, is_const_initializer};
pub use resolve::analyze;
