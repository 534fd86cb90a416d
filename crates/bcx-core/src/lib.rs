//! Core data structures shared across the bcx compiler.
//!
//! Three pieces live here:
//! - `names` - identifier handles with their mangled C spellings
//! - `word` - the B word model (sizes, wraparound, character packing)
//! - `config` - the per-invocation configuration record

mod config;
mod names;
mod word;

#[cfg(test)]
mod names_tests;
#[cfg(test)]
mod word_tests;

pub use config::Config;
pub use names::{Name, NameTable};
pub use word::{PointerMode, WordSize, pack_chars};
