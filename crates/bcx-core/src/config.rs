//! The per-invocation configuration record.

use serde::Serialize;

use crate::word::{PointerMode, WordSize};

/// Compiler configuration, fixed at startup and read-only afterwards.
///
/// `pointer_mode` and `word_size` change the meaning of emitted code;
/// the remaining fields only steer the driver.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Config {
    pub pointer_mode: PointerMode,
    pub word_size: WordSize,
    /// Stop after writing the C translation unit instead of invoking the
    /// downstream toolchain.
    pub emit_intermediate: bool,
    /// Library names handed to the downstream linker (`-l`).
    pub link_libraries: Vec<String>,
    /// Flags passed verbatim to the downstream C compiler.
    pub extra_cflags: Vec<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pointer_mode(mut self, mode: PointerMode) -> Self {
        self.pointer_mode = mode;
        self
    }

    pub fn with_word_size(mut self, size: WordSize) -> Self {
        self.word_size = size;
        self
    }
}
