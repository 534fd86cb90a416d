//! The B word model.
//!
//! B has exactly one value representation: the machine word. bcx represents
//! words as `i64` during compilation regardless of the configured width;
//! `WordSize` narrows results to the configured width by masking and
//! sign-extension, matching what the emitted code does at run time.

use serde::Serialize;

/// Configured width of the B word.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WordSize {
    W16,
    W32,
    /// Host pointer width; arithmetic is not masked.
    #[default]
    Host,
}

impl WordSize {
    /// Width in bits. `Host` reports the host pointer width.
    pub fn bits(self) -> u32 {
        match self {
            WordSize::W16 => 16,
            WordSize::W32 => 32,
            WordSize::Host => usize::BITS,
        }
    }

    /// Maximum number of bytes in a character constant.
    pub fn char_capacity(self) -> usize {
        (self.bits() / 8) as usize
    }

    /// Whether emitted arithmetic needs an explicit wrap mask.
    pub fn needs_mask(self) -> bool {
        !matches!(self, WordSize::Host)
    }

    /// Reduce a host-width value to this width: truncate modulo 2^N, then
    /// sign-extend back into the host word.
    pub fn wrap(self, v: i64) -> i64 {
        match self {
            WordSize::W16 => v as i16 as i64,
            WordSize::W32 => v as i32 as i64,
            WordSize::Host => v,
        }
    }

    /// Whether `v` is representable at this width.
    pub fn contains(self, v: i64) -> bool {
        self.wrap(v) == v
    }
}

/// Pointer addressing mode for the emitted code.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerMode {
    /// Classical B: `p + 1` advances one word; dereference scales.
    Word,
    /// `p + 1` advances one byte; indexing scales by the word size.
    #[default]
    Byte,
}

/// Pack the bytes of a character constant into a word, first byte most
/// significant: `'AB'` packs to `'A' * 256 + 'B'`.
///
/// The caller is responsible for checking that `bytes` fits the configured
/// word width.
pub fn pack_chars(bytes: &[u8]) -> i64 {
    let mut v: i64 = 0;
    for &b in bytes {
        v = (v << 8) | i64::from(b);
    }
    v
}
