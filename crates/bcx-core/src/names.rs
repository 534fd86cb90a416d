//! Identifier names and their C spellings.
//!
//! The analyzer hands out a `Name` handle per distinct identifier; scope
//! maps, label tables and switch records all key on handles instead of
//! text. Because every surviving name eventually reaches the emitted C,
//! the table stores the mangled C symbol next to each spelling, computed
//! once at insertion: a fixed `b_` prefix keeps user symbols clear of the
//! runtime's own, and `.` (a name constituent in B, as in `rd.unit`)
//! folds to `_`.

use std::collections::HashMap;

/// Handle to an entry in a [`NameTable`]. Ordered by first insertion.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Name(u32);

impl Name {
    /// Raw index, for dump output.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct NameEntry {
    spelling: String,
    c_name: String,
}

/// Registry of every identifier in a translation unit.
#[derive(Debug, Default)]
pub struct NameTable {
    entries: Vec<NameEntry>,
    index: HashMap<String, u32>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a spelling. Each distinct spelling is stored, and mangled,
    /// exactly once; repeat insertions return the existing handle.
    pub fn insert(&mut self, spelling: &str) -> Name {
        if let Some(&raw) = self.index.get(spelling) {
            return Name(raw);
        }

        let raw = self.entries.len() as u32;
        self.entries.push(NameEntry {
            spelling: spelling.to_owned(),
            c_name: mangle(spelling),
        });
        self.index.insert(spelling.to_owned(), raw);
        Name(raw)
    }

    /// Handle for an already-interned spelling, without inserting.
    pub fn lookup(&self, spelling: &str) -> Option<Name> {
        self.index.get(spelling).map(|&raw| Name(raw))
    }

    /// The B spelling of a name.
    ///
    /// # Panics
    /// Panics on a handle from a different table.
    #[inline]
    pub fn spelling(&self, name: Name) -> &str {
        &self.entries[name.0 as usize].spelling
    }

    /// The mangled C symbol for a name.
    #[inline]
    pub fn c_name(&self, name: Name) -> &str {
        &self.entries[name.0 as usize].c_name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// C symbol for a B name. Deterministic, so repeated compilations agree.
fn mangle(spelling: &str) -> String {
    let mut out = String::with_capacity(spelling.len() + 2);
    out.push_str("b_");
    for ch in spelling.chars() {
        out.push(if ch == '.' { '_' } else { ch });
    }
    out
}
