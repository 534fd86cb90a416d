//! Analysis output: bindings and per-node annotations.
//!
//! The tree itself stays immutable; everything the analyzer learns is keyed
//! by [`NodeId`] or function name and set exactly once here.

use indexmap::{IndexMap, IndexSet};

use bcx_core::{Name, NameTable};

use crate::parser::ast::NodeId;
use crate::source::SourceId;
use crate::span::Span;

/// A lightweight handle to a [`Binding`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BindingId(u32);

impl BindingId {
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a resolved name refers to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BindingKind {
    /// File-scope variable defined in this translation unit.
    Global,
    /// External reference, explicit (`extrn`) or implicit.
    Extern,
    /// Function-local variable with a frame slot.
    Auto,
    /// Function parameter with a frame slot.
    Param,
    /// Function defined in this translation unit.
    Function,
    /// Statement label; lives in the function-flat label namespace.
    Label,
}

/// One named entity.
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: Name,
    pub kind: BindingKind,
    pub source: SourceId,
    pub def_span: Span,
    /// Frame slot index for Auto/Param bindings.
    pub slot: Option<u32>,
    /// Reserved storage cells following the slot, for auto vectors.
    pub cells: Option<u32>,
}

/// One collected `case` of a switch, in source order.
#[derive(Debug, Clone, Copy)]
pub struct CaseInfo {
    /// Constant, already reduced to the configured word width.
    pub value: i64,
    /// The `Case` statement the dispatch jumps to.
    pub stmt: NodeId,
}

/// Case table of one switch statement.
#[derive(Debug, Clone, Default)]
pub struct SwitchInfo {
    pub cases: Vec<CaseInfo>,
    /// The `Default` statement, at most one.
    pub default: Option<NodeId>,
}

/// Per-function metadata produced by the analyzer.
#[derive(Debug, Clone, Default)]
pub struct FunctionInfo {
    /// Total frame slots (parameters, locals, vector storage).
    pub frame_size: u32,
    /// Slot of each parameter, in declaration order.
    pub param_slots: Vec<u32>,
    /// Label definitions, name to definition site.
    pub labels: IndexMap<Name, Span>,
    /// Case tables keyed by the `Switch` statement node.
    pub switches: IndexMap<NodeId, SwitchInfo>,
}

/// Everything the semantic pass learned about a translation unit.
#[derive(Debug, Default)]
pub struct Analysis {
    pub names: NameTable,
    bindings: Vec<Binding>,
    /// Name references, declarations, and extrn names to their binding.
    pub resolutions: IndexMap<NodeId, BindingId>,
    /// Expressions that denote storage (assignable).
    pub lvalues: IndexSet<NodeId>,
    /// Per-function records, in definition order.
    pub functions: IndexMap<Name, FunctionInfo>,
    /// Extern names that appear in call position.
    pub called_externs: IndexSet<Name>,
    /// Extern names that are assigned, addressed, or incremented; these
    /// must be declared as word variables, not functions.
    pub addressed_externs: IndexSet<Name>,
}

impl Analysis {
    pub fn add_binding(&mut self, binding: Binding) -> BindingId {
        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push(binding);
        id
    }

    #[inline]
    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.index()]
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Resolved binding for a name reference or declaration node.
    pub fn resolution(&self, node: NodeId) -> Option<BindingId> {
        self.resolutions.get(&node).copied()
    }

    pub fn is_lvalue(&self, node: NodeId) -> bool {
        self.lvalues.contains(&node)
    }

    /// Extern bindings in first-reference order, deduplicated by name.
    pub fn extern_names(&self) -> IndexSet<Name> {
        self.bindings
            .iter()
            .filter(|b| b.kind == BindingKind::Extern)
            .map(|b| b.name)
            .collect()
    }
}
