//! bcx compiler core: lexer, parser, semantic analyzer, and C emitter for
//! the B language.
//!
//! - `lexer` - logos-based tokenization, `*` escapes, compound assignment
//! - `parser` - recursive descent to a tagged tree
//! - `analyze` - scopes, lvalues, labels, switch tables, frame layout
//! - `emit` - portable C output
//! - `diagnostics` - shared sink and rendering
//! - `unit` - staged pipeline facade

pub mod analyze;
pub mod diagnostics;
pub mod emit;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod span;
pub mod unit;

pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use source::{Source, SourceId, SourceMap, SourceName};
pub use span::Span;
pub use unit::{Unit, UnitAnalyzed, UnitBuilder, UnitParsed};

/// Errors surfaced by the one-shot compilation helpers.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("compilation failed with {} errors", .0.error_count())]
    Invalid(Diagnostics),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Compile a source map straight to C text.
pub fn compile(source_map: SourceMap, config: bcx_core::Config) -> Result<String> {
    let unit = UnitBuilder::new(source_map)
        .with_config(config)
        .parse()
        .analyze();
    unit.emit()
        .map_err(|_| Error::Invalid(unit.diagnostics().clone()))
}
