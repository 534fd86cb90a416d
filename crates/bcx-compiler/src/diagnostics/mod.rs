//! Compiler diagnostics infrastructure.
//!
//! Every stage pushes messages into a shared [`Diagnostics`] sink. Emission
//! is gated on `has_errors()`; warnings and notes never block it.

mod printer;


pub use printer::DiagnosticsPrinter;

use crate::source::SourceId;
use crate::span::Span;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Note,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// Related location information attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) span: Span,
    pub(crate) message: String,
}

/// A diagnostic message with source location, message, and severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub(crate) severity: Severity,
    pub(crate) source: SourceId,
    pub(crate) span: Span,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// Collection of diagnostic messages from all pipeline stages.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<Diagnostic>,
}

/// Builder for a single diagnostic.
#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: Diagnostic,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(
        &mut self,
        source: SourceId,
        msg: impl Into<String>,
        span: Span,
    ) -> DiagnosticBuilder<'_> {
        self.build(Severity::Error, source, msg, span)
    }

    pub fn warning(
        &mut self,
        source: SourceId,
        msg: impl Into<String>,
        span: Span,
    ) -> DiagnosticBuilder<'_> {
        self.build(Severity::Warning, source, msg, span)
    }

    pub fn note(
        &mut self,
        source: SourceId,
        msg: impl Into<String>,
        span: Span,
    ) -> DiagnosticBuilder<'_> {
        self.build(Severity::Note, source, msg, span)
    }

    fn build(
        &mut self,
        severity: Severity,
        source: SourceId,
        msg: impl Into<String>,
        span: Span,
    ) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: Diagnostic {
                severity,
                source,
                span,
                message: msg.into(),
                related: Vec::new(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.messages.iter().any(|d| d.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_warning()).count()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    /// Stable sort by (source, offset, severity), the reporting order the
    /// compiler guarantees. Called by the printer before rendering.
    pub fn sort(&mut self) {
        self.messages
            .sort_by_key(|d| (d.source, d.span.start, d.severity));
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl DiagnosticBuilder<'_> {
    pub fn related_to(mut self, msg: impl Into<String>, span: Span) -> Self {
        self.message.related.push(RelatedInfo {
            span,
            message: msg.into(),
        });
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}
