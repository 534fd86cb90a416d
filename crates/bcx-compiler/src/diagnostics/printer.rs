//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use super::{Diagnostic, Diagnostics, Severity};
use crate::source::SourceMap;
use crate::span::Span;

/// Renders a [`Diagnostics`] collection against a [`SourceMap`].
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source_map: &'s SourceMap,
    colored: bool,
    snippets: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics, source_map: &'s SourceMap) -> Self {
        Self {
            diagnostics,
            source_map,
            colored: false,
            snippets: true,
        }
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    /// Disable source snippets; emit only `file:line:col: severity: message`
    /// lines.
    pub fn plain(mut self) -> Self {
        self.snippets = false;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        if self.diagnostics.is_empty() {
            return Ok(());
        }

        let mut sorted = self.diagnostics.clone();
        sorted.sort();

        if !self.snippets {
            return self.format_plain(w, &sorted);
        }

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in sorted.iter().enumerate() {
            let source = self.source_map.get(diag.source);
            let range = adjust_span(diag.span, source.text.len());

            let mut snippet = Snippet::source(source.text)
                .path(source.name.display())
                .line_start(1)
                .annotation(
                    AnnotationKind::Primary
                        .span(range)
                        .label(&diag.message),
                );

            for related in &diag.related {
                snippet = snippet.annotation(
                    AnnotationKind::Context
                        .span(adjust_span(related.span, source.text.len()))
                        .label(&related.message),
                );
            }

            let level = severity_to_level(diag.severity);
            let report: Vec<Group> = vec![level.primary_title(&diag.message).element(snippet)];

            if i > 0 {
                w.write_char('\n')?;
            }
            writeln!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }

    fn format_plain(&self, w: &mut impl Write, sorted: &Diagnostics) -> std::fmt::Result {
        for diag in sorted.iter() {
            writeln!(w, "{}", self.one_line(diag))?;
        }
        Ok(())
    }

    /// `file:line:col: severity: message` for a single diagnostic.
    pub fn one_line(&self, diag: &Diagnostic) -> String {
        let name = self.source_map.name(diag.source);
        let (line, col) = self.source_map.line_col(diag.source, diag.span.start);
        format!(
            "{}:{}:{}: {}: {}",
            name, line, col, diag.severity, diag.message
        )
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
        Severity::Note => Level::NOTE,
    }
}

/// annotate-snippets wants a non-empty range inside the source.
fn adjust_span(span: Span, limit: usize) -> std::ops::Range<usize> {
    let start = (span.start as usize).min(limit);
    let end = (span.end as usize).min(limit);

    if start == end {
        return start..(start + 1).min(limit).max(start);
    }
    start..end
}

impl Diagnostics {
    pub fn printer<'d, 's>(&'d self, source_map: &'s SourceMap) -> DiagnosticsPrinter<'d, 's> {
        DiagnosticsPrinter::new(self, source_map)
    }
}
