//! Staged pipeline facade for one translation unit.
//!
//! `UnitBuilder` holds the sources and configuration; `parse()` produces a
//! `UnitParsed`, `analyze()` a `UnitAnalyzed`, and `emit()` the C text.
//! Diagnostics accumulate across stages; emission is gated on them.

use std::ops::Deref;

use indexmap::IndexMap;

use bcx_core::Config;

use crate::analyze::{self, Analysis};
use crate::diagnostics::Diagnostics;
use crate::emit::{self, EmitError};
use crate::lexer::lex;
use crate::parser::ast::Program;
use crate::parser::parse;
use crate::source::{SourceId, SourceMap};

pub type AstMap = IndexMap<SourceId, Program>;

pub struct UnitBuilder {
    source_map: SourceMap,
    config: Config,
}

impl UnitBuilder {
    pub fn new(source_map: SourceMap) -> Self {
        Self {
            source_map,
            config: Config::default(),
        }
    }

    pub fn inline(src: &str) -> Self {
        Self::new(SourceMap::inline(src))
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Lex and parse every source. Never fails; problems land in the
    /// diagnostics sink and parsing continues.
    pub fn parse(self) -> UnitParsed {
        let mut diag = Diagnostics::new();
        let mut asts = IndexMap::new();
        let mut next_node = 0u32;

        for source in self.source_map.iter() {
            let tokens = lex(source.text, source.id, self.config.word_size, &mut diag);
            let (program, next) =
                parse(source.text, source.id, tokens, next_node, &mut diag);
            next_node = next;
            asts.insert(source.id, program);
        }

        UnitParsed {
            source_map: self.source_map,
            config: self.config,
            diag,
            asts,
        }
    }
}

pub struct UnitParsed {
    source_map: SourceMap,
    config: Config,
    diag: Diagnostics,
    asts: AstMap,
}

impl UnitParsed {
    pub fn analyze(mut self) -> UnitAnalyzed {
        let analysis = analyze::analyze(&self.asts, &self.config, &mut self.diag);
        UnitAnalyzed {
            parsed: self,
            analysis,
        }
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    pub fn asts(&self) -> &AstMap {
        &self.asts
    }
}

pub struct UnitAnalyzed {
    parsed: UnitParsed,
    analysis: Analysis,
}

pub type Unit = UnitAnalyzed;

impl UnitAnalyzed {
    pub fn is_valid(&self) -> bool {
        !self.parsed.diag.has_errors()
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    /// Emit the C translation unit. Gated: any error diagnostic means no
    /// output.
    pub fn emit(&self) -> Result<String, EmitError> {
        if !self.is_valid() {
            return Err(EmitError::InvalidUnit);
        }
        Ok(emit::emit(&self.parsed.asts, &self.analysis, &self.parsed.config))
    }
}

impl Deref for UnitAnalyzed {
    type Target = UnitParsed;

    fn deref(&self) -> &Self::Target {
        &self.parsed
    }
}

impl TryFrom<&str> for UnitAnalyzed {
    type Error = crate::Error;

    fn try_from(src: &str) -> Result<Self, crate::Error> {
        let unit = UnitBuilder::inline(src).parse().analyze();
        if !unit.is_valid() {
            return Err(crate::Error::Invalid(unit.diagnostics().clone()));
        }
        Ok(unit)
    }
}
