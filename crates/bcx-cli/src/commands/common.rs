//! Shared helpers for the CLI commands.

use std::path::PathBuf;

use bcx_compiler::{SourceMap, UnitAnalyzed};

use crate::cli::ColorChoice;

/// Load all input files into a source map. I/O failures are fatal for the
/// invocation and reported immediately.
pub fn load_sources(inputs: &[PathBuf]) -> Result<SourceMap, String> {
    let mut map = SourceMap::new();
    for path in inputs {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        map.add_file(&path.to_string_lossy(), &content);
    }
    Ok(map)
}

/// Print every diagnostic (errors, warnings, notes) to stderr.
pub fn report(unit: &UnitAnalyzed, color: ColorChoice) {
    if unit.diagnostics().is_empty() {
        return;
    }
    eprint!(
        "{}",
        unit.diagnostics()
            .printer(unit.source_map())
            .colored(color.should_colorize())
            .render()
    );
}
