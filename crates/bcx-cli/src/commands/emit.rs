use bcx_compiler::UnitBuilder;

use super::common::{load_sources, report};
use crate::cli::EmitParams;

pub fn run(params: EmitParams) -> i32 {
    let source_map = match load_sources(&params.inputs) {
        Ok(map) => map,
        Err(msg) => {
            eprintln!("error: {msg}");
            return 1;
        }
    };

    let unit = UnitBuilder::new(source_map)
        .with_config(params.config)
        .parse()
        .analyze();
    report(&unit, params.color);

    let text = match unit.emit() {
        Ok(text) => text,
        Err(_) => return 1,
    };

    match &params.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &text) {
                eprintln!("error: cannot write {}: {e}", path.display());
                return 1;
            }
        }
        None => print!("{text}"),
    }
    0
}
