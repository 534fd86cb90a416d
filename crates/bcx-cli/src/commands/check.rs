use bcx_compiler::UnitBuilder;

use super::common::{load_sources, report};
use crate::cli::CheckParams;

pub fn run(params: CheckParams) -> i32 {
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

    // Silent on success, like cc.
    report(&unit, params.color);
    if unit.is_valid() { 0 } else { 1 }
}
