use bcx_compiler::UnitBuilder;

use super::common::{load_sources, report};
use crate::cli::AstParams;

pub fn run(params: AstParams) -> i32 {
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
    if !unit.is_valid() {
        return 1;
    }

    // One JSON object per source, keyed by display name.
    let dump: serde_json::Map<String, serde_json::Value> = unit
        .asts()
        .iter()
        .map(|(&id, program)| {
            let name = unit.source_map().name(id).display().to_owned();
            let value = serde_json::to_value(program).expect("AST serializes");
            (name, value)
        })
        .collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::Value::Object(dump))
            .expect("JSON renders")
    );
    0
}
