//! Full build: emit C, compile it together with the bundled runtime, link.

use std::path::PathBuf;
use std::process::Command;

use bcx_core::PointerMode;
use bcx_compiler::UnitBuilder;

use super::common::{load_sources, report};
use crate::cli::BuildParams;

/// The B runtime, compiled alongside the generated translation unit.
const RUNTIME_C: &str = include_str!("../../runtime/brt.c");

pub fn run(params: BuildParams) -> i32 {
    let source_map = match load_sources(&params.inputs) {
        Ok(map) => map,
        Err(msg) => {
            eprintln!("error: {msg}");
            return 1;
        }
    };

    let unit = UnitBuilder::new(source_map)
        .with_config(params.config.clone())
        .parse()
        .analyze();
    report(&unit, params.color);

    let text = match unit.emit() {
        Ok(text) => text,
        Err(_) => return 1,
    };

    let output = params
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("a.out"));

    // Scratch C files; kept next to the output with --keep-c.
    let (gen_c, runtime_c, cleanup) = if params.keep_c {
        (
            output.with_extension("c"),
            output.with_extension("rt.c"),
            false,
        )
    } else {
        let dir = std::env::temp_dir();
        let pid = std::process::id();
        (
            dir.join(format!("bcx-{pid}-gen.c")),
            dir.join(format!("bcx-{pid}-rt.c")),
            true,
        )
    };

    if let Err(e) = std::fs::write(&gen_c, &text) {
        eprintln!("error: cannot write {}: {e}", gen_c.display());
        return 1;
    }
    if let Err(e) = std::fs::write(&runtime_c, RUNTIME_C) {
        eprintln!("error: cannot write {}: {e}", runtime_c.display());
        return 1;
    }

    let mut cc = Command::new(&params.cc);
    // The runtime leans on () declarations for the B entry point.
    cc.arg("-std=gnu17");
    if params.config.pointer_mode == PointerMode::Word {
        cc.arg("-DBCX_WORD_PTR=1");
    }
    for flag in &params.config.extra_cflags {
        cc.arg(flag);
    }
    cc.arg("-o").arg(&output).arg(&gen_c).arg(&runtime_c);
    for lib in &params.config.link_libraries {
        cc.arg(format!("-l{lib}"));
    }

    let status = match cc.status() {
        Ok(status) => status,
        Err(e) => {
            eprintln!("error: cannot run {}: {e}", params.cc);
            return 1;
        }
    };

    if cleanup {
        let _ = std::fs::remove_file(&gen_c);
        let _ = std::fs::remove_file(&runtime_c);
    }

    if status.success() { 0 } else { 1 }
}
