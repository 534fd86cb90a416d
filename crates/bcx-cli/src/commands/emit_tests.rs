use bcx_core::Config;
use tempfile::tempdir;

use crate::cli::{ColorChoice, EmitParams};

fn params(inputs: Vec<std::path::PathBuf>, output: Option<std::path::PathBuf>) -> EmitParams {
    let mut config = Config::default();
    config.emit_intermediate = true;
    EmitParams {
        inputs,
        output,
        config,
        color: ColorChoice::Never,
    }
}

#[test]
fn emit_writes_c_file() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("prog.b");
    std::fs::write(&src, "main(){ return(0); }\n").unwrap();
    let out = dir.path().join("prog.c");

    let code = super::emit::run(params(vec![src], Some(out.clone())));
    assert_eq!(code, 0);

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("bword b_main(void)"), "{text}");
    assert!(text.contains("typedef intptr_t bword;"), "{text}");
}

#[test]
fn emit_fails_on_invalid_source() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("bad.b");
    std::fs::write(&src, "main(){ 1 = 2; }\n").unwrap();
    let out = dir.path().join("bad.c");

    let code = super::emit::run(params(vec![src], Some(out.clone())));
    assert_eq!(code, 1);
    assert!(!out.exists(), "no IR on errors");
}

#[test]
fn emit_covers_multiple_inputs_as_one_unit() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.b");
    let b = dir.path().join("b.b");
    // `shared` is defined in the second file; one translation unit.
    std::fs::write(&a, "main(){ return(shared); }\n").unwrap();
    std::fs::write(&b, "shared 7;\n").unwrap();
    let out = dir.path().join("unit.c");

    let code = super::emit::run(params(vec![a, b], Some(out.clone())));
    assert_eq!(code, 0);

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("bword b_shared = 7;"), "{text}");
}

#[test]
fn missing_input_is_fatal() {
    let dir = tempdir().unwrap();
    let code = super::emit::run(params(vec![dir.path().join("absent.b")], None));
    assert_eq!(code, 1);
}
