use indexmap::IndexMap;
use indoc::indoc;

use bcx_core::{Config, WordSize};

use super::analysis::{Analysis, BindingKind};
use super::resolve::analyze;
use crate::diagnostics::Diagnostics;
use crate::lexer::lex;
use crate::parser::ast::Program;
use crate::parser::parse;
use crate::source::SourceMap;

fn run(src: &str) -> (Analysis, Diagnostics) {
    run_with(src, Config::default())
}

fn run_with(src: &str, config: Config) -> (Analysis, Diagnostics) {
    let map = SourceMap::inline(src);
    let mut diag = Diagnostics::new();
    let mut asts: IndexMap<_, Program> = IndexMap::new();
    let mut next_node = 0;
    for source in map.iter() {
        let tokens = lex(source.text, source.id, config.word_size, &mut diag);
        let (program, next) = parse(source.text, source.id, tokens, next_node, &mut diag);
        next_node = next;
        asts.insert(source.id, program);
    }
    let analysis = analyze(&asts, &config, &mut diag);
    (analysis, diag)
}

fn errors(diag: &Diagnostics) -> Vec<String> {
    diag.iter()
        .filter(|d| d.severity() == crate::diagnostics::Severity::Error)
        .map(|d| d.message().to_owned())
        .collect()
}

#[test]
fn clean_program_has_no_diagnostics() {
    let (analysis, diag) = run(indoc! {"
        main(){ extrn putchar; auto i; i = 0; putchar('a' + i); return(i); }
    "});
    assert!(diag.is_empty(), "{diag:?}");

    let sym = analysis.names.lookup("main").unwrap();
    assert!(analysis.functions.contains_key(&sym));
}

#[test]
fn frame_slots_in_declaration_order() {
    let (analysis, diag) = run("f(a, b){ auto x, v[3], y; }");
    assert!(!diag.has_errors(), "{diag:?}");

    let info = analysis.functions.values().next().unwrap();
    // a=0 b=1 x=2, v=3 (+3 cells), y=7
    assert_eq!(info.param_slots, vec![0, 1]);
    assert_eq!(info.frame_size, 8);

    let slots: Vec<(Option<u32>, Option<u32>)> = analysis
        .bindings()
        .iter()
        .filter(|b| matches!(b.kind, BindingKind::Auto))
        .map(|b| (b.slot, b.cells))
        .collect();
    assert_eq!(
        slots,
        vec![(Some(2), None), (Some(3), Some(3)), (Some(7), None)]
    );
}

#[test]
fn unresolved_name_warns_and_becomes_extern() {
    let (analysis, diag) = run("main(){ putchar('x'); }");
    assert!(!diag.has_errors());
    assert_eq!(diag.warning_count(), 1);

    let names: Vec<&str> = analysis
        .extern_names()
        .iter()
        .map(|s| analysis.names.spelling(*s))
        .collect();
    assert_eq!(names, vec!["putchar"]);
    assert_eq!(analysis.called_externs.len(), 1);
}

#[test]
fn extrn_declaration_suppresses_warning() {
    let (_, diag) = run("main(){ extrn putchar; putchar('x'); }");
    assert!(diag.is_empty(), "{diag:?}");
}

#[test]
fn globals_resolve_across_definition_order() {
    // `later` is defined after its use; the global pre-pass must see it.
    let (_, diag) = run("main(){ return(later); } later 5;");
    assert!(diag.is_empty(), "{diag:?}");
}

#[test]
fn duplicate_global_is_reported() {
    let (_, diag) = run("x 1; x 2;");
    assert_eq!(errors(&diag), vec!["redefinition of 'x'"]);
}

#[test]
fn duplicate_local_in_same_scope() {
    let (_, diag) = run("main(){ auto x, x; }");
    assert_eq!(errors(&diag), vec!["redeclaration of 'x'"]);
}

#[test]
fn shadowing_in_nested_block_is_allowed() {
    let (_, diag) = run("main(){ auto x; { auto x; x = 1; } }");
    assert!(!diag.has_errors(), "{diag:?}");
}

#[test]
fn assignment_needs_lvalue() {
    let (_, diag) = run("main(){ 1 = 2; }");
    assert_eq!(errors(&diag), vec!["assignment target is not an lvalue"]);

    let (_, diag) = run("main(){ auto x; x + 1 = 2; }");
    assert_eq!(errors(&diag), vec!["assignment target is not an lvalue"]);
}

#[test]
fn deref_and_index_are_lvalues() {
    let (_, diag) = run("main(){ auto p, v[4]; *p = 1; v[2] = 3; p[0] =+ 1; }");
    assert!(!diag.has_errors(), "{diag:?}");
}

#[test]
fn function_name_is_not_an_lvalue() {
    let (_, diag) = run("f(){ } main(){ f = 1; }");
    assert_eq!(errors(&diag), vec!["assignment target is not an lvalue"]);
}

#[test]
fn address_of_requires_lvalue() {
    let (_, diag) = run("main(){ auto x; x = &(1+2); }");
    assert_eq!(
        errors(&diag),
        vec!["cannot take the address of this expression"]
    );
}

#[test]
fn increment_requires_lvalue() {
    let (_, diag) = run("main(){ (1+2)++; }");
    assert_eq!(
        errors(&diag),
        vec!["operand of increment or decrement must be an lvalue"]
    );
}

#[test]
fn goto_to_later_label_resolves() {
    let (_, diag) = run("main(){ goto done; done: return(0); }");
    assert!(!diag.has_errors(), "{diag:?}");
}

#[test]
fn undefined_label_is_reported() {
    let (_, diag) = run("main(){ goto nowhere; }");
    assert_eq!(errors(&diag), vec!["undefined label 'nowhere'"]);
}

#[test]
fn duplicate_label_is_reported() {
    let (_, diag) = run("main(){ l: x; l: y; }");
    let errs = errors(&diag);
    assert_eq!(errs.iter().filter(|m| m.contains("duplicate label")).count(), 1);
}

#[test]
fn labels_are_function_scoped() {
    // Same label name in two functions is fine; goto cannot cross functions.
    let (_, diag) = run("f(){ l: return(0); } g(){ goto l; }");
    assert_eq!(errors(&diag), vec!["undefined label 'l'"]);
}

#[test]
fn switch_case_table_collects_in_source_order() {
    let (analysis, diag) = run(indoc! {"
        main(){
            auto x;
            switch(x){
                case 3: x = 1;
                case 1: while(x) { case 7: x = 2; }
                default: x = 3;
            }
        }
    "});
    assert!(!diag.has_errors(), "{diag:?}");

    let info = analysis.functions.values().next().unwrap();
    assert_eq!(info.switches.len(), 1);
    let sw = info.switches.values().next().unwrap();
    let values: Vec<i64> = sw.cases.iter().map(|c| c.value).collect();
    // Cases at arbitrary nesting inside the switch body, source order.
    assert_eq!(values, vec![3, 1, 7]);
    assert!(sw.default.is_some());
}

#[test]
fn nested_switch_shields_outer_case_table() {
    let (analysis, diag) = run(indoc! {"
        main(){
            auto x;
            switch(x){
                case 1: switch(x+1) { case 1: x = 9; }
                case 2: x = 0;
            }
        }
    "});
    assert!(!diag.has_errors(), "duplicate case 1 must not collide: {diag:?}");

    let info = analysis.functions.values().next().unwrap();
    assert_eq!(info.switches.len(), 2);
    let outer: Vec<i64> = info
        .switches
        .values()
        .last()
        .unwrap()
        .cases
        .iter()
        .map(|c| c.value)
        .collect();
    assert_eq!(outer, vec![1, 2]);
}

#[test]
fn duplicate_case_reported_once() {
    let (_, diag) = run("main(){ auto x; switch(x){ case 1: x=1; case 1: x=2; } }");
    let errs = errors(&diag);
    assert_eq!(errs, vec!["duplicate case value 1"]);
}

#[test]
fn duplicate_default_is_reported() {
    let (_, diag) = run("main(){ auto x; switch(x){ default: x=1; default: x=2; } }");
    assert_eq!(errors(&diag), vec!["duplicate default label"]);
}

#[test]
fn case_outside_switch_is_reported() {
    let (_, diag) = run("main(){ case 1: return(0); }");
    assert_eq!(errors(&diag), vec!["case label outside of switch"]);
}

#[test]
fn case_label_must_be_constant() {
    let (_, diag) = run("main(){ auto x, y; switch(x){ case y: x=1; } }");
    assert_eq!(errors(&diag), vec!["case label must be a constant expression"]);
}

#[test]
fn case_values_reduce_at_16_bits() {
    let mut config = Config::default();
    config.word_size = WordSize::W16;
    // 65536 wraps to 0, clashing with an explicit 0.
    let (_, diag) = run_with(
        "main(){ auto x; switch(x){ case 0: x=1; case 65536: x=2; } }",
        config,
    );
    assert_eq!(errors(&diag), vec!["duplicate case value 0"]);
}

#[test]
fn break_and_continue_placement() {
    let (_, diag) = run("main(){ break; }");
    assert_eq!(errors(&diag), vec!["break outside of loop or switch"]);

    let (_, diag) = run("main(){ auto x; switch(x){ case 1: continue; } }");
    assert_eq!(errors(&diag), vec!["continue outside of loop"]);

    let (_, diag) = run("main(){ while(1){ break; continue; } }");
    assert!(!diag.has_errors(), "{diag:?}");

    let (_, diag) = run("main(){ auto x; switch(x){ case 1: break; } }");
    assert!(!diag.has_errors(), "{diag:?}");
}

#[test]
fn vector_initializer_is_rejected() {
    let (_, diag) = run("main(){ auto v[3] 5; }");
    assert_eq!(errors(&diag), vec!["auto vector cannot take an initializer"]);
}

#[test]
fn global_initializers_must_be_constant() {
    let (_, diag) = run("x foo();");
    let errs = errors(&diag);
    assert_eq!(
        errs,
        vec!["file-scope initializer must be a constant or string literal"]
    );
}

#[test]
fn extern_assignment_marks_variable_usage() {
    let (analysis, _) = run("main(){ extrn errno; errno = 1; extrn printf; printf(\"x\"); }");
    let addressed: Vec<&str> = analysis
        .addressed_externs
        .iter()
        .map(|s| analysis.names.spelling(*s))
        .collect();
    let called: Vec<&str> = analysis
        .called_externs
        .iter()
        .map(|s| analysis.names.spelling(*s))
        .collect();
    assert_eq!(addressed, vec!["errno"]);
    assert_eq!(called, vec!["printf"]);
}
