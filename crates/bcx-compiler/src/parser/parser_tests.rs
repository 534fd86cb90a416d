use bcx_core::WordSize;
use indoc::indoc;

use crate::diagnostics::Diagnostics;
use crate::lexer::lex;
use crate::parser::ast::{
    BinOp, ExprKind, ExternalDef, Program, Stmt, StmtKind, UnaryOp,
};
use crate::parser::parse;
use crate::source::SourceId;

fn parse_src(src: &str) -> (Program, Diagnostics) {
    let mut diag = Diagnostics::new();
    let id = SourceId::default();
    let tokens = lex(src, id, WordSize::Host, &mut diag);
    let (program, _) = parse(src, id, tokens, 0, &mut diag);
    (program, diag)
}

fn parse_ok(src: &str) -> Program {
    let (program, diag) = parse_src(src);
    assert!(
        !diag.has_errors(),
        "unexpected parse errors for {src:?}: {diag:?}"
    );
    program
}

fn only_function(program: &Program) -> &crate::parser::ast::FunctionDef {
    match &program.defs[..] {
        [ExternalDef::Function(f)] => f,
        other => panic!("expected a single function, got {other:?}"),
    }
}

fn body_stmts(program: &Program) -> &[Stmt] {
    match &only_function(program).body.kind {
        StmtKind::Block(stmts) => stmts,
        other => panic!("expected block body, got {other:?}"),
    }
}

#[test]
fn factorial_program() {
    let program = parse_ok(indoc! {"
        main(){ return(fact(5)); }
        fact(n){ if(n<=1) return(1); return(n*fact(n-1)); }
    "});
    assert_eq!(program.defs.len(), 2);

    let ExternalDef::Function(fact) = &program.defs[1] else {
        panic!("expected function");
    };
    assert_eq!(fact.name, "fact");
    assert_eq!(fact.params.len(), 1);
    assert_eq!(fact.params[0].name, "n");
}

#[test]
fn global_definitions() {
    let program = parse_ok("x 5; v[10] 1, 2, 3; s \"hi\"; zero;");
    assert_eq!(program.defs.len(), 4);

    let ExternalDef::Variable(x) = &program.defs[0] else {
        panic!()
    };
    assert!(x.vector.is_none());
    assert_eq!(x.inits.len(), 1);

    let ExternalDef::Variable(v) = &program.defs[1] else {
        panic!()
    };
    assert!(v.vector.is_some());
    assert_eq!(v.inits.len(), 3);

    let ExternalDef::Variable(zero) = &program.defs[3] else {
        panic!()
    };
    assert!(zero.inits.is_empty());
}

#[test]
fn dangling_else_binds_to_inner_if() {
    let program = parse_ok("main(){ if(a) if(b) x=1; else x=2; }");
    let stmts = body_stmts(&program);

    let StmtKind::If {
        then, otherwise, ..
    } = &stmts[0].kind
    else {
        panic!("expected if");
    };
    assert!(otherwise.is_none(), "outer if must not own the else");
    let StmtKind::If {
        otherwise: inner_else,
        ..
    } = &then.kind
    else {
        panic!("expected inner if");
    };
    assert!(inner_else.is_some(), "inner if owns the else");
}

#[test]
fn compound_assignment_parses() {
    let program = parse_ok("main(){ x=10; x=+ 5; x=* 2; }");
    let stmts = body_stmts(&program);

    let ops: Vec<Option<BinOp>> = stmts
        .iter()
        .map(|s| match &s.kind {
            StmtKind::Expr(e) => match &e.kind {
                ExprKind::Assign { op, .. } => *op,
                other => panic!("expected assignment, got {other:?}"),
            },
            other => panic!("expected expression statement, got {other:?}"),
        })
        .collect();
    assert_eq!(ops, vec![None, Some(BinOp::Add), Some(BinOp::Mul)]);
}

#[test]
fn relational_assign_parses() {
    let program = parse_ok("main(){ x === y; a =< b; }");
    let stmts = body_stmts(&program);

    let StmtKind::Expr(e) = &stmts[0].kind else {
        panic!()
    };
    assert!(matches!(
        e.kind,
        ExprKind::Assign {
            op: Some(BinOp::Eq),
            ..
        }
    ));

    let StmtKind::Expr(e) = &stmts[1].kind else {
        panic!()
    };
    assert!(matches!(
        e.kind,
        ExprKind::Assign {
            op: Some(BinOp::Lt),
            ..
        }
    ));
}

#[test]
fn assignment_is_right_associative() {
    let program = parse_ok("main(){ a = b = 1; }");
    let stmts = body_stmts(&program);
    let StmtKind::Expr(e) = &stmts[0].kind else {
        panic!()
    };
    let ExprKind::Assign { target, value, .. } = &e.kind else {
        panic!("expected assignment")
    };
    assert!(matches!(target.kind, ExprKind::Name { .. }));
    assert!(matches!(value.kind, ExprKind::Assign { .. }));
}

#[test]
fn precedence_mul_over_add_over_shift() {
    let program = parse_ok("main(){ x = a + b * c << 2; }");
    let stmts = body_stmts(&program);
    let StmtKind::Expr(e) = &stmts[0].kind else {
        panic!()
    };
    let ExprKind::Assign { value, .. } = &e.kind else {
        panic!()
    };
    // ((a + (b * c)) << 2)
    let ExprKind::Binary {
        op: BinOp::Shl,
        lhs,
        ..
    } = &value.kind
    else {
        panic!("expected shift at the top, got {:?}", value.kind);
    };
    let ExprKind::Binary {
        op: BinOp::Add,
        rhs,
        ..
    } = &lhs.kind
    else {
        panic!("expected add under shift");
    };
    assert!(matches!(
        rhs.kind,
        ExprKind::Binary {
            op: BinOp::Mul,
            ..
        }
    ));
}

#[test]
fn ampersand_and_pipe_are_binary_operators() {
    // No short-circuit forms exist; `a & b | c` is ((a & b) | c).
    let program = parse_ok("main(){ x = a & b | c; }");
    let stmts = body_stmts(&program);
    let StmtKind::Expr(e) = &stmts[0].kind else {
        panic!()
    };
    let ExprKind::Assign { value, .. } = &e.kind else {
        panic!()
    };
    let ExprKind::Binary {
        op: BinOp::Or,
        lhs,
        ..
    } = &value.kind
    else {
        panic!("expected | at the top");
    };
    assert!(matches!(
        lhs.kind,
        ExprKind::Binary {
            op: BinOp::And,
            ..
        }
    ));
}

#[test]
fn conditional_is_right_associative() {
    let program = parse_ok("main(){ x = a ? b : c ? d : e; }");
    let stmts = body_stmts(&program);
    let StmtKind::Expr(e) = &stmts[0].kind else {
        panic!()
    };
    let ExprKind::Assign { value, .. } = &e.kind else {
        panic!()
    };
    let ExprKind::Cond { otherwise, .. } = &value.kind else {
        panic!("expected conditional");
    };
    assert!(matches!(otherwise.kind, ExprKind::Cond { .. }));
}

#[test]
fn unary_and_postfix() {
    let program = parse_ok("main(){ x = -*p + a[i]++; ++y; }");
    let stmts = body_stmts(&program);

    let StmtKind::Expr(e) = &stmts[0].kind else {
        panic!()
    };
    let ExprKind::Assign { value, .. } = &e.kind else {
        panic!()
    };
    let ExprKind::Binary { lhs, rhs, .. } = &value.kind else {
        panic!()
    };
    // -*p
    let ExprKind::Unary {
        op: UnaryOp::Neg,
        operand,
    } = &lhs.kind
    else {
        panic!("expected negation");
    };
    assert!(matches!(
        operand.kind,
        ExprKind::Unary {
            op: UnaryOp::Deref,
            ..
        }
    ));
    // a[i]++
    let ExprKind::Unary {
        op: UnaryOp::PostInc,
        operand,
    } = &rhs.kind
    else {
        panic!("expected post-increment");
    };
    assert!(matches!(operand.kind, ExprKind::Index { .. }));

    let StmtKind::Expr(e) = &stmts[1].kind else {
        panic!()
    };
    assert!(matches!(
        e.kind,
        ExprKind::Unary {
            op: UnaryOp::PreInc,
            ..
        }
    ));
}

#[test]
fn switch_with_nested_cases() {
    let program = parse_ok(indoc! {"
        main(){
            auto x;
            x = 2;
            switch(x){
                case 1: putchar('a');
                case 2: putchar('b');
                default: ;
            }
        }
    "});
    let stmts = body_stmts(&program);
    assert!(matches!(stmts[2].kind, StmtKind::Switch { .. }));
}

#[test]
fn switch_without_parens() {
    let program = parse_ok("main(){ switch x { case 1: ; } }");
    let stmts = body_stmts(&program);
    assert!(matches!(stmts[0].kind, StmtKind::Switch { .. }));
}

#[test]
fn goto_and_label() {
    let program = parse_ok("main(){ auto i; i=0; loop: i=i+1; if(i<5) goto loop; return(i); }");
    let stmts = body_stmts(&program);
    assert!(matches!(
        &stmts[2].kind,
        StmtKind::Label { name, .. } if name == "loop"
    ));
}

#[test]
fn goto_rejects_non_name_target() {
    let (_, diag) = parse_src("main(){ goto 1+2; }");
    assert!(diag.has_errors());
}

#[test]
fn auto_declarations() {
    let program = parse_ok("main(){ auto x, y 5, v[10]; }");
    let stmts = body_stmts(&program);
    let StmtKind::Auto(decls) = &stmts[0].kind else {
        panic!("expected auto");
    };
    assert_eq!(decls.len(), 3);
    assert!(decls[0].init.is_none() && decls[0].vector.is_none());
    assert!(decls[1].init.is_some());
    assert!(decls[2].vector.is_some());
}

#[test]
fn extrn_declaration() {
    let program = parse_ok("main(){ extrn putchar, rd.unit; }");
    let stmts = body_stmts(&program);
    let StmtKind::Extrn(names) = &stmts[0].kind else {
        panic!("expected extrn");
    };
    let spelled: Vec<_> = names.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(spelled, vec!["putchar", "rd.unit"]);
}

#[test]
fn missing_semi_recovers_and_continues() {
    let (program, diag) = parse_src("main(){ x = 1 y = 2; z = 3; }");
    assert!(diag.has_errors());
    // The parser must reach the statement after the bad one.
    let stmts = body_stmts(&program);
    assert!(
        stmts
            .iter()
            .any(|s| matches!(&s.kind, StmtKind::Expr(e)
                if matches!(e.kind, ExprKind::Assign { .. }))),
    );
}

#[test]
fn one_error_does_not_stop_parsing() {
    let (program, diag) = parse_src(indoc! {"
        main(){ @ }
        other(){ return(1); }
    "});
    assert!(diag.has_errors());
    assert_eq!(program.defs.len(), 2, "both functions must parse");
}

#[test]
fn unterminated_block_is_reported() {
    let (_, diag) = parse_src("main(){ x = 1;");
    assert!(diag.has_errors());
}

#[test]
fn return_forms() {
    let program = parse_ok("main(){ return; } f(){ return(42); }");
    let ExternalDef::Function(main) = &program.defs[0] else {
        panic!()
    };
    let StmtKind::Block(stmts) = &main.body.kind else {
        panic!()
    };
    assert!(matches!(stmts[0].kind, StmtKind::Return(None)));
}

#[test]
fn call_arguments_parse_in_order() {
    let program = parse_ok("main(){ printf(\"x\", 1, 2+3); }");
    let stmts = body_stmts(&program);
    let StmtKind::Expr(e) = &stmts[0].kind else {
        panic!()
    };
    let ExprKind::Call { args, .. } = &e.kind else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 3);
}

#[test]
fn string_literal_gets_eot() {
    let program = parse_ok("main(){ s = \"hi\"; }");
    let stmts = body_stmts(&program);
    let StmtKind::Expr(e) = &stmts[0].kind else {
        panic!()
    };
    let ExprKind::Assign { value, .. } = &e.kind else {
        panic!()
    };
    let ExprKind::Str { bytes } = &value.kind else {
        panic!("expected string");
    };
    assert_eq!(bytes, &vec![b'h', b'i', 4]);
}

#[test]
fn char_literal_packs() {
    let program = parse_ok("main(){ c = 'Hi'; }");
    let stmts = body_stmts(&program);
    let StmtKind::Expr(e) = &stmts[0].kind else {
        panic!()
    };
    let ExprKind::Assign { value, .. } = &e.kind else {
        panic!()
    };
    assert!(matches!(value.kind, ExprKind::Char { value: 0x4869 }));
}

#[test]
fn octal_number_keeps_base() {
    let program = parse_ok("x 017;");
    let ExternalDef::Variable(x) = &program.defs[0] else {
        panic!()
    };
    assert!(matches!(
        x.inits[0].kind,
        ExprKind::Number {
            value: 15,
            octal: true
        }
    ));
}

#[test]
fn node_ids_are_unique() {
    let program = parse_ok("main(){ x = a + b; y = c; }");
    let mut seen = std::collections::HashSet::new();
    fn walk_expr(e: &crate::parser::ast::Expr, seen: &mut std::collections::HashSet<u32>) {
        assert!(seen.insert(e.id.0), "duplicate node id {:?}", e.id);
        match &e.kind {
            ExprKind::Unary { operand, .. } => walk_expr(operand, seen),
            ExprKind::Binary { lhs, rhs, .. } => {
                walk_expr(lhs, seen);
                walk_expr(rhs, seen);
            }
            ExprKind::Assign { target, value, .. } => {
                walk_expr(target, seen);
                walk_expr(value, seen);
            }
            _ => {}
        }
    }
    for stmt in body_stmts(&program) {
        if let StmtKind::Expr(e) = &stmt.kind {
            walk_expr(e, &mut seen);
        }
    }
}
