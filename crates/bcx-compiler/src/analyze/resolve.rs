//! Name resolution and structural validation.
//!
//! One walk per function over the immutable tree. Scopes are a stack of
//! IndexMaps; labels live in a separate function-flat namespace and goto
//! targets are checked after the walk (labels may be defined later in the
//! source). Case labels attach to the innermost enclosing switch via the
//! switch stack.

use indexmap::IndexMap;

use bcx_core::{Config, Name, WordSize};

use crate::diagnostics::Diagnostics;
use crate::parser::ast::{
    Expr, ExprKind, ExternalDef, FunctionDef, GlobalDef, NodeId, Program, Stmt, StmtKind,
    UnaryOp,
};
use crate::source::SourceId;
use crate::span::Span;

use super::analysis::{
    Analysis, Binding, BindingId, BindingKind, CaseInfo, FunctionInfo, SwitchInfo,
};
use super::consts::{eval_const, is_const_initializer};

/// Run semantic analysis over every source of a translation unit.
pub fn analyze(
    asts: &IndexMap<SourceId, Program>,
    config: &Config,
    diag: &mut Diagnostics,
) -> Analysis {
    let mut resolver = Resolver {
        analysis: Analysis::default(),
        scopes: vec![IndexMap::new()],
        word_size: config.word_size,
        source: SourceId::default(),
        func: None,
        diag,
    };

    // Pass 1: collect file-scope names from all sources, so definition
    // order never matters for resolution.
    for (&source, program) in asts {
        resolver.source = source;
        resolver.collect_globals(program);
    }

    // Pass 2: validate globals and resolve function bodies.
    for (&source, program) in asts {
        resolver.source = source;
        for def in &program.defs {
            match def {
                ExternalDef::Variable(g) => resolver.check_global_def(g),
                ExternalDef::Function(f) => resolver.resolve_function(f),
            }
        }
    }

    resolver.analysis
}

struct Resolver<'d> {
    analysis: Analysis,
    /// Innermost scope last; index 0 is the global scope.
    scopes: Vec<IndexMap<Name, BindingId>>,
    word_size: WordSize,
    source: SourceId,
    func: Option<FnState>,
    diag: &'d mut Diagnostics,
}

/// Mutable state for the function currently being resolved.
struct FnState {
    next_slot: u32,
    param_slots: Vec<u32>,
    labels: IndexMap<Name, Span>,
    gotos: Vec<(Name, Span)>,
    switch_stack: Vec<SwitchBuild>,
    switches: IndexMap<NodeId, SwitchInfo>,
    loop_depth: u32,
    /// Constructs a `break` may target: loops and switches.
    breakable: u32,
}

struct SwitchBuild {
    stmt: NodeId,
    info: SwitchInfo,
    seen: IndexMap<i64, Span>,
    default_span: Option<Span>,
}

impl Resolver<'_> {
    fn intern(&mut self, spelling: &str) -> Name {
        self.analysis.names.insert(spelling)
    }

    fn state(&mut self) -> &mut FnState {
        self.func.as_mut().expect("statement outside of a function")
    }

    // ---- file scope ----

    fn collect_globals(&mut self, program: &Program) {
        for def in &program.defs {
            let (name, span, kind, node) = match def {
                ExternalDef::Variable(g) => (&g.name, g.name_span, BindingKind::Global, g.id),
                ExternalDef::Function(f) => {
                    (&f.name, f.name_span, BindingKind::Function, f.id)
                }
            };
            let sym = self.intern(name);

            if let Some(&existing) = self.scopes[0].get(&sym) {
                let prev = self.analysis.binding(existing);
                let mut report = self.diag.error(
                    self.source,
                    format!("redefinition of '{name}'"),
                    span,
                );
                if prev.source == self.source {
                    report = report.related_to("first defined here", prev.def_span);
                }
                report.emit();
                continue;
            }

            let id = self.analysis.add_binding(Binding {
                name: sym,
                kind,
                source: self.source,
                def_span: span,
                slot: None,
                cells: None,
            });
            self.scopes[0].insert(sym, id);
            self.analysis.resolutions.insert(node, id);
        }
    }

    fn check_global_def(&mut self, g: &GlobalDef) {
        if let Some(vs) = &g.vector
            && let Some(size) = &vs.size
        {
            match eval_const(size, self.word_size) {
                Ok(v) if v < 0 => {
                    self.diag
                        .error(self.source, "vector size cannot be negative", size.span)
                        .emit();
                }
                Ok(_) => {}
                Err(span) => {
                    self.diag
                        .error(self.source, "vector size must be a constant", span)
                        .emit();
                }
            }
        }

        for init in &g.inits {
            if !is_const_initializer(init, self.word_size) {
                self.diag
                    .error(
                        self.source,
                        "file-scope initializer must be a constant or string literal",
                        init.span,
                    )
                    .emit();
            }
        }
    }

    // ---- functions ----

    fn resolve_function(&mut self, f: &FunctionDef) {
        let name = self.intern(&f.name);
        self.func = Some(FnState {
            next_slot: 0,
            param_slots: Vec::with_capacity(f.params.len()),
            labels: IndexMap::new(),
            gotos: Vec::new(),
            switch_stack: Vec::new(),
            switches: IndexMap::new(),
            loop_depth: 0,
            breakable: 0,
        });
        self.scopes.push(IndexMap::new());

        for (i, param) in f.params.iter().enumerate() {
            let sym = self.intern(&param.name);
            self.declare(sym, BindingKind::Param, param.span, Some(i as u32), None);
            self.state().param_slots.push(i as u32);
        }
        self.state().next_slot = f.params.len() as u32;

        self.walk_stmt(&f.body);
        self.scopes.pop();

        let state = self.func.take().expect("function state");
        for (label, span) in &state.gotos {
            if !state.labels.contains_key(label) {
                self.diag
                    .error(
                        self.source,
                        format!(
                            "undefined label '{}'",
                            self.analysis.names.spelling(*label)
                        ),
                        *span,
                    )
                    .emit();
            }
        }

        self.analysis.functions.insert(
            name,
            FunctionInfo {
                frame_size: state.next_slot,
                param_slots: state.param_slots,
                labels: state.labels,
                switches: state.switches,
            },
        );
    }

    /// Insert a binding into the innermost scope, diagnosing duplicates.
    /// The new binding shadows the old one either way, which keeps later
    /// references consistent.
    fn declare(
        &mut self,
        sym: Name,
        kind: BindingKind,
        span: Span,
        slot: Option<u32>,
        cells: Option<u32>,
    ) -> BindingId {
        if let Some(&prev) = self.scopes.last().expect("scope stack").get(&sym) {
            let prev_span = self.analysis.binding(prev).def_span;
            self.diag
                .error(
                    self.source,
                    format!(
                        "redeclaration of '{}'",
                        self.analysis.names.spelling(sym)
                    ),
                    span,
                )
                .related_to("previously declared here", prev_span)
                .emit();
        }

        let id = self.analysis.add_binding(Binding {
            name: sym,
            kind,
            source: self.source,
            def_span: span,
            slot,
            cells,
        });
        self.scopes.last_mut().expect("scope stack").insert(sym, id);
        id
    }

    // ---- statements ----

    fn walk_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Block(stmts) => {
                self.scopes.push(IndexMap::new());
                for s in stmts {
                    self.walk_stmt(s);
                }
                self.scopes.pop();
            }
            StmtKind::Auto(decls) => {
                for decl in decls {
                    self.declare_auto(decl);
                }
            }
            StmtKind::Extrn(names) => {
                for n in names {
                    let sym = self.intern(&n.name);
                    let id = self.declare(sym, BindingKind::Extern, n.span, None, None);
                    self.analysis.resolutions.insert(n.id, id);
                }
            }
            StmtKind::Label {
                name,
                name_span,
                body,
            } => {
                let sym = self.intern(name);
                if let Some(&prev) = self.state().labels.get(&sym) {
                    self.diag
                        .error(self.source, format!("duplicate label '{name}'"), *name_span)
                        .related_to("first defined here", prev)
                        .emit();
                } else {
                    self.state().labels.insert(sym, *name_span);
                    let id = self.analysis.add_binding(Binding {
                        name: sym,
                        kind: BindingKind::Label,
                        source: self.source,
                        def_span: *name_span,
                        slot: None,
                        cells: None,
                    });
                    self.analysis.resolutions.insert(stmt.id, id);
                }
                self.walk_stmt(body);
            }
            StmtKind::Goto { label, label_span } => {
                let sym = self.intern(label);
                self.state().gotos.push((sym, *label_span));
            }
            StmtKind::If {
                cond,
                then,
                otherwise,
            } => {
                self.resolve_expr(cond);
                self.walk_stmt(then);
                if let Some(e) = otherwise {
                    self.walk_stmt(e);
                }
            }
            StmtKind::While { cond, body } => {
                self.resolve_expr(cond);
                let state = self.state();
                state.loop_depth += 1;
                state.breakable += 1;
                self.walk_stmt(body);
                let state = self.state();
                state.loop_depth -= 1;
                state.breakable -= 1;
            }
            StmtKind::Switch { scrutinee, body } => {
                self.resolve_expr(scrutinee);
                let state = self.state();
                state.breakable += 1;
                state.switch_stack.push(SwitchBuild {
                    stmt: stmt.id,
                    info: SwitchInfo::default(),
                    seen: IndexMap::new(),
                    default_span: None,
                });
                self.walk_stmt(body);
                let state = self.state();
                state.breakable -= 1;
                let build = state.switch_stack.pop().expect("switch stack");
                state.switches.insert(build.stmt, build.info);
            }
            StmtKind::Case { value, body } => {
                match eval_const(value, self.word_size) {
                    Ok(v) => self.record_case(v, value.span, stmt.id),
                    Err(span) => {
                        self.diag
                            .error(
                                self.source,
                                "case label must be a constant expression",
                                span,
                            )
                            .emit();
                    }
                }
                self.walk_stmt(body);
            }
            StmtKind::Default { body } => {
                self.record_default(stmt.id, stmt.span);
                self.walk_stmt(body);
            }
            StmtKind::Break => {
                if self.state().breakable == 0 {
                    self.diag
                        .error(self.source, "break outside of loop or switch", stmt.span)
                        .emit();
                }
            }
            StmtKind::Continue => {
                if self.state().loop_depth == 0 {
                    self.diag
                        .error(self.source, "continue outside of loop", stmt.span)
                        .emit();
                }
            }
            StmtKind::Return(value) => {
                if let Some(e) = value {
                    self.resolve_expr(e);
                }
            }
            StmtKind::Expr(e) => self.resolve_expr(e),
            StmtKind::Null => {}
        }
    }

    fn declare_auto(&mut self, decl: &crate::parser::ast::AutoDecl) {
        let sym = self.intern(&decl.name);

        let cells = decl.vector.as_ref().map(|vs| match &vs.size {
            Some(size) => match eval_const(size, self.word_size) {
                Ok(v) if v >= 0 => v as u32,
                Ok(_) => {
                    self.diag
                        .error(self.source, "vector size cannot be negative", size.span)
                        .emit();
                    0
                }
                Err(span) => {
                    self.diag
                        .error(self.source, "vector size must be a constant", span)
                        .emit();
                    0
                }
            },
            None => {
                self.diag
                    .error(self.source, "auto vector needs a size", vs.span)
                    .emit();
                0
            }
        });

        let state = self.state();
        let slot = state.next_slot;
        // A vector reserves its own cell plus the storage cells it points at.
        state.next_slot += 1 + cells.unwrap_or(0);

        let id = self.declare(sym, BindingKind::Auto, decl.name_span, Some(slot), cells);
        self.analysis.resolutions.insert(decl.id, id);

        if let Some(init) = &decl.init {
            if cells.is_some() {
                self.diag
                    .error(
                        self.source,
                        "auto vector cannot take an initializer",
                        init.span,
                    )
                    .emit();
            } else {
                self.resolve_expr(init);
            }
        }
    }

    fn record_case(&mut self, value: i64, span: Span, stmt: NodeId) {
        let source = self.source;
        let state = self.func.as_mut().expect("case outside of a function");
        let Some(build) = state.switch_stack.last_mut() else {
            self.diag
                .error(source, "case label outside of switch", span)
                .emit();
            return;
        };

        if let Some(&prev) = build.seen.get(&value) {
            self.diag
                .error(source, format!("duplicate case value {value}"), span)
                .related_to("first used here", prev)
                .emit();
            return;
        }
        build.seen.insert(value, span);
        build.info.cases.push(CaseInfo { value, stmt });
    }

    fn record_default(&mut self, stmt: NodeId, span: Span) {
        let source = self.source;
        let state = self.func.as_mut().expect("default outside of a function");
        let Some(build) = state.switch_stack.last_mut() else {
            self.diag
                .error(source, "default label outside of switch", span)
                .emit();
            return;
        };

        if let Some(prev) = build.default_span {
            self.diag
                .error(source, "duplicate default label", span)
                .related_to("first default here", prev)
                .emit();
            return;
        }
        build.default_span = Some(span);
        build.info.default = Some(stmt);
    }

    // ---- expressions ----

    fn resolve_expr(&mut self, e: &Expr) {
        match &e.kind {
            ExprKind::Number { .. }
            | ExprKind::Char { .. }
            | ExprKind::Str { .. }
            | ExprKind::Error => {}
            ExprKind::Name { name } => self.resolve_name(e, name),
            ExprKind::Unary { op, operand } => {
                self.resolve_expr(operand);
                match op {
                    UnaryOp::Deref => {
                        self.analysis.lvalues.insert(e.id);
                    }
                    UnaryOp::AddrOf => {
                        self.require_lvalue(
                            operand,
                            "cannot take the address of this expression",
                        );
                        self.mark_extern_addressed(operand);
                    }
                    UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc
                    | UnaryOp::PostDec => {
                        self.require_lvalue(
                            operand,
                            "operand of increment or decrement must be an lvalue",
                        );
                        self.mark_extern_addressed(operand);
                    }
                    _ => {}
                }
            }
            ExprKind::Binary { lhs, rhs, .. } => {
                self.resolve_expr(lhs);
                self.resolve_expr(rhs);
            }
            ExprKind::Assign { target, value, .. } => {
                self.resolve_expr(target);
                self.resolve_expr(value);
                self.require_lvalue(target, "assignment target is not an lvalue");
                self.mark_extern_addressed(target);
            }
            ExprKind::Cond {
                cond,
                then,
                otherwise,
            } => {
                self.resolve_expr(cond);
                self.resolve_expr(then);
                self.resolve_expr(otherwise);
            }
            ExprKind::Call { callee, args } => {
                self.resolve_expr(callee);
                self.mark_extern_called(callee);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            ExprKind::Index { base, index } => {
                self.resolve_expr(base);
                self.resolve_expr(index);
                self.analysis.lvalues.insert(e.id);
            }
        }
    }

    fn resolve_name(&mut self, e: &Expr, name: &str) {
        let sym = self.intern(name);
        let found = self
            .scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&sym).copied());

        let id = match found {
            Some(id) => id,
            None => {
                // Classical B: free identifiers are implicitly external.
                self.diag
                    .warning(
                        self.source,
                        format!("implicit declaration of external '{name}'"),
                        e.span,
                    )
                    .emit();
                let id = self.analysis.add_binding(Binding {
                    name: sym,
                    kind: BindingKind::Extern,
                    source: self.source,
                    def_span: e.span,
                    slot: None,
                    cells: None,
                });
                self.scopes[0].insert(sym, id);
                id
            }
        };

        self.analysis.resolutions.insert(e.id, id);
        if matches!(
            self.analysis.binding(id).kind,
            BindingKind::Global | BindingKind::Extern | BindingKind::Auto | BindingKind::Param
        ) {
            self.analysis.lvalues.insert(e.id);
        }
    }

    fn require_lvalue(&mut self, e: &Expr, message: &str) {
        if matches!(e.kind, ExprKind::Error) {
            return;
        }
        if !self.analysis.lvalues.contains(&e.id) {
            self.diag.error(self.source, message, e.span).emit();
        }
    }

    fn mark_extern_addressed(&mut self, e: &Expr) {
        if let Some(sym) = self.extern_name_of(e) {
            self.analysis.addressed_externs.insert(sym);
        }
    }

    fn mark_extern_called(&mut self, e: &Expr) {
        if let Some(sym) = self.extern_name_of(e) {
            self.analysis.called_externs.insert(sym);
        }
    }

    fn extern_name_of(&self, e: &Expr) -> Option<Name> {
        if !matches!(e.kind, ExprKind::Name { .. }) {
            return None;
        }
        let id = self.analysis.resolution(e.id)?;
        let binding = self.analysis.binding(id);
        (binding.kind == BindingKind::Extern).then_some(binding.name)
    }
}
