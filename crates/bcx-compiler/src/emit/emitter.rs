//! Lowering of the analyzed tree to portable C.
//!
//! All B values travel as the `bword` type. Expressions lower to straight-
//! line statements with temporaries, which fixes left-to-right argument
//! evaluation and single evaluation of assignment targets. Control flow
//! lowers to labels and gotos; a switch emits its body linearly with the
//! dispatch appended after it, preserving fall-through.
//!
//! Sections are assembled in a fixed order (prelude, extern declarations,
//! forward declarations, string constants, globals, `bcx_init`, bodies) so
//! repeated runs produce byte-identical output.

use indexmap::IndexMap;

use bcx_core::{Config, Name, PointerMode, WordSize};

use crate::analyze::{Analysis, BindingKind, FunctionInfo, eval_const};
use crate::parser::ast::{
    BinOp, Expr, ExprKind, ExternalDef, FunctionDef, GlobalDef, NodeId, Program, Stmt,
    StmtKind, UnaryOp,
};
use crate::source::SourceId;

use super::runtime::{ExternForm, runtime_entry};

/// Emit the C translation unit for an analyzed, error-free unit.
pub fn emit(
    asts: &IndexMap<SourceId, Program>,
    analysis: &Analysis,
    config: &Config,
) -> String {
    let mut emitter = Emitter {
        analysis,
        config,
        strings: IndexMap::new(),
        globals: IndexMap::new(),
        defined_fns: IndexMap::new(),
        global_lines: Vec::new(),
        init_lines: Vec::new(),
        bodies: String::new(),
        body: String::new(),
        vec_count: 0,
        tmp: 0,
        label: 0,
        break_targets: Vec::new(),
        cont_targets: Vec::new(),
        case_labels: IndexMap::new(),
        fn_info: None,
    };

    // Signatures and global layouts first; bodies may reference anything.
    for program in asts.values() {
        for def in &program.defs {
            emitter.collect_def(def);
        }
    }
    for program in asts.values() {
        for def in &program.defs {
            if let ExternalDef::Variable(g) = def {
                emitter.emit_global(g);
            }
        }
    }
    for program in asts.values() {
        for def in &program.defs {
            if let ExternalDef::Function(f) = def {
                emitter.emit_function(f);
            }
        }
    }

    emitter.assemble()
}

/// How a defined global was laid out in C.
#[derive(Clone, Copy, PartialEq, Eq)]
enum GlobalLayout {
    /// One word: `bword b_x;` (also the pointer cell of a vector).
    Scalar,
    /// Multi-initializer scalar, emitted as an array whose first cell is
    /// the named word.
    Array,
}

struct Emitter<'a> {
    analysis: &'a Analysis,
    config: &'a Config,
    /// String literal pool, bytes (EOT included) to index.
    strings: IndexMap<Vec<u8>, usize>,
    globals: IndexMap<Name, GlobalLayout>,
    defined_fns: IndexMap<Name, usize>,
    global_lines: Vec<String>,
    init_lines: Vec<String>,
    bodies: String,
    /// Body of the function currently being emitted.
    body: String,
    vec_count: usize,
    tmp: u32,
    label: u32,
    break_targets: Vec<String>,
    cont_targets: Vec<String>,
    /// Synthetic labels for case/default statements of the current function.
    case_labels: IndexMap<NodeId, String>,
    fn_info: Option<&'a FunctionInfo>,
}

impl<'a> Emitter<'a> {
    fn word_size(&self) -> WordSize {
        self.config.word_size
    }

    fn sym(&self, spelling: &str) -> Name {
        self.analysis
            .names
            .lookup(spelling)
            .expect("name interned during analysis")
    }

    /// Mangled C symbol for a name, from the unit's name table.
    fn c_name_of(&self, name: Name) -> &'a str {
        self.analysis.names.c_name(name)
    }

    // ---- collection ----

    fn collect_def(&mut self, def: &ExternalDef) {
        match def {
            ExternalDef::Function(f) => {
                let sym = self.sym(&f.name);
                self.defined_fns.insert(sym, f.params.len());
            }
            ExternalDef::Variable(g) => {
                let sym = self.sym(&g.name);
                let layout = if g.vector.is_none() && g.inits.len() > 1 {
                    GlobalLayout::Array
                } else {
                    GlobalLayout::Scalar
                };
                self.globals.insert(sym, layout);
            }
        }
    }

    // ---- globals ----

    fn emit_global(&mut self, g: &GlobalDef) {
        let m = self.c_name_of(self.sym(&g.name));

        match &g.vector {
            Some(vs) => {
                let declared = vs
                    .size
                    .as_ref()
                    .and_then(|e| eval_const(e, self.word_size()).ok())
                    .unwrap_or(0)
                    .max(0) as usize;
                let cells = declared.max(g.inits.len()).max(1);

                let store = format!("bvec_{}", self.vec_count);
                self.vec_count += 1;

                let elems = self.static_elements(&g.inits, &store);
                if elems.is_empty() {
                    self.global_lines.push(format!("bword {store}[{cells}];"));
                } else {
                    self.global_lines
                        .push(format!("bword {store}[{cells}] = {{{elems}}};"));
                }
                self.global_lines.push(format!("bword {m};"));
                self.init_lines.push(format!("{m} = bx_ad({store});"));
            }
            None if g.inits.len() > 1 => {
                let k = g.inits.len();
                let elems = self.static_elements(&g.inits, &m);
                self.global_lines
                    .push(format!("bword {m}[{k}] = {{{elems}}};"));
            }
            None => match g.inits.first() {
                None => self.global_lines.push(format!("bword {m};")),
                Some(init) => match &init.kind {
                    ExprKind::Str { bytes } => {
                        let s = self.string_operand(bytes);
                        self.global_lines.push(format!("bword {m};"));
                        self.init_lines.push(format!("{m} = {s};"));
                    }
                    _ => {
                        let v = eval_const(init, self.word_size())
                            .expect("constant checked during analysis");
                        self.global_lines
                            .push(format!("bword {m} = {};", fmt_const(v)));
                    }
                },
            },
        }
    }

    /// Static initializer list; string elements become zero here plus an
    /// assignment in `bcx_init` (their address is not a C constant in every
    /// pointer mode).
    fn static_elements(&mut self, inits: &[Expr], target: &str) -> String {
        let mut elems = Vec::with_capacity(inits.len());
        for (i, init) in inits.iter().enumerate() {
            match &init.kind {
                ExprKind::Str { bytes } => {
                    let s = self.string_operand(bytes);
                    self.init_lines.push(format!("{target}[{i}] = {s};"));
                    elems.push("0".to_owned());
                }
                _ => {
                    let v = eval_const(init, self.word_size())
                        .expect("constant checked during analysis");
                    elems.push(fmt_const(v));
                }
            }
        }
        elems.join(", ")
    }

    // ---- functions ----

    fn emit_function(&mut self, f: &FunctionDef) {
        let sym = self.sym(&f.name);
        self.fn_info = Some(
            self.analysis
                .functions
                .get(&sym)
                .expect("function analyzed"),
        );
        self.tmp = 0;
        self.label = 0;
        self.body.clear();
        self.case_labels.clear();
        self.break_targets.clear();
        self.cont_targets.clear();

        let info = self.fn_info.expect("set above");
        if info.frame_size > 0 {
            self.line(format!("bword f[{}];", info.frame_size));
        }
        for (i, &slot) in info.param_slots.iter().enumerate() {
            self.line(format!("f[{slot}] = p{i};"));
        }

        self.stmt(&f.body);
        self.line("return 0;");

        let m = self.c_name_of(sym);
        let params = if f.params.is_empty() {
            "void".to_owned()
        } else {
            (0..f.params.len())
                .map(|i| format!("bword p{i}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let body = std::mem::take(&mut self.body);
        self.bodies
            .push_str(&format!("bword {m}({params})\n{{\n{body}}}\n\n"));
    }

    // ---- statements ----

    fn stmt(&mut self, s: &Stmt) {
        match &s.kind {
            StmtKind::Block(stmts) => {
                for inner in stmts {
                    self.stmt(inner);
                }
            }
            StmtKind::Expr(e) => {
                let _ = self.value(e);
            }
            StmtKind::If {
                cond,
                then,
                otherwise,
            } => {
                let c = self.value(cond);
                match otherwise {
                    Some(else_stmt) => {
                        let l_else = self.fresh_label();
                        let l_end = self.fresh_label();
                        self.line(format!("if (!{c}) goto {l_else};"));
                        self.stmt(then);
                        self.line(format!("goto {l_end};"));
                        self.put_label(&l_else);
                        self.stmt(else_stmt);
                        self.put_label(&l_end);
                    }
                    None => {
                        let l_end = self.fresh_label();
                        self.line(format!("if (!{c}) goto {l_end};"));
                        self.stmt(then);
                        self.put_label(&l_end);
                    }
                }
            }
            StmtKind::While { cond, body } => {
                let l_cont = self.fresh_label();
                let l_brk = self.fresh_label();
                self.put_label(&l_cont);
                let c = self.value(cond);
                self.line(format!("if (!{c}) goto {l_brk};"));
                self.break_targets.push(l_brk.clone());
                self.cont_targets.push(l_cont.clone());
                self.stmt(body);
                self.break_targets.pop();
                self.cont_targets.pop();
                self.line(format!("goto {l_cont};"));
                self.put_label(&l_brk);
            }
            StmtKind::Return(value) => match value {
                Some(e) => {
                    let v = self.value(e);
                    self.line(format!("return {v};"));
                }
                None => self.line("return 0;"),
            },
            StmtKind::Goto { label, .. } => {
                let l = user_label(label);
                self.line(format!("goto {l};"));
            }
            StmtKind::Label { name, body, .. } => {
                let l = user_label(name);
                self.put_label(&l);
                self.stmt(body);
            }
            StmtKind::Switch { scrutinee, body } => self.switch(s.id, scrutinee, body),
            StmtKind::Case { body, .. } | StmtKind::Default { body } => {
                let l = self
                    .case_labels
                    .get(&s.id)
                    .expect("case collected by analysis")
                    .clone();
                self.put_label(&l);
                self.stmt(body);
            }
            StmtKind::Break => {
                let target = self
                    .break_targets
                    .last()
                    .expect("break validated by analysis")
                    .clone();
                self.line(format!("goto {target};"));
            }
            StmtKind::Continue => {
                let target = self
                    .cont_targets
                    .last()
                    .expect("continue validated by analysis")
                    .clone();
                self.line(format!("goto {target};"));
            }
            StmtKind::Auto(decls) => {
                for decl in decls {
                    let binding = self
                        .analysis
                        .resolution(decl.id)
                        .map(|id| self.analysis.binding(id))
                        .expect("auto declaration resolved");
                    let slot = binding.slot.expect("auto has a frame slot");
                    if binding.cells.is_some() {
                        // The vector cell points at the storage that follows it.
                        self.line(format!("f[{slot}] = bx_ad(&f[{}]);", slot + 1));
                    } else if let Some(init) = &decl.init {
                        let v = self.value(init);
                        self.line(format!("f[{slot}] = {v};"));
                    }
                }
            }
            StmtKind::Extrn(_) | StmtKind::Null => {}
        }
    }

    /// Fall-through switch: body first (cases are plain labels), then the
    /// dispatch, so control entering a case runs into the next one unless a
    /// break jumps out.
    fn switch(&mut self, id: NodeId, scrutinee: &Expr, body: &Stmt) {
        let info = self
            .fn_info
            .expect("inside a function")
            .switches
            .get(&id)
            .expect("switch collected by analysis");

        let l_dispatch = self.fresh_label();
        let l_end = self.fresh_label();
        for case in &info.cases {
            let l = self.fresh_label();
            self.case_labels.insert(case.stmt, l);
        }
        if let Some(default) = info.default {
            let l = self.fresh_label();
            self.case_labels.insert(default, l);
        }

        self.line(format!("goto {l_dispatch};"));
        self.break_targets.push(l_end.clone());
        self.stmt(body);
        self.break_targets.pop();
        self.line(format!("goto {l_end};"));

        self.put_label(&l_dispatch);
        let scrutinee_value = self.value(scrutinee);
        for case in &info.cases {
            let target = self.case_labels[&case.stmt].clone();
            self.line(format!(
                "if ({scrutinee_value} == {}) goto {target};",
                fmt_const(case.value)
            ));
        }
        let fallback = match info.default {
            Some(default) => self.case_labels[&default].clone(),
            None => l_end.clone(),
        };
        self.line(format!("goto {fallback};"));
        self.put_label(&l_end);
    }

    // ---- expressions ----

    /// Lower an expression; returns the C operand holding its value.
    fn value(&mut self, e: &Expr) -> String {
        match &e.kind {
            ExprKind::Number { value, octal } => self.number_operand(*value, *octal),
            ExprKind::Char { value } => fmt_const(self.word_size().wrap(*value)),
            ExprKind::Str { bytes } => self.string_operand(bytes),
            ExprKind::Name { .. } => self.name_value(e),
            ExprKind::Unary { op, operand } => self.unary(*op, operand),
            ExprKind::Binary { op, lhs, rhs } => self.binary(*op, lhs, rhs),
            ExprKind::Assign { op, target, value } => self.assign(*op, target, value),
            ExprKind::Cond {
                cond,
                then,
                otherwise,
            } => {
                let t = self.fresh_tmp();
                self.line(format!("bword {t};"));
                let c = self.value(cond);
                let l_else = self.fresh_label();
                let l_end = self.fresh_label();
                self.line(format!("if (!{c}) goto {l_else};"));
                let a = self.value(then);
                self.line(format!("{t} = {a};"));
                self.line(format!("goto {l_end};"));
                self.put_label(&l_else);
                let b = self.value(otherwise);
                self.line(format!("{t} = {b};"));
                self.put_label(&l_end);
                t
            }
            ExprKind::Call { callee, args } => self.call(callee, args),
            ExprKind::Index { .. } => {
                let p = self.addr(e);
                let t = self.fresh_tmp();
                self.line(format!("bword {t} = bx_ld({p});"));
                t
            }
            ExprKind::Error => unreachable!("error node survived semantic analysis"),
        }
    }

    /// Lower an lvalue to the operand holding its address, in the pointer
    /// mode's addressing units. Pure except for operand temporaries, so the
    /// result can be used for both the read and the write of a compound
    /// assignment.
    fn addr(&mut self, e: &Expr) -> String {
        match &e.kind {
            ExprKind::Name { .. } => {
                let binding = self.binding_of(e);
                match binding.kind {
                    BindingKind::Auto | BindingKind::Param => {
                        format!("bx_ad(&f[{}])", binding.slot.expect("frame slot"))
                    }
                    BindingKind::Global | BindingKind::Extern => {
                        let m = self.c_name_of(binding.name);
                        match self.globals.get(&binding.name) {
                            Some(GlobalLayout::Array) => format!("bx_ad({m})"),
                            _ => format!("bx_ad(&{m})"),
                        }
                    }
                    BindingKind::Function | BindingKind::Label => {
                        unreachable!("non-storage name used as lvalue")
                    }
                }
            }
            ExprKind::Unary {
                op: UnaryOp::Deref,
                operand,
            } => self.value(operand),
            ExprKind::Index { base, index } => {
                let b = self.value(base);
                let i = self.value(index);
                format!("bx_ix({b}, {i})")
            }
            _ => unreachable!("non-lvalue survived semantic analysis"),
        }
    }

    /// C lvalue expression for a directly addressable name, avoiding the
    /// load/store helpers for the common cases.
    fn direct_place(&self, e: &Expr) -> Option<String> {
        let ExprKind::Name { .. } = e.kind else {
            return None;
        };
        let binding = self.binding_of(e);
        match binding.kind {
            BindingKind::Auto | BindingKind::Param => {
                Some(format!("f[{}]", binding.slot.expect("frame slot")))
            }
            BindingKind::Global | BindingKind::Extern => {
                let m = self.c_name_of(binding.name);
                match self.globals.get(&binding.name) {
                    Some(GlobalLayout::Array) => Some(format!("{m}[0]")),
                    _ => Some(m.to_owned()),
                }
            }
            _ => None,
        }
    }

    fn name_value(&mut self, e: &Expr) -> String {
        let binding = self.binding_of(e);
        match binding.kind {
            BindingKind::Function => {
                format!("((bword)(buword){})", self.c_name_of(binding.name))
            }
            BindingKind::Extern
                if self.extern_form(binding.name) == ExternForm::Function
                    && !self.globals.contains_key(&binding.name) =>
            {
                format!("((bword)(buword){})", self.c_name_of(binding.name))
            }
            _ => {
                let place = self.direct_place(e).expect("storage name");
                let t = self.fresh_tmp();
                self.line(format!("bword {t} = {place};"));
                t
            }
        }
    }

    fn unary(&mut self, op: UnaryOp, operand: &Expr) -> String {
        match op {
            UnaryOp::Neg => {
                let a = self.value(operand);
                let t = self.fresh_tmp();
                let e = self.wrapped(format!("-{a}"));
                self.line(format!("bword {t} = {e};"));
                t
            }
            UnaryOp::Not => {
                let a = self.value(operand);
                let t = self.fresh_tmp();
                self.line(format!("bword {t} = !{a};"));
                t
            }
            UnaryOp::BitNot => {
                let a = self.value(operand);
                let t = self.fresh_tmp();
                let e = self.wrapped(format!("~{a}"));
                self.line(format!("bword {t} = {e};"));
                t
            }
            UnaryOp::Deref => {
                let p = self.value(operand);
                let t = self.fresh_tmp();
                self.line(format!("bword {t} = bx_ld({p});"));
                t
            }
            UnaryOp::AddrOf => self.addr(operand),
            UnaryOp::PreInc | UnaryOp::PreDec => {
                let sign = if op == UnaryOp::PreInc { "+" } else { "-" };
                let t = self.fresh_tmp();
                match self.direct_place(operand) {
                    Some(place) => {
                        let e = self.wrapped(format!("{place} {sign} 1"));
                        self.line(format!("bword {t} = {e};"));
                        self.line(format!("{place} = {t};"));
                    }
                    None => {
                        let p = self.addr(operand);
                        let e = self.wrapped(format!("bx_ld({p}) {sign} 1"));
                        self.line(format!("bword {t} = {e};"));
                        self.line(format!("bx_st({p}, {t});"));
                    }
                }
                t
            }
            UnaryOp::PostInc | UnaryOp::PostDec => {
                let sign = if op == UnaryOp::PostInc { "+" } else { "-" };
                let t = self.fresh_tmp();
                let u = self.fresh_tmp();
                match self.direct_place(operand) {
                    Some(place) => {
                        self.line(format!("bword {t} = {place};"));
                        let e = self.wrapped(format!("{t} {sign} 1"));
                        self.line(format!("bword {u} = {e};"));
                        self.line(format!("{place} = {u};"));
                    }
                    None => {
                        let p = self.addr(operand);
                        self.line(format!("bword {t} = bx_ld({p});"));
                        let e = self.wrapped(format!("{t} {sign} 1"));
                        self.line(format!("bword {u} = {e};"));
                        self.line(format!("bx_st({p}, {u});"));
                    }
                }
                t
            }
        }
    }

    fn binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr) -> String {
        let a = self.value(lhs);
        let b = self.value(rhs);
        let t = self.fresh_tmp();
        let rhs_text = self.binary_operand(op, &a, &b);
        self.line(format!("bword {t} = {rhs_text};"));
        t
    }

    /// Combined operation text for `a op b`, with masking and shift-count
    /// handling per the configured word size.
    fn binary_operand(&mut self, op: BinOp, a: &str, b: &str) -> String {
        match op {
            BinOp::Shl => format!("bx_shl({a}, {b})"),
            BinOp::Shr => format!("bx_shr({a}, {b})"),
            _ if op.is_comparison() => format!("{a} {} {b}", op.sigil()),
            _ => self.wrapped(format!("{a} {} {b}", op.sigil())),
        }
    }

    fn assign(&mut self, op: Option<BinOp>, target: &Expr, value: &Expr) -> String {
        let place = self.direct_place(target);
        match op {
            None => {
                let v = self.value(value);
                match place {
                    Some(place) => self.line(format!("{place} = {v};")),
                    None => {
                        let p = self.addr(target);
                        self.line(format!("bx_st({p}, {v});"));
                    }
                }
                v
            }
            Some(op) => {
                // Single evaluation of the target's address, then
                // `t = (t op v)` semantics.
                match place {
                    Some(place) => {
                        let v = self.value(value);
                        let t = self.fresh_tmp();
                        let rhs_text = self.binary_operand(op, &place, &v);
                        self.line(format!("bword {t} = {rhs_text};"));
                        self.line(format!("{place} = {t};"));
                        t
                    }
                    None => {
                        let p = self.addr(target);
                        let v = self.value(value);
                        let old = self.fresh_tmp();
                        self.line(format!("bword {old} = bx_ld({p});"));
                        let t = self.fresh_tmp();
                        let rhs_text = self.binary_operand(op, &old, &v);
                        self.line(format!("bword {t} = {rhs_text};"));
                        self.line(format!("bx_st({p}, {t});"));
                        t
                    }
                }
            }
        }
    }

    fn call(&mut self, callee: &Expr, args: &[Expr]) -> String {
        // Arguments evaluate left to right; the statement sequence fixes
        // the order C would otherwise leave open.
        let direct = self.direct_callee(callee);
        let callee_value = match &direct {
            Some(_) => None,
            None => Some(self.value(callee)),
        };
        let mut arg_operands = Vec::with_capacity(args.len());
        for arg in args {
            arg_operands.push(self.value(arg));
        }
        let arg_list = arg_operands.join(", ");

        let t = self.fresh_tmp();
        match direct {
            Some(name) => self.line(format!("bword {t} = {name}({arg_list});")),
            None => {
                let params = if args.is_empty() {
                    "void".to_owned()
                } else {
                    vec!["bword"; args.len()].join(", ")
                };
                let cv = callee_value.expect("indirect callee evaluated");
                self.line(format!(
                    "bword {t} = ((bword (*)({params}))(buword){cv})({arg_list});"
                ));
            }
        }
        t
    }

    /// Mangled C name when the callee can be called directly.
    fn direct_callee(&self, callee: &Expr) -> Option<String> {
        let ExprKind::Name { .. } = callee.kind else {
            return None;
        };
        let binding = self.binding_of(callee);
        match binding.kind {
            BindingKind::Function => Some(self.c_name_of(binding.name).to_owned()),
            BindingKind::Extern
                if self.extern_form(binding.name) == ExternForm::Function
                    && !self.globals.contains_key(&binding.name) =>
            {
                Some(self.c_name_of(binding.name).to_owned())
            }
            _ => None,
        }
    }

    fn binding_of(&self, e: &Expr) -> &'a crate::analyze::Binding {
        let id = self
            .analysis
            .resolution(e.id)
            .expect("name resolved by analysis");
        self.analysis.binding(id)
    }

    /// Declaration form for an extern: runtime knowledge first, then usage.
    fn extern_form(&self, sym: Name) -> ExternForm {
        let spelling = self.analysis.names.spelling(sym);
        if let Some((_, form)) = runtime_entry(spelling) {
            return form;
        }
        if self.analysis.addressed_externs.contains(&sym) {
            ExternForm::Variable
        } else if self.analysis.called_externs.contains(&sym) {
            ExternForm::Function
        } else {
            ExternForm::Variable
        }
    }

    // ---- operands and text helpers ----

    fn number_operand(&self, value: i64, octal: bool) -> String {
        let v = self.word_size().wrap(value);
        if octal && v == value && v >= 0 {
            return format!("0{v:o}");
        }
        fmt_const(v)
    }

    fn string_operand(&mut self, bytes: &[u8]) -> String {
        let next = self.strings.len();
        let idx = *self.strings.entry(bytes.to_vec()).or_insert(next);
        format!("bx_ad(bstr_{idx})")
    }

    /// Wrap an arithmetic result to the configured width. At host width no
    /// mask is emitted at all.
    fn wrapped(&self, inner: String) -> String {
        if self.word_size().needs_mask() {
            format!("bx_w({inner})")
        } else {
            inner
        }
    }

    fn fresh_tmp(&mut self) -> String {
        let t = format!("t{}", self.tmp);
        self.tmp += 1;
        t
    }

    fn fresh_label(&mut self) -> String {
        let l = format!("L{}", self.label);
        self.label += 1;
        l
    }

    fn line(&mut self, text: impl AsRef<str>) {
        self.body.push_str("    ");
        self.body.push_str(text.as_ref());
        self.body.push('\n');
    }

    fn put_label(&mut self, label: &str) {
        self.body.push_str(label);
        self.body.push_str(":;\n");
    }

    // ---- assembly ----

    fn assemble(&mut self) -> String {
        let mut out = prelude(self.config);

        let extern_decls = self.extern_decls();
        if !extern_decls.is_empty() {
            out.push_str("/* external declarations */\n");
            for decl in &extern_decls {
                out.push_str(decl);
                out.push('\n');
            }
            out.push('\n');
        }

        if !self.defined_fns.is_empty() {
            out.push_str("/* forward declarations */\n");
            for (&sym, &arity) in &self.defined_fns {
                let m = self.c_name_of(sym);
                let params = if arity == 0 {
                    "void".to_owned()
                } else {
                    vec!["bword"; arity].join(", ")
                };
                out.push_str(&format!("bword {m}({params});\n"));
            }
            out.push('\n');
        }

        if !self.strings.is_empty() {
            out.push_str("/* string constants */\n");
            let align = match self.config.pointer_mode {
                PointerMode::Word => "_Alignas(bword) ",
                PointerMode::Byte => "",
            };
            for (bytes, idx) in &self.strings {
                let elems = bytes
                    .iter()
                    .map(|b| b.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push_str(&format!(
                    "static {align}unsigned char bstr_{idx}[{}] = {{{elems}}};\n",
                    bytes.len()
                ));
            }
            out.push('\n');
        }

        if !self.global_lines.is_empty() {
            out.push_str("/* globals */\n");
            for line in &self.global_lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }

        out.push_str("void bcx_init(void)\n{\n");
        for line in &self.init_lines {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("}\n\n");

        out.push_str(&self.bodies);
        out
    }

    /// Declarations for referenced externs not defined in this unit,
    /// in first-reference order.
    fn extern_decls(&self) -> Vec<String> {
        let mut decls = Vec::new();
        for sym in self.analysis.extern_names() {
            if self.globals.contains_key(&sym) || self.defined_fns.contains_key(&sym) {
                continue;
            }
            let spelling = self.analysis.names.spelling(sym);
            match runtime_entry(spelling) {
                Some((decl, _)) => decls.push(decl.to_owned()),
                None => {
                    let m = self.c_name_of(sym);
                    match self.extern_form(sym) {
                        ExternForm::Function => decls.push(format!("extern bword {m}();")),
                        ExternForm::Variable => decls.push(format!("extern bword {m};")),
                    }
                }
            }
        }
        decls
    }
}

/// Label for a user `name:` statement.
fn user_label(name: &str) -> String {
    format!("l_{}", name.replace('.', "_"))
}

/// Decimal constant text, parenthesizing negatives for operand safety.
fn fmt_const(v: i64) -> String {
    if v == i64::MIN {
        return "(-9223372036854775807 - 1)".to_owned();
    }
    if v < 0 {
        format!("({v})")
    } else {
        v.to_string()
    }
}

/// Fixed prelude: the word type and the addressing/width helpers selected
/// by the configuration.
fn prelude(config: &Config) -> String {
    let mut out = String::from(
        "/* Generated by bcx. */\n\
         #include <stdint.h>\n\
         #include <stddef.h>\n\
         \n\
         typedef intptr_t bword;\n\
         typedef uintptr_t buword;\n\
         \n",
    );

    match config.word_size {
        WordSize::W16 => {
            out.push_str("#define BX_WORD_BITS 16\n");
            out.push_str(
                "static inline bword bx_w(bword v) { return (bword)(int16_t)v; }\n",
            );
        }
        WordSize::W32 => {
            out.push_str("#define BX_WORD_BITS 32\n");
            out.push_str(
                "static inline bword bx_w(bword v) { return (bword)(int32_t)v; }\n",
            );
        }
        WordSize::Host => {
            out.push_str("#define BX_WORD_BITS (8 * (int)sizeof(bword))\n");
        }
    }

    match config.pointer_mode {
        PointerMode::Word => out.push_str(
            "static inline bword bx_ld(bword p) { return *(const bword *)((buword)p * sizeof(bword)); }\n\
             static inline void bx_st(bword p, bword v) { *(bword *)((buword)p * sizeof(bword)) = v; }\n\
             static inline bword bx_ad(const void *p) { return (bword)((buword)p / sizeof(bword)); }\n\
             static inline bword bx_ix(bword b, bword i) { return b + i; }\n",
        ),
        PointerMode::Byte => out.push_str(
            "static inline bword bx_ld(bword p) { return *(const bword *)(buword)p; }\n\
             static inline void bx_st(bword p, bword v) { *(bword *)(buword)p = v; }\n\
             static inline bword bx_ad(const void *p) { return (bword)(buword)p; }\n\
             static inline bword bx_ix(bword b, bword i) { return b + i * (bword)sizeof(bword); }\n",
        ),
    }

    match config.word_size {
        WordSize::Host => out.push_str(
            "static inline bword bx_shl(bword a, bword n) { return (bword)((buword)a << (n & (BX_WORD_BITS - 1))); }\n\
             static inline bword bx_shr(bword a, bword n) { return a >> (n & (BX_WORD_BITS - 1)); }\n",
        ),
        _ => out.push_str(
            "static inline bword bx_shl(bword a, bword n) { return bx_w((bword)((buword)a << (n & (BX_WORD_BITS - 1)))); }\n\
             static inline bword bx_shr(bword a, bword n) { return bx_w(a >> (n & (BX_WORD_BITS - 1))); }\n",
        ),
    }

    out.push('\n');
    out
}
