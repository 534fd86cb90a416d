//! Runtime collaborator interface.
//!
//! The core never defines the runtime; it emits declarations for the
//! collaborators a program references. The table below is keyed by B
//! spelling; the declarations carry the mangled symbols the name table
//! produces, so the bundled runtime and generated code always agree.

/// How an external name must be declared in C.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExternForm {
    Function,
    Variable,
}

/// Declaration and form for a known runtime collaborator.
///
/// Signatures are in terms of the word type; the runtime library implements
/// exactly these.
pub fn runtime_entry(name: &str) -> Option<(&'static str, ExternForm)> {
    use ExternForm::{Function, Variable};

    let entry = match name {
        // Character I/O
        "putchar" => ("extern bword b_putchar(bword);", Function),
        "getchar" => ("extern bword b_getchar(void);", Function),
        "putstr" => ("extern bword b_putstr(bword);", Function),
        "getstr" => ("extern bword b_getstr(bword);", Function),
        "flush" => ("extern bword b_flush(void);", Function),
        // Formatted output
        "printf" => ("extern bword b_printf(bword, ...);", Function),
        "print" => ("extern bword b_print(bword);", Function),
        "putnum" => ("extern bword b_putnum(bword);", Function),
        "printn" => ("extern bword b_printn(bword, bword);", Function),
        // String primitives
        "char" => ("extern bword b_char(bword, bword);", Function),
        "lchar" => ("extern bword b_lchar(bword, bword, bword);", Function),
        // File I/O
        "open" => ("extern bword b_open(bword, bword);", Function),
        "creat" => ("extern bword b_creat(bword, bword);", Function),
        "close" => ("extern bword b_close(bword);", Function),
        "read" => ("extern bword b_read(bword, bword, bword);", Function),
        "write" => ("extern bword b_write(bword, bword, bword);", Function),
        "seek" => ("extern bword b_seek(bword, bword, bword);", Function),
        "openr" => ("extern bword b_openr(bword);", Function),
        "openw" => ("extern bword b_openw(bword);", Function),
        "getc" => ("extern bword b_getc(bword);", Function),
        "putc" => ("extern bword b_putc(bword, bword);", Function),
        "getw" => ("extern bword b_getw(bword);", Function),
        "putw" => ("extern bword b_putw(bword, bword);", Function),
        "fopen" => ("extern bword b_fopen(bword, bword);", Function),
        "fcreat" => ("extern bword b_fcreat(bword, bword);", Function),
        "fclose" => ("extern bword b_fclose(bword);", Function),
        // Process
        "fork" => ("extern bword b_fork(void);", Function),
        "wait" => ("extern bword b_wait(void);", Function),
        "execl" => ("extern bword b_execl(bword, ...);", Function),
        "execv" => ("extern bword b_execv(bword, bword);", Function),
        "exit" => ("extern bword b_exit(bword);", Function),
        "system" => ("extern bword b_system(bword);", Function),
        // Memory
        "alloc" => ("extern bword b_alloc(bword);", Function),
        "malloc" => ("extern bword b_malloc(bword);", Function),
        "memset" => ("extern bword b_memset(bword, bword, bword);", Function),
        "rlsevec" => ("extern bword b_rlsevec(bword, bword);", Function),
        // Compatibility
        "sx64" => ("extern bword b_sx64(bword);", Function),
        // I/O unit globals
        "rd.unit" => ("extern bword b_rd_unit;", Variable),
        "wr.unit" => ("extern bword b_wr_unit;", Variable),
        _ => return None,
    };
    Some(entry)
}
