//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` composed into commands by
//! `build_cli`, so the same definition is reused everywhere it appears.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// B source files (positional, one or more).
pub fn inputs_arg() -> Arg {
    Arg::new("inputs")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .num_args(1..)
        .required(true)
        .help("B source files forming one translation unit")
}

/// Classical word-addressed pointer mode (--word-pointer).
pub fn word_pointer_arg() -> Arg {
    Arg::new("word_pointer")
        .long("word-pointer")
        .action(ArgAction::SetTrue)
        .help("Word-addressed pointers: p+1 advances one word (classical B)")
}

/// Word width (--word-size).
pub fn word_size_arg() -> Arg {
    Arg::new("word_size")
        .long("word-size")
        .value_name("BITS")
        .default_value("host")
        .value_parser(["16", "32", "host"])
        .help("Arithmetic wraparound width")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize diagnostics")
}

/// Output path (-o).
pub fn output_arg(help: &'static str) -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

/// Library for the downstream linker (-l, repeatable).
pub fn lib_arg() -> Arg {
    Arg::new("libs")
        .short('l')
        .value_name("LIB")
        .action(ArgAction::Append)
        .help("Link against a library (passed to the downstream linker)")
}

/// Verbatim flag for the downstream C compiler (--cflag, repeatable).
pub fn cflag_arg() -> Arg {
    Arg::new("cflags")
        .long("cflag")
        .value_name("FLAG")
        .action(ArgAction::Append)
        .allow_hyphen_values(true)
        .help("Extra flag passed verbatim to the downstream C compiler")
}

/// Downstream C compiler executable (--cc).
pub fn cc_arg() -> Arg {
    Arg::new("cc")
        .long("cc")
        .value_name("PATH")
        .default_value("cc")
        .help("Downstream C compiler to invoke")
}

/// Keep the generated C next to the output (--keep-c).
pub fn keep_c_arg() -> Arg {
    Arg::new("keep_c")
        .long("keep-c")
        .action(ArgAction::SetTrue)
        .help("Keep the generated C file next to the output")
}
