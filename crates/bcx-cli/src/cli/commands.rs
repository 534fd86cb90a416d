//! Command-line interface definition.

use clap::Command;

use super::args;

pub fn build_cli() -> Command {
    Command::new("bcx")
        .about("A compiler for the B programming language")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("build")
                .about("Compile B sources to a native executable")
                .arg(args::inputs_arg())
                .arg(args::output_arg("Output executable (default: a.out)"))
                .arg(args::word_pointer_arg())
                .arg(args::word_size_arg())
                .arg(args::lib_arg())
                .arg(args::cflag_arg())
                .arg(args::cc_arg())
                .arg(args::keep_c_arg())
                .arg(args::color_arg()),
        )
        .subcommand(
            Command::new("emit")
                .about("Emit the C translation unit without invoking the toolchain")
                .arg(args::inputs_arg())
                .arg(args::output_arg("Output C file (default: stdout)"))
                .arg(args::word_pointer_arg())
                .arg(args::word_size_arg())
                .arg(args::color_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Parse and analyze without emitting anything")
                .arg(args::inputs_arg())
                .arg(args::word_pointer_arg())
                .arg(args::word_size_arg())
                .arg(args::color_arg()),
        )
        .subcommand(
            Command::new("ast")
                .about("Dump the parsed tree as JSON")
                .arg(args::inputs_arg())
                .arg(args::word_size_arg())
                .arg(args::color_arg()),
        )
}
