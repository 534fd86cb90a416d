mod cli;
mod commands;

use cli::{AstParams, BuildParams, CheckParams, EmitParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    let code = match matches.subcommand() {
        Some(("build", m)) => commands::build::run(BuildParams::from_matches(m)),
        Some(("emit", m)) => commands::emit::run(EmitParams::from_matches(m)),
        Some(("check", m)) => commands::check::run(CheckParams::from_matches(m)),
        Some(("ast", m)) => commands::ast::run(AstParams::from_matches(m)),
        _ => unreachable!("clap should have caught this"),
    };
    std::process::exit(code);
}
