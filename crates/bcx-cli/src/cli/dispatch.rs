//! Typed parameter extraction from clap matches.

use std::path::PathBuf;

use clap::ArgMatches;

use bcx_core::{Config, PointerMode, WordSize};

use super::ColorChoice;

fn inputs(m: &ArgMatches) -> Vec<PathBuf> {
    m.get_many::<PathBuf>("inputs")
        .expect("inputs are required")
        .cloned()
        .collect()
}

fn color(m: &ArgMatches) -> ColorChoice {
    ColorChoice::from_flag(
        m.get_one::<String>("color").map(String::as_str).unwrap_or("auto"),
    )
}

fn word_size(m: &ArgMatches) -> WordSize {
    match m.get_one::<String>("word_size").map(String::as_str) {
        Some("16") => WordSize::W16,
        Some("32") => WordSize::W32,
        _ => WordSize::Host,
    }
}

fn pointer_mode(m: &ArgMatches) -> PointerMode {
    if m.get_flag("word_pointer") {
        PointerMode::Word
    } else {
        PointerMode::Byte
    }
}

fn strings(m: &ArgMatches, id: &str) -> Vec<String> {
    m.get_many::<String>(id)
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default()
}

pub struct BuildParams {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub config: Config,
    pub cc: String,
    pub keep_c: bool,
    pub color: ColorChoice,
}

impl BuildParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let mut config = Config::default();
        config.pointer_mode = pointer_mode(m);
        config.word_size = word_size(m);
        config.link_libraries = strings(m, "libs");
        config.extra_cflags = strings(m, "cflags");

        Self {
            inputs: inputs(m),
            output: m.get_one::<PathBuf>("output").cloned(),
            config,
            cc: m
                .get_one::<String>("cc")
                .cloned()
                .unwrap_or_else(|| "cc".to_owned()),
            keep_c: m.get_flag("keep_c"),
            color: color(m),
        }
    }
}

pub struct EmitParams {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub config: Config,
    pub color: ColorChoice,
}

impl EmitParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let mut config = Config::default();
        config.pointer_mode = pointer_mode(m);
        config.word_size = word_size(m);
        config.emit_intermediate = true;

        Self {
            inputs: inputs(m),
            output: m.get_one::<PathBuf>("output").cloned(),
            config,
            color: color(m),
        }
    }
}

pub struct CheckParams {
    pub inputs: Vec<PathBuf>,
    pub config: Config,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let mut config = Config::default();
        config.pointer_mode = pointer_mode(m);
        config.word_size = word_size(m);

        Self {
            inputs: inputs(m),
            config,
            color: color(m),
        }
    }
}

pub struct AstParams {
    pub inputs: Vec<PathBuf>,
    pub config: Config,
    pub color: ColorChoice,
}

impl AstParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let mut config = Config::default();
        config.word_size = word_size(m);

        Self {
            inputs: inputs(m),
            config,
            color: color(m),
        }
    }
}
