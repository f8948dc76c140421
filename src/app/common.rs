use super::{
    app_helper::AppHelper, command::Command, AuthorsCommand, EncodingsCommand, EnumerateCommand,
    LexCommand,
};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches};
use lexbibd::{
    designs::SymmetryBreaking,
    sat::{DefaultSatSolverFactory, SatSolver, SatSolverFactory, SolvingListener, SolvingResult},
    translator::{ExternalTranslator, FormulaTranslator, TseitinTranslator},
};
use log::{debug, info};
use std::{fs, path::PathBuf};

pub(crate) fn create_app_helper() -> AppHelper<'static> {
    let app_name = option_env!("CARGO_PKG_NAME").unwrap_or("unknown app name");
    let app_version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown version");
    let authors = option_env!("CARGO_PKG_AUTHORS").unwrap_or("unknown authors");
    let mut app = AppHelper::new(
        app_name,
        app_version,
        authors,
        "Lexbibd, a BIBD enumerator with lex-leader symmetry breaking.",
    );
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(AuthorsCommand::new(app_name, app_version, authors)),
        Box::new(EncodingsCommand::new()),
        Box::new(EnumerateCommand::new()),
        Box::new(LexCommand::new()),
    ];
    for c in commands {
        app.add_command(c);
    }
    app
}

pub(crate) const ARG_OPTION: &str = "OPTION";

pub(crate) fn option_arg(default_value: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(ARG_OPTION)
        .long("option")
        .empty_values(false)
        .multiple(false)
        .default_value(default_value)
        .help("the symmetry-breaking option (see the encodings command)")
        .required(false)
}

pub(crate) fn read_option(arg_matches: &ArgMatches<'_>) -> Result<SymmetryBreaking> {
    let name = arg_matches.value_of(ARG_OPTION).unwrap_or_default();
    SymmetryBreaking::from_name(name).context("while reading the symmetry-breaking option")
}

const ARG_TRANSLATOR: &str = "TRANSLATOR";
const ARG_TRANSLATOR_OPTIONS: &str = "TRANSLATOR_OPTIONS";

pub(crate) fn translator_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_TRANSLATOR)
            .long("translator")
            .empty_values(false)
            .multiple(false)
            .help("a path to an external formula translator to replace the embedded one")
            .required(false),
        Arg::with_name(ARG_TRANSLATOR_OPTIONS)
            .long("translator-opt")
            .requires(ARG_TRANSLATOR)
            .empty_values(false)
            .multiple(true)
            .number_of_values(1)
            .allow_hyphen_values(true)
            .help("an option to give to the external formula translator")
            .required(false),
    ]
}

pub(crate) fn create_translator(arg_matches: &ArgMatches<'_>) -> Result<Box<dyn FormulaTranslator>> {
    match arg_matches.value_of(ARG_TRANSLATOR) {
        Some(t) => {
            let path = canonicalize_file_path(t)?;
            let options = arg_matches
                .values_of(ARG_TRANSLATOR_OPTIONS)
                .map(|v| v.map(|o| o.to_string()).collect::<Vec<String>>())
                .unwrap_or_default();
            info!("using {:?} as formula translator", path);
            Ok(Box::new(ExternalTranslator::new(
                path.to_string_lossy().to_string(),
                options,
            )))
        }
        None => {
            info!("using the embedded formula translator");
            Ok(Box::new(TseitinTranslator))
        }
    }
}

/// Canonicalize a path given by the user.
pub(crate) fn canonicalize_file_path(file_path: &str) -> Result<PathBuf> {
    fs::canonicalize(PathBuf::from(file_path))
        .with_context(|| format!(r#"while opening file "{}""#, file_path))
}

pub(crate) fn create_sat_solver() -> Box<dyn SatSolver> {
    let mut solver = DefaultSatSolverFactory.new_solver();
    solver.add_listener(Box::<SatSolvingLogger>::default());
    solver
}

#[derive(Default)]
struct SatSolvingLogger;

impl SolvingListener for SatSolvingLogger {
    fn solving_start(&self, n_vars: usize, n_clauses: usize) {
        debug!(
            "launching SAT solver on an instance with {} variables and {} clauses",
            n_vars,
            n_clauses
        );
    }

    fn solving_end(&self, result: &SolvingResult) {
        debug!("SAT solver ended with result {}", result.status_str());
    }
}
