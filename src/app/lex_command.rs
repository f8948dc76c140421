use super::{cli_manager::logging_level_cli_arg, command::Command, common};
use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use lexbibd::{designs::SymmetryBreaking, lexleader::LexLeaderEncoder};
use log::info;

const CMD_NAME: &str = "lex";

const ARG_COLUMNS: &str = "COLUMNS";
const ARG_ROWS: &str = "ROWS";
const ARG_NO_COLUMNS: &str = "NO_COLUMNS";
const ARG_NO_ROWS: &str = "NO_ROWS";

pub(crate) struct LexCommand;

impl LexCommand {
    pub(crate) fn new() -> Self {
        LexCommand
    }
}

impl<'a> Command<'a> for LexCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Prints the lex-leader constraints of a matrix in the formula translator format")
            .setting(AppSettings::DisableVersion)
            .arg(
                Arg::with_name(ARG_COLUMNS)
                    .short("c")
                    .long("columns")
                    .empty_values(false)
                    .multiple(false)
                    .help("the number of columns of the matrix")
                    .required(true),
            )
            .arg(
                Arg::with_name(ARG_ROWS)
                    .short("r")
                    .long("rows")
                    .empty_values(false)
                    .multiple(false)
                    .help("the number of rows of the matrix")
                    .required(true),
            )
            .arg(common::option_arg("and"))
            .arg(
                Arg::with_name(ARG_NO_COLUMNS)
                    .long("no-columns")
                    .takes_value(false)
                    .help("do not order the columns"),
            )
            .arg(
                Arg::with_name(ARG_NO_ROWS)
                    .long("no-rows")
                    .takes_value(false)
                    .help("do not order the rows"),
            )
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let n_columns = read_dimension(arg_matches, ARG_COLUMNS)?;
        let n_rows = read_dimension(arg_matches, ARG_ROWS)?;
        let encoding = match common::read_option(arg_matches)? {
            SymmetryBreaking::Encoded(e) => e,
            other => {
                return Err(anyhow!(
                    r#"option "{}" has no lex-leader formula; use one of the encodings"#,
                    other
                ))
            }
        };
        let mut encoder = LexLeaderEncoder::new(n_columns, n_rows, encoding)
            .with_columns(!arg_matches.is_present(ARG_NO_COLUMNS))
            .with_rows(!arg_matches.is_present(ARG_NO_ROWS));
        let formula = encoder.make_lexleader();
        info!(
            "{}x{} matrix with encoding {} uses {} local variables",
            n_columns,
            n_rows,
            encoder.encoding(),
            encoder.n_vars()
        );
        println!("{}", formula.to_translator_input());
        Ok(())
    }
}

fn read_dimension(arg_matches: &ArgMatches<'_>, arg: &str) -> Result<usize> {
    let value = arg_matches.value_of(arg).unwrap_or_default();
    value
        .parse::<usize>()
        .with_context(|| format!(r#"invalid matrix dimension "{}""#, value))
}
