use super::{cli_manager::logging_level_cli_arg, command::Command};
use anyhow::Result;
use clap::{App, AppSettings, ArgMatches, SubCommand};
use lexbibd::designs::SymmetryBreaking;

const CMD_NAME: &str = "encodings";

pub(crate) struct EncodingsCommand;

impl EncodingsCommand {
    pub(crate) fn new() -> Self {
        EncodingsCommand
    }
}

impl<'a> Command<'a> for EncodingsCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Displays the available symmetry-breaking options")
            .setting(AppSettings::DisableVersion)
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, _arg_matches: &ArgMatches<'_>) -> Result<()> {
        SymmetryBreaking::iter_names().for_each(|n| println!("{}", n));
        Ok(())
    }
}
