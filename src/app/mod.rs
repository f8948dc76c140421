mod app_helper;

mod authors_command;
pub(crate) use authors_command::AuthorsCommand;

mod cli_manager;

mod command;

pub(crate) mod common;

mod encodings_command;
pub(crate) use encodings_command::EncodingsCommand;

mod enumerate_command;
pub(crate) use enumerate_command::EnumerateCommand;

mod lex_command;
pub(crate) use lex_command::LexCommand;

mod writable_string;
