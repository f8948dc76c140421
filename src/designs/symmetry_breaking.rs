use crate::lexleader::LexEncoding;
use anyhow::{anyhow, Result};
use std::fmt::Display;

const NONE_NAME: &str = "none";
const NATIVE_LEX_NAME: &str = "mylex";

/// The symmetry-breaking constraints added to a design model.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SymmetryBreaking {
    /// No symmetry breaking.
    #[default]
    None,
    /// Clauses ordering the first 1 of adjacent columns and rows, added directly to the solver.
    NativeLex,
    /// Lex-leader constraints in the given encoding, translated into clauses.
    Encoded(LexEncoding),
}

impl SymmetryBreaking {
    /// Reads a symmetry-breaking option given its name: `none`, `mylex`, or the name of a [`LexEncoding`].
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            NONE_NAME => Ok(SymmetryBreaking::None),
            NATIVE_LEX_NAME => Ok(SymmetryBreaking::NativeLex),
            _ => LexEncoding::from_name(name)
                .map(SymmetryBreaking::Encoded)
                .map_err(|_| anyhow!(r#"undefined symmetry-breaking option "{}""#, name)),
        }
    }

    /// Iterates over the names of the available options.
    pub fn iter_names() -> impl Iterator<Item = &'static str> {
        [NONE_NAME, NATIVE_LEX_NAME]
            .into_iter()
            .chain(LexEncoding::iter_names())
    }
}

impl Display for SymmetryBreaking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymmetryBreaking::None => write!(f, "{}", NONE_NAME),
            SymmetryBreaking::NativeLex => write!(f, "{}", NATIVE_LEX_NAME),
            SymmetryBreaking::Encoded(e) => write!(f, "{}", e),
        }
    }
}
