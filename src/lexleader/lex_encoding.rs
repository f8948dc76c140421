use anyhow::{anyhow, Result};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// The encodings available to express a lexicographic ordering constraint between two vectors of bits.
///
/// All the encodings accept the same assignments of the vectors; they differ in the number of clauses,
/// the number of auxiliary variables, and the strength of unit propagation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString, IntoStaticStr,
)]
pub enum LexEncoding {
    /// Unrolled chain of implications, without auxiliary variables.
    #[strum(serialize = "and")]
    And,
    /// Chain of implications with one auxiliary variable per equal prefix.
    #[strum(serialize = "and-cse")]
    AndCse,
    /// Disjunction of strictness witnesses, without auxiliary variables.
    #[strum(serialize = "or")]
    Or,
    /// Disjunction of strictness witnesses with one auxiliary variable per equal prefix.
    #[strum(serialize = "or-cse")]
    OrCse,
    /// Right-to-left recursive disjunction.
    #[strum(serialize = "ror")]
    Ror,
    /// Monotonic "still tied" variables.
    #[strum(serialize = "alpha")]
    Alpha,
    /// Monotonic "still tied" variables, one formula per position.
    #[strum(serialize = "alpha-m")]
    AlphaM,
    /// Arithmetic carry chain.
    #[strum(serialize = "harvey")]
    Harvey,
}

impl LexEncoding {
    /// Returns `true` iff this encoding introduces auxiliary variables.
    pub fn uses_aux_vars(&self) -> bool {
        !matches!(self, LexEncoding::And | LexEncoding::Or)
    }

    /// Reads an encoding given its name, ignoring case.
    pub fn from_name(name: &str) -> Result<Self> {
        name.to_ascii_lowercase()
            .parse::<LexEncoding>()
            .map_err(|_| anyhow!(r#"undefined lex-leader encoding "{}""#, name))
    }

    /// Iterates over the names of the encodings.
    pub fn iter_names() -> impl Iterator<Item = &'static str> {
        LexEncoding::iter().map(|e| e.into())
    }
}
