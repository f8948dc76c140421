//! Lexbibd enumerates balanced incomplete block designs with a SAT solver,
//! breaking the row and column symmetries of their incidence matrices with lex-leader constraints.
//!
//! The lex-leader constraints are built as [propositional formulas](formula) in one of several
//! [encodings](lexleader::LexEncoding), then [translated](translator) into clauses.
//! The [design model](designs::DesignModelBuilder) adds the design constraints on top of them,
//! and the [enumerator](designs::DesignEnumerator) lists the solutions.

#![warn(missing_docs)]

pub mod designs;

pub mod formula;

pub mod lexleader;

pub mod sat;

pub mod translator;

pub mod utils;
