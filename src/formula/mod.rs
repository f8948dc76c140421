//! Symbolic propositional formulas over local variables.

mod local_var;
pub use local_var::LocalVar;
pub use local_var::LocalVarAllocator;

mod propositional_formula;
pub use propositional_formula::Formula;
