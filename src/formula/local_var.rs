use std::{fmt::Display, num::NonZeroUsize};

/// A variable of a symbolic formula.
///
/// Local variables live in their own numbering space, distinct from the one of the SAT solver.
/// The two spaces are linked by the [`VarMap`](crate::translator::VarMap) produced when a formula is translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalVar(NonZeroUsize);

impl LocalVar {
    /// Returns the (positive) identifier of this variable.
    pub fn id(&self) -> usize {
        self.0.get()
    }
}

impl From<usize> for LocalVar {
    fn from(id: usize) -> Self {
        match NonZeroUsize::new(id) {
            Some(id) => Self(id),
            None => panic!("local variable identifiers must be positive"),
        }
    }
}

impl Display for LocalVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A dense and monotonic allocator of local variables.
///
/// Variables are numbered from 1; each new variable is greater than all the previous ones.
#[derive(Debug, Default, Clone)]
pub struct LocalVarAllocator {
    n_vars: usize,
}

impl LocalVarAllocator {
    /// Allocates a new variable.
    pub fn new_var(&mut self) -> LocalVar {
        self.n_vars += 1;
        LocalVar::from(self.n_vars)
    }

    /// Allocates `n` new variables, in increasing order.
    pub fn new_vars(&mut self, n: usize) -> Vec<LocalVar> {
        (0..n).map(|_| self.new_var()).collect()
    }

    /// Returns the number of variables allocated so far.
    pub fn n_vars(&self) -> usize {
        self.n_vars
    }
}
