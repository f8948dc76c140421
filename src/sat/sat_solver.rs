use super::{cadical_solver::CadicalSolver, cardinality_encoder};
use anyhow::Result;
use std::{
    fmt::Display,
    num::{NonZeroIsize, NonZeroUsize},
};

/// A variable in a SAT solver.
///
/// A variable is represented by a non-null positive integer.
/// It can be obtained through the [From] trait from an integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(NonZeroUsize);

macro_rules! impl_var_from {
    ($t: ty) => {
        impl From<$t> for Variable {
            fn from(v: $t) -> Self {
                Self(NonZeroUsize::try_from(v as usize).unwrap())
            }
        }
    };
}
impl_var_from!(usize);
impl_var_from!(u64);
impl_var_from!(u32);

macro_rules! impl_var_from_neg {
    ($t: ty) => {
        impl From<$t> for Variable {
            fn from(v: $t) -> Self {
                if v < 0 {
                    panic!("cannot build a variable from a negative integer")
                }
                Self(NonZeroUsize::try_from(v as usize).unwrap())
            }
        }
    };
}
impl_var_from_neg!(isize);
impl_var_from_neg!(i64);
impl_var_from_neg!(i32);

impl From<Variable> for usize {
    fn from(v: Variable) -> Self {
        v.0.into()
    }
}

impl Variable {
    /// Returns the literal asserting this variable.
    pub fn positive(self) -> Literal {
        Literal::from(self)
    }

    /// Returns the literal asserting the negation of this variable.
    pub fn negative(self) -> Literal {
        Literal::from(self).negate()
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A literal in a SAT solver.
///
/// A literal is represented by a non-null integer.
/// It can be obtained through the [From] trait from a signed integer type or a [Variable].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal(NonZeroIsize);

impl Literal {
    /// Returns the opposite literal.
    pub fn negate(self) -> Self {
        Self::from(-self.0.get())
    }

    /// Returns the variable of this literal.
    pub fn var(&self) -> Variable {
        Variable(self.0.unsigned_abs())
    }

    /// Returns `true` iff this literal is the positive one of its variable.
    pub fn is_positive(&self) -> bool {
        self.0.get() > 0
    }
}

macro_rules! impl_lit_from {
    ($t: ty) => {
        impl From<$t> for Literal {
            fn from(l: $t) -> Self {
                Self(NonZeroIsize::try_from(l as isize).unwrap())
            }
        }
    };
}
impl_lit_from!(isize);
impl_lit_from!(i64);
impl_lit_from!(i32);

impl From<Variable> for Literal {
    fn from(v: Variable) -> Self {
        Self::from(usize::from(v) as isize)
    }
}

impl From<Literal> for isize {
    fn from(l: Literal) -> Self {
        l.0.into()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds a clause from a list of integers.
#[macro_export]
macro_rules! clause {
    () => (
        vec![] as Vec<$crate::sat::Literal>
    );
    ($($x:expr),+ $(,)?) => (
        [$($x),+].into_iter().map($crate::sat::Literal::from).collect::<Vec<$crate::sat::Literal>>()
    );
}

/// An assignment of a set of variables.
///
/// Inside the set of variables involved in the assignment, some may be unassigned.
/// This is the reason why accessors to assigned value returns an [Option<bool>].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment(Vec<Option<bool>>);

impl Assignment {
    pub(crate) fn new(assignment: Vec<Option<bool>>) -> Self {
        Self(assignment)
    }

    /// Returns the value potentially assigned to the variable.
    ///
    /// The result in an [Option].
    /// In case the variable is not assigned (or is out of the range of the assignment), [Option::None] is returned.
    /// Else, [Option::Some] is returned and contains the assigned value.
    pub fn value_of<T>(&self, v: T) -> Option<bool>
    where
        T: Into<Variable>,
    {
        self.0
            .get(usize::from(v.into()) - 1)
            .copied()
            .unwrap_or_default()
    }

    /// Returns the number of variables covered by this assignment.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` iff this assignment covers no variable.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The result of a call to a SAT solver.
#[derive(Debug, PartialEq, Eq)]
pub enum SolvingResult {
    /// The problem is satisfiable; a model is given.
    Satisfiable(Assignment),
    /// The problem is unsatisfiable.
    Unsatisfiable,
    /// The solver was not able to conclude.
    Unknown,
}

impl SolvingResult {
    /// Returns the underlying model if it exists, or [Option::None].
    ///
    /// # Panics
    ///
    /// If the solving result is set [SolvingResult::Unknown], this function panics.
    pub fn unwrap_model(self) -> Option<Assignment> {
        match self {
            SolvingResult::Satisfiable(assignment) => Some(assignment),
            SolvingResult::Unsatisfiable => None,
            SolvingResult::Unknown => {
                panic!(r#"cannot unwrap solving result when the solver returned "Unknown""#)
            }
        }
    }

    /// Returns a short string describing the status of this result.
    pub fn status_str(&self) -> &'static str {
        match self {
            SolvingResult::Satisfiable(_) => "SAT",
            SolvingResult::Unsatisfiable => "UNSAT",
            SolvingResult::Unknown => "UNKNOWN",
        }
    }
}

/// A trait for objects listening to the solving steps of a SAT solver.
pub trait SolvingListener {
    /// Called when a solving step begins.
    fn solving_start(&self, n_vars: usize, n_clauses: usize);

    /// Called when a solving step ends.
    fn solving_end(&self, result: &SolvingResult);
}

/// A trait for SAT solvers.
///
/// Besides plain clauses, solvers accept cardinality constraints over sets of literals.
/// The default implementation of these constraints translates them into clauses,
/// allocating the auxiliary variables it needs through [`SatSolver::new_var`].
pub trait SatSolver {
    /// Adds a clause to this solver.
    fn add_clause(&mut self, cl: Vec<Literal>);

    /// Solves the problem formed by the clauses added so far.
    fn solve(&mut self) -> SolvingResult;

    /// Solves the problem formed by the clauses added so far and the provided assumptions.
    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> SolvingResult;

    /// Returns the number of variables known by this solver.
    fn n_vars(&self) -> usize;

    /// Returns the number of clauses added to this solver.
    fn n_clauses(&self) -> usize;

    /// Adds a listener to this solver.
    fn add_listener(&mut self, listener: Box<dyn SolvingListener>);

    /// Extends the pool of variables so that the maximal variable id is at least `new_max_id`.
    fn reserve(&mut self, new_max_id: usize);

    /// Allocates a fresh variable, greater than every variable known so far.
    fn new_var(&mut self) -> Variable {
        let v = self.n_vars() + 1;
        self.reserve(v);
        Variable::from(v)
    }

    /// Requires at least `k` literals of `lits` to be true.
    ///
    /// An error is returned if `k` exceeds the number of literals.
    fn add_at_least(&mut self, lits: &[Literal], k: usize) -> Result<()> {
        let clauses = cardinality_encoder::encode_at_least(lits, k, &mut || self.new_var())?;
        clauses.into_iter().for_each(|cl| self.add_clause(cl));
        Ok(())
    }

    /// Requires at most `k` literals of `lits` to be true.
    ///
    /// An error is returned if `k` exceeds the number of literals.
    fn add_at_most(&mut self, lits: &[Literal], k: usize) -> Result<()> {
        let clauses = cardinality_encoder::encode_at_most(lits, k, &mut || self.new_var())?;
        clauses.into_iter().for_each(|cl| self.add_clause(cl));
        Ok(())
    }

    /// Requires exactly `k` literals of `lits` to be true.
    fn add_exactly(&mut self, lits: &[Literal], k: usize) -> Result<()> {
        self.add_at_least(lits, k)?;
        self.add_at_most(lits, k)
    }
}

/// A trait for objects able to build new SAT solvers.
pub trait SatSolverFactory {
    /// Builds a new SAT solver.
    fn new_solver(&self) -> Box<dyn SatSolver>;
}

/// A factory building [`default_solver`] instances.
#[derive(Default)]
pub struct DefaultSatSolverFactory;

impl SatSolverFactory for DefaultSatSolverFactory {
    fn new_solver(&self) -> Box<dyn SatSolver> {
        default_solver()
    }
}

/// The default SAT solver (Cadical).
pub fn default_solver() -> Box<dyn SatSolver> {
    Box::<CadicalSolver>::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause;

    #[test]
    fn test_var_from_pos() {
        let v = Variable::from(1);
        assert_eq!(1, usize::from(v))
    }

    #[test]
    #[allow(unused_must_use)]
    #[should_panic]
    fn test_var_from_null() {
        Variable::from(0);
    }

    #[test]
    #[allow(unused_must_use)]
    #[should_panic]
    fn test_var_from_neg() {
        Variable::from(-1);
    }

    #[test]
    fn test_lit_from_var() {
        let v = Variable::from(3);
        assert_eq!(3, isize::from(v.positive()));
        assert_eq!(-3, isize::from(v.negative()));
        assert_eq!(v, v.negative().var());
    }

    #[test]
    #[allow(unused_must_use)]
    #[should_panic]
    fn test_lit_from_null() {
        Literal::from(0);
    }

    #[test]
    fn test_negate_lit() {
        assert_eq!(Literal::from(-1), Literal::from(1).negate());
        assert_eq!(Literal::from(1), Literal::from(-1).negate());
    }

    #[test]
    fn test_solving_result_unwrap_model_none() {
        assert_eq!(None, SolvingResult::Unsatisfiable.unwrap_model());
    }

    #[test]
    #[should_panic]
    fn test_solving_result_unwrap_model_unknown() {
        SolvingResult::Unknown.unwrap_model();
    }

    #[test]
    fn test_new_var_is_monotonic() {
        let mut s = default_solver();
        s.reserve(4);
        let v1 = s.new_var();
        let v2 = s.new_var();
        assert_eq!(5, usize::from(v1));
        assert_eq!(6, usize::from(v2));
        assert_eq!(6, s.n_vars());
    }

    #[test]
    fn test_exactly() {
        let mut s = default_solver();
        s.reserve(4);
        let lits = clause![1, 2, 3, 4];
        s.add_exactly(&lits, 2).unwrap();
        s.add_clause(clause![1]);
        s.add_clause(clause![3]);
        let model = s.solve().unwrap_model().unwrap();
        assert_eq!(Some(false), model.value_of(2));
        assert_eq!(Some(false), model.value_of(4));
        s.add_clause(clause![2]);
        assert!(s.solve().unwrap_model().is_none());
    }

    #[test]
    fn test_cardinality_out_of_range() {
        let mut s = default_solver();
        s.reserve(2);
        assert!(s.add_at_least(&clause![1, 2], 3).is_err());
        assert!(s.add_at_most(&clause![1, 2], 3).is_err());
    }
}
