use crate::{
    formula::{Formula, LocalVar},
    sat::{Literal, SatSolver, Variable},
};
use anyhow::Result;
use std::collections::BTreeMap;

/// A mapping from local variables to solver variables.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VarMap(BTreeMap<LocalVar, Variable>);

impl VarMap {
    /// Records the solver variable associated with a local variable.
    ///
    /// Returns the previous association, if any.
    pub fn insert(&mut self, local: LocalVar, var: Variable) -> Option<Variable> {
        self.0.insert(local, var)
    }

    /// Returns the solver variable associated with a local variable, if any.
    pub fn get(&self, local: LocalVar) -> Option<Variable> {
        self.0.get(&local).copied()
    }

    /// Returns the number of mapped local variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` iff no local variable is mapped.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the associations, by increasing local variable.
    pub fn iter(&self) -> impl Iterator<Item = (LocalVar, Variable)> + '_ {
        self.0.iter().map(|(l, v)| (*l, *v))
    }
}

/// The CNF translation of a formula.
///
/// Solver variables of a translation are numbered from 1 to [`n_vars`](Translation::n_vars).
/// They are shifted when the translation is loaded into a solver that already has variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    var_map: VarMap,
    n_vars: usize,
    clauses: Vec<Vec<Literal>>,
}

impl Translation {
    pub(crate) fn new(var_map: VarMap, n_vars: usize, clauses: Vec<Vec<Literal>>) -> Self {
        Self {
            var_map,
            n_vars,
            clauses,
        }
    }

    /// Returns the mapping from the local variables to the variables of this translation.
    pub fn var_map(&self) -> &VarMap {
        &self.var_map
    }

    /// Returns the number of variables of this translation, Tseitin variables included.
    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    /// Returns the clauses of this translation.
    pub fn clauses(&self) -> &[Vec<Literal>] {
        &self.clauses
    }

    /// Loads this translation into a solver.
    ///
    /// The variables of the translation are placed after the ones already known by the solver,
    /// whose pool is extended accordingly.
    /// The returned mapping links the local variables to the solver variables.
    pub fn load_into(&self, solver: &mut dyn SatSolver) -> VarMap {
        let offset = solver.n_vars();
        let shift_var = |v: Variable| Variable::from(usize::from(v) + offset);
        let shift_lit = |l: Literal| {
            let shifted = Literal::from(shift_var(l.var()));
            if l.is_positive() {
                shifted
            } else {
                shifted.negate()
            }
        };
        solver.reserve(offset + self.n_vars);
        self.clauses
            .iter()
            .for_each(|cl| solver.add_clause(cl.iter().map(|l| shift_lit(*l)).collect()));
        VarMap(
            self.var_map
                .0
                .iter()
                .map(|(l, v)| (*l, shift_var(*v)))
                .collect(),
        )
    }
}

/// A translator from formulas to equisatisfiable sets of clauses.
///
/// Translators map each variable of the formula to a solver variable
/// and may introduce auxiliary variables to name sub-formulas.
pub trait FormulaTranslator {
    /// Translates a formula into clauses.
    fn translate(&mut self, formula: &Formula) -> Result<Translation>;
}
