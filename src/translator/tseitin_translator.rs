use super::{FormulaTranslator, Translation, VarMap};
use crate::{
    formula::Formula,
    sat::{Literal, Variable},
};
use anyhow::Result;

/// An in-process translator based on the Tseitin transformation.
///
/// The variables of the formula receive the first solver variables, in increasing order of their local identifiers.
/// Sub-formulas which are not clauses are then named by fresh variables defined by equivalences.
#[derive(Default)]
pub struct TseitinTranslator;

impl FormulaTranslator for TseitinTranslator {
    fn translate(&mut self, formula: &Formula) -> Result<Translation> {
        let mut context = TseitinContext::new(formula);
        context.assert_true(formula);
        Ok(Translation::new(
            context.var_map,
            context.n_vars,
            context.clauses,
        ))
    }
}

struct TseitinContext {
    var_map: VarMap,
    n_vars: usize,
    clauses: Vec<Vec<Literal>>,
}

impl TseitinContext {
    fn new(formula: &Formula) -> Self {
        let mut var_map = VarMap::default();
        let mut n_vars = 0;
        formula.vars().into_iter().for_each(|v| {
            n_vars += 1;
            var_map.insert(v, Variable::from(n_vars));
        });
        Self {
            var_map,
            n_vars,
            clauses: Vec::new(),
        }
    }

    fn new_var(&mut self) -> Literal {
        self.n_vars += 1;
        Literal::from(Variable::from(self.n_vars))
    }

    fn assert_true(&mut self, formula: &Formula) {
        match formula {
            Formula::And(fs) => fs.iter().for_each(|f| self.assert_true(f)),
            Formula::Iff(a, b) => {
                let (la, lb) = (self.literal_of(a), self.literal_of(b));
                self.clauses.push(vec![la.negate(), lb]);
                self.clauses.push(vec![la, lb.negate()]);
            }
            _ => {
                let mut cl = Vec::new();
                self.collect_disjunction(formula, &mut cl);
                self.clauses.push(cl);
            }
        }
    }

    // pushes literals whose disjunction is equivalent to the formula
    fn collect_disjunction(&mut self, formula: &Formula, cl: &mut Vec<Literal>) {
        match formula {
            Formula::Or(fs) => fs.iter().for_each(|f| self.collect_disjunction(f, cl)),
            Formula::Implies(a, b) => {
                match a.as_ref() {
                    Formula::And(fs) => fs
                        .iter()
                        .for_each(|f| cl.push(self.literal_of(f).negate())),
                    other => cl.push(self.literal_of(other).negate()),
                }
                self.collect_disjunction(b, cl)
            }
            other => cl.push(self.literal_of(other)),
        }
    }

    fn literal_of(&mut self, formula: &Formula) -> Literal {
        match formula {
            Formula::Var(v) => Literal::from(
                self.var_map
                    .get(*v)
                    .unwrap_or_else(|| panic!("variable {} was not collected", v)),
            ),
            Formula::Not(f) => self.literal_of(f).negate(),
            Formula::And(fs) => {
                let lits = fs.iter().map(|f| self.literal_of(f)).collect::<Vec<_>>();
                let t = self.new_var();
                lits.iter()
                    .for_each(|l| self.clauses.push(vec![t.negate(), *l]));
                self.clauses.push(
                    std::iter::once(t)
                        .chain(lits.iter().map(|l| l.negate()))
                        .collect(),
                );
                t
            }
            Formula::Or(fs) => {
                let lits = fs.iter().map(|f| self.literal_of(f)).collect::<Vec<_>>();
                let t = self.new_var();
                lits.iter()
                    .for_each(|l| self.clauses.push(vec![t, l.negate()]));
                self.clauses
                    .push(std::iter::once(t.negate()).chain(lits).collect());
                t
            }
            Formula::Implies(a, b) => {
                let (la, lb) = (self.literal_of(a), self.literal_of(b));
                let t = self.new_var();
                self.clauses.push(vec![t.negate(), la.negate(), lb]);
                self.clauses.push(vec![t, la]);
                self.clauses.push(vec![t, lb.negate()]);
                t
            }
            Formula::Iff(a, b) => {
                let (la, lb) = (self.literal_of(a), self.literal_of(b));
                let t = self.new_var();
                self.clauses.push(vec![t.negate(), la.negate(), lb]);
                self.clauses.push(vec![t.negate(), la, lb.negate()]);
                self.clauses.push(vec![t, la, lb]);
                self.clauses.push(vec![t, la.negate(), lb.negate()]);
                t
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        formula::{LocalVar, LocalVarAllocator},
        sat::default_solver,
    };

    fn x(i: usize) -> LocalVar {
        LocalVar::from(i)
    }

    fn clause_satisfied(cl: &[Literal], value: &dyn Fn(usize) -> bool) -> bool {
        cl.iter()
            .any(|l| value(usize::from(l.var())) == l.is_positive())
    }

    /// Checks that for each assignment of the formula variables,
    /// the formula holds iff some extension to Tseitin variables satisfies the clauses.
    fn check_equisatisfiable(formula: &Formula) {
        let translation = TseitinTranslator.translate(formula).unwrap();
        let locals = formula.vars().into_iter().collect::<Vec<_>>();
        let n_named = locals.len();
        let n_aux = translation.n_vars() - n_named;
        assert!(n_named + n_aux <= 16);
        for pattern in 0..(1usize << n_named) {
            let local_value = |v: LocalVar| {
                let i = locals.iter().position(|l| *l == v).unwrap();
                (pattern >> i) & 1 == 1
            };
            let expected = formula.eval(&local_value);
            let actual = (0..(1usize << n_aux)).any(|aux| {
                let value = |var: usize| {
                    if var <= n_named {
                        local_value(locals[var - 1])
                    } else {
                        (aux >> (var - n_named - 1)) & 1 == 1
                    }
                };
                translation
                    .clauses()
                    .iter()
                    .all(|cl| clause_satisfied(cl, &value))
            });
            assert_eq!(expected, actual, "pattern {:b} for {}", pattern, formula);
        }
    }

    #[test]
    fn test_vars_are_mapped_in_order() {
        let f = Formula::le(x(7), x(3));
        let translation = TseitinTranslator.translate(&f).unwrap();
        assert_eq!(Some(Variable::from(1)), translation.var_map().get(x(3)));
        assert_eq!(Some(Variable::from(2)), translation.var_map().get(x(7)));
        assert_eq!(2, translation.n_vars());
        assert_eq!(1, translation.clauses().len());
    }

    #[test]
    fn test_clause_shapes_need_no_aux() {
        let f = Formula::and([
            Formula::le(x(1), x(2)),
            Formula::implies(
                Formula::and([Formula::var(x(3)), Formula::var(x(4))]),
                Formula::le(x(1), x(2)),
            ),
            Formula::eq(x(1), x(4)),
        ]);
        let translation = TseitinTranslator.translate(&f).unwrap();
        assert_eq!(4, translation.n_vars());
        assert_eq!(4, translation.clauses().len());
        check_equisatisfiable(&f);
    }

    #[test]
    fn test_nested_equisatisfiable() {
        let f = Formula::and([
            Formula::iff(
                Formula::var(x(5)),
                Formula::and([Formula::var(x(4)), Formula::eq(x(1), x(2))]),
            ),
            Formula::or([
                Formula::lt(x(1), x(2)),
                Formula::and([Formula::var(x(5)), Formula::lt(x(3), x(4))]),
                Formula::not(Formula::implies(Formula::var(x(3)), Formula::var(x(1)))),
            ]),
        ]);
        check_equisatisfiable(&f);
    }

    #[test]
    fn test_empty_connectives() {
        check_equisatisfiable(&Formula::and([]));
        let f = Formula::implies(Formula::var(x(1)), Formula::or([]));
        check_equisatisfiable(&f);
        let f = Formula::iff(Formula::var(x(1)), Formula::and([]));
        check_equisatisfiable(&f);
    }

    #[test]
    fn test_solver_roundtrip() {
        let mut alloc = LocalVarAllocator::default();
        let (a, b) = (alloc.new_var(), alloc.new_var());
        let f = Formula::and([Formula::lt(a, b)]);
        let translation = TseitinTranslator.translate(&f).unwrap();
        let mut solver = default_solver();
        let var_map = translation.load_into(solver.as_mut());
        let model = solver.solve().unwrap_model().unwrap();
        assert_eq!(Some(false), model.value_of(var_map.get(a).unwrap()));
        assert_eq!(Some(true), model.value_of(var_map.get(b).unwrap()));
    }
}
