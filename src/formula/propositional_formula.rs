use super::LocalVar;
use std::{collections::BTreeSet, fmt::Display};

/// A propositional formula over local variables.
///
/// Formulas are built by the symmetry-breaking encoders and consumed by the
/// [translators](crate::translator) that turn them into clauses.
/// An empty conjunction is true, an empty disjunction is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    /// A variable.
    Var(LocalVar),
    /// The negation of a formula.
    Not(Box<Formula>),
    /// The conjunction of a list of formulas.
    And(Vec<Formula>),
    /// The disjunction of a list of formulas.
    Or(Vec<Formula>),
    /// An implication.
    Implies(Box<Formula>, Box<Formula>),
    /// An equivalence.
    Iff(Box<Formula>, Box<Formula>),
}

impl Formula {
    /// Builds a formula made of a single variable.
    pub fn var(v: LocalVar) -> Self {
        Formula::Var(v)
    }

    /// Builds the negation of a formula.
    pub fn not(f: Formula) -> Self {
        Formula::Not(Box::new(f))
    }

    /// Builds a conjunction; conjunctions among the operands are flattened.
    pub fn and<I>(operands: I) -> Self
    where
        I: IntoIterator<Item = Formula>,
    {
        let mut flat = Vec::new();
        operands.into_iter().for_each(|f| match f {
            Formula::And(inner) => flat.extend(inner),
            other => flat.push(other),
        });
        Formula::And(flat)
    }

    /// Builds a disjunction; disjunctions among the operands are flattened.
    pub fn or<I>(operands: I) -> Self
    where
        I: IntoIterator<Item = Formula>,
    {
        let mut flat = Vec::new();
        operands.into_iter().for_each(|f| match f {
            Formula::Or(inner) => flat.extend(inner),
            other => flat.push(other),
        });
        Formula::Or(flat)
    }

    /// Builds the implication `lhs -> rhs`.
    pub fn implies(lhs: Formula, rhs: Formula) -> Self {
        Formula::Implies(Box::new(lhs), Box::new(rhs))
    }

    /// Builds the equivalence `lhs = rhs`.
    pub fn iff(lhs: Formula, rhs: Formula) -> Self {
        Formula::Iff(Box::new(lhs), Box::new(rhs))
    }

    /// `a <= b` for bits, with false lower than true.
    pub fn le(a: LocalVar, b: LocalVar) -> Self {
        Formula::or([Formula::not(Formula::var(a)), Formula::var(b)])
    }

    /// `a < b` for bits, with false lower than true.
    pub fn lt(a: LocalVar, b: LocalVar) -> Self {
        Formula::and([Formula::not(Formula::var(a)), Formula::var(b)])
    }

    /// `a = b` for bits.
    pub fn eq(a: LocalVar, b: LocalVar) -> Self {
        Formula::iff(Formula::var(a), Formula::var(b))
    }

    /// Evaluates the formula given the values of its variables.
    pub fn eval(&self, value: &dyn Fn(LocalVar) -> bool) -> bool {
        match self {
            Formula::Var(v) => value(*v),
            Formula::Not(f) => !f.eval(value),
            Formula::And(fs) => fs.iter().all(|f| f.eval(value)),
            Formula::Or(fs) => fs.iter().any(|f| f.eval(value)),
            Formula::Implies(a, b) => !a.eval(value) || b.eval(value),
            Formula::Iff(a, b) => a.eval(value) == b.eval(value),
        }
    }

    /// Returns the set of variables occurring in the formula.
    pub fn vars(&self) -> BTreeSet<LocalVar> {
        let mut vars = BTreeSet::new();
        self.collect_vars(&mut vars);
        vars
    }

    fn collect_vars(&self, vars: &mut BTreeSet<LocalVar>) {
        match self {
            Formula::Var(v) => {
                vars.insert(*v);
            }
            Formula::Not(f) => f.collect_vars(vars),
            Formula::And(fs) | Formula::Or(fs) => fs.iter().for_each(|f| f.collect_vars(vars)),
            Formula::Implies(a, b) | Formula::Iff(a, b) => {
                a.collect_vars(vars);
                b.collect_vars(vars)
            }
        }
    }

    /// Returns the top-level terms of the formula, that is the operands of its outermost conjunctions.
    pub fn top_level_terms(&self) -> Vec<&Formula> {
        match self {
            Formula::And(fs) => fs.iter().flat_map(|f| f.top_level_terms()).collect(),
            other => vec![other],
        }
    }

    /// Renders the formula in the text format read by formula translators.
    ///
    /// Each top-level term is written on its own line; lines after the first one begin with `& `.
    pub fn to_translator_input(&self) -> String {
        self.top_level_terms()
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<String>>()
            .join("\n& ")
    }
}

fn write_nary(f: &mut std::fmt::Formatter<'_>, operands: &[Formula], op: &str) -> std::fmt::Result {
    write!(f, "(")?;
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", op)?;
        }
        write!(f, "{}", operand)?;
    }
    write!(f, ")")
}

impl Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Formula::Var(v) => write!(f, "{}", v),
            Formula::Not(inner) => write!(f, "!{}", inner),
            Formula::And(fs) => write_nary(f, fs, "&"),
            Formula::Or(fs) => write_nary(f, fs, "|"),
            Formula::Implies(a, b) => write!(f, "({} -> {})", a, b),
            Formula::Iff(a, b) => write!(f, "({} = {})", a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x(i: usize) -> LocalVar {
        LocalVar::from(i)
    }

    #[test]
    fn test_display_le() {
        assert_eq!("(!x1 | x2)", Formula::le(x(1), x(2)).to_string());
    }

    #[test]
    fn test_display_nested() {
        let f = Formula::iff(
            Formula::var(x(3)),
            Formula::and([Formula::var(x(4)), Formula::eq(x(1), x(2))]),
        );
        assert_eq!("(x3 = (x4 & (x1 = x2)))", f.to_string());
        let f = Formula::implies(Formula::var(x(3)), Formula::le(x(1), x(2)));
        assert_eq!("(x3 -> (!x1 | x2))", f.to_string());
    }

    #[test]
    fn test_translator_input() {
        let f = Formula::and([
            Formula::le(x(1), x(2)),
            Formula::and([Formula::var(x(3)), Formula::not(Formula::var(x(4)))]),
        ]);
        assert_eq!("(!x1 | x2)\n& x3\n& !x4", f.to_translator_input());
    }

    #[test]
    fn test_flattening() {
        let f = Formula::or([Formula::lt(x(1), x(2)), Formula::or([Formula::var(x(3))])]);
        assert_eq!(
            Formula::Or(vec![Formula::lt(x(1), x(2)), Formula::var(x(3))]),
            f
        );
    }

    #[test]
    fn test_eval() {
        let values = [false, true, true, false];
        let value = |v: LocalVar| values[v.id() - 1];
        assert!(Formula::le(x(1), x(2)).eval(&value));
        assert!(!Formula::le(x(2), x(1)).eval(&value));
        assert!(Formula::lt(x(4), x(3)).eval(&value));
        assert!(Formula::eq(x(2), x(3)).eval(&value));
        assert!(Formula::implies(Formula::var(x(1)), Formula::var(x(4))).eval(&value));
        assert!(Formula::and([]).eval(&value));
        assert!(!Formula::or([]).eval(&value));
    }

    #[test]
    fn test_vars() {
        let f = Formula::implies(Formula::eq(x(5), x(2)), Formula::le(x(2), x(9)));
        assert_eq!(
            vec![2, 5, 9],
            f.vars().into_iter().map(|v| v.id()).collect::<Vec<_>>()
        );
    }
}
