//! Clausal encodings of cardinality constraints.
//!
//! At-most constraints are encoded with the sequential counter of Sinz (2005);
//! at-least constraints are at-most constraints on the negated literals.

use super::{Literal, Variable};
use anyhow::{anyhow, Result};

/// Encodes "at most `k` literals of `lits` are true" into clauses.
///
/// Auxiliary variables are requested through `new_var`, in increasing order of use.
pub(crate) fn encode_at_most(
    lits: &[Literal],
    k: usize,
    new_var: &mut dyn FnMut() -> Variable,
) -> Result<Vec<Vec<Literal>>> {
    check_bound(lits, k)?;
    let n = lits.len();
    if k == n {
        return Ok(vec![]);
    }
    if k == 0 {
        return Ok(lits.iter().map(|l| vec![l.negate()]).collect());
    }
    // s[i][j] holds iff at least j+1 of lits[0..=i] are true, for i < n-1 and j < k
    let s = (0..n - 1)
        .map(|_| (0..k).map(|_| new_var()).collect::<Vec<Variable>>())
        .collect::<Vec<Vec<Variable>>>();
    let mut clauses = Vec::with_capacity(2 * n * k + n);
    clauses.push(vec![lits[0].negate(), s[0][0].positive()]);
    for s_0_j in s[0].iter().skip(1) {
        clauses.push(vec![s_0_j.negative()]);
    }
    for i in 1..n - 1 {
        clauses.push(vec![lits[i].negate(), s[i][0].positive()]);
        clauses.push(vec![s[i - 1][0].negative(), s[i][0].positive()]);
        for j in 1..k {
            clauses.push(vec![
                lits[i].negate(),
                s[i - 1][j - 1].negative(),
                s[i][j].positive(),
            ]);
            clauses.push(vec![s[i - 1][j].negative(), s[i][j].positive()]);
        }
        clauses.push(vec![lits[i].negate(), s[i - 1][k - 1].negative()]);
    }
    clauses.push(vec![lits[n - 1].negate(), s[n - 2][k - 1].negative()]);
    Ok(clauses)
}

/// Encodes "at least `k` literals of `lits` are true" into clauses.
///
/// Auxiliary variables are requested through `new_var`, in increasing order of use.
pub(crate) fn encode_at_least(
    lits: &[Literal],
    k: usize,
    new_var: &mut dyn FnMut() -> Variable,
) -> Result<Vec<Vec<Literal>>> {
    check_bound(lits, k)?;
    match k {
        0 => Ok(vec![]),
        1 => Ok(vec![lits.to_vec()]),
        _ => {
            let negated = lits.iter().map(|l| l.negate()).collect::<Vec<Literal>>();
            encode_at_most(&negated, lits.len() - k, new_var)
        }
    }
}

fn check_bound(lits: &[Literal], k: usize) -> Result<()> {
    if k > lits.len() {
        Err(anyhow!(
            "cannot bound the number of true literals to {} in a set of {} literals",
            k,
            lits.len()
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause;

    fn allocator(first: usize) -> impl FnMut() -> Variable {
        let mut next = first;
        move || {
            let v = Variable::from(next);
            next += 1;
            v
        }
    }

    fn count_models_by_weight(n: usize, clauses: &[Vec<Literal>], n_aux: usize) -> Vec<bool> {
        // for each assignment of the n first vars, check if some aux extension satisfies the clauses
        let mut satisfiable_by_pattern = vec![false; 1 << n];
        for pattern in 0..(1usize << n) {
            for aux in 0..(1usize << n_aux) {
                let value = |v: Variable| {
                    let i = usize::from(v) - 1;
                    if i < n {
                        (pattern >> i) & 1 == 1
                    } else {
                        (aux >> (i - n)) & 1 == 1
                    }
                };
                let sat = clauses.iter().all(|cl| {
                    cl.iter()
                        .any(|l| value(l.var()) == l.is_positive())
                });
                if sat {
                    satisfiable_by_pattern[pattern] = true;
                    break;
                }
            }
        }
        satisfiable_by_pattern
    }

    #[test]
    fn test_at_most_semantics() {
        let lits = clause![1, 2, 3, 4];
        for k in 0..=4 {
            let mut next_var = allocator(5);
            let clauses = encode_at_most(&lits, k, &mut next_var).unwrap();
            let n_aux = usize::from(next_var()) - 5;
            let sat = count_models_by_weight(4, &clauses, n_aux);
            for (pattern, s) in sat.iter().enumerate() {
                assert_eq!(pattern.count_ones() as usize <= k, *s);
            }
        }
    }

    #[test]
    fn test_at_least_semantics() {
        let lits = clause![1, 2, 3, 4];
        for k in 0..=4 {
            let mut next_var = allocator(5);
            let clauses = encode_at_least(&lits, k, &mut next_var).unwrap();
            let n_aux = usize::from(next_var()) - 5;
            let sat = count_models_by_weight(4, &clauses, n_aux);
            for (pattern, s) in sat.iter().enumerate() {
                assert_eq!(pattern.count_ones() as usize >= k, *s);
            }
        }
    }

    #[test]
    fn test_trivial_bounds_add_no_aux_var() {
        let lits = clause![1, 2, 3];
        let mut next_var = allocator(4);
        assert!(encode_at_most(&lits, 3, &mut next_var).unwrap().is_empty());
        assert!(encode_at_least(&lits, 0, &mut next_var).unwrap().is_empty());
        assert_eq!(3, encode_at_most(&lits, 0, &mut next_var).unwrap().len());
        assert_eq!(Variable::from(4), next_var());
    }

    #[test]
    fn test_bound_too_large() {
        let lits = clause![1, 2];
        let mut next_var = allocator(3);
        assert!(encode_at_most(&lits, 3, &mut next_var).is_err());
        assert!(encode_at_least(&lits, 3, &mut next_var).is_err());
    }

    #[test]
    fn test_empty_set() {
        let mut next_var = allocator(1);
        assert!(encode_at_most(&[], 0, &mut next_var).unwrap().is_empty());
        assert!(encode_at_least(&[], 0, &mut next_var).unwrap().is_empty());
    }
}
