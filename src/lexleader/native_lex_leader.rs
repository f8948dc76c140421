use crate::sat::{Literal, SatSolver, Variable};
use log::debug;

/// Adds clauses partially ordering the columns and the rows of a matrix of solver variables.
///
/// The matrix is given column by column: `columns[c][r]` is the variable at column `c` and row `r`.
/// For each pair of adjacent columns `(c-1, c)` and each row `r`, a clause states that if the first 1
/// of column `c` is at row `r`, then column `c-1` has no 1 above `r`.
/// The same clauses are produced for each pair of adjacent rows.
///
/// These clauses are implied by the lex-leader ordering used by [`LexLeaderEncoder`](super::LexLeaderEncoder),
/// but they are weaker: only the position of the first 1 is constrained.
/// No auxiliary variable is introduced.
///
/// # Panics
///
/// Panics if the columns have different lengths.
pub fn native_lex_leader(solver: &mut dyn SatSolver, columns: &[Vec<Variable>]) {
    let n_rows = columns.first().map(|c| c.len()).unwrap_or_default();
    assert!(
        columns.iter().all(|c| c.len() == n_rows),
        "matrix columns must have the same length"
    );
    let n_clauses_before = solver.n_clauses();
    for c in (1..columns.len()).rev() {
        for r in 0..n_rows {
            for q in 0..r {
                let mut cl = columns[c][0..r]
                    .iter()
                    .map(|v| v.positive())
                    .collect::<Vec<Literal>>();
                cl.push(columns[c][r].negative());
                cl.push(columns[c - 1][q].negative());
                solver.add_clause(cl);
            }
        }
    }
    for r in (1..n_rows).rev() {
        for c in 0..columns.len() {
            for p in 0..c {
                let mut cl = columns[0..c]
                    .iter()
                    .map(|col| col[r].positive())
                    .collect::<Vec<Literal>>();
                cl.push(columns[c][r].negative());
                cl.push(columns[p][r - 1].negative());
                solver.add_clause(cl);
            }
        }
    }
    debug!(
        "added {} native lex-leader clauses",
        solver.n_clauses() - n_clauses_before
    );
}
