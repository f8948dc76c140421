use super::LexEncoding;
use crate::formula::{Formula, LocalVar, LocalVarAllocator};
use log::debug;

/// An encoder for lex-leader symmetry-breaking constraints on a matrix of variables.
///
/// The matrix variables are allocated at construction, column after column:
/// the variable at `(column, row)` has identifier `column * n_rows + row + 1`.
/// Auxiliary variables required by the encoding are allocated afterwards, on demand.
///
/// The produced constraints require each column (resp. row) to be lexicographically lower or equal to the next one,
/// the first element being the most significant and false being lower than true.
///
/// # Example
///
/// ```
/// # use lexbibd::lexleader::{LexEncoding, LexLeaderEncoder};
/// let mut encoder = LexLeaderEncoder::new(2, 2, LexEncoding::And);
/// let formula = encoder.make_lexleader();
/// assert_eq!(
///     "(!x1 | x3)\n& ((x1 = x3) -> (!x2 | x4))\n& (!x1 | x2)\n& ((x1 = x2) -> (!x3 | x4))",
///     formula.to_translator_input()
/// );
/// ```
pub struct LexLeaderEncoder {
    n_columns: usize,
    n_rows: usize,
    encoding: LexEncoding,
    columns_enabled: bool,
    rows_enabled: bool,
    vars: LocalVarAllocator,
}

impl LexLeaderEncoder {
    /// Builds a new encoder for a matrix of `n_columns` columns and `n_rows` rows.
    ///
    /// Both columns and rows constraints are enabled.
    pub fn new(n_columns: usize, n_rows: usize, encoding: LexEncoding) -> Self {
        let mut vars = LocalVarAllocator::default();
        vars.new_vars(n_columns * n_rows);
        Self {
            n_columns,
            n_rows,
            encoding,
            columns_enabled: true,
            rows_enabled: true,
            vars,
        }
    }

    /// Enables or disables the constraints between consecutive columns.
    pub fn with_columns(mut self, enabled: bool) -> Self {
        self.columns_enabled = enabled;
        self
    }

    /// Enables or disables the constraints between consecutive rows.
    pub fn with_rows(mut self, enabled: bool) -> Self {
        self.rows_enabled = enabled;
        self
    }

    /// Returns the encoding used by this encoder.
    pub fn encoding(&self) -> LexEncoding {
        self.encoding
    }

    /// Returns the number of local variables allocated so far.
    pub fn n_vars(&self) -> usize {
        self.vars.n_vars()
    }

    /// Returns the variable of the matrix at the given position.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of the matrix.
    pub fn matrix_var(&self, column: usize, row: usize) -> LocalVar {
        assert!(
            column < self.n_columns && row < self.n_rows,
            "position ({}, {}) is out of the {}x{} matrix",
            column,
            row,
            self.n_columns,
            self.n_rows
        );
        LocalVar::from(column * self.n_rows + row + 1)
    }

    /// Returns the variables of a column, from the first row to the last one.
    pub fn column(&self, column: usize) -> Vec<LocalVar> {
        (0..self.n_rows)
            .map(|r| self.matrix_var(column, r))
            .collect()
    }

    /// Returns the variables of a row, from the first column to the last one.
    pub fn row(&self, row: usize) -> Vec<LocalVar> {
        (0..self.n_columns)
            .map(|c| self.matrix_var(c, row))
            .collect()
    }

    /// Builds the conjunction of the lex-leader constraints of the matrix.
    ///
    /// Column pairs come first, from the last pair to the first one; row pairs follow in the same order.
    pub fn make_lexleader(&mut self) -> Formula {
        let mut constraints = Vec::new();
        if self.columns_enabled {
            for c in (1..self.n_columns).rev() {
                let (previous, current) = (self.column(c - 1), self.column(c));
                constraints.push(self.encode_pair(&previous, &current));
            }
        }
        if self.rows_enabled {
            for r in (1..self.n_rows).rev() {
                let (previous, current) = (self.row(r - 1), self.row(r));
                constraints.push(self.encode_pair(&previous, &current));
            }
        }
        debug!(
            "{} lex-leader constraints use {} local variables",
            self.encoding,
            self.n_vars()
        );
        Formula::and(constraints)
    }

    /// Builds the constraint `a <= b`, where `a` and `b` are compared lexicographically.
    ///
    /// # Panics
    ///
    /// Panics if the vectors have different lengths.
    pub fn encode_pair(&mut self, a: &[LocalVar], b: &[LocalVar]) -> Formula {
        assert_eq!(
            a.len(),
            b.len(),
            "cannot compare vectors of different lengths"
        );
        if a.is_empty() {
            return Formula::and([]);
        }
        let vars = &mut self.vars;
        match self.encoding {
            LexEncoding::And => encode_and(a, b),
            LexEncoding::AndCse => encode_and_cse(vars, a, b),
            LexEncoding::Or => encode_or(a, b),
            LexEncoding::OrCse => encode_or_cse(vars, a, b),
            LexEncoding::Ror => encode_ror(vars, a, b),
            LexEncoding::Alpha => encode_alpha(vars, a, b),
            LexEncoding::AlphaM => encode_alpha_m(vars, a, b),
            LexEncoding::Harvey => encode_harvey(vars, a, b),
        }
    }
}

fn var(v: LocalVar) -> Formula {
    Formula::var(v)
}

fn prefix_equality(a: &[LocalVar], b: &[LocalVar], len: usize) -> Formula {
    if len == 1 {
        return Formula::eq(a[0], b[0]);
    }
    Formula::and((0..len).map(|j| Formula::eq(a[j], b[j])))
}

fn encode_and(a: &[LocalVar], b: &[LocalVar]) -> Formula {
    let mut terms = vec![Formula::le(a[0], b[0])];
    for i in 1..a.len() {
        terms.push(Formula::implies(
            prefix_equality(a, b, i),
            Formula::le(a[i], b[i]),
        ));
    }
    Formula::and(terms)
}

// x[i] holds iff a[0..=i] = b[0..=i]
fn encode_and_cse(vars: &mut LocalVarAllocator, a: &[LocalVar], b: &[LocalVar]) -> Formula {
    let n = a.len();
    let x = vars.new_vars(n - 1);
    let mut terms = vec![Formula::le(a[0], b[0])];
    if n > 1 {
        terms.push(Formula::iff(var(x[0]), Formula::eq(a[0], b[0])));
    }
    for i in 1..n - 1 {
        terms.push(Formula::iff(
            var(x[i]),
            Formula::and([var(x[i - 1]), Formula::eq(a[i], b[i])]),
        ));
    }
    for i in 0..n - 1 {
        terms.push(Formula::implies(var(x[i]), Formula::le(a[i + 1], b[i + 1])));
    }
    Formula::and(terms)
}

fn encode_or(a: &[LocalVar], b: &[LocalVar]) -> Formula {
    let n = a.len();
    let mut witnesses = vec![Formula::lt(a[0], b[0])];
    for i in 0..n - 1 {
        witnesses.push(Formula::and([
            prefix_equality(a, b, i + 1),
            Formula::lt(a[i + 1], b[i + 1]),
        ]));
    }
    witnesses.push(prefix_equality(a, b, n));
    Formula::or(witnesses)
}

// x[i] holds iff a[0..=i] = b[0..=i]
fn encode_or_cse(vars: &mut LocalVarAllocator, a: &[LocalVar], b: &[LocalVar]) -> Formula {
    let n = a.len();
    let x = vars.new_vars(n);
    let mut terms = vec![Formula::iff(var(x[0]), Formula::eq(a[0], b[0]))];
    for i in 1..n {
        terms.push(Formula::iff(
            var(x[i]),
            Formula::and([var(x[i - 1]), Formula::eq(a[i], b[i])]),
        ));
    }
    let mut witnesses = vec![Formula::lt(a[0], b[0])];
    for i in 0..n - 1 {
        witnesses.push(Formula::and([var(x[i]), Formula::lt(a[i + 1], b[i + 1])]));
    }
    witnesses.push(var(x[n - 1]));
    terms.push(Formula::or(witnesses));
    Formula::and(terms)
}

// x[i] holds iff a[i..] <= b[i..]
fn encode_ror(vars: &mut LocalVarAllocator, a: &[LocalVar], b: &[LocalVar]) -> Formula {
    let n = a.len();
    let x = vars.new_vars(n);
    let mut terms = vec![Formula::iff(var(x[n - 1]), Formula::le(a[n - 1], b[n - 1]))];
    for i in (0..n - 1).rev() {
        terms.push(Formula::iff(
            var(x[i]),
            Formula::or([
                Formula::lt(a[i], b[i]),
                Formula::and([Formula::eq(a[i], b[i]), var(x[i + 1])]),
            ]),
        ));
    }
    terms.push(var(x[0]));
    Formula::and(terms)
}

// alpha[i] holds iff the i first positions are still tied; alpha[0] always holds
fn encode_alpha(vars: &mut LocalVarAllocator, a: &[LocalVar], b: &[LocalVar]) -> Formula {
    let n = a.len();
    let alpha = vars.new_vars(n + 1);
    let mut terms = vec![var(alpha[0])];
    for i in 0..n {
        terms.push(Formula::implies(
            Formula::not(var(alpha[i])),
            Formula::not(var(alpha[i + 1])),
        ));
        terms.push(Formula::implies(var(alpha[i + 1]), Formula::eq(a[i], b[i])));
        terms.push(Formula::implies(
            Formula::and([var(alpha[i]), Formula::not(var(alpha[i + 1]))]),
            Formula::lt(a[i], b[i]),
        ));
        terms.push(Formula::implies(var(alpha[i]), Formula::le(a[i], b[i])));
    }
    Formula::and(terms)
}

fn encode_alpha_m(vars: &mut LocalVarAllocator, a: &[LocalVar], b: &[LocalVar]) -> Formula {
    let n = a.len();
    let alpha = vars.new_vars(n + 1);
    let mut terms = vec![var(alpha[0])];
    for i in 0..n {
        terms.push(Formula::implies(
            var(alpha[i]),
            Formula::and([
                Formula::le(a[i], b[i]),
                Formula::iff(var(alpha[i + 1]), Formula::eq(a[i], b[i])),
            ]),
        ));
    }
    Formula::and(terms)
}

// x[i] holds iff a[i] < b[i] + x[i+1], with an implicit x[n] set to true
fn encode_harvey(vars: &mut LocalVarAllocator, a: &[LocalVar], b: &[LocalVar]) -> Formula {
    let n = a.len();
    let x = vars.new_vars(n);
    let mut terms = vec![Formula::iff(
        var(x[n - 1]),
        Formula::implies(var(a[n - 1]), var(b[n - 1])),
    )];
    for i in (0..n - 1).rev() {
        terms.push(Formula::iff(
            var(x[i]),
            Formula::and([
                Formula::implies(var(a[i]), var(b[i])),
                Formula::implies(var(a[i]), var(x[i + 1])),
                Formula::or([var(b[i]), var(x[i + 1])]),
            ]),
        ));
    }
    terms.push(var(x[0]));
    Formula::and(terms)
}
