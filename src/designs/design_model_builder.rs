use super::{DesignInstance, SymmetryBreaking};
use crate::{
    lexleader::{native_lex_leader, LexLeaderEncoder},
    sat::{Literal, SatSolver, Variable},
    translator::FormulaTranslator,
    utils::PhaseTimes,
};
use anyhow::{anyhow, Context, Result};
use log::info;

/// The variables of a design problem loaded into a solver.
///
/// The incidence variable of `(class, vertex)` is true iff the vertex belongs to the class.
/// The edge variable of `(class, u, v)` is true iff both `u` and `v` belong to the class.
#[derive(Debug, Clone)]
pub struct DesignModel {
    instance: DesignInstance,
    incidence: Vec<Variable>,
    edges: Vec<Variable>,
}

impl DesignModel {
    /// Returns the instance this model encodes.
    pub fn instance(&self) -> &DesignInstance {
        &self.instance
    }

    /// Returns the variable telling whether a vertex belongs to a class.
    ///
    /// # Panics
    ///
    /// Panics if the class or the vertex is out of range.
    pub fn incidence_var(&self, class: usize, vertex: usize) -> Variable {
        assert!(class < self.instance.n_classes() && vertex < self.instance.n_vertices());
        self.incidence[class * self.instance.n_vertices() + vertex]
    }

    /// Returns all the incidence variables, class by class.
    pub fn incidence_vars(&self) -> &[Variable] {
        &self.incidence
    }

    /// Returns the variable telling whether both vertices of an ordered pair belong to a class.
    ///
    /// # Panics
    ///
    /// Panics if `u == v` or if a parameter is out of range.
    pub fn edge_var(&self, class: usize, u: usize, v: usize) -> Variable {
        let n = self.instance.n_vertices();
        assert!(class < self.instance.n_classes() && u < n && v < n);
        assert_ne!(u, v, "no edge variable for a vertex with itself");
        self.edges[class * n * (n - 1) + edge_index(n, u, v)]
    }
}

fn edge_index(n_vertices: usize, u: usize, v: usize) -> usize {
    u * (n_vertices - 1) + if v < u { v } else { v - 1 }
}

/// Builds the constraints of a design problem into a SAT solver.
///
/// # Example
///
/// ```
/// # use lexbibd::designs::{DesignInstance, DesignModelBuilder, SymmetryBreaking};
/// # use lexbibd::lexleader::LexEncoding;
/// # use lexbibd::sat::default_solver;
/// # use lexbibd::translator::TseitinTranslator;
/// let instance = DesignInstance::new(7, 3, 1).unwrap();
/// let mut builder = DesignModelBuilder::new(instance, SymmetryBreaking::Encoded(LexEncoding::Ror));
/// let mut solver = default_solver();
/// let model = builder.build(solver.as_mut(), &mut TseitinTranslator).unwrap();
/// assert_eq!(49, model.incidence_vars().len());
/// ```
pub struct DesignModelBuilder {
    instance: DesignInstance,
    symmetry_breaking: SymmetryBreaking,
    phase_times: PhaseTimes,
}

impl DesignModelBuilder {
    /// Builds a new model builder.
    pub fn new(instance: DesignInstance, symmetry_breaking: SymmetryBreaking) -> Self {
        Self {
            instance,
            symmetry_breaking,
            phase_times: PhaseTimes::default(),
        }
    }

    /// Returns the time spent in each phase of the previous builds.
    ///
    /// The phases are `make lex`, `translate` (only for encoded symmetry breaking) and `make model`.
    pub fn phase_times(&self) -> &PhaseTimes {
        &self.phase_times
    }

    /// Adds the variables and the constraints of the design problem to the solver.
    ///
    /// The translator is used only if the symmetry breaking relies on a lex-leader encoding.
    /// In this case, the translated constraints are loaded first,
    /// and the incidence variables are the ones chosen by the translator.
    /// The translation must map every incidence variable.
    pub fn build(
        &mut self,
        solver: &mut dyn SatSolver,
        translator: &mut dyn FormulaTranslator,
    ) -> Result<DesignModel> {
        let instance = self.instance;
        info!(
            "building the model of the {} design with symmetry breaking {}",
            instance, self.symmetry_breaking
        );
        let incidence = match self.symmetry_breaking {
            SymmetryBreaking::Encoded(encoding) => {
                let mut encoder =
                    LexLeaderEncoder::new(instance.n_classes(), instance.n_vertices(), encoding);
                let formula = self.phase_times.time("make lex", || encoder.make_lexleader());
                let translation = self
                    .phase_times
                    .time("translate", || translator.translate(&formula))
                    .context("while translating the lex-leader constraints")?;
                let var_map = translation.load_into(solver);
                info!(
                    "lex-leader constraints translated into {} variables and {} clauses",
                    translation.n_vars(),
                    translation.clauses().len()
                );
                let mut incidence = Vec::with_capacity(instance.n_classes() * instance.n_vertices());
                for c in 0..instance.n_classes() {
                    for v in 0..instance.n_vertices() {
                        let var = var_map.get(encoder.matrix_var(c, v)).ok_or_else(|| {
                            anyhow!(
                                "the translator did not map the incidence variable of class {} and vertex {}",
                                c,
                                v
                            )
                        })?;
                        incidence.push(var);
                    }
                }
                incidence
            }
            SymmetryBreaking::NativeLex => {
                let incidence = new_incidence_vars(solver, &instance);
                self.phase_times.time("make lex", || {
                    let columns = incidence
                        .chunks(instance.n_vertices())
                        .map(|c| c.to_vec())
                        .collect::<Vec<Vec<Variable>>>();
                    native_lex_leader(solver, &columns)
                });
                incidence
            }
            SymmetryBreaking::None => new_incidence_vars(solver, &instance),
        };
        let model = self
            .phase_times
            .time("make model", || add_design_constraints(solver, instance, incidence))?;
        info!(
            "the model has {} variables and {} clauses",
            solver.n_vars(),
            solver.n_clauses()
        );
        Ok(model)
    }
}

fn new_incidence_vars(solver: &mut dyn SatSolver, instance: &DesignInstance) -> Vec<Variable> {
    (0..instance.n_classes() * instance.n_vertices())
        .map(|_| solver.new_var())
        .collect()
}

fn add_design_constraints(
    solver: &mut dyn SatSolver,
    instance: DesignInstance,
    incidence: Vec<Variable>,
) -> Result<DesignModel> {
    let n = instance.n_vertices();
    let edges = (0..instance.n_classes() * n * (n - 1))
        .map(|_| solver.new_var())
        .collect();
    let model = DesignModel {
        instance,
        incidence,
        edges,
    };
    for c in 0..instance.n_classes() {
        for u in 0..n {
            for v in (0..n).filter(|v| *v != u) {
                let (x_u, x_v) = (model.incidence_var(c, u), model.incidence_var(c, v));
                let e = model.edge_var(c, u, v);
                solver.add_clause(vec![x_u.negative(), x_v.negative(), e.positive()]);
                solver.add_clause(vec![x_u.positive(), e.negative()]);
                solver.add_clause(vec![x_v.positive(), e.negative()]);
            }
        }
    }
    for u in 0..n {
        for v in u + 1..n {
            let lits = (0..instance.n_classes())
                .map(|c| model.edge_var(c, u, v).positive())
                .collect::<Vec<Literal>>();
            solver
                .add_exactly(&lits, instance.lambda())
                .with_context(|| format!("while constraining the pair ({}, {})", u, v))?;
        }
    }
    for v in 0..n {
        let lits = (0..instance.n_classes())
            .map(|c| model.incidence_var(c, v).positive())
            .collect::<Vec<Literal>>();
        solver
            .add_exactly(&lits, instance.replication())
            .with_context(|| format!("while constraining the replication of vertex {}", v))?;
    }
    for c in 0..instance.n_classes() {
        let lits = (0..n)
            .map(|v| model.incidence_var(c, v).positive())
            .collect::<Vec<Literal>>();
        solver
            .add_exactly(&lits, instance.block_size())
            .with_context(|| format!("while constraining the size of class {}", c))?;
    }
    Ok(model)
}
