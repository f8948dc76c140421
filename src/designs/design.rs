use super::{DesignInstance, DesignModel};
use crate::sat::{Assignment, Literal};
use anyhow::{anyhow, Result};
use std::fmt::Display;

/// A design, given by its incidence matrix.
///
/// The cell `(vertex, class)` is set iff the vertex belongs to the class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Design {
    n_vertices: usize,
    n_classes: usize,
    incidence: Vec<bool>,
}

impl Design {
    /// Builds a design from its incidence matrix, given class by class.
    ///
    /// # Panics
    ///
    /// Panics if a class has not `n_vertices` cells.
    pub fn new(n_vertices: usize, classes: &[Vec<bool>]) -> Self {
        assert!(
            classes.iter().all(|c| c.len() == n_vertices),
            "each class must have a cell per vertex"
        );
        Self {
            n_vertices,
            n_classes: classes.len(),
            incidence: classes.concat(),
        }
    }

    pub(crate) fn from_assignment(model: &DesignModel, assignment: &Assignment) -> Self {
        let instance = model.instance();
        Self {
            n_vertices: instance.n_vertices(),
            n_classes: instance.n_classes(),
            incidence: model
                .incidence_vars()
                .iter()
                .map(|v| assignment.value_of(*v).unwrap_or(false))
                .collect(),
        }
    }

    /// Returns the clause forbidding this design, given the model it was read from.
    ///
    /// The clause contains one literal per incidence variable, of polarity opposite to the design cell.
    pub(crate) fn blocking_clause(&self, model: &DesignModel) -> Vec<Literal> {
        model
            .incidence_vars()
            .iter()
            .zip(self.incidence.iter())
            .map(|(v, b)| if *b { v.negative() } else { v.positive() })
            .collect()
    }

    /// The number of vertices.
    pub fn n_vertices(&self) -> usize {
        self.n_vertices
    }

    /// The number of classes.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Returns `true` iff the vertex belongs to the class.
    pub fn is_member(&self, vertex: usize, class: usize) -> bool {
        assert!(vertex < self.n_vertices && class < self.n_classes);
        self.incidence[class * self.n_vertices + vertex]
    }

    /// Returns the vertices of each class, in increasing order.
    pub fn blocks(&self) -> Vec<Vec<usize>> {
        self.incidence
            .chunks(self.n_vertices.max(1))
            .take(self.n_classes)
            .map(|c| {
                c.iter()
                    .enumerate()
                    .filter_map(|(v, b)| if *b { Some(v) } else { None })
                    .collect()
            })
            .collect()
    }

    /// Checks that this design satisfies the constraints of an instance.
    ///
    /// The dimensions must match, each class must contain `k` vertices,
    /// each vertex must belong to `r` classes and each pair of vertices must appear in `λ` classes.
    pub fn check(&self, instance: &DesignInstance) -> Result<()> {
        if self.n_vertices != instance.n_vertices() || self.n_classes != instance.n_classes() {
            return Err(anyhow!(
                "a {}x{} matrix cannot be a {} design",
                self.n_vertices,
                self.n_classes,
                instance
            ));
        }
        let blocks = self.blocks();
        if let Some((c, b)) = blocks
            .iter()
            .enumerate()
            .find(|(_, b)| b.len() != instance.block_size())
        {
            return Err(anyhow!(
                "class {} has {} vertices instead of {}",
                c,
                b.len(),
                instance.block_size()
            ));
        }
        for v in 0..self.n_vertices {
            let n = (0..self.n_classes).filter(|c| self.is_member(v, *c)).count();
            if n != instance.replication() {
                return Err(anyhow!(
                    "vertex {} belongs to {} classes instead of {}",
                    v,
                    n,
                    instance.replication()
                ));
            }
        }
        for u in 0..self.n_vertices {
            for v in u + 1..self.n_vertices {
                let n = (0..self.n_classes)
                    .filter(|c| self.is_member(u, *c) && self.is_member(v, *c))
                    .count();
                if n != instance.lambda() {
                    return Err(anyhow!(
                        "vertices {} and {} share {} classes instead of {}",
                        u,
                        v,
                        n,
                        instance.lambda()
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Display for Design {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for v in 0..self.n_vertices {
            let line = (0..self.n_classes)
                .map(|c| if self.is_member(v, c) { '1' } else { '0' })
                .collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        designs::{DesignModelBuilder, SymmetryBreaking},
        sat::default_solver,
        translator::TseitinTranslator,
    };

    fn fano() -> Design {
        let blocks = [
            [0, 1, 2],
            [0, 3, 4],
            [0, 5, 6],
            [1, 3, 5],
            [1, 4, 6],
            [2, 3, 6],
            [2, 4, 5],
        ];
        let classes = blocks
            .iter()
            .map(|b| (0..7).map(|v| b.contains(&v)).collect())
            .collect::<Vec<Vec<bool>>>();
        Design::new(7, &classes)
    }

    #[test]
    fn test_fano_is_valid() {
        let design = fano();
        assert!(design.check(&DesignInstance::new(7, 3, 1).unwrap()).is_ok());
        assert_eq!(vec![0, 3, 4], design.blocks()[1]);
        assert!(design.is_member(3, 1));
        assert!(!design.is_member(3, 0));
    }

    #[test]
    fn test_display() {
        let design = Design::new(3, &[vec![true, true, false], vec![false, true, true]]);
        assert_eq!("10\n11\n01\n", design.to_string());
    }

    #[test]
    fn test_check_failures() {
        let design = fano();
        assert!(design.check(&DesignInstance::new(7, 3, 2).unwrap()).is_err());
        let mut classes = (0..7)
            .map(|c| (0..7).map(|v| design.is_member(v, c)).collect())
            .collect::<Vec<Vec<bool>>>();
        classes[0].swap(2, 3);
        let broken = Design::new(7, &classes);
        let err = broken
            .check(&DesignInstance::new(7, 3, 1).unwrap())
            .unwrap_err();
        assert_eq!("vertex 2 belongs to 2 classes instead of 3", err.to_string());
        classes[0][2] = true;
        let broken = Design::new(7, &classes);
        let err = broken
            .check(&DesignInstance::new(7, 3, 1).unwrap())
            .unwrap_err();
        assert_eq!("class 0 has 4 vertices instead of 3", err.to_string());
    }

    #[test]
    fn test_check_pairs() {
        let blocks = [[0, 1], [0, 1], [2, 3], [2, 3], [0, 2], [1, 3]];
        let classes = blocks
            .iter()
            .map(|b| (0..4).map(|v| b.contains(&v)).collect())
            .collect::<Vec<Vec<bool>>>();
        let design = Design::new(4, &classes);
        let err = design
            .check(&DesignInstance::new(4, 2, 1).unwrap())
            .unwrap_err();
        assert_eq!("vertices 0 and 1 share 2 classes instead of 1", err.to_string());
    }

    #[test]
    fn test_check_dimensions() {
        let design = Design::new(3, &[vec![true, true, true], vec![true, true, true]]);
        assert!(design.check(&DesignInstance::new(3, 3, 2).unwrap()).is_ok());
        assert!(design.check(&DesignInstance::new(4, 2, 1).unwrap()).is_err());
    }

    #[test]
    fn test_blocking_clause_forbids_only_this_design() {
        let instance = DesignInstance::new(4, 2, 1).unwrap();
        let mut solver = default_solver();
        let model = DesignModelBuilder::new(instance, SymmetryBreaking::None)
            .build(solver.as_mut(), &mut TseitinTranslator)
            .unwrap();
        let assignment = solver.solve().unwrap_model().unwrap();
        let design = Design::from_assignment(&model, &assignment);
        assert!(design.check(&instance).is_ok());
        let clause = design.blocking_clause(&model);
        assert_eq!(model.incidence_vars().len(), clause.len());
        let mut cells = model
            .incidence_vars()
            .iter()
            .map(|v| assignment.value_of(*v).unwrap())
            .collect::<Vec<bool>>();
        let satisfied = |cells: &[bool]| {
            clause.iter().any(|l| {
                let i = model.incidence_vars().iter().position(|v| *v == l.var()).unwrap();
                cells[i] == l.is_positive()
            })
        };
        assert!(!satisfied(&cells));
        for i in 0..cells.len() {
            cells[i] = !cells[i];
            assert!(satisfied(&cells));
            cells[i] = !cells[i];
        }
    }
}
