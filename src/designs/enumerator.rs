use super::{Design, DesignModel};
use crate::sat::{SatSolver, SolvingResult};
use anyhow::{anyhow, Result};
use log::{debug, info};
use std::time::{Duration, Instant};

/// The reason why an enumeration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exhaustion {
    /// Every design was found.
    AllFound,
    /// The maximal number of designs was reached.
    LimitReached,
}

/// The states of a [`DesignEnumerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumeratorState {
    /// No search was made yet.
    Ready,
    /// The solver is running.
    Solving,
    /// A design was found and blocked; more designs may exist.
    ModelFound,
    /// The enumeration is over.
    Exhausted(Exhaustion),
}

/// Statistics about a complete enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerationSummary {
    /// The number of designs found.
    pub n_designs: usize,
    /// The reason why the enumeration stopped.
    pub exhaustion: Exhaustion,
    /// The time spent in the solver.
    pub solving_time: Duration,
}

/// Enumerates the designs of a model, blocking each design once found.
///
/// Each design found adds a clause to the solver, so the enumeration cannot be restarted.
///
/// # Example
///
/// ```
/// # use lexbibd::designs::{DesignEnumerator, DesignInstance, DesignModelBuilder, Exhaustion, SymmetryBreaking};
/// # use lexbibd::sat::default_solver;
/// # use lexbibd::translator::TseitinTranslator;
/// let instance = DesignInstance::new(4, 2, 1).unwrap();
/// let mut solver = default_solver();
/// let model = DesignModelBuilder::new(instance, SymmetryBreaking::None)
///     .build(solver.as_mut(), &mut TseitinTranslator)
///     .unwrap();
/// let mut enumerator = DesignEnumerator::new(solver, model, Some(10));
/// let summary = enumerator.run(|d| assert!(d.check(&instance).is_ok())).unwrap();
/// assert_eq!(10, summary.n_designs);
/// assert_eq!(Exhaustion::LimitReached, summary.exhaustion);
/// ```
pub struct DesignEnumerator {
    solver: Box<dyn SatSolver>,
    model: DesignModel,
    remaining: Option<usize>,
    state: EnumeratorState,
    n_designs: usize,
    solving_time: Duration,
}

impl DesignEnumerator {
    /// Builds a new enumerator.
    ///
    /// The solver must contain the constraints of the model.
    /// If a limit is given, the enumeration stops after this number of designs.
    pub fn new(solver: Box<dyn SatSolver>, model: DesignModel, limit: Option<usize>) -> Self {
        Self {
            solver,
            model,
            remaining: limit,
            state: EnumeratorState::Ready,
            n_designs: 0,
            solving_time: Duration::default(),
        }
    }

    /// Returns the current state of the enumeration.
    pub fn state(&self) -> EnumeratorState {
        self.state
    }

    /// Returns the number of designs found so far.
    pub fn n_designs(&self) -> usize {
        self.n_designs
    }

    /// Returns the time spent in the solver so far.
    pub fn solving_time(&self) -> Duration {
        self.solving_time
    }

    /// Returns the underlying solver.
    pub fn solver(&self) -> &dyn SatSolver {
        self.solver.as_ref()
    }

    /// Searches for the next design.
    ///
    /// Returns `None` when the enumeration is over; see [`state`](Self::state) for the reason.
    /// An error is returned if the solver cannot decide whether another design exists.
    pub fn next_design(&mut self) -> Result<Option<Design>> {
        if let EnumeratorState::Exhausted(_) = self.state {
            return Ok(None);
        }
        if self.remaining == Some(0) {
            self.state = EnumeratorState::Exhausted(Exhaustion::LimitReached);
            return Ok(None);
        }
        self.state = EnumeratorState::Solving;
        let start = Instant::now();
        let result = self.solver.solve();
        self.solving_time += start.elapsed();
        match result {
            SolvingResult::Satisfiable(assignment) => {
                let design = Design::from_assignment(&self.model, &assignment);
                self.solver.add_clause(design.blocking_clause(&self.model));
                self.n_designs += 1;
                debug!("found design #{}", self.n_designs);
                self.remaining = self.remaining.map(|r| r - 1);
                self.state = if self.remaining == Some(0) {
                    EnumeratorState::Exhausted(Exhaustion::LimitReached)
                } else {
                    EnumeratorState::ModelFound
                };
                Ok(Some(design))
            }
            SolvingResult::Unsatisfiable => {
                self.state = EnumeratorState::Exhausted(Exhaustion::AllFound);
                Ok(None)
            }
            SolvingResult::Unknown => Err(anyhow!(
                "the solver could not decide whether design #{} exists",
                self.n_designs + 1
            )),
        }
    }

    /// Enumerates the remaining designs, giving each of them to the callback.
    pub fn run<F>(&mut self, mut callback: F) -> Result<EnumerationSummary>
    where
        F: FnMut(&Design),
    {
        while let Some(design) = self.next_design()? {
            callback(&design);
        }
        let exhaustion = match self.state {
            EnumeratorState::Exhausted(e) => e,
            other => return Err(anyhow!("enumeration stopped in state {:?}", other)),
        };
        info!(
            "enumeration stopped after {} designs ({})",
            self.n_designs,
            match exhaustion {
                Exhaustion::AllFound => "all found",
                Exhaustion::LimitReached => "limit reached",
            }
        );
        Ok(EnumerationSummary {
            n_designs: self.n_designs,
            exhaustion,
            solving_time: self.solving_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        designs::{DesignInstance, DesignModelBuilder, SymmetryBreaking},
        lexleader::LexEncoding,
        sat::{default_solver, Literal, SolvingListener},
        translator::TseitinTranslator,
    };
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    fn enumerator(instance: DesignInstance, sb: SymmetryBreaking, limit: Option<usize>) -> DesignEnumerator {
        let mut solver = default_solver();
        let model = DesignModelBuilder::new(instance, sb)
            .build(solver.as_mut(), &mut TseitinTranslator)
            .unwrap();
        DesignEnumerator::new(solver, model, limit)
    }

    fn all_designs(instance: DesignInstance, sb: SymmetryBreaking) -> Vec<Design> {
        let mut designs = vec![];
        let summary = enumerator(instance, sb, None)
            .run(|d| designs.push(d.clone()))
            .unwrap();
        assert_eq!(Exhaustion::AllFound, summary.exhaustion);
        assert_eq!(designs.len(), summary.n_designs);
        designs
    }

    fn is_lex_sorted(design: &Design) -> bool {
        let columns = (0..design.n_classes())
            .map(|c| (0..design.n_vertices()).map(|v| design.is_member(v, c)).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let rows = (0..design.n_vertices())
            .map(|v| (0..design.n_classes()).map(|c| design.is_member(v, c)).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        columns.windows(2).all(|w| w[0] <= w[1]) && rows.windows(2).all(|w| w[0] <= w[1])
    }

    #[test]
    fn test_all_designs_without_symmetry_breaking() {
        let instance = DesignInstance::new(4, 2, 1).unwrap();
        let designs = all_designs(instance, SymmetryBreaking::None);
        assert_eq!(720, designs.len());
        assert_eq!(720, designs.iter().collect::<HashSet<_>>().len());
        assert!(designs.iter().all(|d| d.check(&instance).is_ok()));
    }

    #[test]
    fn test_encodings_agree() {
        for instance in [DesignInstance::new(4, 2, 1).unwrap(), DesignInstance::new(7, 3, 1).unwrap()] {
            let reference = all_designs(instance, SymmetryBreaking::Encoded(LexEncoding::And))
                .into_iter()
                .collect::<HashSet<_>>();
            assert!(!reference.is_empty());
            for encoding in LexEncoding::iter() {
                let designs = all_designs(instance, SymmetryBreaking::Encoded(encoding));
                assert_eq!(reference.len(), designs.len(), "{}", encoding);
                for d in designs.iter() {
                    assert!(d.check(&instance).is_ok());
                    assert!(is_lex_sorted(d), "{}", encoding);
                    assert!(reference.contains(d));
                }
            }
        }
    }

    #[test]
    fn test_native_lex_keeps_sorted_designs() {
        let instance = DesignInstance::new(4, 2, 1).unwrap();
        let designs = all_designs(instance, SymmetryBreaking::NativeLex);
        assert!(designs.len() < 720);
        let lex = all_designs(instance, SymmetryBreaking::Encoded(LexEncoding::Ror));
        assert!(designs.len() >= lex.len());
        let designs = designs.into_iter().collect::<HashSet<_>>();
        assert!(lex.iter().all(|d| designs.contains(d)));
    }

    #[test]
    fn test_limit() {
        let instance = DesignInstance::new(7, 3, 1).unwrap();
        let mut enumerator = enumerator(instance, SymmetryBreaking::None, Some(3));
        assert_eq!(EnumeratorState::Ready, enumerator.state());
        assert!(enumerator.next_design().unwrap().is_some());
        assert_eq!(EnumeratorState::ModelFound, enumerator.state());
        let summary = enumerator.run(|_| {}).unwrap();
        assert_eq!(3, summary.n_designs);
        assert_eq!(Exhaustion::LimitReached, summary.exhaustion);
        assert_eq!(EnumeratorState::Exhausted(Exhaustion::LimitReached), enumerator.state());
        assert!(enumerator.next_design().unwrap().is_none());
        assert_eq!(3, enumerator.n_designs());
    }

    #[test]
    fn test_zero_limit() {
        let instance = DesignInstance::new(7, 3, 1).unwrap();
        let summary = enumerator(instance, SymmetryBreaking::None, Some(0))
            .run(|_| panic!())
            .unwrap();
        assert_eq!(0, summary.n_designs);
        assert_eq!(Exhaustion::LimitReached, summary.exhaustion);
    }

    #[test]
    fn test_limit_above_count() {
        let instance = DesignInstance::new(3, 3, 2).unwrap();
        let summary = enumerator(instance, SymmetryBreaking::None, Some(5))
            .run(|_| {})
            .unwrap();
        assert_eq!(1, summary.n_designs);
        assert_eq!(Exhaustion::AllFound, summary.exhaustion);
    }

    struct UnknownSolver;

    impl SatSolver for UnknownSolver {
        fn add_clause(&mut self, _cl: Vec<Literal>) {}

        fn solve(&mut self) -> SolvingResult {
            SolvingResult::Unknown
        }

        fn solve_under_assumptions(&mut self, _assumptions: &[Literal]) -> SolvingResult {
            SolvingResult::Unknown
        }

        fn n_vars(&self) -> usize {
            0
        }

        fn n_clauses(&self) -> usize {
            0
        }

        fn add_listener(&mut self, _listener: Box<dyn SolvingListener>) {}

        fn reserve(&mut self, _new_max_id: usize) {}
    }

    #[test]
    fn test_unknown_is_an_error() {
        let instance = DesignInstance::new(3, 3, 2).unwrap();
        let mut solver = default_solver();
        let model = DesignModelBuilder::new(instance, SymmetryBreaking::None)
            .build(solver.as_mut(), &mut TseitinTranslator)
            .unwrap();
        let mut enumerator = DesignEnumerator::new(Box::new(UnknownSolver), model, None);
        assert!(enumerator.next_design().is_err());
        assert_eq!(EnumeratorState::Solving, enumerator.state());
    }
}
