use std::time::{Duration, Instant};

/// Accumulates the time spent in named phases of a computation.
///
/// Phases are kept in the order of their first occurrence;
/// timing a phase several times adds up the durations.
#[derive(Debug, Default, Clone)]
pub struct PhaseTimes(Vec<(&'static str, Duration)>);

impl PhaseTimes {
    /// Runs a function and adds its execution time to the given phase.
    pub fn time<F, T>(&mut self, phase: &'static str, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let result = f();
        self.add(phase, start.elapsed());
        result
    }

    /// Adds a duration to the given phase.
    pub fn add(&mut self, phase: &'static str, duration: Duration) {
        match self.0.iter_mut().find(|(p, _)| *p == phase) {
            Some((_, d)) => *d += duration,
            None => self.0.push((phase, duration)),
        }
    }

    /// Adds the durations of another set of phases to this one.
    pub fn merge(&mut self, other: &PhaseTimes) {
        other.iter().for_each(|(p, d)| self.add(p, d));
    }

    /// Returns the time spent in a phase, if this phase was timed.
    pub fn get(&self, phase: &str) -> Option<Duration> {
        self.0.iter().find(|(p, _)| *p == phase).map(|(_, d)| *d)
    }

    /// Iterates over the phases in the order of their first occurrence.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Duration)> + '_ {
        self.0.iter().copied()
    }

    /// Returns the phases sorted by increasing duration.
    pub fn sorted_by_duration(&self) -> Vec<(&'static str, Duration)> {
        let mut phases = self.0.clone();
        phases.sort_by_key(|(_, d)| *d);
        phases
    }

    /// Returns the number of distinct phases.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` iff no phase was timed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_returns_value() {
        let mut times = PhaseTimes::default();
        assert_eq!(42, times.time("compute", || 42));
        assert_eq!(1, times.len());
        assert!(times.get("compute").is_some());
        assert!(times.get("other").is_none());
    }

    #[test]
    fn test_accumulate() {
        let mut times = PhaseTimes::default();
        times.add("a", Duration::from_millis(3));
        times.add("b", Duration::from_millis(1));
        times.add("a", Duration::from_millis(2));
        assert_eq!(Some(Duration::from_millis(5)), times.get("a"));
        assert_eq!(vec!["a", "b"], times.iter().map(|(p, _)| p).collect::<Vec<_>>());
        assert_eq!(
            vec!["b", "a"],
            times
                .sorted_by_duration()
                .iter()
                .map(|(p, _)| *p)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_merge() {
        let mut times = PhaseTimes::default();
        times.add("a", Duration::from_millis(3));
        let mut other = PhaseTimes::default();
        other.add("a", Duration::from_millis(1));
        other.add("c", Duration::from_millis(1));
        times.merge(&other);
        assert_eq!(Some(Duration::from_millis(4)), times.get("a"));
        assert_eq!(2, times.len());
        assert!(!times.is_empty());
    }
}
