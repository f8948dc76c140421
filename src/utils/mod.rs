//! Miscellaneous components used in the library.

mod phase_times;
pub use phase_times::PhaseTimes;
