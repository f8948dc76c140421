//! Balanced incomplete block designs: instances, SAT models and enumeration.

mod design;
pub use design::Design;

mod design_instance;
pub use design_instance::DesignInstance;

mod design_model_builder;
pub use design_model_builder::DesignModel;
pub use design_model_builder::DesignModelBuilder;

mod enumerator;
pub use enumerator::DesignEnumerator;
pub use enumerator::EnumerationSummary;
pub use enumerator::EnumeratorState;
pub use enumerator::Exhaustion;

mod symmetry_breaking;
pub use symmetry_breaking::SymmetryBreaking;
