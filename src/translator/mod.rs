//! Translators from symbolic formulas to clauses.

mod external_translator;
pub use external_translator::ExternalTranslator;

mod specs;
pub use specs::FormulaTranslator;
pub use specs::Translation;
pub use specs::VarMap;

mod translator_output_reader;
pub use translator_output_reader::read_translator_output;

mod tseitin_translator;
pub use tseitin_translator::TseitinTranslator;
