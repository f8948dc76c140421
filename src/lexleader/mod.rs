//! Lex-leader symmetry-breaking constraints on matrices of boolean variables.

mod lex_encoding;
pub use lex_encoding::LexEncoding;

mod lex_leader_encoder;
pub use lex_leader_encoder::LexLeaderEncoder;

mod native_lex_leader;
pub use native_lex_leader::native_lex_leader;
