//! Feature assembly
//!
//! Joins team-season tables and bracket entries into model-ready matchups.

pub mod assembler;
pub mod columns;
pub mod matchup;
pub mod matrix;

pub use assembler::FeatureAssembler;
pub use columns::Side;
pub use matchup::{BracketEntry, MatchupPair};
pub use matrix::FeatureMatrix;
