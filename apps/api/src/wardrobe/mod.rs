// Wardrobe opening calculator.
// Rule tables → overlap policy → side build-out → solver; diagram and CSV export
// consume solver output. Everything here is pure and synchronous.

pub mod build_out;
pub mod diagram;
pub mod export;
pub mod handlers;
pub mod notes;
pub mod opening;
pub mod overlap;
pub mod rules;
pub mod solver;
pub mod status;

// Re-export the types consumed outside the module (config, state, router).
pub use overlap::OverlapPolicy;
pub use rules::{Housebuilder, RuleBook, Vocabulary};
