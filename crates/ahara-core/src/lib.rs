//! Core library for ahara: Ayurvedic meal-plan synthesis.
//!
//! - [`records`]: foods, patients and plan types.
//! - [`graph`]: typed knowledge graph and fixed-width feature export.
//! - [`recommend`]: category-driven meal suggestions.
//! - [`plan`]: tagged-text parsing, weekly assembly, defaults, formatting.
//! - [`oracle`]: the boundary to an external text generator.
//! - [`planner`]: the generation pipeline tying the above together.
//! - [`knowledge_base`]: the TOML knowledge-base format.
//! - [`dataset`]: prompt/target pairs from reference plans.

pub mod dataset;
pub mod graph;
pub mod knowledge_base;
pub mod oracle;
pub mod plan;
pub mod planner;
pub mod recommend;
pub mod records;
