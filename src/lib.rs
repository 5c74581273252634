//! Multilevel bill-of-materials explosion and structural validation.
//!
//! This crate flattens a multilevel BOM into scrap-adjusted component
//! requirements, descending through phantom sub-assemblies, and proves the
//! phantom composition graph is acyclic before an explosion can be trusted.
//! Persistence and effectivity resolution live behind the traits in
//! [`graph`]; the engine itself never writes anything.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod entities;
pub mod errors;
pub mod graph;
pub mod services;

pub use entities::{BomHeader, BomLine};
pub use errors::BomError;
pub use graph::{BomGraphReader, EffectivityResolver, InMemoryBomGraph};
pub use services::explosion::{
    ComponentRequirement, EffectivityContext, ExplosionDetail, ExplosionResult, ExplosionService,
};
pub use services::validation::BomValidationService;
