//! Read-only collaborator contracts for the explosion engine and the cycle
//! validator.
//!
//! A host application supplies these; the engine never writes through them.
//! [`InMemoryBomGraph`] is a reference implementation for tests and embedded
//! use.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::entities::BomHeader;
use crate::errors::BomError;

pub mod memory;

pub use memory::InMemoryBomGraph;

/// Side-effect-free access to BOM headers and their lines.
#[async_trait]
pub trait BomGraphReader: Send + Sync {
    /// Fetches one header, including its ordered lines, by surrogate id.
    async fn get_header_by_id(&self, header_id: i64) -> Result<Option<BomHeader>, BomError>;

    /// Fetches the header currently representing a material's parts list.
    /// Used when recursing into a phantom component and during cycle
    /// validation.
    async fn get_header_by_material(&self, material_id: i64)
        -> Result<Option<BomHeader>, BomError>;
}

/// Date-based selection of which BOM version is current for a material.
///
/// Failures from a resolver are soft: the engine falls back to
/// [`BomGraphReader::get_header_by_material`] instead of propagating them.
#[async_trait]
pub trait EffectivityResolver: Send + Sync {
    async fn get_effective_bom(
        &self,
        material_id: i64,
        production_date: NaiveDate,
        organization_id: i64,
        plant_id: i64,
    ) -> Result<Option<BomHeader>, BomError>;
}
