use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::entities::BomHeader;
use crate::errors::BomError;
use crate::graph::{BomGraphReader, EffectivityResolver};

/// HashMap-backed BOM graph for tests and embedded hosts.
///
/// Headers are keyed by surrogate id; the by-material index points at the
/// most recently inserted header for each material, mirroring the
/// "caller-resolved current parts list" contract of
/// [`BomGraphReader::get_header_by_material`].
#[derive(Debug, Default, Clone)]
pub struct InMemoryBomGraph {
    headers: HashMap<i64, BomHeader>,
    by_material: HashMap<i64, i64>,
    next_id: i64,
}

impl InMemoryBomGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a header and returns its id, assigning the next free surrogate
    /// id when the header has none. The material index is updated to point at
    /// this header.
    pub fn insert(&mut self, header: BomHeader) -> i64 {
        let id = match header.id() {
            Some(id) => id,
            None => {
                self.next_id += 1;
                self.next_id
            }
        };
        self.next_id = self.next_id.max(id);

        let header = header.with_id(id);
        self.by_material.insert(header.material_id(), id);
        self.headers.insert(id, header);
        id
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

#[async_trait]
impl BomGraphReader for InMemoryBomGraph {
    async fn get_header_by_id(&self, header_id: i64) -> Result<Option<BomHeader>, BomError> {
        Ok(self.headers.get(&header_id).cloned())
    }

    async fn get_header_by_material(
        &self,
        material_id: i64,
    ) -> Result<Option<BomHeader>, BomError> {
        Ok(self
            .by_material
            .get(&material_id)
            .and_then(|id| self.headers.get(id))
            .cloned())
    }
}

#[async_trait]
impl EffectivityResolver for InMemoryBomGraph {
    /// Picks the active header for `material_id` in the given scope whose
    /// effectivity window covers `production_date`. Among several matches the
    /// highest version wins.
    async fn get_effective_bom(
        &self,
        material_id: i64,
        production_date: NaiveDate,
        organization_id: i64,
        plant_id: i64,
    ) -> Result<Option<BomHeader>, BomError> {
        Ok(self
            .headers
            .values()
            .filter(|h| {
                h.material_id() == material_id
                    && h.organization_id() == organization_id
                    && h.plant_id() == plant_id
                    && h.is_active()
                    && h.is_effective_on(production_date)
            })
            .max_by_key(|h| h.bom_version())
            .cloned())
    }
}
