use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::entities::BomHeader;
use crate::errors::BomError;
use crate::graph::{BomGraphReader, EffectivityResolver};

/// Production context handed to the effectivity resolver when phantom
/// components are explored. The resolver is consulted only when a full
/// context is supplied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EffectivityContext {
    pub production_date: NaiveDate,
    pub organization_id: i64,
    pub plant_id: i64,
}

/// One contribution to an accumulated material, recorded so a caller can
/// reconstruct which level and parent contributed how much.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionDetail {
    pub level: u32,
    pub parent_material_id: Option<i64>,
    pub quantity: f64,
}

/// Flattened, scrap-adjusted requirement for one leaf material, accumulated
/// across every path that reached it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionResult {
    pub material_id: i64,
    pub total_quantity: f64,
    /// First occurrence wins; the engine does not convert units.
    pub unit_of_measure_id: Option<i64>,
    pub details: Vec<ExplosionDetail>,
}

/// Gross per-line requirement from a single header, without descending into
/// phantoms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRequirement {
    pub line_number: u32,
    pub material_id: i64,
    pub required_quantity: f64,
    pub unit_of_measure_id: Option<i64>,
}

/// Multilevel BOM explosion engine.
///
/// Walks a header depth-first in line-number order, multiplying net (scrap
/// inflated) quantities by the parent-level multiplier. Phantom lines are
/// replaced by their own BOM in place and never appear in the result; only
/// genuine leaves accumulate.
///
/// The engine reads the graph through [`BomGraphReader`] on each recursive
/// step and never mutates it, so concurrent explosions need no locking. It
/// does not protect itself against cyclic data; run
/// [`BomValidationService::validate_no_cycle`](crate::services::validation::BomValidationService::validate_no_cycle)
/// first, or arm [`with_max_depth`](ExplosionService::with_max_depth).
#[derive(Clone)]
pub struct ExplosionService {
    graph: Arc<dyn BomGraphReader>,
    resolver: Option<Arc<dyn EffectivityResolver>>,
    max_depth: Option<u32>,
}

impl ExplosionService {
    pub fn new(graph: Arc<dyn BomGraphReader>) -> Self {
        Self {
            graph,
            resolver: None,
            max_depth: None,
        }
    }

    /// Supplies an effectivity resolver, preferred over the plain by-material
    /// lookup whenever an [`EffectivityContext`] accompanies the explosion.
    pub fn with_resolver(mut self, resolver: Arc<dyn EffectivityResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Arms a recursion depth cap. Off by default: a validated acyclic graph
    /// cannot recurse deeper than its number of distinct materials, but hosts
    /// exploding unvalidated data can bound the walk here and get
    /// [`BomError::MaxDepthExceeded`] instead of unbounded recursion.
    pub fn with_max_depth(mut self, limit: u32) -> Self {
        self.max_depth = Some(limit);
        self
    }

    /// Explodes `required_quantity` units of the assembly produced by the
    /// header `root_header_id` into flattened leaf-material requirements,
    /// keyed by component material id.
    ///
    /// Fails with [`BomError::InvalidQuantity`] before touching the graph
    /// when `required_quantity` is not positive, and with
    /// [`BomError::HeaderNotFound`] when the root does not resolve. A phantom
    /// whose own BOM cannot be found is skipped, not an error.
    #[instrument(skip(self))]
    pub async fn explode(
        &self,
        root_header_id: i64,
        required_quantity: f64,
        context: Option<EffectivityContext>,
    ) -> Result<HashMap<i64, ExplosionResult>, BomError> {
        if !required_quantity.is_finite() || required_quantity <= 0.0 {
            return Err(BomError::InvalidQuantity(required_quantity));
        }

        let root = self
            .graph
            .get_header_by_id(root_header_id)
            .await?
            .ok_or_else(|| {
                BomError::HeaderNotFound(format!("BOM header {} not found", root_header_id))
            })?;

        debug!(
            root_material_id = root.material_id(),
            required_quantity, "starting BOM explosion"
        );

        let mut accumulator = HashMap::new();
        self.explode_header(&root, required_quantity, 1, None, context, &mut accumulator)
            .await?;
        Ok(accumulator)
    }

    /// Gross requirements for one header's direct lines: net quantity times
    /// `required_quantity`, in line-number order. Phantoms appear as
    /// themselves at this level.
    #[instrument(skip(self))]
    pub async fn single_level_requirements(
        &self,
        header_id: i64,
        required_quantity: f64,
    ) -> Result<Vec<ComponentRequirement>, BomError> {
        if !required_quantity.is_finite() || required_quantity <= 0.0 {
            return Err(BomError::InvalidQuantity(required_quantity));
        }

        let header = self
            .graph
            .get_header_by_id(header_id)
            .await?
            .ok_or_else(|| {
                BomError::HeaderNotFound(format!("BOM header {} not found", header_id))
            })?;

        Ok(header
            .lines()
            .iter()
            .map(|line| ComponentRequirement {
                line_number: line.line_number(),
                material_id: line.component_material_id(),
                required_quantity: line.net_quantity() * required_quantity,
                unit_of_measure_id: line.unit_of_measure_id(),
            })
            .collect())
    }

    async fn explode_header(
        &self,
        header: &BomHeader,
        parent_quantity: f64,
        level: u32,
        parent_material_id: Option<i64>,
        context: Option<EffectivityContext>,
        accumulator: &mut HashMap<i64, ExplosionResult>,
    ) -> Result<(), BomError> {
        if let Some(limit) = self.max_depth {
            if level > limit {
                return Err(BomError::MaxDepthExceeded { limit });
            }
        }

        for line in header.lines() {
            let total_quantity = line.net_quantity() * parent_quantity;

            if line.is_phantom() {
                match self
                    .resolve_phantom(line.component_material_id(), context)
                    .await?
                {
                    Some(sub_header) => {
                        debug!(
                            material_id = line.component_material_id(),
                            level, "expanding phantom sub-assembly"
                        );
                        Box::pin(self.explode_header(
                            &sub_header,
                            total_quantity,
                            level + 1,
                            Some(header.material_id()),
                            context,
                            accumulator,
                        ))
                        .await?;
                    }
                    None => {
                        // Tolerated data gap: the phantom contributes nothing.
                        warn!(
                            material_id = line.component_material_id(),
                            level, "phantom component has no BOM, skipping expansion"
                        );
                    }
                }
            } else {
                let entry = accumulator
                    .entry(line.component_material_id())
                    .or_insert_with(|| ExplosionResult {
                        material_id: line.component_material_id(),
                        total_quantity: 0.0,
                        unit_of_measure_id: line.unit_of_measure_id(),
                        details: Vec::new(),
                    });
                entry.total_quantity += total_quantity;
                entry.details.push(ExplosionDetail {
                    level,
                    parent_material_id,
                    quantity: total_quantity,
                });
            }
        }

        Ok(())
    }

    /// Resolves a phantom component's own header. The effectivity resolver is
    /// tried first when a full context is available; a resolver failure or
    /// empty answer falls back to the plain by-material lookup. Reader errors
    /// still propagate.
    async fn resolve_phantom(
        &self,
        material_id: i64,
        context: Option<EffectivityContext>,
    ) -> Result<Option<BomHeader>, BomError> {
        if let (Some(resolver), Some(ctx)) = (&self.resolver, context) {
            match resolver
                .get_effective_bom(
                    material_id,
                    ctx.production_date,
                    ctx.organization_id,
                    ctx.plant_id,
                )
                .await
            {
                Ok(Some(header)) => return Ok(Some(header)),
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        material_id,
                        error = %err,
                        "effectivity resolver failed, falling back to by-material lookup"
                    );
                }
            }
        }

        self.graph.get_header_by_material(material_id).await
    }
}
