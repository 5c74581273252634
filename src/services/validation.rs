use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::errors::BomError;
use crate::graph::BomGraphReader;

/// Structural validation of the phantom composition graph.
///
/// Proves that following phantom edges from a root material can never revisit
/// a material already on the exploration stack, i.e. the phantom sub-graph is
/// a DAG. This is the prerequisite that makes
/// [`ExplosionService::explode`](crate::services::explosion::ExplosionService::explode)
/// safe to run: the engine itself has no cycle protection.
#[derive(Clone)]
pub struct BomValidationService {
    graph: Arc<dyn BomGraphReader>,
}

impl BomValidationService {
    pub fn new(graph: Arc<dyn BomGraphReader>) -> Self {
        Self { graph }
    }

    /// Depth-first search over the phantom sub-graph rooted at the material
    /// of header `root_header_id`.
    ///
    /// A `visited` set short-circuits materials already proven safe via
    /// another path, so diamond shapes cost O(V+E) and each material's header
    /// is fetched at most once; the recursion stack alone decides whether a
    /// revisit is a cycle. Validation is purely structural: lookups go
    /// through the by-material read, never the effectivity resolver.
    #[instrument(skip(self))]
    pub async fn validate_no_cycle(&self, root_header_id: i64) -> Result<(), BomError> {
        let root = self
            .graph
            .get_header_by_id(root_header_id)
            .await?
            .ok_or_else(|| {
                BomError::HeaderNotFound(format!("BOM header {} not found", root_header_id))
            })?;

        let mut visited = HashSet::new();
        let mut path = Vec::new();
        self.visit(root.material_id(), &mut visited, &mut path)
            .await?;

        debug!(
            root_material_id = root.material_id(),
            materials = visited.len(),
            "BOM structure validated, no circular references"
        );
        Ok(())
    }

    async fn visit(
        &self,
        material_id: i64,
        visited: &mut HashSet<i64>,
        path: &mut Vec<i64>,
    ) -> Result<(), BomError> {
        if path.contains(&material_id) {
            let mut cycle = path.clone();
            cycle.push(material_id);
            return Err(BomError::CircularReference {
                material_id,
                path: cycle,
            });
        }
        if !visited.insert(material_id) {
            // Already proven safe via another path.
            return Ok(());
        }

        path.push(material_id);
        if let Some(header) = self.graph.get_header_by_material(material_id).await? {
            for line in header.lines() {
                if line.is_phantom() {
                    Box::pin(self.visit(line.component_material_id(), visited, path)).await?;
                }
            }
        }
        path.pop();

        Ok(())
    }
}
