//! Shared fixtures for the explosion and validation test suites.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bom_engine::{
    BomError, BomGraphReader, BomHeader, BomLine, EffectivityResolver, InMemoryBomGraph,
};
use chrono::NaiveDate;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn component(line_number: u32, material_id: i64, quantity: f64, scrap: f64) -> BomLine {
    BomLine::new(line_number, material_id, quantity, scrap, false).unwrap()
}

pub fn phantom(line_number: u32, material_id: i64, quantity: f64, scrap: f64) -> BomLine {
    BomLine::new(line_number, material_id, quantity, scrap, true).unwrap()
}

pub fn header(material_id: i64, lines: Vec<BomLine>) -> BomHeader {
    BomHeader::new(
        None,
        1,
        1,
        &format!("BOM-{material_id}"),
        material_id,
        1,
        1.0,
        None,
        None,
        lines,
    )
    .unwrap()
}

/// The concrete multilevel scenario: product A (material 1) requires
/// phantom B (material 2, 2 units, 10% scrap) and C (material 3, 1 unit,
/// 5% scrap); B's own BOM requires D (material 4, 3 units, 5% scrap).
/// Returns the graph and the root header id.
pub fn multi_level_graph() -> (InMemoryBomGraph, i64) {
    let mut graph = InMemoryBomGraph::new();
    let root_id = graph.insert(header(
        1,
        vec![phantom(10, 2, 2.0, 10.0), component(20, 3, 1.0, 5.0)],
    ));
    graph.insert(header(2, vec![component(10, 4, 3.0, 5.0)]));
    (graph, root_id)
}

/// Graph reader wrapper that counts collaborator calls.
pub struct CountingGraph {
    inner: InMemoryBomGraph,
    pub by_id_calls: AtomicUsize,
    pub by_material_calls: AtomicUsize,
}

impl CountingGraph {
    pub fn new(inner: InMemoryBomGraph) -> Self {
        Self {
            inner,
            by_id_calls: AtomicUsize::new(0),
            by_material_calls: AtomicUsize::new(0),
        }
    }

    pub fn total_calls(&self) -> usize {
        self.by_id_calls.load(Ordering::SeqCst) + self.by_material_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BomGraphReader for CountingGraph {
    async fn get_header_by_id(&self, header_id: i64) -> Result<Option<BomHeader>, BomError> {
        self.by_id_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_header_by_id(header_id).await
    }

    async fn get_header_by_material(
        &self,
        material_id: i64,
    ) -> Result<Option<BomHeader>, BomError> {
        self.by_material_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_header_by_material(material_id).await
    }
}

/// Resolver that always fails, for exercising the soft-fallback path.
pub struct FailingResolver;

#[async_trait]
impl EffectivityResolver for FailingResolver {
    async fn get_effective_bom(
        &self,
        _material_id: i64,
        _production_date: NaiveDate,
        _organization_id: i64,
        _plant_id: i64,
    ) -> Result<Option<BomHeader>, BomError> {
        Err(BomError::Graph("effectivity store unavailable".to_string()))
    }
}
