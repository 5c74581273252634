//! Cycle validator behavior: detection, diamond traversal cost, and lookup
//! discipline.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use assert_matches::assert_matches;
use bom_engine::{BomError, BomValidationService};
use common::{component, header, phantom, CountingGraph};

#[tokio::test]
async fn detects_indirect_cycle() {
    common::init_tracing();
    // A -> B -> C -> A, all through phantom lines.
    let mut graph = bom_engine::InMemoryBomGraph::new();
    let root_id = graph.insert(header(1, vec![phantom(10, 2, 1.0, 0.0)]));
    graph.insert(header(2, vec![phantom(10, 3, 1.0, 0.0)]));
    graph.insert(header(3, vec![phantom(10, 1, 1.0, 0.0)]));

    let service = BomValidationService::new(Arc::new(graph));
    let err = service.validate_no_cycle(root_id).await.unwrap_err();

    match err {
        BomError::CircularReference { material_id, path } => {
            assert!([1, 2, 3].contains(&material_id));
            // The reported path closes the loop on the offending material.
            assert_eq!(path.last(), Some(&material_id));
            assert!(path[..path.len() - 1].contains(&material_id));
        }
        other => panic!("expected CircularReference, got {other:?}"),
    }
}

#[tokio::test]
async fn detects_direct_self_reference() {
    let mut graph = bom_engine::InMemoryBomGraph::new();
    let root_id = graph.insert(header(1, vec![phantom(10, 1, 1.0, 0.0)]));

    let service = BomValidationService::new(Arc::new(graph));
    let err = service.validate_no_cycle(root_id).await.unwrap_err();
    assert_matches!(err, BomError::CircularReference { material_id: 1, .. });
}

#[tokio::test]
async fn diamond_validates_with_one_fetch_per_material() {
    // A -> B, A -> C, B -> D, C -> D: two paths to D, no cycle.
    let mut graph = bom_engine::InMemoryBomGraph::new();
    let root_id = graph.insert(header(
        1,
        vec![phantom(10, 2, 1.0, 0.0), phantom(20, 3, 1.0, 0.0)],
    ));
    graph.insert(header(2, vec![phantom(10, 4, 1.0, 0.0)]));
    graph.insert(header(3, vec![phantom(10, 4, 1.0, 0.0)]));
    graph.insert(header(4, vec![component(10, 5, 1.0, 0.0)]));

    let counting = Arc::new(CountingGraph::new(graph));
    let service = BomValidationService::new(counting.clone());

    service.validate_no_cycle(root_id).await.unwrap();

    // D is reached twice but its header is fetched only once: one
    // by-material lookup per distinct material (A, B, C, D).
    assert_eq!(counting.by_material_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn missing_root_header_is_fatal() {
    let graph = bom_engine::InMemoryBomGraph::new();
    let service = BomValidationService::new(Arc::new(graph));

    let err = service.validate_no_cycle(7).await.unwrap_err();
    assert_matches!(err, BomError::HeaderNotFound(msg) if msg.contains('7'));
}

#[tokio::test]
async fn non_phantom_edges_are_not_traversed() {
    // A holds B as an ordinary stocked component; B's phantom edge back to A
    // is unreachable from A's phantom sub-graph.
    let mut graph = bom_engine::InMemoryBomGraph::new();
    let root_id = graph.insert(header(1, vec![component(10, 2, 1.0, 0.0)]));
    graph.insert(header(2, vec![phantom(10, 1, 1.0, 0.0)]));

    let service = BomValidationService::new(Arc::new(graph));
    service.validate_no_cycle(root_id).await.unwrap();
}

#[tokio::test]
async fn phantom_without_own_bom_is_a_dead_end() {
    let mut graph = bom_engine::InMemoryBomGraph::new();
    let root_id = graph.insert(header(1, vec![phantom(10, 99, 1.0, 0.0)]));

    let service = BomValidationService::new(Arc::new(graph));
    service.validate_no_cycle(root_id).await.unwrap();
}

#[tokio::test]
async fn validated_graph_explodes_without_recursion_hazard() {
    // The intended composition: validate first, then trust explosion.
    let (graph, root_id) = common::multi_level_graph();
    let graph = Arc::new(graph);

    BomValidationService::new(graph.clone())
        .validate_no_cycle(root_id)
        .await
        .unwrap();

    let result = bom_engine::ExplosionService::new(graph)
        .explode(root_id, 2.0, None)
        .await
        .unwrap();
    assert_eq!(result.len(), 2);
}
