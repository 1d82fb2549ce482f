//! Integration tests for node and edge storage.

use quiver_core::{Edge, ElementId, Node, Value};
use quiver_graph::{GraphError, GraphStore};
use tempfile::TempDir;

fn open_temp_store() -> (GraphStore, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let store = GraphStore::open(dir.path()).expect("failed to open store");
    (store, dir)
}

fn person(name: &str) -> Node {
    Node::new(ElementId::random()).with_label("Person").with_property("name", name)
}

// ============================================================================
// Nodes
// ============================================================================

#[test]
fn put_then_get_node() {
    let (store, _dir) = open_temp_store();

    let node = person("ada");
    let tx = store.begin();
    tx.put_node(&node).unwrap();
    tx.commit().unwrap();

    let tx = store.begin();
    let found = tx.get_node(node.id).unwrap().unwrap();
    assert_eq!(found, node);
}

#[test]
fn get_missing_node_is_none() {
    let (store, _dir) = open_temp_store();
    let tx = store.begin();
    assert!(tx.get_node(ElementId::random()).unwrap().is_none());
}

#[test]
fn node_property_order_is_preserved() {
    let (store, _dir) = open_temp_store();

    let node = Node::new(ElementId::random())
        .with_property("z", 1i64)
        .with_property("a", 2i64)
        .with_property("m", 3i64);
    let tx = store.begin();
    tx.put_node(&node).unwrap();
    tx.commit().unwrap();

    let tx = store.begin();
    let found = tx.get_node(node.id).unwrap().unwrap();
    let keys: Vec<_> = found.properties.iter().map(|(k, _)| k.to_owned()).collect();
    assert_eq!(keys, ["z", "a", "m"]);
}

#[test]
fn delete_node_then_get_is_none() {
    let (store, _dir) = open_temp_store();

    let node = person("ada");
    let tx = store.begin();
    tx.put_node(&node).unwrap();
    tx.commit().unwrap();

    let tx = store.begin();
    tx.delete_node(node.id).unwrap();
    tx.commit().unwrap();

    let tx = store.begin();
    assert!(tx.get_node(node.id).unwrap().is_none());
}

#[test]
fn delete_missing_node_is_not_found() {
    let (store, _dir) = open_temp_store();

    let node = person("ada");
    let tx = store.begin();
    tx.put_node(&node).unwrap();
    tx.delete_node(node.id).unwrap();
    let err = tx.delete_node(node.id).unwrap_err();
    assert!(matches!(err, GraphError::NotFound(id) if id == node.id));
}

#[test]
fn put_node_overwrites() {
    let (store, _dir) = open_temp_store();

    let mut node = person("ada");
    let tx = store.begin();
    tx.put_node(&node).unwrap();
    tx.commit().unwrap();

    node.set_property("name", "grace");
    let tx = store.begin();
    tx.put_node(&node).unwrap();
    tx.commit().unwrap();

    let tx = store.begin();
    let found = tx.get_node(node.id).unwrap().unwrap();
    assert_eq!(found.get_property("name"), Some(&Value::from("grace")));
}

#[test]
fn node_scan_is_id_ordered() {
    let (store, _dir) = open_temp_store();

    let tx = store.begin();
    let mut ids = Vec::new();
    for i in 0..8 {
        let node = Node::new(ElementId::random()).with_property("i", i as i64);
        tx.put_node(&node).unwrap();
        ids.push(node.id);
    }
    tx.commit().unwrap();
    ids.sort();

    let tx = store.begin();
    let mut scan = tx.nodes().unwrap();
    let mut seen = Vec::new();
    while let Some(node) = scan.next_node().unwrap() {
        seen.push(node.id);
    }
    assert_eq!(seen, ids);
}

// ============================================================================
// Edges
// ============================================================================

#[test]
fn put_then_get_edge() {
    let (store, _dir) = open_temp_store();

    let (a, b) = (person("a"), person("b"));
    let edge = Edge::new(ElementId::random(), a.id, b.id)
        .with_label("KNOWS")
        .with_property("since", 2020i64);

    let tx = store.begin();
    tx.put_node(&a).unwrap();
    tx.put_node(&b).unwrap();
    tx.put_edge(&edge).unwrap();
    tx.commit().unwrap();

    let tx = store.begin();
    assert_eq!(tx.get_edge(edge.id).unwrap().unwrap(), edge);
}

#[test]
fn put_edge_requires_endpoints() {
    let (store, _dir) = open_temp_store();

    let a = person("a");
    let missing = ElementId::random();
    let edge = Edge::new(ElementId::random(), a.id, missing);

    let tx = store.begin();
    tx.put_node(&a).unwrap();
    let err = tx.put_edge(&edge).unwrap_err();
    assert!(matches!(err, GraphError::NotFound(id) if id == missing));
}

#[test]
fn put_edge_rejects_endpoint_drift() {
    let (store, _dir) = open_temp_store();

    let (a, b, c) = (person("a"), person("b"), person("c"));
    let edge = Edge::new(ElementId::random(), a.id, b.id);

    let tx = store.begin();
    for node in [&a, &b, &c] {
        tx.put_node(node).unwrap();
    }
    tx.put_edge(&edge).unwrap();

    // Same id, different destination.
    let drifted = Edge::new(edge.id, a.id, c.id);
    let err = tx.put_edge(&drifted).unwrap_err();
    assert!(matches!(err, GraphError::EdgeDataMismatch(id) if id == edge.id));

    // Same id, different directedness.
    let flipped = Edge::undirected(edge.id, a.id, b.id);
    let err = tx.put_edge(&flipped).unwrap_err();
    assert!(matches!(err, GraphError::EdgeDataMismatch(_)));
}

#[test]
fn put_edge_twice_updates_properties() {
    let (store, _dir) = open_temp_store();

    let (a, b) = (person("a"), person("b"));
    let edge = Edge::new(ElementId::random(), a.id, b.id).with_property("w", 1i64);

    let tx = store.begin();
    tx.put_node(&a).unwrap();
    tx.put_node(&b).unwrap();
    tx.put_edge(&edge).unwrap();
    let updated = Edge::new(edge.id, a.id, b.id).with_property("w", 2i64);
    tx.put_edge(&updated).unwrap();
    tx.commit().unwrap();

    let tx = store.begin();
    let found = tx.get_edge(edge.id).unwrap().unwrap();
    assert_eq!(found.get_property("w"), Some(&Value::Int(2)));

    // The overwrite must not have duplicated the adjacency entries.
    let entries =
        tx.iterate_adj(a.id, quiver_core::Dir::Out, quiver_core::Dir::Out).unwrap().collect_entries().unwrap();
    assert_eq!(entries.len(), 1);
}

#[test]
fn delete_missing_edge_is_not_found() {
    let (store, _dir) = open_temp_store();
    let tx = store.begin();
    let id = ElementId::random();
    let err = tx.delete_edge(id).unwrap_err();
    assert!(matches!(err, GraphError::NotFound(got) if got == id));
}

#[test]
fn writes_are_invisible_before_commit() {
    let (store, _dir) = open_temp_store();

    let node = person("ada");
    let tx1 = store.begin();
    let tx2 = store.begin();
    tx1.put_node(&node).unwrap();

    // tx1 sees its own write, tx2 does not.
    assert!(tx1.get_node(node.id).unwrap().is_some());
    assert!(tx2.get_node(node.id).unwrap().is_none());

    tx1.commit().unwrap();

    // Still invisible to the older snapshot.
    assert!(tx2.get_node(node.id).unwrap().is_none());

    let tx3 = store.begin();
    assert!(tx3.get_node(node.id).unwrap().is_some());
}

#[test]
fn edge_insert_races_with_endpoint_delete() {
    let (store, _dir) = open_temp_store();

    let (a, b) = (person("a"), person("b"));
    let tx = store.begin();
    tx.put_node(&a).unwrap();
    tx.put_node(&b).unwrap();
    tx.commit().unwrap();

    // tx1 deletes an endpoint, tx2 concurrently inserts an edge to it.
    let tx1 = store.begin();
    let tx2 = store.begin();
    tx1.delete_node(b.id).unwrap();
    tx1.commit().unwrap();

    tx2.put_edge(&Edge::new(ElementId::random(), a.id, b.id)).unwrap();
    let err = tx2.commit().unwrap_err();
    assert!(err.is_retryable(), "got {err:?}");
}
