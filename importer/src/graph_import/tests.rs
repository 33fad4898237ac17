use pretty_assertions::assert_eq;
use serde_json::json;
use sysml_import_core::graph::{GraphSink, MemoryGraph, DST_POINTER, SRC_POINTER};
use sysml_import_core::types::MetaType;

use super::*;

fn decode(value: serde_json::Value) -> GraphDocument {
    serde_json::from_value(value).unwrap()
}

fn setup() -> (MemoryGraph, NodeRef) {
    let mut g = MemoryGraph::new();
    let root = g.create_node(None, MetaType::Graph).unwrap();
    (g, root)
}

fn node_named(g: &MemoryGraph, parent: NodeRef, name: &str) -> NodeRef {
    *g.children(parent)
        .iter()
        .find(|n| g.node(**n).unwrap().name() == Some(name))
        .unwrap()
}

#[test]
fn example_document_creates_nodes_and_one_edge() {
    let doc = decode(json!({
        "nodes": [
            {"id": 1, "label": "A", "outE": {"created": [{"id": "e1", "inV": 2}]}},
            {"id": 2, "label": "B"}
        ]
    }));
    let (mut g, root) = setup();

    let container = import_graph(&mut g, root, &doc).unwrap();

    let data = g.node(container).unwrap();
    assert_eq!(MetaType::Graph, data.base);
    assert_eq!(Some(CONTAINER_NAME), data.name());

    let nodes = g.children_of_type(container, MetaType::Node);
    assert_eq!(2, nodes.len());
    let a = node_named(&g, container, "A");
    let b = node_named(&g, container, "B");

    let edges = g.children_of_type(container, MetaType::Edge);
    assert_eq!(1, edges.len());
    let edge = g.node(edges[0]).unwrap();
    assert_eq!(Some("created"), edge.attributes.get("label").map(String::as_str));
    assert_eq!(Some(&Some(a)), edge.pointers.get(SRC_POINTER));
    assert_eq!(Some(&Some(b)), edge.pointers.get(DST_POINTER));
}

#[test]
fn vertices_get_sequence_default_positions() {
    let doc = decode(json!({
        "nodes": [
            {"id": 1, "label": "A"},
            {"id": 2, "label": "B"},
            {"id": 3, "label": "C"}
        ]
    }));
    let (mut g, root) = setup();

    let container = import_graph(&mut g, root, &doc).unwrap();

    let nodes = g.children_of_type(container, MetaType::Node);
    for (i, node) in nodes.iter().enumerate() {
        assert_eq!(
            Some(&json!({"x": 50 + 100 * i as i64, "y": 200})),
            g.node(*node).unwrap().registry.get("position")
        );
    }
}

#[test]
fn duplicate_edge_ids_collapse_to_one_edge() {
    // Both vertices report the same edge: once outgoing, once incoming.
    let doc = decode(json!({
        "nodes": [
            {"id": 1, "label": "A", "outE": {"created": [{"id": "e1", "inV": 2}]}},
            {"id": 2, "label": "B", "inE": {"created": [{"id": "e1", "outV": 1}]}}
        ]
    }));
    let (mut g, root) = setup();

    let container = import_graph(&mut g, root, &doc).unwrap();

    assert_eq!(1, g.children_of_type(container, MetaType::Edge).len());
}

#[test]
fn incoming_lists_are_ignored_when_an_outgoing_list_exists() {
    let doc = decode(json!({
        "nodes": [
            {
                "id": 1,
                "label": "A",
                "outE": {"created": [{"id": "e1", "inV": 2}]},
                "inE": {"created": [{"id": "e2", "outV": 2}]}
            },
            {"id": 2, "label": "B"}
        ]
    }));
    let (mut g, root) = setup();

    let container = import_graph(&mut g, root, &doc).unwrap();

    let edges = g.children_of_type(container, MetaType::Edge);
    assert_eq!(1, edges.len());
    assert_eq!(
        Some("created"),
        g.node(edges[0]).unwrap().attributes.get("label").map(String::as_str)
    );
}

#[test]
fn incoming_lists_are_used_without_an_outgoing_list() {
    let doc = decode(json!({
        "nodes": [
            {"id": 1, "label": "A"},
            {"id": 2, "label": "B", "inE": {"created": [{"id": "e1", "outV": 1}]}}
        ]
    }));
    let (mut g, root) = setup();

    let container = import_graph(&mut g, root, &doc).unwrap();

    let edges = g.children_of_type(container, MetaType::Edge);
    assert_eq!(1, edges.len());
    let edge = g.node(edges[0]).unwrap();
    let a = node_named(&g, container, "A");
    let b = node_named(&g, container, "B");
    // The scanning vertex becomes the source, the opposite endpoint the target.
    assert_eq!(Some(&Some(b)), edge.pointers.get(SRC_POINTER));
    assert_eq!(Some(&Some(a)), edge.pointers.get(DST_POINTER));
}

#[test]
fn knows_edges_are_imported_and_other_kinds_ignored() {
    let doc = decode(json!({
        "nodes": [
            {
                "id": 1,
                "label": "A",
                "outE": {
                    "knows": [{"id": "e1", "inV": 2}],
                    "likes": [{"id": "e2", "inV": 2}]
                }
            },
            {"id": 2, "label": "B"}
        ]
    }));
    let (mut g, root) = setup();

    let container = import_graph(&mut g, root, &doc).unwrap();

    let edges = g.children_of_type(container, MetaType::Edge);
    assert_eq!(1, edges.len());
    assert_eq!(
        Some("knows"),
        g.node(edges[0]).unwrap().attributes.get("label").map(String::as_str)
    );
}

#[test]
fn unresolved_endpoints_leave_the_pointer_unset() {
    let doc = decode(json!({
        "nodes": [
            {"id": 1, "label": "A", "outE": {"created": [{"id": "e1", "inV": 99}]}}
        ]
    }));
    let (mut g, root) = setup();

    let container = import_graph(&mut g, root, &doc).unwrap();

    let edges = g.children_of_type(container, MetaType::Edge);
    assert_eq!(1, edges.len());
    let edge = g.node(edges[0]).unwrap();
    let a = node_named(&g, container, "A");
    assert_eq!(Some(&Some(a)), edge.pointers.get(SRC_POINTER));
    assert_eq!(Some(&None), edge.pointers.get(DST_POINTER));
}

#[test]
fn empty_document_creates_only_the_container() {
    let (mut g, root) = setup();

    let container = import_graph(&mut g, root, &GraphDocument::default()).unwrap();

    assert_eq!(Vec::<NodeRef>::new(), g.children(container));
}
