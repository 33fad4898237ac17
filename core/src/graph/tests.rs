use pretty_assertions::assert_eq;

use super::*;
use crate::types::{MetaType, Position};

#[test]
fn create_and_inspect_nodes() {
    let mut g = MemoryGraph::new();
    let root = g.create_node(None, MetaType::Graph).unwrap();
    let child = g
        .create_named_node(Some(root), MetaType::Node, "A", Position { x: 50, y: 200 })
        .unwrap();

    let data = g.node(child).unwrap();
    assert_eq!(Some("A"), data.name());
    assert_eq!(MetaType::Node, data.base);
    assert_eq!(Some(root), data.parent);
    assert_eq!(
        Some(&serde_json::json!({"x": 50, "y": 200})),
        data.registry.get(POSITION_KEY)
    );
    assert_eq!(vec![child], g.children(root));
    assert_eq!(2, g.len());
}

#[test]
fn children_are_listed_in_creation_order_and_filtered_by_type() {
    let mut g = MemoryGraph::new();
    let root = g.create_node(None, MetaType::Graph).unwrap();
    let a = g.create_node(Some(root), MetaType::Node).unwrap();
    let e = g.create_node(Some(root), MetaType::Edge).unwrap();
    let b = g.create_node(Some(root), MetaType::Node).unwrap();

    assert_eq!(vec![a, e, b], g.children(root));
    assert_eq!(vec![a, b], g.children_of_type(root, MetaType::Node));
    assert_eq!(vec![e], g.children_of_type(root, MetaType::Edge));
}

#[test]
fn unknown_parent_is_rejected() {
    let mut g = MemoryGraph::new();
    assert!(matches!(
        g.create_node(Some(42), MetaType::Node),
        Err(SysmlImportCoreError::InvalidNodeReference(42))
    ));
}

#[test]
fn mutating_a_missing_node_is_rejected() {
    let mut g = MemoryGraph::new();
    assert!(g.set_attribute(7, NAME_ATTRIBUTE, "x").is_err());
    assert!(g.set_registry(7, POSITION_KEY, serde_json::json!(null)).is_err());
    assert!(g.set_pointer(7, SRC_POINTER, None).is_err());
}

#[test]
fn pointers_validate_their_target_but_allow_unset() {
    let mut g = MemoryGraph::new();
    let root = g.create_node(None, MetaType::Graph).unwrap();
    let edge = g.create_node(Some(root), MetaType::Edge).unwrap();

    assert!(matches!(
        g.set_pointer(edge, DST_POINTER, Some(99)),
        Err(SysmlImportCoreError::InvalidNodeReference(99))
    ));

    g.set_pointer(edge, DST_POINTER, None).unwrap();
    assert_eq!(Some(&None), g.node(edge).unwrap().pointers.get(DST_POINTER));

    g.set_pointer(edge, SRC_POINTER, Some(root)).unwrap();
    assert_eq!(
        Some(&Some(root)),
        g.node(edge).unwrap().pointers.get(SRC_POINTER)
    );
}
