//! Importer for vertex/edge graph documents: one container node, one child
//! node per vertex, one typed edge node per distinct collected edge.

use std::collections::{HashMap, HashSet};

use sysml_import_core::graph::{GraphSink, DST_POINTER, SRC_POINTER};
use sysml_import_core::types::{MetaType, NodeRef, Position, DIAGRAM_POSITION};

use crate::document::{EdgeLists, ElementId, GraphDocument};
use crate::errors::Result;

/// Display name of the created container node.
pub const CONTAINER_NAME: &str = "graph";

/// Edge kinds the importer materializes; other kinds in the document are
/// ignored.
pub const IMPORTED_EDGE_KINDS: [&str; 2] = ["created", "knows"];

const LABEL_ATTRIBUTE: &str = "label";

/// Which edge list of a vertex is being scanned; determines the field that
/// holds the opposite endpoint.
#[derive(Clone, Copy, Debug)]
enum EdgeDirection {
    Outgoing,
    Incoming,
}

#[derive(Clone, Debug)]
struct CollectedEdge {
    src: ElementId,
    dst: Option<ElementId>,
    label: String,
}

/// De-duplicating edge collector. The first discovery of an edge id wins and
/// edges are materialized in discovery order.
#[derive(Default)]
struct EdgeCollector {
    seen: HashSet<ElementId>,
    edges: Vec<CollectedEdge>,
}

impl EdgeCollector {
    fn collect(&mut self, node_id: &ElementId, lists: &EdgeLists, direction: EdgeDirection) {
        for kind in IMPORTED_EDGE_KINDS {
            if let Some(entries) = lists.get(kind) {
                for entry in entries {
                    if self.seen.insert(entry.id.clone()) {
                        let dst = match direction {
                            EdgeDirection::Outgoing => entry.in_v.clone(),
                            EdgeDirection::Incoming => entry.out_v.clone(),
                        };
                        self.edges.push(CollectedEdge {
                            src: node_id.clone(),
                            dst,
                            label: kind.to_string(),
                        });
                    }
                }
            }
        }
    }
}

/// Import a graph document as a "Graph" container under `parent`.
///
/// First pass creates one "Node" child per vertex and collects edge
/// candidates, second pass creates one "Edge" child per distinct edge with
/// its `src`/`dst` pointers resolved through the id map. Endpoints that do
/// not resolve leave the pointer unset.
pub fn import_graph<S: GraphSink>(
    sink: &mut S,
    parent: NodeRef,
    document: &GraphDocument,
) -> Result<NodeRef> {
    let container =
        sink.create_named_node(Some(parent), MetaType::Graph, CONTAINER_NAME, DIAGRAM_POSITION)?;

    let mut id_to_node: HashMap<ElementId, NodeRef> = HashMap::new();
    let mut collector = EdgeCollector::default();

    for (index, source) in document.nodes.iter().enumerate() {
        let node = sink.create_named_node(
            Some(container),
            MetaType::Node,
            &source.label,
            Position::sequence_default(index),
        )?;
        id_to_node.insert(source.id.clone(), node);

        // The outgoing list takes precedence; the incoming list is only a
        // fallback for vertices that carry no outgoing entry at all.
        if let Some(out) = &source.out_edges {
            collector.collect(&source.id, out, EdgeDirection::Outgoing);
        } else if let Some(incoming) = &source.in_edges {
            collector.collect(&source.id, incoming, EdgeDirection::Incoming);
        }
    }

    debug!(
        "collected {} distinct edges from {} vertices",
        collector.edges.len(),
        document.nodes.len()
    );

    for edge in &collector.edges {
        let edge_node = sink.create_node(Some(container), MetaType::Edge)?;
        sink.set_attribute(edge_node, LABEL_ATTRIBUTE, &edge.label)?;
        sink.set_pointer(edge_node, SRC_POINTER, resolve(&id_to_node, Some(&edge.src)))?;
        sink.set_pointer(edge_node, DST_POINTER, resolve(&id_to_node, edge.dst.as_ref()))?;
    }

    Ok(container)
}

/// Resolve an endpoint id, tolerating unresolved references: the pointer of
/// the edge stays unset and a warning is logged.
fn resolve(id_to_node: &HashMap<ElementId, NodeRef>, id: Option<&ElementId>) -> Option<NodeRef> {
    let id = id?;
    let hit = id_to_node.get(id).copied();
    if hit.is_none() {
        warn!("edge endpoint '{}' does not resolve to an imported node", id);
    }
    hit
}

#[cfg(test)]
mod tests;
