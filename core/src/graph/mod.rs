//! The graph-sink capability of the host model and an in-memory reference
//! implementation of it.

use std::collections::BTreeMap;

use crate::errors::{Result, SysmlImportCoreError};
use crate::types::{MetaType, NodeRef, Position};

/// Name of the attribute holding the display name of a node.
pub const NAME_ATTRIBUTE: &str = "name";
/// Name of the registry entry holding the diagram position of a node.
pub const POSITION_KEY: &str = "position";
/// Pointer name of the source endpoint of a link node.
pub const SRC_POINTER: &str = "src";
/// Pointer name of the target endpoint of a link node.
pub const DST_POINTER: &str = "dst";

/// Encode a position the way the host stores it in the node registry.
pub fn position_value(pos: Position) -> serde_json::Value {
    serde_json::json!({"x": pos.x, "y": pos.y})
}

/// Capability interface to the host model graph.
///
/// The import pipelines are pure transforms from external documents to calls
/// on this trait; they never delete or re-read what they created. A real host
/// binds this to its own storage engine, tests use [`MemoryGraph`].
pub trait GraphSink {
    /// Create a new node of the given base meta-type under `parent`
    /// (`None` creates a root node).
    fn create_node(&mut self, parent: Option<NodeRef>, base: MetaType) -> Result<NodeRef>;

    /// Set a named attribute on an existing node.
    fn set_attribute(&mut self, node: NodeRef, name: &str, value: &str) -> Result<()>;

    /// Set a named registry entry on an existing node.
    fn set_registry(&mut self, node: NodeRef, key: &str, value: serde_json::Value) -> Result<()>;

    /// Set a named pointer of `node` to another node. A `None` target records
    /// the pointer as unset, which is how unresolved link endpoints are
    /// represented.
    fn set_pointer(&mut self, node: NodeRef, name: &str, target: Option<NodeRef>) -> Result<()>;

    /// Create a child node with its display name and position set. This is
    /// the single node-construction routine shared by all importers.
    fn create_named_node(
        &mut self,
        parent: Option<NodeRef>,
        base: MetaType,
        name: &str,
        pos: Position,
    ) -> Result<NodeRef> {
        let node = self.create_node(parent, base)?;
        self.set_attribute(node, NAME_ATTRIBUTE, name)?;
        self.set_registry(node, POSITION_KEY, position_value(pos))?;
        Ok(node)
    }
}

/// Everything recorded for a single node created through the sink.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NodeData {
    pub base: MetaType,
    pub parent: Option<NodeRef>,
    pub attributes: BTreeMap<String, String>,
    pub registry: BTreeMap<String, serde_json::Value>,
    pub pointers: BTreeMap<String, Option<NodeRef>>,
}

impl NodeData {
    fn new(base: MetaType, parent: Option<NodeRef>) -> NodeData {
        NodeData {
            base,
            parent,
            attributes: BTreeMap::new(),
            registry: BTreeMap::new(),
            pointers: BTreeMap::new(),
        }
    }

    /// Display name of the node, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.attributes.get(NAME_ATTRIBUTE).map(String::as_str)
    }
}

/// In-memory [`GraphSink`] that records the constructed graph and supports
/// inspecting it afterwards.
#[derive(Default, Debug, Clone)]
pub struct MemoryGraph {
    nodes: BTreeMap<NodeRef, NodeData>,
    next_ref: NodeRef,
}

impl MemoryGraph {
    pub fn new() -> MemoryGraph {
        MemoryGraph::default()
    }

    pub fn node(&self, node: NodeRef) -> Option<&NodeData> {
        self.nodes.get(&node)
    }

    fn node_mut(&mut self, node: NodeRef) -> Result<&mut NodeData> {
        self.nodes
            .get_mut(&node)
            .ok_or(SysmlImportCoreError::InvalidNodeReference(node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct children of `parent` in creation order.
    pub fn children(&self, parent: NodeRef) -> Vec<NodeRef> {
        self.nodes
            .iter()
            .filter(|(_, data)| data.parent == Some(parent))
            .map(|(node, _)| *node)
            .collect()
    }

    /// Direct children of `parent` with the given base type, in creation order.
    pub fn children_of_type(&self, parent: NodeRef, base: MetaType) -> Vec<NodeRef> {
        self.nodes
            .iter()
            .filter(|(_, data)| data.parent == Some(parent) && data.base == base)
            .map(|(node, _)| *node)
            .collect()
    }
}

impl GraphSink for MemoryGraph {
    fn create_node(&mut self, parent: Option<NodeRef>, base: MetaType) -> Result<NodeRef> {
        if let Some(parent) = parent {
            if !self.nodes.contains_key(&parent) {
                return Err(SysmlImportCoreError::InvalidNodeReference(parent));
            }
        }
        let node = self.next_ref;
        self.next_ref += 1;
        trace!("creating node {} with base {}", node, base);
        self.nodes.insert(node, NodeData::new(base, parent));
        Ok(node)
    }

    fn set_attribute(&mut self, node: NodeRef, name: &str, value: &str) -> Result<()> {
        self.node_mut(node)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_registry(&mut self, node: NodeRef, key: &str, value: serde_json::Value) -> Result<()> {
        self.node_mut(node)?.registry.insert(key.to_string(), value);
        Ok(())
    }

    fn set_pointer(&mut self, node: NodeRef, name: &str, target: Option<NodeRef>) -> Result<()> {
        if let Some(target) = target {
            if !self.nodes.contains_key(&target) {
                return Err(SysmlImportCoreError::InvalidNodeReference(target));
            }
        }
        self.node_mut(node)?.pointers.insert(name.to_string(), target);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
