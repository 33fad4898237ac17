use std::fmt;

use strum_macros::{AsRefStr, EnumIter, EnumString};

/// Unique internal identifier for a node created through a
/// [`GraphSink`](crate::graph::GraphSink).
pub type NodeRef = u64;

/// Diagram position hint of a node, stored in its `position` registry entry.
#[derive(Serialize, Deserialize, Default, Eq, PartialEq, Clone, Copy, Debug, Hash)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

/// Position given to diagram container nodes.
pub const DIAGRAM_POSITION: Position = Position { x: 200, y: 200 };

impl Position {
    /// Fallback layout for the element at `index` within its containing
    /// collection, used when the notation file carries no entry for it.
    pub fn sequence_default(index: usize) -> Position {
        Position {
            x: 50 + 100 * index as i64,
            y: 200,
        }
    }
}

/// Meta-types of the host model that imported elements are instantiated from.
///
/// Every external type name is mapped to one of these variants before any
/// node is created, so an unmapped name is rejected by the importer instead
/// of being carried into the host graph as an unknown base type.
#[derive(
    Serialize,
    Deserialize,
    AsRefStr,
    EnumIter,
    EnumString,
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    PartialOrd,
    Ord,
    Hash,
)]
pub enum MetaType {
    // Container and plain graph elements.
    Graph,
    Node,
    Edge,
    // Requirement diagram elements.
    RequirementDiagram,
    Requirement,
    Comment,
    Rationale,
    Problem,
    // Link kinds, resolved from stereotype applications or from the
    // structure of the source document.
    Satisfy,
    Verify,
    DeriveReqt,
    Refine,
    Trace,
    Copy,
    Decompose,
    CommentLink,
}

impl MetaType {
    /// `true` for kinds that connect two other nodes via `src`/`dst` pointers.
    pub fn is_link(&self) -> bool {
        matches!(
            self,
            MetaType::Edge
                | MetaType::Satisfy
                | MetaType::Verify
                | MetaType::DeriveReqt
                | MetaType::Refine
                | MetaType::Trace
                | MetaType::Copy
                | MetaType::Decompose
                | MetaType::CommentLink
        )
    }

    /// `true` for kinds a comment element can be instantiated as.
    pub fn is_comment(&self) -> bool {
        matches!(self, MetaType::Comment | MetaType::Rationale | MetaType::Problem)
    }
}

impl fmt::Display for MetaType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}
