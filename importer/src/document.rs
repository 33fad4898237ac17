//! Serde data model of the external documents handled by the importers: the
//! vertex/edge graph format, the exported UML model with its profile
//! applications, and the companion notation (layout) file.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserializer, Error as DeError};
use serde::Deserialize as DeserializeTrait;

use crate::constants::UML_MODEL_KEY;
use crate::errors::{Result, SysmlImportError};

/// Identifier of an element in an external document.
///
/// The graph format uses JSON numbers, the UML export uses strings; both are
/// normalized to their textual form so that cross-references (edge endpoints,
/// `@annotatedElements` lists) compare correctly.
#[derive(Serialize, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> ElementId {
        ElementId(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> ElementId {
        ElementId(value)
    }
}

impl<'de> DeserializeTrait<'de> for ElementId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<ElementId, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(i64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(ElementId(n.to_string())),
            Repr::Text(t) => Ok(ElementId(t)),
        }
    }
}

/// A collection that external documents collapse to a bare object when it has
/// exactly one entry.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::Many(items) => items.iter(),
            OneOrMany::One(item) => std::slice::from_ref(item).iter(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OneOrMany::Many(items) => items.len(),
            OneOrMany::One(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Document consumed by the Graph Importer: an ordered sequence of vertices
/// with embedded outgoing/incoming edge lists.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<SourceNode>,
}

/// One vertex of a [`GraphDocument`].
#[derive(Deserialize, Clone, Debug)]
pub struct SourceNode {
    pub id: ElementId,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "outE")]
    pub out_edges: Option<EdgeLists>,
    #[serde(default, rename = "inE")]
    pub in_edges: Option<EdgeLists>,
}

/// Edge lists of a vertex, keyed by edge-kind name.
pub type EdgeLists = BTreeMap<String, Vec<EdgeEndpoint>>;

/// One entry of an edge list: the edge id and the opposite endpoint. An
/// outgoing list carries `inV`, an incoming list carries `outV`.
#[derive(Deserialize, Clone, Debug)]
pub struct EdgeEndpoint {
    pub id: ElementId,
    #[serde(default, rename = "inV")]
    pub in_v: Option<ElementId>,
    #[serde(default, rename = "outV")]
    pub out_v: Option<ElementId>,
}

/// Parsed `.uml` export: the model object plus every top-level sibling key in
/// document order. The siblings outside the UML namespace are the stereotype
/// applications of the applied profiles.
#[derive(Clone, Debug)]
pub struct UmlDocument {
    pub model: UmlModel,
    pub profile_applications: serde_json::Map<String, serde_json::Value>,
}

impl UmlDocument {
    /// Split a raw document into the UML model and its sibling keys.
    pub fn from_value(value: serde_json::Value) -> Result<UmlDocument> {
        let mut root = match value {
            serde_json::Value::Object(map) => map,
            _ => return Err(SysmlImportError::MissingModelRoot(UML_MODEL_KEY)),
        };
        let model_value = root
            .remove(UML_MODEL_KEY)
            .ok_or(SysmlImportError::MissingModelRoot(UML_MODEL_KEY))?;
        let model = serde_json::from_value(model_value)?;
        Ok(UmlDocument {
            model,
            profile_applications: root,
        })
    }
}

/// The UML model object of an exported `.uml` document.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct UmlModel {
    #[serde(default, rename = "packagedElement")]
    pub packaged_elements: Option<OneOrMany<PackagedElement>>,
    #[serde(default, rename = "ownedComment")]
    pub owned_comments: Option<OneOrMany<OwnedComment>>,
}

/// One `packagedElement` entry: either a requirement class (possibly with a
/// nested decomposition subtree) or an abstraction connecting two elements.
#[derive(Deserialize, Clone, Debug)]
pub struct PackagedElement {
    #[serde(rename = "@http://www.omg.org/spec/XMI/20131001:id")]
    pub id: ElementId,
    #[serde(rename = "@http://www.omg.org/spec/XMI/20131001:type")]
    pub xmi_type: String,
    #[serde(default, rename = "@name")]
    pub name: Option<String>,
    #[serde(default, rename = "@client")]
    pub client: Option<ElementId>,
    #[serde(default, rename = "@supplier")]
    pub supplier: Option<ElementId>,
    #[serde(default, rename = "nestedClassifier")]
    pub nested_classifiers: Option<Box<OneOrMany<PackagedElement>>>,
}

/// One `ownedComment` entry of the UML model.
#[derive(Deserialize, Clone, Debug)]
pub struct OwnedComment {
    #[serde(rename = "@http://www.omg.org/spec/XMI/20131001:id")]
    pub id: ElementId,
    #[serde(default, rename = "@annotatedElements")]
    pub annotated_elements: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl OwnedComment {
    /// Ids of the elements this comment annotates (space-separated list).
    pub fn annotated_element_ids(&self) -> Vec<ElementId> {
        self.annotated_elements
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
            .map(ElementId::from)
            .collect()
    }
}

/// One stereotype application entry of an applied profile.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct StereotypeApplication {
    #[serde(default, rename = "@base_Abstraction")]
    pub base_abstraction: Option<ElementId>,
    #[serde(default, rename = "@base_Comment")]
    pub base_comment: Option<ElementId>,
}

/// The companion notation file: diagram name and layout of the diagram
/// children, keyed by element reference.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct NotationDocument {
    #[serde(default, rename = "@name")]
    pub name: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<NotationChild>>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct NotationChild {
    #[serde(default)]
    pub element: Option<NotationElement>,
    #[serde(default, rename = "layoutConstraint")]
    pub layout_constraint: Option<LayoutConstraint>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct NotationElement {
    #[serde(default, rename = "@href")]
    pub href: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct LayoutConstraint {
    #[serde(default, rename = "@x", deserialize_with = "coordinate")]
    pub x: i64,
    #[serde(default, rename = "@y", deserialize_with = "coordinate")]
    pub y: i64,
}

/// Layout coordinates appear both as JSON numbers and as strings, depending
/// on the exporting tool version.
fn coordinate<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(i64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(n) => Ok(n),
        Repr::Text(t) => t.trim().parse().map_err(DeError::custom),
    }
}
