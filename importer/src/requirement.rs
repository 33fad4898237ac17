//! Importer for Papyrus requirement diagrams: an exported `.uml` model plus
//! its companion `.notation` layout file.
//!
//! The diagram is built in two passes. The element walk creates requirement
//! and comment nodes and defers every typed connection as a pending link;
//! the second pass materializes the pending links once all nodes exist and
//! their external ids can be resolved.

use std::collections::HashMap;

use sysml_import_core::graph::{GraphSink, DST_POINTER, SRC_POINTER};
use sysml_import_core::types::{MetaType, NodeRef, Position, DIAGRAM_POSITION};

use crate::constants::{
    resolve_stereotype, resolve_uml_type, UmlElementKind, MODEL_ELEMENTS_PROFILE_PREFIX,
    NOTATION_HREF_PREFIX, REQUIREMENTS_PROFILE_PREFIX, REQUIREMENT_STEREOTYPE,
};
use crate::document::{
    ElementId, NotationDocument, OneOrMany, OwnedComment, PackagedElement, StereotypeApplication,
    UmlDocument,
};
use crate::errors::{Result, SysmlImportError};

/// Name of the diagram root when the notation file carries none.
const DEFAULT_DIAGRAM_NAME: &str = "RequirementDiagram";

/// A typed connection discovered during the element walk, materialized after
/// all nodes have been created.
#[derive(Clone, Debug, Eq, PartialEq)]
struct PendingLink {
    src: ElementId,
    dst: ElementId,
    kind: MetaType,
}

type StereotypeIndex = HashMap<ElementId, MetaType>;
type PositionIndex = HashMap<ElementId, Position>;

/// Build a requirement diagram under `parent` from the UML model and its
/// notation file.
pub fn build_diagram<S: GraphSink>(
    sink: &mut S,
    parent: NodeRef,
    uml: &UmlDocument,
    notation: &NotationDocument,
) -> Result<NodeRef> {
    let stereotypes = collect_stereotypes(&uml.profile_applications)?;
    let positions = collect_positions(notation);

    let diagram_name = notation.name.as_deref().unwrap_or(DEFAULT_DIAGRAM_NAME);
    let diagram = sink.create_named_node(
        Some(parent),
        MetaType::RequirementDiagram,
        diagram_name,
        DIAGRAM_POSITION,
    )?;

    let mut builder = DiagramBuilder {
        sink,
        diagram,
        stereotypes,
        positions,
        id_to_node: HashMap::new(),
        links: Vec::new(),
    };

    if let Some(elements) = &uml.model.packaged_elements {
        for (index, element) in elements.iter().enumerate() {
            builder.add_packaged_element(element, index)?;
        }
    }
    if let Some(comments) = &uml.model.owned_comments {
        for (index, comment) in comments.iter().enumerate() {
            builder.add_comment(comment, index)?;
        }
    }
    builder.materialize_links()?;

    Ok(diagram)
}

/// Working state of one diagram build; nothing survives the call.
struct DiagramBuilder<'a, S> {
    sink: &'a mut S,
    diagram: NodeRef,
    stereotypes: StereotypeIndex,
    positions: Option<PositionIndex>,
    id_to_node: HashMap<ElementId, NodeRef>,
    links: Vec<PendingLink>,
}

impl<'a, S: GraphSink> DiagramBuilder<'a, S> {
    /// Position from the notation file, or the sequence default for the
    /// element at `index` within its containing collection.
    fn position_for(&self, id: &ElementId, index: usize) -> Position {
        self.positions
            .as_ref()
            .and_then(|positions| positions.get(id).copied())
            .unwrap_or_else(|| Position::sequence_default(index))
    }

    fn add_packaged_element(&mut self, element: &PackagedElement, index: usize) -> Result<()> {
        match resolve_uml_type(&element.xmi_type)? {
            UmlElementKind::Abstraction => {
                let kind = self
                    .stereotypes
                    .get(&element.id)
                    .copied()
                    .ok_or_else(|| SysmlImportError::MissingStereotype(element.id.clone()))?;
                let src = element.client.clone().ok_or_else(|| {
                    SysmlImportError::MissingLinkEndpoint {
                        id: element.id.clone(),
                        endpoint: "client",
                    }
                })?;
                let dst = element.supplier.clone().ok_or_else(|| {
                    SysmlImportError::MissingLinkEndpoint {
                        id: element.id.clone(),
                        endpoint: "supplier",
                    }
                })?;
                self.links.push(PendingLink { src, dst, kind });
            }
            UmlElementKind::Requirement => {
                if !self.id_to_node.contains_key(&element.id) {
                    self.add_requirement(element, index)?;
                }
            }
        }
        Ok(())
    }

    fn add_requirement(&mut self, element: &PackagedElement, index: usize) -> Result<()> {
        let name = element.name.as_deref().unwrap_or_default();
        let position = self.position_for(&element.id, index);
        let node =
            self.sink
                .create_named_node(Some(self.diagram), MetaType::Requirement, name, position)?;
        self.id_to_node.insert(element.id.clone(), node);

        if let Some(nested) = &element.nested_classifiers {
            self.expand_decomposition(element, nested)?;
        }
        Ok(())
    }

    /// Recursively expand a nested decomposition subtree: one requirement
    /// node and one "Decompose" pending link per parent/child pair.
    fn expand_decomposition(
        &mut self,
        parent: &PackagedElement,
        nested: &OneOrMany<PackagedElement>,
    ) -> Result<()> {
        for (index, child) in nested.iter().enumerate() {
            self.links.push(PendingLink {
                src: parent.id.clone(),
                dst: child.id.clone(),
                kind: MetaType::Decompose,
            });
            if !self.id_to_node.contains_key(&child.id) {
                let position = self.position_for(&child.id, index);
                let node = self.sink.create_named_node(
                    Some(self.diagram),
                    MetaType::Requirement,
                    child.name.as_deref().unwrap_or_default(),
                    position,
                )?;
                self.id_to_node.insert(child.id.clone(), node);
            }
            if let Some(grandchildren) = &child.nested_classifiers {
                self.expand_decomposition(child, grandchildren)?;
            }
        }
        Ok(())
    }

    fn add_comment(&mut self, comment: &OwnedComment, index: usize) -> Result<()> {
        let kind = self
            .stereotypes
            .get(&comment.id)
            .copied()
            .unwrap_or(MetaType::Comment);
        let position = self.position_for(&comment.id, index);
        let node = self
            .sink
            .create_named_node(Some(self.diagram), kind, kind.as_ref(), position)?;
        self.id_to_node.insert(comment.id.clone(), node);

        for dst in comment.annotated_element_ids() {
            self.links.push(PendingLink {
                src: comment.id.clone(),
                dst,
                kind: MetaType::CommentLink,
            });
        }
        Ok(())
    }

    /// Create one typed child node per pending link under the diagram root.
    /// Endpoints that were never registered leave the pointer unset.
    fn materialize_links(&mut self) -> Result<()> {
        debug!("materializing {} links", self.links.len());
        for link in &self.links {
            let node = self.sink.create_node(Some(self.diagram), link.kind)?;
            self.sink
                .set_pointer(node, SRC_POINTER, resolve(&self.id_to_node, &link.src))?;
            self.sink
                .set_pointer(node, DST_POINTER, resolve(&self.id_to_node, &link.dst))?;
        }
        Ok(())
    }
}

fn resolve(id_to_node: &HashMap<ElementId, NodeRef>, id: &ElementId) -> Option<NodeRef> {
    let hit = id_to_node.get(id).copied();
    if hit.is_none() {
        warn!("link endpoint '{}' does not resolve to an imported node", id);
    }
    hit
}

/// Scan the top-level siblings of the UML model for stereotype applications,
/// in document order. Connection stereotypes map `base_Abstraction` ids,
/// comment stereotypes map `base_Comment` ids; a duplicate target id is
/// resolved last-wins.
fn collect_stereotypes(
    profile_applications: &serde_json::Map<String, serde_json::Value>,
) -> Result<StereotypeIndex> {
    let mut index = StereotypeIndex::new();
    for (key, value) in profile_applications {
        if let Some(local) = key.strip_prefix(REQUIREMENTS_PROFILE_PREFIX) {
            if local == REQUIREMENT_STEREOTYPE {
                continue;
            }
            let kind = resolve_stereotype(local)?;
            for application in parse_applications(value)?.iter() {
                if let Some(id) = &application.base_abstraction {
                    insert_stereotype(&mut index, id, kind);
                }
            }
        } else if let Some(local) = key.strip_prefix(MODEL_ELEMENTS_PROFILE_PREFIX) {
            let kind = resolve_stereotype(local)?;
            for application in parse_applications(value)?.iter() {
                if let Some(id) = &application.base_comment {
                    insert_stereotype(&mut index, id, kind);
                }
            }
        }
    }
    Ok(index)
}

fn insert_stereotype(index: &mut StereotypeIndex, id: &ElementId, kind: MetaType) {
    if let Some(previous) = index.insert(id.clone(), kind) {
        if previous != kind {
            debug!(
                "stereotype of '{}' redefined from {} to {}",
                id, previous, kind
            );
        }
    }
}

fn parse_applications(value: &serde_json::Value) -> Result<OneOrMany<StereotypeApplication>> {
    Ok(serde_json::from_value(value.clone())?)
}

/// Build the position index from the notation file, or `None` when it has no
/// navigable children (the caller then falls back to sequence defaults).
fn collect_positions(notation: &NotationDocument) -> Option<PositionIndex> {
    let children = notation.children.as_ref()?;
    let mut index = PositionIndex::new();
    for child in children {
        let href = child.element.as_ref().and_then(|e| e.href.as_deref());
        if let (Some(href), Some(layout)) = (href, child.layout_constraint.as_ref()) {
            let id = href.strip_prefix(NOTATION_HREF_PREFIX).unwrap_or(href);
            index.insert(
                ElementId::from(id),
                Position {
                    x: layout.x,
                    y: layout.y,
                },
            );
        }
    }
    Some(index)
}
