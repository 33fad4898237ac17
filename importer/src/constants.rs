//! Shared constants of the external Papyrus/XMI document formats and the
//! lookup table from external type names to internal meta-types.

use std::collections::HashMap;

use sysml_import_core::types::MetaType;

use crate::errors::{Result, SysmlImportError};

/// Prefix the XML-to-JSON conversion puts in front of XMI attribute keys.
pub const XMI_ATTR_PREFIX: &str = "@http://www.omg.org/spec/XMI/20131001:";

/// Top-level key of the UML model object inside an exported `.uml` document.
pub const UML_MODEL_KEY: &str = "http://www.eclipse.org/uml2/5.0.0/UML:Model";

/// Namespace prefix of connection stereotype applications (requirement links).
pub const REQUIREMENTS_PROFILE_PREFIX: &str =
    "http://www.eclipse.org/papyrus/0.7.0/SysML/Requirements:";

/// Namespace prefix of comment stereotype applications.
pub const MODEL_ELEMENTS_PROFILE_PREFIX: &str =
    "http://www.eclipse.org/papyrus/0.7.0/SysML/ModelElements:";

/// The `Requirement` stereotype marks `uml:Class` elements themselves, not
/// connections between them, and is skipped by the stereotype scan.
pub const REQUIREMENT_STEREOTYPE: &str = "Requirement";

/// Prefix of element references inside the companion notation file.
pub const NOTATION_HREF_PREFIX: &str = "model.uml#";

/// Internal kind a `packagedElement` XMI type resolves to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum UmlElementKind {
    /// A requirement class, materialized as a node in the diagram.
    Requirement,
    /// A generic UML relationship, deferred until its stereotype is known.
    Abstraction,
}

lazy_static! {
    /// Lookup table from the XMI type of a packaged element to its internal kind.
    pub static ref UML_TO_META: HashMap<&'static str, UmlElementKind> = {
        let mut m = HashMap::new();
        m.insert("uml:Class", UmlElementKind::Requirement);
        m.insert("uml:Abstraction", UmlElementKind::Abstraction);
        m
    };
}

/// Resolve the XMI type of a packaged element, rejecting unmapped types.
pub fn resolve_uml_type(xmi_type: &str) -> Result<UmlElementKind> {
    UML_TO_META
        .get(xmi_type)
        .copied()
        .ok_or_else(|| SysmlImportError::UnknownElementType(xmi_type.to_string()))
}

/// Resolve a prefix-stripped stereotype name to the meta-type it stands for.
/// Only link and comment kinds are valid stereotype targets.
pub fn resolve_stereotype(local_name: &str) -> Result<MetaType> {
    local_name
        .parse::<MetaType>()
        .ok()
        .filter(|kind| kind.is_link() || kind.is_comment())
        .ok_or_else(|| SysmlImportError::UnknownStereotype(local_name.to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn uml_types_resolve_to_their_internal_kind() {
        assert_eq!(
            UmlElementKind::Requirement,
            resolve_uml_type("uml:Class").unwrap()
        );
        assert_eq!(
            UmlElementKind::Abstraction,
            resolve_uml_type("uml:Abstraction").unwrap()
        );
    }

    #[test]
    fn unmapped_uml_type_is_rejected() {
        assert!(matches!(
            resolve_uml_type("uml:Component"),
            Err(SysmlImportError::UnknownElementType(t)) if t == "uml:Component"
        ));
    }

    #[test]
    fn stereotype_names_resolve_to_link_and_comment_kinds() {
        assert_eq!(MetaType::Satisfy, resolve_stereotype("Satisfy").unwrap());
        assert_eq!(
            MetaType::DeriveReqt,
            resolve_stereotype("DeriveReqt").unwrap()
        );
        assert_eq!(MetaType::Rationale, resolve_stereotype("Rationale").unwrap());
    }

    #[test]
    fn non_stereotype_meta_types_are_rejected() {
        // "Graph" is a valid meta-type but never a stereotype name.
        assert!(resolve_stereotype("Graph").is_err());
        assert!(resolve_stereotype("Banana").is_err());
    }
}
