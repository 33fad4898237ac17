use sysml_import_core::errors::SysmlImportCoreError;
use thiserror::Error;

use crate::document::ElementId;

pub type Result<T> = std::result::Result<T, SysmlImportError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SysmlImportError {
    #[error(transparent)]
    Core(#[from] SysmlImportCoreError),
    #[error("no model file provided")]
    MissingInput,
    #[error("no notation file provided")]
    MissingNotation,
    #[error("could not decode input as JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("document contains no '{0}' object")]
    MissingModelRoot(&'static str),
    #[error("unknown element type '{0}'")]
    UnknownElementType(String),
    #[error("unknown stereotype '{0}'")]
    UnknownStereotype(String),
    #[error("abstraction '{0}' has no stereotype application")]
    MissingStereotype(ElementId),
    #[error("abstraction '{id}' is missing its '{endpoint}' endpoint")]
    MissingLinkEndpoint {
        id: ElementId,
        endpoint: &'static str,
    },
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
