use thiserror::Error;

use crate::types::NodeRef;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SysmlImportCoreError {
    #[error("node reference {0} does not exist in the constructed graph")]
    InvalidNodeReference(NodeRef),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, SysmlImportCoreError>;
