//! Plugin invocation surface: configuration, the host capabilities the
//! runners depend on, and the two end-to-end import runners.
//!
//! A runner is a strict sequence of resolve input, transform, persist. Any
//! failure short-circuits the remaining steps and surfaces as a non-success
//! result carrying the original error message; nodes already created stay in
//! the working graph (recovery is the host's own transaction facility).

use sysml_import_core::graph::GraphSink;
use sysml_import_core::types::NodeRef;

use crate::document::{GraphDocument, NotationDocument, UmlDocument};
use crate::errors::{Result, SysmlImportError};
use crate::{graph_import, requirement};

/// Commit message handed to the persistence collaborator by the graph runner.
pub const GRAPH_IMPORT_COMMIT: &str = "Graph importer created new model.";
/// Commit message handed to the persistence collaborator by the requirement
/// diagram runner.
pub const REQUIREMENT_IMPORT_COMMIT: &str = "Requirement diagram importer created new model.";

/// Content an asset handle resolves to: raw bytes when running on the
/// server, a pre-parsed object when the browser host already decoded it.
#[derive(Clone, Debug)]
pub enum AssetContent {
    Bytes(Vec<u8>),
    Json(serde_json::Value),
}

/// Capability to resolve an uploaded asset handle to its content.
pub trait AssetResolver {
    fn resolve(&self, handle: &str) -> Result<AssetContent>;
}

/// Capability to persist the mutated model graph.
pub trait Persistence {
    fn save(&mut self, message: &str) -> Result<()>;
}

/// User-facing configuration of one import invocation.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ImportConfig {
    /// Handle of the uploaded model file.
    #[serde(default)]
    pub file: Option<String>,
    /// Handle of the companion notation (layout) file; only the requirement
    /// diagram runner uses it.
    #[serde(default)]
    pub notation_file: Option<String>,
}

/// Outcome reported back to the invoking user.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
pub struct PluginResult {
    pub success: bool,
    pub message: Option<String>,
}

impl PluginResult {
    fn succeeded() -> PluginResult {
        PluginResult {
            success: true,
            message: None,
        }
    }

    fn failed(error: &SysmlImportError) -> PluginResult {
        PluginResult {
            success: false,
            message: Some(error.to_string()),
        }
    }
}

fn decode(content: AssetContent) -> Result<serde_json::Value> {
    match content {
        AssetContent::Bytes(bytes) => Ok(serde_json::from_slice(&bytes)?),
        AssetContent::Json(value) => Ok(value),
    }
}

/// Run the graph importer end to end: resolve input, transform, persist.
pub fn run_graph_import<S, R, P>(
    sink: &mut S,
    active_node: NodeRef,
    resolver: &R,
    persistence: &mut P,
    config: &ImportConfig,
) -> PluginResult
where
    S: GraphSink,
    R: AssetResolver + ?Sized,
    P: Persistence + ?Sized,
{
    match try_graph_import(sink, active_node, resolver, persistence, config) {
        Ok(()) => PluginResult::succeeded(),
        Err(error) => {
            error!("graph import failed: {}", error);
            PluginResult::failed(&error)
        }
    }
}

fn try_graph_import<S, R, P>(
    sink: &mut S,
    active_node: NodeRef,
    resolver: &R,
    persistence: &mut P,
    config: &ImportConfig,
) -> Result<()>
where
    S: GraphSink,
    R: AssetResolver + ?Sized,
    P: Persistence + ?Sized,
{
    let handle = config.file.as_deref().ok_or(SysmlImportError::MissingInput)?;
    let document: GraphDocument = serde_json::from_value(decode(resolver.resolve(handle)?)?)?;
    info!("importing graph document with {} vertices", document.nodes.len());
    graph_import::import_graph(sink, active_node, &document)?;
    persistence.save(GRAPH_IMPORT_COMMIT)?;
    Ok(())
}

/// Run the requirement diagram importer end to end: resolve the model and
/// notation files, transform, persist.
pub fn run_requirement_import<S, R, P>(
    sink: &mut S,
    active_node: NodeRef,
    resolver: &R,
    persistence: &mut P,
    config: &ImportConfig,
) -> PluginResult
where
    S: GraphSink,
    R: AssetResolver + ?Sized,
    P: Persistence + ?Sized,
{
    match try_requirement_import(sink, active_node, resolver, persistence, config) {
        Ok(()) => PluginResult::succeeded(),
        Err(error) => {
            error!("requirement diagram import failed: {}", error);
            PluginResult::failed(&error)
        }
    }
}

fn try_requirement_import<S, R, P>(
    sink: &mut S,
    active_node: NodeRef,
    resolver: &R,
    persistence: &mut P,
    config: &ImportConfig,
) -> Result<()>
where
    S: GraphSink,
    R: AssetResolver + ?Sized,
    P: Persistence + ?Sized,
{
    let model_handle = config.file.as_deref().ok_or(SysmlImportError::MissingInput)?;
    let notation_handle = config
        .notation_file
        .as_deref()
        .ok_or(SysmlImportError::MissingNotation)?;

    let uml = UmlDocument::from_value(decode(resolver.resolve(model_handle)?)?)?;
    let notation: NotationDocument =
        serde_json::from_value(decode(resolver.resolve(notation_handle)?)?)?;

    requirement::build_diagram(sink, active_node, &uml, &notation)?;
    persistence.save(REQUIREMENT_IMPORT_COMMIT)?;
    Ok(())
}
