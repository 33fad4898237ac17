#![warn(clippy::panic)]
#![warn(clippy::expect_used)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate lazy_static;

pub mod constants;
pub mod document;
pub mod errors;
pub mod graph_import;
pub mod plugin;
pub mod requirement;

pub use graph_import::import_graph;
pub use plugin::{run_graph_import, run_requirement_import};
pub use requirement::build_diagram;
