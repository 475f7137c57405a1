pub mod editing;
pub mod html;
pub mod models;
pub mod schema;

// Re-export key types for easier usage
pub use editing::{Cmd, Document, MediaNode, Node, NodeBody, NodeId, Patch};
pub use models::{AspectRatio, Dimension, MediaAttrs, MediaKind, TextAlign};
pub use schema::{MediaOptions, NodeSpec, SchemaError, SchemaSet, SourceGate};
