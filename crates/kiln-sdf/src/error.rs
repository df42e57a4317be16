//! Error types for scene editing and shader generation

use thiserror::Error;

use crate::node::NodeId;

/// Result type alias using kiln-sdf's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing a scene graph or assembling a shader
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The id does not belong to this graph
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// The node exists but is of the wrong kind for the requested edit
    #[error("Node '{name}' is not {expected}")]
    WrongKind {
        name: String,
        expected: &'static str,
    },

    /// The edit would make a node its own descendant
    #[error("Attaching '{child}' under '{parent}' would create a cycle")]
    Cycle { parent: String, child: String },

    /// The designated root never gets an owner
    #[error("Root node '{0}' cannot be attached to another operation")]
    RootReparent(String),

    /// Non-finite, non-positive or otherwise out of range value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The shader template does not contain the expected marker
    #[error("Shader template is missing splice point '{0}'")]
    MissingSplicePoint(&'static str),
}
