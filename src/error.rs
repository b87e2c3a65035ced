//! Error types for droidarch.
//!
//! Every variant here is fatal for the extraction run. Recoverable problems
//! are reported as [`Diagnostic`](crate::application::Diagnostic) values instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::entity::{Direction, EntityId};

#[derive(Error, Debug)]
pub enum ArchError {
    #[error("could not read \"{}\": {source}", path.display())]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed manifest \"{}\": {message}", path.display())]
    MalformedManifest { path: PathBuf, message: String },

    #[error("<{element}> in \"{}\" is missing required attribute `{attribute}`", path.display())]
    MissingAttribute {
        path: PathBuf,
        element: String,
        attribute: String,
    },

    #[error("invalid interface direction `{0}` (expected none, in, out or in-out)")]
    InvalidDirection(String),

    #[error("interface {interface} has direction {actual}, expected {expected}")]
    WrongDirection {
        interface: EntityId,
        expected: Direction,
        actual: Direction,
    },

    #[error("no entity with id {0} in this document")]
    UnknownEntity(EntityId),

    #[error("link {link} (\"{name}\") has no {side} interface")]
    MissingLinkEndpoint {
        link: EntityId,
        name: String,
        side: &'static str,
    },

    #[error("link {link} (\"{name}\") {side} interface {interface} is not in this document")]
    DanglingLinkEndpoint {
        link: EntityId,
        name: String,
        side: &'static str,
        interface: EntityId,
    },

    #[error("id {0} is already used in this document")]
    DuplicateId(EntityId),

    #[error("document has no message bus to remove")]
    NoBus,

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArchError>;
