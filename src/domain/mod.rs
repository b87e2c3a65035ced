// Domain model for droidarch: the architecture graph and what feeds it.

pub mod document;
pub mod entity;
pub mod intent;
pub mod manifest;

pub use document::{Document, BUS_NAME};
pub use entity::{
    Component, Connector, Direction, Endpoint, Entity, EntityId, Interface, Link, Structure,
};
