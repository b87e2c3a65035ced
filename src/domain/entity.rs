//! Architecture entities.
//!
//! Components and connectors own their interfaces. An interface only points
//! back at its owner by id, so there are no reference cycles and the owning
//! [`Document`](super::document::Document) is the place to resolve it.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::{ArchError, Result};

/// Globally unique identity assigned to every entity at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(Uuid);

impl EntityId {
    pub fn new() -> Self {
        EntityId(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of an interface relative to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    None,
    In,
    Out,
    InOut,
}

impl Direction {
    /// Token used in the xADL `direction` attribute. `None` is omitted there.
    pub fn xadl_token(&self) -> Option<&'static str> {
        match self {
            Direction::None => None,
            Direction::In => Some("in"),
            Direction::Out => Some("out"),
            Direction::InOut => Some("in-out"),
        }
    }
}

impl FromStr for Direction {
    type Err = ArchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Direction::None),
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            "in-out" | "inout" | "in_out" => Ok(Direction::InOut),
            _ => Err(ArchError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.xadl_token().unwrap_or("none"))
    }
}

/// Shared capability of everything that can appear in an architecture.
pub trait Structure {
    fn id(&self) -> EntityId;
    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);
}

macro_rules! impl_structure {
    ($($ty:ty),*) => {
        $(impl Structure for $ty {
            fn id(&self) -> EntityId {
                self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn set_name(&mut self, name: String) {
                self.name = name;
            }
        })*
    };
}

impl_structure!(Interface, Component, Connector, Link);

// ============================================================================
// Interface
// ============================================================================

/// A directional attachment point on a component or connector.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    id: EntityId,
    name: String,
    direction: Direction,
    parent: Option<EntityId>,
}

impl Interface {
    pub fn new(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            direction,
            parent: None,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Set the direction from its textual form, rejecting unknown values.
    pub fn set_direction_str(&mut self, direction: &str) -> Result<()> {
        self.set_direction(direction.parse()?);
        Ok(())
    }

    /// Id of the component or connector this interface is attached to.
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    fn attach(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    fn expect_direction(&self, expected: Direction) -> Result<()> {
        if self.direction == expected {
            Ok(())
        } else {
            Err(ArchError::WrongDirection {
                interface: self.id,
                expected,
                actual: self.direction,
            })
        }
    }
}

// ============================================================================
// Component
// ============================================================================

/// A named unit of application functionality.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    id: EntityId,
    name: String,
    interfaces: Vec<Interface>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            interfaces: Vec::new(),
        }
    }

    /// The last dot-separated segment of the component name.
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn interface(&self, id: EntityId) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.id == id)
    }

    /// Attach an interface of any direction. Re-adding an attached id is a no-op.
    pub fn add_interface(&mut self, interface: Interface) -> EntityId {
        let id = interface.id;
        if self.interface(id).is_none() {
            self.interfaces.push(interface.attach(self.id));
        }
        id
    }

    pub fn remove_interface(&mut self, id: EntityId) -> Option<Interface> {
        let pos = self.interfaces.iter().position(|i| i.id == id)?;
        let mut removed = self.interfaces.remove(pos);
        removed.parent = None;
        Some(removed)
    }

    /// First interface with direction `In`. Further inbound interfaces are
    /// never returned here.
    pub fn interface_in(&self) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.direction == Direction::In)
    }

    /// First interface with direction `Out`.
    pub fn interface_out(&self) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.direction == Direction::Out)
    }

    pub fn add_interface_in(&mut self, interface: Interface) -> Result<EntityId> {
        interface.expect_direction(Direction::In)?;
        Ok(self.add_interface(interface))
    }

    pub fn add_interface_out(&mut self, interface: Interface) -> Result<EntityId> {
        interface.expect_direction(Direction::Out)?;
        Ok(self.add_interface(interface))
    }
}

// ============================================================================
// Connector
// ============================================================================

/// A communication medium with exactly one inbound and one outbound interface.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    id: EntityId,
    name: String,
    interface_in: Interface,
    interface_out: Interface,
}

impl Connector {
    pub fn new(name: impl Into<String>) -> Self {
        let id = EntityId::new();
        let name = name.into();
        Self {
            interface_in: Interface::new(format!("{} Interface In", name), Direction::In).attach(id),
            interface_out: Interface::new(format!("{} Interface Out", name), Direction::Out)
                .attach(id),
            id,
            name,
        }
    }

    pub fn interface_in(&self) -> &Interface {
        &self.interface_in
    }

    pub fn interface_out(&self) -> &Interface {
        &self.interface_out
    }

    /// Both interfaces, inbound first.
    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> {
        [&self.interface_in, &self.interface_out].into_iter()
    }

    pub fn interface(&self, id: EntityId) -> Option<&Interface> {
        self.interfaces().find(|i| i.id == id)
    }

    /// Replace the inbound slot, returning the interface it held.
    pub fn add_interface_in(&mut self, interface: Interface) -> Result<Interface> {
        interface.expect_direction(Direction::In)?;
        let mut old = std::mem::replace(&mut self.interface_in, interface.attach(self.id));
        old.parent = None;
        Ok(old)
    }

    /// Replace the outbound slot, returning the interface it held.
    pub fn add_interface_out(&mut self, interface: Interface) -> Result<Interface> {
        interface.expect_direction(Direction::Out)?;
        let mut old = std::mem::replace(&mut self.interface_out, interface.attach(self.id));
        old.parent = None;
        Ok(old)
    }
}

// ============================================================================
// Link
// ============================================================================

/// A directed edge from an outbound interface to an inbound interface.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    id: EntityId,
    name: String,
    start: Option<EntityId>,
    end: Option<EntityId>,
}

impl Link {
    /// A link with no endpoints yet. It cannot be rendered until both are set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            start: None,
            end: None,
        }
    }

    pub fn between(name: impl Into<String>, start: &Interface, end: &Interface) -> Result<Self> {
        let mut link = Self::new(name);
        link.set_start(start)?;
        link.set_end(end)?;
        Ok(link)
    }

    pub fn start(&self) -> Option<EntityId> {
        self.start
    }

    pub fn end(&self) -> Option<EntityId> {
        self.end
    }

    pub fn set_start(&mut self, interface: &Interface) -> Result<()> {
        interface.expect_direction(Direction::Out)?;
        self.start = Some(interface.id);
        Ok(())
    }

    pub fn set_end(&mut self, interface: &Interface) -> Result<()> {
        interface.expect_direction(Direction::In)?;
        self.end = Some(interface.id);
        Ok(())
    }

    /// Both endpoint ids, or the error naming the missing side.
    pub fn endpoints(&self) -> Result<(EntityId, EntityId)> {
        let missing = |side| ArchError::MissingLinkEndpoint {
            link: self.id,
            name: self.name.clone(),
            side,
        };
        let start = self.start.ok_or_else(|| missing("start"))?;
        let end = self.end.ok_or_else(|| missing("end"))?;
        Ok((start, end))
    }
}

// ============================================================================
// Entity / Endpoint
// ============================================================================

/// A top-level member of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Component(Component),
    Connector(Connector),
    Link(Link),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Component(c) => c.id,
            Entity::Connector(c) => c.id,
            Entity::Link(l) => l.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Component(c) => &c.name,
            Entity::Connector(c) => &c.name,
            Entity::Link(l) => &l.name,
        }
    }

    /// Interfaces carried by this entity (none for links).
    pub fn interfaces(&self) -> Vec<&Interface> {
        match self {
            Entity::Component(c) => c.interfaces.iter().collect(),
            Entity::Connector(c) => c.interfaces().collect(),
            Entity::Link(_) => Vec::new(),
        }
    }
}

/// One side of a link request: a bare interface, or an entity whose
/// interface should be looked up (or created) for that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Component(EntityId),
    Connector(EntityId),
    Interface(EntityId),
}

impl From<&Component> for Endpoint {
    fn from(c: &Component) -> Self {
        Endpoint::Component(c.id)
    }
}

impl From<&Connector> for Endpoint {
    fn from(c: &Connector) -> Self {
        Endpoint::Connector(c.id)
    }
}

impl From<&Interface> for Endpoint {
    fn from(i: &Interface) -> Self {
        Endpoint::Interface(i.id)
    }
}

/// Substring after the last `.` of a possibly qualified name.
pub fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!("in".parse::<Direction>().unwrap(), Direction::In);
        assert_eq!("OUT".parse::<Direction>().unwrap(), Direction::Out);
        assert_eq!("in-out".parse::<Direction>().unwrap(), Direction::InOut);
        assert_eq!("none".parse::<Direction>().unwrap(), Direction::None);
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(ArchError::InvalidDirection(_))
        ));
    }

    #[test]
    fn test_set_direction_str_rejects_unknown_value() {
        let mut iface = Interface::new("i", Direction::In);
        assert!(iface.set_direction_str("upward").is_err());
        assert_eq!(iface.direction(), Direction::In);
        iface.set_direction_str("in-out").unwrap();
        assert_eq!(iface.direction(), Direction::InOut);
        iface.set_direction(Direction::None);
        assert_eq!(iface.direction(), Direction::None);
    }

    #[test]
    fn test_component_add_remove_interface() {
        let mut comp = Component::new("com.app.Main");
        let iface = Interface::new("Main In", Direction::In);
        let id = comp.add_interface(iface.clone());

        assert_eq!(comp.interfaces().len(), 1);
        assert_eq!(comp.interfaces()[0].parent(), Some(comp.id()));

        // same interface again is membership, not count
        comp.add_interface(iface);
        assert_eq!(comp.interfaces().len(), 1);

        let removed = comp.remove_interface(id).unwrap();
        assert_eq!(removed.parent(), None);
        assert!(comp.interfaces().is_empty());
    }

    #[test]
    fn test_component_first_match_accessors() {
        let mut comp = Component::new("Main");
        assert!(comp.interface_in().is_none());
        assert!(comp.interface_out().is_none());

        let first = comp.add_interface(Interface::new("first", Direction::In));
        comp.add_interface(Interface::new("second", Direction::In));
        let out = comp.add_interface(Interface::new("out", Direction::Out));

        assert_eq!(comp.interface_in().unwrap().id(), first);
        assert_eq!(comp.interface_out().unwrap().id(), out);
    }

    #[test]
    fn test_component_checked_slots() {
        let mut comp = Component::new("Main");
        assert!(comp.add_interface_out(Interface::new("x", Direction::In)).is_err());
        assert!(comp.add_interface_in(Interface::new("x", Direction::Out)).is_err());
        assert!(comp.interfaces().is_empty());
        assert!(comp.add_interface_in(Interface::new("x", Direction::In)).is_ok());
    }

    #[test]
    fn test_connector_has_placeholder_interfaces() {
        let conn = Connector::new("Bus");
        assert_eq!(conn.interface_in().name(), "Bus Interface In");
        assert_eq!(conn.interface_out().name(), "Bus Interface Out");
        assert_eq!(conn.interface_in().direction(), Direction::In);
        assert_eq!(conn.interface_out().direction(), Direction::Out);
        assert_eq!(conn.interface_in().parent(), Some(conn.id()));
    }

    #[test]
    fn test_connector_replaces_slot() {
        let mut conn = Connector::new("Bus");
        let replacement = Interface::new("new out", Direction::Out);
        let new_id = replacement.id();
        let old = conn.add_interface_out(replacement).unwrap();

        assert_eq!(old.name(), "Bus Interface Out");
        assert_eq!(conn.interface_out().id(), new_id);
        assert_eq!(conn.interfaces().count(), 2);
        assert!(conn.add_interface_in(Interface::new("bad", Direction::Out)).is_err());
    }

    #[test]
    fn test_link_endpoint_directions() {
        let out = Interface::new("out", Direction::Out);
        let inn = Interface::new("in", Direction::In);

        assert!(Link::between("bad", &inn, &out).is_err());
        let link = Link::between("ok", &out, &inn).unwrap();
        assert_eq!(link.endpoints().unwrap(), (out.id(), inn.id()));
    }

    #[test]
    fn test_link_without_endpoints_fails() {
        let link = Link::new("dangling");
        match link.endpoints() {
            Err(ArchError::MissingLinkEndpoint { side, .. }) => assert_eq!(side, "start"),
            other => panic!("expected missing endpoint, got {:?}", other),
        }
    }

    #[test]
    fn test_rename_keeps_id() {
        let mut comp = Component::new("Old");
        let id = comp.id();
        comp.set_name("New".to_string());
        assert_eq!(comp.name(), "New");
        assert_eq!(comp.id(), id);
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(simple_name("com.app.Main"), "Main");
        assert_eq!(simple_name("Main"), "Main");
        assert_eq!(Component::new("org.x.Y").simple_name(), "Y");
    }
}
