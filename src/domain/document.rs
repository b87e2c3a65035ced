//! Document aggregate.
//!
//! Owns every component, connector and link of one architecture. Entities are
//! kept in insertion order with an id index beside them, so iteration (and
//! therefore export) is reproducible for identical input.

use std::collections::{HashMap, HashSet};

use crate::domain::entity::{
    simple_name, Component, Connector, Direction, Endpoint, Entity, EntityId, Interface, Link,
    Structure,
};
use crate::error::{ArchError, Result};

/// Name of the shared connector implicit intents are routed through.
pub const BUS_NAME: &str = "Implicit Message Bus";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Start,
    End,
}

impl Side {
    fn direction(self) -> Direction {
        match self {
            Side::Start => Direction::Out,
            Side::End => Direction::In,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Side::Start => "Out",
            Side::End => "In",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    structure_id: EntityId,
    name: String,
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
    bus: Option<EntityId>,
}

impl Document {
    /// An empty architecture whose top-level structure is called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            structure_id: EntityId::new(),
            name: name.into(),
            entities: Vec::new(),
            index: HashMap::new(),
            bus: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the top-level structure element. Fixed for the document's lifetime.
    pub fn structure_id(&self) -> EntityId {
        self.structure_id
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether `id` is taken by the structure, an entity or an interface.
    pub fn contains(&self, id: EntityId) -> bool {
        id == self.structure_id || self.index.contains_key(&id) || self.interface(id).is_some()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&pos| &self.entities[pos])
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let pos = *self.index.get(&id)?;
        self.entities.get_mut(pos)
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Component(c) => Some(c),
            _ => None,
        })
    }

    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Connector(c) => Some(c),
            _ => None,
        })
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Link(l) => Some(l),
            _ => None,
        })
    }

    pub fn component(&self, id: EntityId) -> Option<&Component> {
        match self.entity(id)? {
            Entity::Component(c) => Some(c),
            _ => None,
        }
    }

    fn component_mut(&mut self, id: EntityId) -> Option<&mut Component> {
        match self.entity_mut(id)? {
            Entity::Component(c) => Some(c),
            _ => None,
        }
    }

    pub fn connector(&self, id: EntityId) -> Option<&Connector> {
        match self.entity(id)? {
            Entity::Connector(c) => Some(c),
            _ => None,
        }
    }

    pub fn link(&self, id: EntityId) -> Option<&Link> {
        match self.entity(id)? {
            Entity::Link(l) => Some(l),
            _ => None,
        }
    }

    /// Find an interface attached to any component or connector.
    pub fn interface(&self, id: EntityId) -> Option<&Interface> {
        self.entities.iter().find_map(|e| match e {
            Entity::Component(c) => c.interface(id),
            Entity::Connector(c) => c.interface(id),
            Entity::Link(_) => None,
        })
    }

    /// The component or connector an interface belongs to.
    pub fn interface_owner(&self, id: EntityId) -> Option<&Entity> {
        self.interface(id)
            .and_then(|i| i.parent())
            .and_then(|parent| self.entity(parent))
    }

    /// First component whose simple name equals `simple`.
    pub fn get_component_from_simple_name(&self, simple: &str) -> Option<&Component> {
        self.components().find(|c| simple_name(c.name()) == simple)
    }

    // ------------------------------------------------------------------
    // Components and connectors
    // ------------------------------------------------------------------

    /// Register a component. Adding an id that is already present is a no-op.
    ///
    /// Fails with `DuplicateId` if one of its interfaces reuses an id the
    /// document already holds.
    pub fn add_component(&mut self, component: Component) -> Result<EntityId> {
        self.register(Entity::Component(component))
    }

    pub fn add_connector(&mut self, connector: Connector) -> Result<EntityId> {
        self.register(Entity::Connector(connector))
    }

    /// Attach an interface of any direction to a registered component.
    pub fn add_interface(&mut self, component: EntityId, interface: Interface) -> Result<EntityId> {
        self.check_unused(component, &interface)?;
        let comp = self
            .component_mut(component)
            .ok_or(ArchError::UnknownEntity(component))?;
        Ok(comp.add_interface(interface))
    }

    /// Attach an inbound interface to a component, or replace a connector's
    /// inbound slot. Links to a replaced slot are left dangling.
    pub fn add_interface_in(&mut self, owner: EntityId, interface: Interface) -> Result<EntityId> {
        self.check_unused(owner, &interface)?;
        let id = interface.id();
        match self.entity_mut(owner) {
            Some(Entity::Component(c)) => c.add_interface_in(interface),
            Some(Entity::Connector(c)) => c.add_interface_in(interface).map(|_| id),
            _ => Err(ArchError::UnknownEntity(owner)),
        }
    }

    /// Outbound counterpart of [`Document::add_interface_in`].
    pub fn add_interface_out(&mut self, owner: EntityId, interface: Interface) -> Result<EntityId> {
        self.check_unused(owner, &interface)?;
        let id = interface.id();
        match self.entity_mut(owner) {
            Some(Entity::Component(c)) => c.add_interface_out(interface),
            Some(Entity::Connector(c)) => c.add_interface_out(interface).map(|_| id),
            _ => Err(ArchError::UnknownEntity(owner)),
        }
    }

    /// Remove an interface from whichever component carries it.
    ///
    /// Connector interfaces cannot be removed, only replaced.
    pub fn remove_interface(&mut self, id: EntityId) -> Option<Interface> {
        self.entities.iter_mut().find_map(|e| match e {
            Entity::Component(c) => c.remove_interface(id),
            _ => None,
        })
    }

    // ------------------------------------------------------------------
    // Bus
    // ------------------------------------------------------------------

    /// Return the bus, creating it on first use.
    pub fn add_bus(&mut self) -> EntityId {
        if let Some(id) = self.bus {
            return id;
        }
        let id = self.insert(Entity::Connector(Connector::new(BUS_NAME)));
        self.bus = Some(id);
        id
    }

    pub fn bus_id(&self) -> Option<EntityId> {
        self.bus
    }

    pub fn get_bus(&self) -> Option<&Connector> {
        self.bus.and_then(|id| self.connector(id))
    }

    /// Remove the bus connector and every link that starts or ends on it.
    pub fn remove_bus(&mut self) -> Result<Connector> {
        let id = self.bus.take().ok_or(ArchError::NoBus)?;
        let attached: Vec<EntityId> = self
            .links()
            .filter(|l| {
                self.side_matches(Endpoint::Connector(id), l.start())
                    || self.side_matches(Endpoint::Connector(id), l.end())
            })
            .map(|l| l.id())
            .collect();
        for link in attached {
            self.remove(link);
        }
        match self.remove(id) {
            Some(Entity::Connector(c)) => Ok(c),
            _ => Err(ArchError::UnknownEntity(id)),
        }
    }

    // ------------------------------------------------------------------
    // Links
    // ------------------------------------------------------------------

    /// Link `start` to `end`.
    ///
    /// Bare interfaces must already point the right way (out at the start,
    /// in at the end). For a component the existing interface for that side
    /// is used, or a new one is attached; a connector always uses its slot.
    pub fn add_link(&mut self, start: Endpoint, end: Endpoint) -> Result<EntityId> {
        self.check_side(start, Side::Start)?;
        self.check_side(end, Side::End)?;

        let start_id = self.resolve_side(start, Side::Start)?;
        let end_id = self.resolve_side(end, Side::End)?;

        let start_iface = self
            .interface(start_id)
            .ok_or(ArchError::UnknownEntity(start_id))?;
        let end_iface = self
            .interface(end_id)
            .ok_or(ArchError::UnknownEntity(end_id))?;

        let name = format!(
            "{} -> {}",
            self.owner_name(start_iface),
            self.owner_name(end_iface)
        );
        let link = Link::between(name, start_iface, end_iface)?;
        self.register(Entity::Link(link))
    }

    /// Register a link built by the caller. Its endpoints are not checked
    /// until export.
    pub fn insert_link(&mut self, link: Link) -> Result<EntityId> {
        self.register(Entity::Link(link))
    }

    /// Both endpoint ids of `link`, each resolved to an interface this
    /// document still holds.
    pub fn link_endpoints(&self, link: &Link) -> Result<(EntityId, EntityId)> {
        let (start, end) = link.endpoints()?;
        for (side, interface) in [("start", start), ("end", end)] {
            if self.interface(interface).is_none() {
                return Err(ArchError::DanglingLinkEndpoint {
                    link: link.id(),
                    name: link.name().to_string(),
                    side,
                    interface,
                });
            }
        }
        Ok((start, end))
    }

    /// First link whose start matches `sender` and whose end matches `receiver`.
    ///
    /// An interface endpoint matches the link's interface itself; a component
    /// or connector endpoint matches the owner of that interface.
    pub fn get_link(&self, sender: Endpoint, receiver: Endpoint) -> Option<&Link> {
        self.links().find(|l| {
            self.side_matches(sender, l.start()) && self.side_matches(receiver, l.end())
        })
    }

    pub fn remove_link(&mut self, id: EntityId) -> Option<Link> {
        self.link(id)?;
        match self.remove(id) {
            Some(Entity::Link(l)) => Some(l),
            _ => None,
        }
    }

    /// Remove the link `get_link(start, end)` would return.
    pub fn remove_link_between(&mut self, start: Endpoint, end: Endpoint) -> Option<Link> {
        let id = self.get_link(start, end)?.id();
        self.remove_link(id)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Insert `entity` unless it is already a member, rejecting ids that
    /// collide with anything else in the document.
    fn register(&mut self, entity: Entity) -> Result<EntityId> {
        let id = entity.id();
        if self.index.contains_key(&id) {
            return Ok(id);
        }
        if self.contains(id) {
            return Err(ArchError::DuplicateId(id));
        }
        let mut seen = HashSet::new();
        for iface in entity.interfaces() {
            if iface.id() == id || self.contains(iface.id()) || !seen.insert(iface.id()) {
                return Err(ArchError::DuplicateId(iface.id()));
            }
        }
        Ok(self.insert(entity))
    }

    /// An interface id may only be attached to `owner` if the document does
    /// not use it yet, or `owner` is a component already carrying it.
    fn check_unused(&self, owner: EntityId, interface: &Interface) -> Result<()> {
        let id = interface.id();
        let already_attached = self
            .component(owner)
            .is_some_and(|c| c.interface(id).is_some());
        if self.contains(id) && !already_attached {
            return Err(ArchError::DuplicateId(id));
        }
        Ok(())
    }

    fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        if !self.index.contains_key(&id) {
            self.index.insert(id, self.entities.len());
            self.entities.push(entity);
        }
        id
    }

    fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let pos = self.index.remove(&id)?;
        let entity = self.entities.remove(pos);
        for (i, e) in self.entities.iter().enumerate().skip(pos) {
            self.index.insert(e.id(), i);
        }
        if self.bus == Some(id) {
            self.bus = None;
        }
        Some(entity)
    }

    fn owner_name(&self, iface: &Interface) -> String {
        iface
            .parent()
            .and_then(|p| self.entity(p))
            .map(|e| e.name().to_string())
            .unwrap_or_else(|| iface.name().to_string())
    }

    fn side_matches(&self, endpoint: Endpoint, iface: Option<EntityId>) -> bool {
        let Some(iface) = iface else {
            return false;
        };
        match endpoint {
            Endpoint::Interface(id) => id == iface,
            Endpoint::Component(id) | Endpoint::Connector(id) => {
                self.interface(iface).and_then(|i| i.parent()) == Some(id)
            }
        }
    }

    /// Validate an endpoint without touching the document.
    fn check_side(&self, endpoint: Endpoint, side: Side) -> Result<()> {
        match endpoint {
            Endpoint::Interface(id) => {
                let iface = self.interface(id).ok_or(ArchError::UnknownEntity(id))?;
                if iface.direction() != side.direction() {
                    return Err(ArchError::WrongDirection {
                        interface: id,
                        expected: side.direction(),
                        actual: iface.direction(),
                    });
                }
                Ok(())
            }
            Endpoint::Component(id) => self
                .component(id)
                .map(|_| ())
                .ok_or(ArchError::UnknownEntity(id)),
            Endpoint::Connector(id) => self
                .connector(id)
                .map(|_| ())
                .ok_or(ArchError::UnknownEntity(id)),
        }
    }

    fn resolve_side(&mut self, endpoint: Endpoint, side: Side) -> Result<EntityId> {
        match endpoint {
            Endpoint::Interface(id) => Ok(id),
            Endpoint::Component(id) => {
                let comp = self.component_mut(id).ok_or(ArchError::UnknownEntity(id))?;
                let existing = match side {
                    Side::Start => comp.interface_out(),
                    Side::End => comp.interface_in(),
                };
                if let Some(found) = existing.map(|i| i.id()) {
                    return Ok(found);
                }
                let iface = Interface::new(
                    format!("{} Interface {}", comp.name(), side.label()),
                    side.direction(),
                );
                Ok(comp.add_interface(iface))
            }
            Endpoint::Connector(id) => {
                let conn = self.connector(id).ok_or(ArchError::UnknownEntity(id))?;
                let slot = match side {
                    Side::Start => conn.interface_out(),
                    Side::End => conn.interface_in(),
                };
                Ok(slot.id())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn two_components(doc: &mut Document) -> (EntityId, EntityId) {
        let a = doc.add_component(Component::new("com.app.A")).unwrap();
        let b = doc.add_component(Component::new("com.app.B")).unwrap();
        (a, b)
    }

    #[test]
    fn test_add_remove_bus() {
        let mut doc = Document::new("test-struct");
        doc.add_bus();

        let bus = doc.get_bus().unwrap();
        assert_eq!(bus.name(), BUS_NAME);
        assert_eq!(doc.connectors().count(), 1);

        doc.remove_bus().unwrap();
        assert!(doc.get_bus().is_none());
        assert_eq!(doc.connectors().count(), 0);
        assert!(matches!(doc.remove_bus(), Err(ArchError::NoBus)));
    }

    #[test]
    fn test_add_bus_is_idempotent() {
        let mut doc = Document::new("s");
        let ids: Vec<EntityId> = (0..5).map(|_| doc.add_bus()).collect();
        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_eq!(doc.connectors().count(), 1);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_add_component_twice_is_noop() {
        let mut doc = Document::new("s");
        let comp = Component::new("Main");
        let first = doc.add_component(comp.clone()).unwrap();
        let second = doc.add_component(comp).unwrap();
        assert_eq!(first, second);
        assert_eq!(doc.components().count(), 1);
    }

    #[test]
    fn test_add_connector() {
        let mut doc = Document::new("s");
        let id = doc.add_connector(Connector::new("pipe")).unwrap();
        assert!(doc.connector(id).is_some());
        assert!(doc.get_bus().is_none());
    }

    #[test]
    fn test_add_remove_link_with_link() {
        let mut doc = Document::new("s");
        let (a, b) = two_components(&mut doc);

        let link = doc.add_link(Endpoint::Component(a), Endpoint::Component(b)).unwrap();
        assert!(doc.link(link).is_some());

        let removed = doc.remove_link(link).unwrap();
        assert_eq!(removed.id(), link);
        assert!(doc.link(link).is_none());
        assert_eq!(doc.links().count(), 0);
    }

    #[test]
    fn test_add_remove_link_with_endpoints() {
        let mut doc = Document::new("s");
        let (a, b) = two_components(&mut doc);

        let link = doc.add_link(Endpoint::Component(a), Endpoint::Component(b)).unwrap();
        let removed = doc
            .remove_link_between(Endpoint::Component(a), Endpoint::Component(b))
            .unwrap();
        assert_eq!(removed.id(), link);
        assert_eq!(doc.links().count(), 0);
        assert!(doc
            .remove_link_between(Endpoint::Component(a), Endpoint::Component(b))
            .is_none());
    }

    #[test]
    fn test_get_link() {
        let mut doc = Document::new("s");
        let (a, b) = two_components(&mut doc);

        let link = doc.add_link(Endpoint::Component(a), Endpoint::Component(b)).unwrap();
        assert_eq!(
            doc.get_link(Endpoint::Component(a), Endpoint::Component(b)).map(|l| l.id()),
            Some(link)
        );
        assert!(doc.get_link(Endpoint::Component(b), Endpoint::Component(a)).is_none());

        let out = doc.component(a).unwrap().interface_out().unwrap().id();
        assert!(doc.get_link(Endpoint::Interface(out), Endpoint::Component(b)).is_some());
    }

    #[test]
    fn test_add_link_auto_creates_interfaces() {
        let mut doc = Document::new("s");
        let (a, b) = two_components(&mut doc);
        doc.add_link(Endpoint::Component(a), Endpoint::Component(b)).unwrap();

        let a = doc.component(a).unwrap();
        let b = doc.component(b).unwrap();
        assert_eq!(a.interfaces().len(), 1);
        assert_eq!(a.interface_out().unwrap().name(), "com.app.A Interface Out");
        assert_eq!(b.interface_in().unwrap().name(), "com.app.B Interface In");
    }

    #[test]
    fn test_add_link_reuses_existing_interfaces() {
        let mut doc = Document::new("s");
        let (a, b) = two_components(&mut doc);
        doc.add_link(Endpoint::Component(a), Endpoint::Component(b)).unwrap();
        doc.add_link(Endpoint::Component(a), Endpoint::Component(b)).unwrap();

        assert_eq!(doc.component(a).unwrap().interfaces().len(), 1);
        assert_eq!(doc.component(b).unwrap().interfaces().len(), 1);
        assert_eq!(doc.links().count(), 2);
    }

    #[test]
    fn test_add_link_to_connector_uses_slots() {
        let mut doc = Document::new("s");
        let (a, _) = two_components(&mut doc);
        let bus = doc.add_bus();

        let link = doc.add_link(Endpoint::Component(a), Endpoint::Connector(bus)).unwrap();
        let bus_in = doc.get_bus().unwrap().interface_in().id();
        assert_eq!(doc.link(link).unwrap().end(), Some(bus_in));
        assert_eq!(doc.get_bus().unwrap().interfaces().count(), 2);
    }

    #[test]
    fn test_add_link_uses_replaced_connector_slot() {
        let mut doc = Document::new("s");
        let (_, b) = two_components(&mut doc);
        let conn = doc.add_connector(Connector::new("pipe")).unwrap();
        let replacement = doc
            .add_interface_out(conn, Interface::new("pipe out 2", Direction::Out))
            .unwrap();

        let link = doc.add_link(Endpoint::Connector(conn), Endpoint::Component(b)).unwrap();
        assert_eq!(doc.link(link).unwrap().start(), Some(replacement));
        assert_eq!(doc.connector(conn).unwrap().interfaces().count(), 2);
    }

    #[test]
    fn test_add_link_rejects_wrong_direction() {
        let mut doc = Document::new("s");
        let (a, b) = two_components(&mut doc);
        let inbound = doc
            .add_interface(a, Interface::new("A in", Direction::In))
            .unwrap();

        let err = doc
            .add_link(Endpoint::Interface(inbound), Endpoint::Component(b))
            .unwrap_err();
        assert!(matches!(err, ArchError::WrongDirection { .. }));
        // nothing was created on the receiving side
        assert!(doc.component(b).unwrap().interfaces().is_empty());
        assert_eq!(doc.links().count(), 0);
    }

    #[test]
    fn test_add_link_unknown_entity() {
        let mut doc = Document::new("s");
        let stray = Component::new("Stray");
        let (a, _) = two_components(&mut doc);
        let err = doc
            .add_link(Endpoint::Component(a), Endpoint::from(&stray))
            .unwrap_err();
        assert!(matches!(err, ArchError::UnknownEntity(id) if id == stray.id()));
    }

    #[test]
    fn test_get_component_from_simple_name() {
        let mut doc = Document::new("s");
        let (a, _) = two_components(&mut doc);
        assert_eq!(doc.get_component_from_simple_name("A").map(|c| c.id()), Some(a));
        assert!(doc.get_component_from_simple_name("Missing").is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut doc = Document::new("s");
        for i in 0..20 {
            doc.add_component(Component::new(format!("C{}", i))).unwrap();
        }
        doc.add_bus();
        let comps: Vec<EntityId> = doc.components().map(|c| c.id()).collect();
        for pair in comps.windows(2) {
            doc.add_link(Endpoint::Component(pair[0]), Endpoint::Component(pair[1]))
                .unwrap();
        }

        let mut seen = HashSet::new();
        seen.insert(doc.structure_id());
        for entity in doc.entities() {
            assert!(seen.insert(entity.id()));
            for iface in entity.interfaces() {
                assert!(seen.insert(iface.id()));
            }
        }
    }

    #[test]
    fn test_remove_keeps_order_and_index() {
        let mut doc = Document::new("s");
        let (a, b) = two_components(&mut doc);
        let c = doc.add_component(Component::new("com.app.C")).unwrap();
        let link = doc.add_link(Endpoint::Component(a), Endpoint::Component(b)).unwrap();

        doc.remove_link(link);
        let d = doc.add_component(Component::new("com.app.D")).unwrap();

        let order: Vec<EntityId> = doc.entities().map(|e| e.id()).collect();
        assert_eq!(order, vec![a, b, c, d]);
        assert!(doc.component(c).is_some());
        assert!(doc.component(d).is_some());
    }

    #[test]
    fn test_interface_owner() {
        let mut doc = Document::new("s");
        let bus = doc.add_bus();
        let out = doc.get_bus().unwrap().interface_out().id();
        assert_eq!(doc.interface_owner(out).map(|e| e.id()), Some(bus));
    }

    #[test]
    fn test_remove_interface() {
        let mut doc = Document::new("s");
        let (a, _) = two_components(&mut doc);
        let iface = doc
            .add_interface(a, Interface::new("x", Direction::None))
            .unwrap();
        assert!(doc.remove_interface(iface).is_some());
        assert!(doc.component(a).unwrap().interfaces().is_empty());
        assert!(!doc.contains(iface));
    }

    #[test]
    fn test_shared_interface_rejected_across_components() {
        let mut doc = Document::new("s");
        let shared = Interface::new("shared", Direction::Out);
        let mut a = Component::new("com.app.A");
        let mut b = Component::new("com.app.B");
        a.add_interface(shared.clone());
        b.add_interface(shared.clone());

        doc.add_component(a).unwrap();
        let err = doc.add_component(b.clone()).unwrap_err();
        assert!(matches!(err, ArchError::DuplicateId(id) if id == shared.id()));
        assert!(doc.component(b.id()).is_none());

        let owners = doc
            .entities()
            .flat_map(|e| e.interfaces())
            .filter(|i| i.id() == shared.id())
            .count();
        assert_eq!(owners, 1);
    }

    #[test]
    fn test_connector_cannot_reuse_component_interface() {
        let mut doc = Document::new("s");
        let (a, _) = two_components(&mut doc);
        let inbound = Interface::new("A in", Direction::In);
        doc.add_interface_in(a, inbound.clone()).unwrap();

        let mut conn = Connector::new("pipe");
        conn.add_interface_in(inbound.clone()).unwrap();
        assert!(matches!(
            doc.add_connector(conn),
            Err(ArchError::DuplicateId(id)) if id == inbound.id()
        ));
    }

    #[test]
    fn test_add_interface_checks_whole_document() {
        let mut doc = Document::new("s");
        let (a, b) = two_components(&mut doc);
        let bus = doc.add_bus();
        let out = Interface::new("A out", Direction::Out);
        let id = doc.add_interface_out(a, out.clone()).unwrap();

        // re-adding to the same component is a no-op
        assert_eq!(doc.add_interface(a, out.clone()).unwrap(), id);
        assert_eq!(doc.component(a).unwrap().interfaces().len(), 1);

        assert!(matches!(doc.add_interface(b, out.clone()), Err(ArchError::DuplicateId(_))));
        assert!(matches!(doc.add_interface_out(bus, out), Err(ArchError::DuplicateId(_))));
        let bus_in = doc.get_bus().unwrap().interface_in().clone();
        assert!(matches!(doc.add_interface_in(b, bus_in), Err(ArchError::DuplicateId(_))));
        assert!(doc.component(b).unwrap().interfaces().is_empty());
    }

    #[test]
    fn test_add_interface_to_unknown_owner() {
        let mut doc = Document::new("s");
        let stray = EntityId::new();
        let err = doc
            .add_interface(stray, Interface::new("x", Direction::None))
            .unwrap_err();
        assert!(matches!(err, ArchError::UnknownEntity(id) if id == stray));
    }

    #[test]
    fn test_remove_bus_drops_attached_links() {
        let mut doc = Document::new("s");
        let (a, b) = two_components(&mut doc);
        let bus = doc.add_bus();
        doc.add_link(Endpoint::Connector(bus), Endpoint::Component(a)).unwrap();
        doc.add_link(Endpoint::Component(b), Endpoint::Connector(bus)).unwrap();
        let kept = doc.add_link(Endpoint::Component(a), Endpoint::Component(b)).unwrap();

        doc.remove_bus().unwrap();
        let links: Vec<EntityId> = doc.links().map(|l| l.id()).collect();
        assert_eq!(links, vec![kept]);
        for link in doc.links() {
            assert!(doc.link_endpoints(link).is_ok());
        }
    }

    #[test]
    fn test_link_endpoints_reports_removed_interface() {
        let mut doc = Document::new("s");
        let (a, b) = two_components(&mut doc);
        let link = doc.add_link(Endpoint::Component(a), Endpoint::Component(b)).unwrap();
        let inbound = doc.component(b).unwrap().interface_in().unwrap().id();
        doc.remove_interface(inbound).unwrap();

        let err = doc.link_endpoints(doc.link(link).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            ArchError::DanglingLinkEndpoint { side: "end", interface, .. } if interface == inbound
        ));
    }

    #[test]
    fn test_link_endpoints_after_slot_replacement() {
        let mut doc = Document::new("s");
        let (a, _) = two_components(&mut doc);
        let conn = doc.add_connector(Connector::new("pipe")).unwrap();
        let link = doc.add_link(Endpoint::Component(a), Endpoint::Connector(conn)).unwrap();

        doc.add_interface_in(conn, Interface::new("pipe in 2", Direction::In))
            .unwrap();
        let err = doc.link_endpoints(doc.link(link).unwrap()).unwrap_err();
        assert!(matches!(err, ArchError::DanglingLinkEndpoint { side: "end", .. }));
    }

    #[test]
    fn test_contains() {
        let mut doc = Document::new("s");
        let bus = doc.add_bus();
        let slot = doc.get_bus().unwrap().interface_out().id();
        assert!(doc.contains(doc.structure_id()));
        assert!(doc.contains(bus));
        assert!(doc.contains(slot));
        assert!(!doc.contains(EntityId::new()));
    }
}
