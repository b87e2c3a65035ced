use serde::{Deserialize, Serialize};

use crate::domain::document::Document;
use crate::domain::entity::{Entity, Interface, Structure};
use crate::error::Result;
use crate::ports::ArchitectureExporter;

#[derive(Debug, Serialize, Deserialize)]
pub struct ArchitectureDto {
    pub id: String,
    pub name: String,
    pub bus: Option<String>,
    pub components: Vec<NodeDto>,
    pub connectors: Vec<NodeDto>,
    pub links: Vec<LinkDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NodeDto {
    pub id: String,
    pub name: String,
    pub interfaces: Vec<InterfaceDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InterfaceDto {
    pub id: String,
    pub name: String,
    pub direction: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkDto {
    pub id: String,
    pub name: String,
    pub from: String,
    pub to: String,
}

impl From<&Interface> for InterfaceDto {
    fn from(i: &Interface) -> Self {
        InterfaceDto {
            id: i.id().to_string(),
            name: i.name().to_string(),
            direction: i.direction().to_string(),
        }
    }
}

impl TryFrom<&Document> for ArchitectureDto {
    type Error = crate::error::ArchError;

    fn try_from(doc: &Document) -> Result<Self> {
        let mut dto = ArchitectureDto {
            id: doc.structure_id().to_string(),
            name: doc.name().to_string(),
            bus: doc.bus_id().map(|id| id.to_string()),
            components: Vec::new(),
            connectors: Vec::new(),
            links: Vec::new(),
        };

        for entity in doc.entities() {
            let node = || NodeDto {
                id: entity.id().to_string(),
                name: entity.name().to_string(),
                interfaces: entity.interfaces().into_iter().map(InterfaceDto::from).collect(),
            };
            match entity {
                Entity::Component(_) => dto.components.push(node()),
                Entity::Connector(_) => dto.connectors.push(node()),
                Entity::Link(l) => {
                    let (from, to) = doc.link_endpoints(l)?;
                    dto.links.push(LinkDto {
                        id: l.id().to_string(),
                        name: l.name().to_string(),
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }
            }
        }

        Ok(dto)
    }
}

/// Pretty-printed JSON view of a Document.
pub struct JsonExporter;

impl ArchitectureExporter for JsonExporter {
    fn render(&self, doc: &Document) -> Result<String> {
        let dto = ArchitectureDto::try_from(doc)?;
        Ok(serde_json::to_string_pretty(&dto)?)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
