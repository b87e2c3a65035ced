//! xADL 3.0 Exporter
//!
//! Renders a Document as an ArchStudio xADL 3.0 structure.

use crate::domain::document::Document;
use crate::domain::entity::{Component, Connector, Entity, Interface, Link, Structure};
use crate::error::Result;
use crate::ports::ArchitectureExporter;

const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
const NS_HINTS: &str = "http://www.archstudio.org/xadl3/schemas/hints-3.0.xsd";
const NS_STRUCTURE: &str = "http://www.archstudio.org/xadl3/schemas/structure-3.0.xsd";
const NS_XADLCORE: &str = "http://www.archstudio.org/xadl3/schemas/xadlcore-3.0.xsd";

const INDENT: &str = "    ";

pub struct XadlExporter;

impl ArchitectureExporter for XadlExporter {
    fn render(&self, doc: &Document) -> Result<String> {
        Self::to_xadl(doc)
    }

    fn extension(&self) -> &'static str {
        "xml"
    }
}

impl XadlExporter {
    /// Convert a Document to an xADL string.
    ///
    /// Fails if any link is missing an endpoint; nothing is emitted then.
    pub fn to_xadl(doc: &Document) -> Result<String> {
        let mut lines = Vec::new();

        lines.push(r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string());
        lines.push(format!(
            r#"<xadlcore_3_0:xADL xmlns:xsi="{}" xmlns:hints_3_0="{}" xmlns:structure_3_0="{}" xmlns:xadlcore_3_0="{}">"#,
            NS_XSI, NS_HINTS, NS_STRUCTURE, NS_XADLCORE
        ));
        lines.push(format!(
            "{}<structure_3_0:structure {}>",
            INDENT,
            Self::id_name(&doc.structure_id().to_string(), doc.name())
        ));

        for entity in doc.entities() {
            match entity {
                Entity::Component(c) => Self::component(c, 2, &mut lines),
                Entity::Connector(c) => Self::connector(c, 2, &mut lines),
                Entity::Link(l) => Self::link(doc, l, 2, &mut lines)?,
            }
        }

        lines.push(format!("{}</structure_3_0:structure>", INDENT));
        lines.push("</xadlcore_3_0:xADL>".to_string());
        lines.push(String::new());

        Ok(lines.join("\n"))
    }

    fn component(c: &Component, depth: usize, lines: &mut Vec<String>) {
        let pad = INDENT.repeat(depth);
        let attrs = Self::id_name(&c.id().to_string(), c.name());
        if c.interfaces().is_empty() {
            lines.push(format!("{}<structure_3_0:component {}/>", pad, attrs));
            return;
        }
        lines.push(format!("{}<structure_3_0:component {}>", pad, attrs));
        for iface in c.interfaces() {
            lines.push(Self::interface(iface, depth + 1));
        }
        lines.push(format!("{}</structure_3_0:component>", pad));
    }

    fn connector(c: &Connector, depth: usize, lines: &mut Vec<String>) {
        let pad = INDENT.repeat(depth);
        lines.push(format!(
            "{}<structure_3_0:connector {}>",
            pad,
            Self::id_name(&c.id().to_string(), c.name())
        ));
        for iface in c.interfaces() {
            lines.push(Self::interface(iface, depth + 1));
        }
        lines.push(format!("{}</structure_3_0:connector>", pad));
    }

    fn interface(iface: &Interface, depth: usize) -> String {
        let direction = iface
            .direction()
            .xadl_token()
            .map(|d| format!(r#" structure_3_0:direction="{}""#, d))
            .unwrap_or_default();
        format!(
            "{}<structure_3_0:interface {}{}/>",
            INDENT.repeat(depth),
            Self::id_name(&iface.id().to_string(), iface.name()),
            direction
        )
    }

    fn link(doc: &Document, l: &Link, depth: usize, lines: &mut Vec<String>) -> Result<()> {
        let (start, end) = doc.link_endpoints(l)?;
        let pad = INDENT.repeat(depth);
        let inner = INDENT.repeat(depth + 1);
        lines.push(format!(
            "{}<structure_3_0:link {}>",
            pad,
            Self::id_name(&l.id().to_string(), l.name())
        ));
        lines.push(format!("{}<structure_3_0:point1>{}</structure_3_0:point1>", inner, start));
        lines.push(format!("{}<structure_3_0:point2>{}</structure_3_0:point2>", inner, end));
        lines.push(format!("{}</structure_3_0:link>", pad));
        Ok(())
    }

    fn id_name(id: &str, name: &str) -> String {
        format!(
            r#"structure_3_0:id="{}" structure_3_0:name="{}""#,
            Self::escape(id),
            Self::escape(name)
        )
    }

    fn escape(value: &str) -> String {
        value
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;")
    }
}
