//! Two-pass architecture extraction.
//!
//! Pass 1 declares one component per manifest entry and wires entries with
//! intent filters to the bus. Pass 2 scans each component's source for intent
//! constructions: implicit ones are wired to the bus at once, explicit ones are
//! queued by simple name because the receiver may not be known yet. The queue
//! is resolved once every component exists.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::diagnostic::{Diagnostic, ExtractionReport};
use crate::config::ExtractorConfig;
use crate::domain::document::Document;
use crate::domain::entity::{
    Component, Connector, Direction, Endpoint, EntityId, Interface, Structure,
};
use crate::domain::intent::{IntentClassifier, IntentKind};
use crate::domain::manifest::{Declaration, Manifest};
use crate::error::{ArchError, Result};
use crate::ports::SourceReader;

/// An explicit intent waiting for its receiver to be looked up.
#[derive(Debug, Clone)]
struct ExplicitRequest {
    sender: String,
    receiver: String,
    path: PathBuf,
    line: usize,
}

pub struct Extractor<'a> {
    reader: &'a dyn SourceReader,
    config: &'a ExtractorConfig,
    classifier: IntentClassifier,
}

impl<'a> Extractor<'a> {
    pub fn new(reader: &'a dyn SourceReader, config: &'a ExtractorConfig) -> Result<Self> {
        let classifier =
            IntentClassifier::new(&config.message_type, &config.qualified_message_type)?;
        Ok(Self {
            reader,
            config,
            classifier,
        })
    }

    /// Build the architecture of `manifest`. Source scanning only happens
    /// when `src_dir` is given.
    pub fn extract(
        &self,
        manifest: &Manifest,
        structure_name: &str,
        src_dir: Option<&Path>,
    ) -> Result<ExtractionReport> {
        let mut doc = Document::new(structure_name);
        let mut diagnostics = Vec::new();

        info!("declaring {} components", manifest.declarations.len());
        let mut declared = Vec::with_capacity(manifest.declarations.len());
        for decl in &manifest.declarations {
            let id = self.declare(&mut doc, manifest, decl)?;
            declared.push((id, decl));
        }

        let mut pending = Vec::new();
        if let Some(src_dir) = src_dir {
            info!("scanning sources under {}", src_dir.display());
            for (id, decl) in &declared {
                self.scan_source(&mut doc, *id, decl, src_dir, &mut pending, &mut diagnostics)?;
            }
        }

        if !pending.is_empty() {
            info!("resolving {} explicit intents", pending.len());
        }
        for request in pending {
            self.resolve(&mut doc, request, &mut diagnostics)?;
        }

        Ok(ExtractionReport {
            document: doc,
            diagnostics,
        })
    }

    fn declare(&self, doc: &mut Document, manifest: &Manifest, decl: &Declaration) -> Result<EntityId> {
        let name = decl.display_name(&manifest.package, self.config.fully_qualified_names);
        debug!("{} {} -> component {}", decl.kind, decl.qualified_name, name);

        let id = doc.add_component(Component::new(name.clone()))?;
        if decl.has_intent_filter {
            let bus = doc.add_bus();
            let inbound = doc.add_interface_in(
                id,
                Interface::new(format!("{} Interface In", name), Direction::In),
            )?;
            doc.add_link(Endpoint::Connector(bus), Endpoint::Interface(inbound))?;
        }
        Ok(id)
    }

    fn scan_source(
        &self,
        doc: &mut Document,
        id: EntityId,
        decl: &Declaration,
        src_dir: &Path,
        pending: &mut Vec<ExplicitRequest>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<()> {
        let (name, sender) = {
            let comp = doc.component(id).ok_or(ArchError::UnknownEntity(id))?;
            (comp.name().to_string(), comp.simple_name().to_string())
        };
        let path = decl.source_path(src_dir, &self.config.source_extension);

        let source = match self.reader.read_to_string(&path) {
            Ok(source) => source,
            Err(ArchError::UnreadableInput { source, .. }) if source.kind() == ErrorKind::NotFound => {
                report(diagnostics, Diagnostic::MissingSource { component: name, path });
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        for site in self.classifier.scan(&source) {
            match site.kind {
                IntentKind::Explicit { receiver } => {
                    debug!("{}:{}: explicit intent {} -> {}", path.display(), site.line, sender, receiver);
                    pending.push(ExplicitRequest {
                        sender: sender.clone(),
                        receiver,
                        path: path.clone(),
                        line: site.line,
                    });
                }
                IntentKind::Implicit { action } => {
                    debug!("{}:{}: implicit intent {} from {}", path.display(), site.line, action, name);
                    self.wire_to_bus(doc, id, &name)?;
                }
                IntentKind::Unrecognized => report(
                    diagnostics,
                    Diagnostic::UnrecognizedIntent {
                        component: name.clone(),
                        path: path.clone(),
                        line: site.line,
                        snippet: site.snippet,
                    },
                ),
            }
        }
        Ok(())
    }

    /// Link a component to the bus unless it already is.
    fn wire_to_bus(&self, doc: &mut Document, id: EntityId, name: &str) -> Result<()> {
        let bus = doc.add_bus();
        if doc
            .get_link(Endpoint::Component(id), Endpoint::Connector(bus))
            .is_some()
        {
            return Ok(());
        }
        let outbound = doc.add_interface_out(
            id,
            Interface::new(format!("{} Interface Out", name), Direction::Out),
        )?;
        doc.add_link(Endpoint::Interface(outbound), Endpoint::Connector(bus))?;
        Ok(())
    }

    fn resolve(
        &self,
        doc: &mut Document,
        request: ExplicitRequest,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<()> {
        let sender = doc
            .get_component_from_simple_name(&request.sender)
            .map(|c| (c.id(), c.name().to_string()));
        let receiver = doc
            .get_component_from_simple_name(&request.receiver)
            .map(|c| (c.id(), c.name().to_string()));

        let (Some((sender_id, sender_name)), Some((receiver_id, receiver_name))) = (sender, receiver)
        else {
            report(
                diagnostics,
                Diagnostic::UnresolvedLink {
                    sender: request.sender,
                    receiver: request.receiver,
                    path: request.path,
                    line: request.line,
                },
            );
            return Ok(());
        };

        let connector = doc.add_connector(Connector::new(format!(
            "{} to {}",
            request.sender, request.receiver
        )))?;

        let outbound = doc.add_interface_out(
            sender_id,
            Interface::new(format!("{} Interface Out", sender_name), Direction::Out),
        )?;
        let inbound = doc.add_interface_in(
            receiver_id,
            Interface::new(format!("{} Interface In", receiver_name), Direction::In),
        )?;

        doc.add_link(Endpoint::Interface(outbound), Endpoint::Connector(connector))?;
        doc.add_link(Endpoint::Connector(connector), Endpoint::Interface(inbound))?;
        Ok(())
    }
}

fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    warn!("{}", diagnostic);
    diagnostics.push(diagnostic);
}
