//! Taglib descriptors
//!
//! A descriptor publishes already registered handlers under another namespace:
//!
//! ```xml
//! <taglib uri="urn:acme:ui">
//!     <tag name="panel" handler="urn:wuic:core#fragment"/>
//! </taglib>
//! ```

use super::registry::TagRegistry;
use crate::consts::TAGLIB_DESCRIPTOR_SUFFIX;
use crate::error::{Error, Result};
use crate::parser::LineCounter;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use walkdir::WalkDir;

/// One `<tag>` entry; `None` fields were missing in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorEntry {
    pub name: Option<String>,
    pub handler: Option<String>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub uri: String,
    pub entries: Vec<DescriptorEntry>,
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read the structure of a descriptor document without resolving handlers
pub fn parse_descriptor(xml: &str) -> Result<Descriptor> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut uri = None;
    let mut entries = Vec::new();
    let mut lines = LineCounter::new(xml);
    loop {
        let line = lines.line_at(reader.buffer_position() as usize);
        let event = reader
            .read_event()
            .map_err(|e| Error::malformed(line, e.to_string()))?;
        match event {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"taglib" => {
                    uri = attribute(&e, b"uri");
                    if uri.is_none() {
                        return Err(Error::malformed(
                            line,
                            "taglib descriptor has no 'uri'",
                        ));
                    }
                }
                b"tag" if uri.is_some() => entries.push(DescriptorEntry {
                    name: attribute(&e, b"name"),
                    handler: attribute(&e, b"handler"),
                    line,
                }),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    match uri {
        Some(uri) => Ok(Descriptor { uri, entries }),
        None => Err(Error::malformed(1, "missing <taglib> element")),
    }
}

impl TagRegistry {
    /// Apply a descriptor document; returns how many tags were registered.
    ///
    /// Entries that are incomplete or point at an unknown handler are skipped
    /// with a warning.
    pub fn load_descriptor(&mut self, xml: &str) -> Result<usize> {
        let descriptor = parse_descriptor(xml)?;
        let mut registered = 0;
        for entry in &descriptor.entries {
            let (Some(name), Some(reference)) = (&entry.name, &entry.handler) else {
                log::warn!(
                    "taglib '{}' line {}: <tag> needs 'name' and 'handler', skipped",
                    descriptor.uri,
                    entry.line
                );
                continue;
            };
            let Some((namespace, tag)) = reference.rsplit_once('#') else {
                log::warn!(
                    "taglib '{}' line {}: handler '{}' is not of the form namespace#tag, skipped",
                    descriptor.uri,
                    entry.line,
                    reference
                );
                continue;
            };
            let Some(handler) = self.library(namespace).and_then(|lib| lib.handler(tag)) else {
                log::warn!(
                    "taglib '{}' line {}: no handler '{}', skipped",
                    descriptor.uri,
                    entry.line,
                    reference
                );
                continue;
            };
            self.ensure_library(&descriptor.uri)
                .register_shared(name.clone(), handler);
            registered += 1;
        }
        log::debug!("taglib '{}': {} tag(s) registered", descriptor.uri, registered);
        Ok(registered)
    }

    pub fn load_descriptor_file(&mut self, path: &Path) -> Result<usize> {
        let xml = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        self.load_descriptor(&xml)
    }

    /// Load every `*.taglib.xml` below `dir`, in path order. Unreadable or
    /// malformed descriptors are skipped.
    pub fn discover(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Err(Error::config(format!(
                "taglib directory '{}' does not exist",
                dir.display()
            )));
        }
        let mut registered = 0;
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("skipping taglib entry: {}", e);
                    continue;
                }
            };
            let is_descriptor = entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|n| n.ends_with(TAGLIB_DESCRIPTOR_SUFFIX));
            if !is_descriptor {
                continue;
            }
            match self.load_descriptor_file(entry.path()) {
                Ok(count) => registered += count,
                Err(e) => log::warn!("skipping taglib '{}': {}", entry.path().display(), e),
            }
        }
        Ok(registered)
    }
}
