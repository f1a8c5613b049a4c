//! Template driver
//!
//! Streams a template through `quick_xml::NsReader` and dispatches each element to
//! the handler registered for its (namespace, local name). Handlers run in strict
//! document order and build the AST held by the [`TranslationContext`].

use super::LineCounter;
use crate::codegen::TranslationContext;
use crate::error::{Error, Result};
use crate::taglib::{Attributes, Tag, TagHandler, TagRegistry};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::sync::Arc;

pub struct TemplateParser<'r> {
    registry: &'r TagRegistry,
}

impl<'r> TemplateParser<'r> {
    pub fn new(registry: &'r TagRegistry) -> Self {
        Self { registry }
    }

    /// Run one pass over `source`, feeding every tag event into `tc`
    pub fn parse(&self, source: &str, tc: &mut TranslationContext) -> Result<()> {
        let mut reader = NsReader::from_str(source);
        reader.config_mut().trim_text(false);
        reader.config_mut().expand_empty_elements = true;

        // open tags and their handlers, outermost first
        let mut tags: Vec<Tag> = Vec::new();
        let mut handlers: Vec<Arc<dyn TagHandler>> = Vec::new();
        let mut seen_root = false;
        let mut lines = LineCounter::new(source);

        loop {
            let position = reader.buffer_position() as usize;
            let line = lines.line_at(position);
            let (resolved, event) = reader
                .read_resolved_event()
                .map_err(|e| Error::malformed(line, e.to_string()))?;

            match event {
                Event::Start(element) => {
                    let namespace = match resolved {
                        ResolveResult::Bound(ns) => String::from_utf8_lossy(ns.as_ref()).into_owned(),
                        ResolveResult::Unbound => String::new(),
                        ResolveResult::Unknown(prefix) => {
                            return Err(Error::malformed(
                                line,
                                format!("unknown namespace prefix '{}'", String::from_utf8_lossy(&prefix)),
                            ));
                        }
                    };
                    let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                    let attributes = read_attributes(&element, line)?;
                    let handler = self.registry.resolve(&namespace, &name, line)?;

                    let (method, container) = match tags.last() {
                        Some(parent) => (parent.inner_method, parent.inner_container),
                        None => {
                            if seen_root {
                                return Err(Error::malformed(line, "document has more than one root element"));
                            }
                            if !handler.is_root() {
                                return Err(Error::malformed(
                                    line,
                                    format!("<{}> cannot be the document root", name),
                                ));
                            }
                            seen_root = true;
                            let service = tc.service_method();
                            (service, tc.body(service)?)
                        }
                    };

                    log::debug!("line {}: <{}> in '{}'", line, name, namespace);
                    let mut tag = Tag::new(namespace, name, line, attributes, method, container);
                    handler.start(&mut tag, &tags, tc)?;
                    tags.push(tag);
                    handlers.push(handler);
                }
                Event::End(_) => {
                    let (Some(mut tag), Some(handler)) = (tags.pop(), handlers.pop()) else {
                        return Err(Error::malformed(line, "unexpected end tag"));
                    };
                    handler.end(&mut tag, &tags, tc)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| Error::malformed(line, e.to_string()))?;
                    self.text(&mut tags, &handlers, &text, line, tc)?;
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    self.text(&mut tags, &handlers, &text, line, tc)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = tags.last() {
            return Err(Error::malformed(open.line, format!("unclosed <{}>", open.name)));
        }
        if !seen_root {
            return Err(Error::malformed(1, "document has no root element"));
        }
        Ok(())
    }

    fn text(
        &self,
        tags: &mut [Tag],
        handlers: &[Arc<dyn TagHandler>],
        text: &str,
        line: usize,
        tc: &mut TranslationContext,
    ) -> Result<()> {
        match (tags.last_mut(), handlers.last()) {
            (Some(tag), Some(handler)) => handler.text(tag, text, tc),
            _ if text.trim().is_empty() => Ok(()),
            _ => Err(Error::malformed(line, "text outside the root element")),
        }
    }
}

/// Attributes by local name; namespace declarations are dropped
fn read_attributes(element: &BytesStart<'_>, line: usize) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| Error::malformed(line, e.to_string()))?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        let value = attribute
            .unescape_value()
            .map_err(|e| Error::malformed(line, e.to_string()))?;
        let name = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        attributes.insert(name, value.into_owned());
    }
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::consts::CORE_NAMESPACE;
    use crate::taglib::core_registry;

    fn parse(source: &str) -> Result<TranslationContext> {
        let registry = core_registry();
        let mut tc = TranslationContext::new("index.wui", &Config::new("/src", "/dst"))?;
        TemplateParser::new(&registry).parse(source, &mut tc)?;
        Ok(tc)
    }

    fn line_of(result: Result<TranslationContext>) -> usize {
        match result {
            Err(Error::MalformedTemplate { line, .. }) => line,
            Err(other) => panic!("expected MalformedTemplate, got {}", other),
            Ok(_) => panic!("expected MalformedTemplate"),
        }
    }

    #[test]
    fn test_prefixed_and_default_namespaces() {
        let source = format!(
            r#"<c:page xmlns:c="{ns}">
    <c:field name="title" type="String" value="Home"/>
    <text>@{{title}}</text>
</c:page>"#,
            ns = CORE_NAMESPACE
        );
        let tc = parse(&source).unwrap();
        let output = tc.render();
        assert!(output.contains("final String title = \"Home\";"));
        assert!(output.contains("response.getWriter().write(String.valueOf(title));"));
    }

    #[test]
    fn test_unresolved_tag_reports_line() {
        let source = "<page>\n\n  <blink/>\n</page>";
        match parse(source) {
            Err(Error::UnresolvedTag { name, line, .. }) => {
                assert_eq!(name, "blink");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(line_of(parse("<field name=\"a\" type=\"int\" value=\"1\"/>")), 1);
        assert_eq!(line_of(parse("<page/>\n<page/>")), 2);
        assert_eq!(line_of(parse("stray<page/>")), 1);
        assert_eq!(line_of(parse("<page>\n  <if test=\"true\">\n</page>")), 3);
        assert_eq!(line_of(parse("<page>\n  <text>")), 2);
        assert_eq!(line_of(parse("")), 1);
        assert_eq!(line_of(parse("<x:page xmlns:y=\"urn:y\"/>")), 1);
    }

    #[test]
    fn test_comments_and_declarations_are_ignored() {
        let source = "<?xml version=\"1.0\"?>\n<!-- header -->\n<page>\n  <comment>hello</comment>\n</page>\n";
        let output = parse(source).unwrap().render();
        assert!(output.contains("// hello"));
        assert!(!output.contains("header"));
    }
}
