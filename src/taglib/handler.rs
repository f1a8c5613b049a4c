use crate::ast::NodeId;
use crate::codegen::{MethodId, TranslationContext, VarId};
use crate::error::{Error, Result};

/// Attributes of a template tag in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (k, v) in iter {
            attributes.insert(k, v);
        }
        attributes
    }
}

/// Parse-time frame of one open tag
///
/// Handlers are stateless; whatever a tag needs between its start and end
/// callbacks is kept here.
#[derive(Debug, Clone)]
pub struct Tag {
    pub namespace: String,
    pub name: String,
    /// Line of the start tag
    pub line: usize,
    pub attributes: Attributes,
    /// Where this tag's own output goes
    pub method: MethodId,
    pub container: NodeId,
    /// Where nested tags put their output; starts equal to `method`/`container`
    pub inner_method: MethodId,
    pub inner_container: NodeId,
    /// Variable introduced by the tag, if any
    pub bean: Option<VarId>,
    /// Node created by the tag, if any
    pub node: Option<NodeId>,
    /// Character data received so far
    pub text: String,
}

impl Tag {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        line: usize,
        attributes: Attributes,
        method: MethodId,
        container: NodeId,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            line,
            attributes,
            method,
            container,
            inner_method: method,
            inner_container: container,
            bean: None,
            node: None,
            text: String::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// Attribute that must be present and non-blank
    pub fn required(&self, name: &str) -> Result<&str> {
        match self.attributes.get(name) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(self.error(format!("missing required attribute '{}'", name))),
        }
    }

    /// Structural error attributed to this tag
    pub fn error(&self, message: impl AsRef<str>) -> Error {
        Error::malformed(self.line, format!("<{}>: {}", self.name, message.as_ref()))
    }

    /// Send nested content to another block (and method)
    pub fn redirect(&mut self, method: MethodId, container: NodeId) {
        self.inner_method = method;
        self.inner_container = container;
    }
}

/// Behavior bound to a (namespace, tag name) pair
///
/// Callbacks arrive in strict `start`, nested events, `end` order. One handler
/// instance serves every occurrence of its tag, including nested ones, so all
/// state lives in the [`Tag`] frames and the [`TranslationContext`].
pub trait TagHandler: Send + Sync {
    /// `ancestors` lists the enclosing open tags, outermost first
    fn start(&self, tag: &mut Tag, ancestors: &[Tag], tc: &mut TranslationContext) -> Result<()>;

    fn end(&self, _tag: &mut Tag, _ancestors: &[Tag], _tc: &mut TranslationContext) -> Result<()> {
        Ok(())
    }

    /// Character data directly inside the tag. Whitespace is ignored unless the
    /// handler overrides this.
    fn text(&self, tag: &mut Tag, text: &str, _tc: &mut TranslationContext) -> Result<()> {
        if text.trim().is_empty() {
            Ok(())
        } else {
            Err(tag.error("text content is not allowed here"))
        }
    }

    /// Whether the tag may be the document root
    fn is_root(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_keep_order_and_replace() {
        let mut attrs: Attributes = [("name", "a"), ("type", "int")].into_iter().collect();
        attrs.insert("name", "b");
        let pairs: Vec<(&str, &str)> = attrs.iter().collect();
        assert_eq!(pairs, vec![("name", "b"), ("type", "int")]);
        assert_eq!(attrs.get("missing"), None);
    }
}
