//! Parsing for templates and their embedded mini-languages
//!
//! Templates are read with a streaming XML reader ([`template`]); attribute
//! values may carry type specs ([`type_spec`]) and `@{..}` bindings ([`binding`]),
//! both tokenized by [`lexer`].

pub mod binding;
pub mod lexer;
pub mod template;
pub mod type_spec;

pub use binding::{parse_binding, Binding, Segment};
pub use template::TemplateParser;
pub use type_spec::parse_type_spec;

/// 1-based line numbers for increasing byte offsets of one document
///
/// Only the bytes since the previous lookup are scanned; a position before it
/// restarts the count.
#[derive(Debug, Clone)]
pub(crate) struct LineCounter<'a> {
    source: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source: source.as_bytes(),
            offset: 0,
            line: 1,
        }
    }

    pub fn line_at(&mut self, position: usize) -> usize {
        let end = position.min(self.source.len());
        if end < self.offset {
            self.offset = 0;
            self.line = 1;
        }
        self.line += self.source[self.offset..end].iter().filter(|&&b| b == b'\n').count();
        self.offset = end;
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_counter() {
        let mut lines = LineCounter::new("a\nb\n\nc");
        assert_eq!(lines.line_at(0), 1);
        assert_eq!(lines.line_at(2), 2);
        assert_eq!(lines.line_at(2), 2);
        assert_eq!(lines.line_at(5), 4);
        assert_eq!(lines.line_at(100), 4);
        // going back recounts from the start
        assert_eq!(lines.line_at(3), 2);
    }
}
