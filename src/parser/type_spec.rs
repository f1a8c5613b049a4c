//! Recursive descent parser for textual type specifications
//!
//! ```text
//! type     := qname dims? args? dims?
//! qname    := IDENT ('.' IDENT)*
//! dims     := ('[' ']')+
//! args     := '<' argument (',' argument)* '>'
//! argument := '?' (('extends' | 'super') type)? | type
//! ```

use super::lexer::{tokenize_type, LexicalToken, TypeToken};
use crate::error::{Error, Result};
use crate::types::{TypeArgument, TypeDescriptor, Wildcard};

/// Parse a type spec such as `a.b.List[][]` or `java.util.Map<K,? super V>`
pub fn parse_type_spec(spec: &str) -> Result<TypeDescriptor> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_type(spec, "no type specified"));
    }
    let tokens = tokenize_type(trimmed).map_err(|offset| {
        Error::invalid_type(spec, format!("unexpected character at offset {}", offset))
    })?;
    let mut parser = TypeSpecParser {
        spec,
        tokens,
        pos: 0,
    };
    let descriptor = parser.parse_type()?;
    if let Some(token) = parser.peek() {
        return Err(Error::invalid_type(
            spec,
            format!("unexpected '{}' after type", token.lexeme),
        ));
    }
    Ok(descriptor)
}

struct TypeSpecParser<'a> {
    spec: &'a str,
    tokens: Vec<LexicalToken<'a, TypeToken>>,
    pos: usize,
}

impl<'a> TypeSpecParser<'a> {
    fn peek(&self) -> Option<&LexicalToken<'a, TypeToken>> {
        self.tokens.get(self.pos)
    }

    fn check(&self, token: TypeToken) -> bool {
        self.peek().map_or(false, |t| t.is(&token))
    }

    fn advance(&mut self) -> Option<&LexicalToken<'a, TypeToken>> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn consume(&mut self, token: TypeToken, what: &str) -> Result<&'a str> {
        match self.tokens.get(self.pos) {
            Some(t) if t.is(&token) => {
                self.pos += 1;
                Ok(t.lexeme)
            }
            Some(t) => Err(self.error(format!("expected {}, found '{}'", what, t.lexeme))),
            None => Err(self.error(format!("expected {}, found end of input", what))),
        }
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::invalid_type(self.spec, reason)
    }

    fn parse_type(&mut self) -> Result<TypeDescriptor> {
        let qualified_name = self.parse_qualified_name()?;
        let mut dimension = self.parse_dims()?;
        let arguments = if self.check(TypeToken::Lt) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        dimension += self.parse_dims()?;

        let mut descriptor = TypeDescriptor::with_dimension(&qualified_name, dimension)
            .map_err(|_| self.error("empty simple name"))?;
        for argument in arguments {
            descriptor.add_argument(argument);
        }
        Ok(descriptor)
    }

    fn parse_qualified_name(&mut self) -> Result<String> {
        let mut name = self.consume(TypeToken::Identifier, "type name")?.to_string();
        while self.check(TypeToken::Dot) {
            self.advance();
            let segment = self
                .consume(TypeToken::Identifier, "name segment")
                .map_err(|_| self.error("empty simple name"))?;
            name.push('.');
            name.push_str(segment);
        }
        Ok(name)
    }

    fn parse_dims(&mut self) -> Result<usize> {
        let mut dimension = 0;
        while self.check(TypeToken::LBracket) {
            self.advance();
            self.consume(TypeToken::RBracket, "']'")?;
            dimension += 1;
        }
        Ok(dimension)
    }

    fn parse_arguments(&mut self) -> Result<Vec<TypeArgument>> {
        self.consume(TypeToken::Lt, "'<'")?;
        let mut arguments = vec![self.parse_argument()?];
        while self.check(TypeToken::Comma) {
            self.advance();
            arguments.push(self.parse_argument()?);
        }
        self.consume(TypeToken::Gt, "'>'")?;
        Ok(arguments)
    }

    fn parse_argument(&mut self) -> Result<TypeArgument> {
        if !self.check(TypeToken::Question) {
            return Ok(TypeArgument::Simple(self.parse_type()?));
        }
        self.advance();
        let mut wildcard = Wildcard::unbounded();
        if self.check(TypeToken::Extends) {
            self.advance();
            wildcard.set_upper_bound(self.parse_type()?);
        } else if self.check(TypeToken::Super) {
            self.advance();
            wildcard.set_lower_bound(self.parse_type()?);
        }
        Ok(TypeArgument::Wildcard(wildcard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::same_descriptor;

    #[test]
    fn test_trailing_brackets_become_dimension() {
        let t = parse_type_spec("a.b.List[][]").unwrap();
        assert_eq!(t.qualified_name(), "a.b.List");
        assert_eq!(t.simple_name(), "List");
        assert_eq!(t.array_dimension(), 2);
        assert_eq!(t.to_string(), "a.b.List[][]");
    }

    #[test]
    fn test_blank_and_dangling_specs_fail() {
        for spec in ["", "   ", "a.", "a.b.", "a[", "List<>", "List<String", "a b"] {
            assert!(
                matches!(parse_type_spec(spec), Err(Error::InvalidTypeSpec { .. })),
                "spec '{}' should be rejected",
                spec
            );
        }
    }

    #[test]
    fn test_generic_arguments_and_wildcards() {
        let t = parse_type_spec(
            " java.util.Map<java.lang.String, java.util.List<? super java.lang.Integer>> ",
        )
        .unwrap();
        assert_eq!(t.arguments().len(), 2);
        assert_eq!(
            t.to_string(),
            "java.util.Map<java.lang.String,java.util.List<? super java.lang.Integer>>"
        );
        match &t.arguments()[1] {
            TypeArgument::Simple(list) => match &list.arguments()[0] {
                TypeArgument::Wildcard(w) => {
                    assert!(w.upper_bound().is_none());
                    assert_eq!(w.lower_bound().unwrap().simple_name(), "Integer");
                }
                other => panic!("expected wildcard, got {:?}", other),
            },
            other => panic!("expected simple argument, got {:?}", other),
        }
    }

    #[test]
    fn test_brackets_on_either_side_of_arguments() {
        let before = parse_type_spec("java.util.List[]<java.lang.String>").unwrap();
        let after = parse_type_spec("java.util.List<java.lang.String>[]").unwrap();
        assert!(same_descriptor(&before, &after));
        assert_eq!(before.array_dimension(), 1);
    }

    #[test]
    fn test_canonical_rendering_reparses() {
        for spec in [
            "Foo",
            "int[]",
            "java.util.Map[]<java.lang.String,?>",
            "a.B<? extends c.D<e.F>,g.H[][]>",
        ] {
            let first = parse_type_spec(spec).unwrap();
            let second = parse_type_spec(&first.to_string()).unwrap();
            assert!(same_descriptor(&first, &second), "{}", spec);
            assert_eq!(first.to_string(), second.to_string());
        }
    }
}
