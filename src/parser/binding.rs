//! Attribute value bindings
//!
//! An attribute value is static text with optional `@{expr}` segments whose
//! content is copied verbatim into generated code.

use super::lexer::{ExprToken, TextToken};
use crate::ast::{Literal, NodeId, NodeKind};
use crate::codegen::TranslationContext;
use crate::error::{Error, Result};
use crate::types::TypeDescriptor;
use logos::{Lexer, Logos};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Static(String),
    Dynamic(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    segments: Vec<Segment>,
}

/// Split `value` into static and dynamic segments
pub fn parse_binding(value: &str) -> Result<Binding> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut lexer = TextToken::lexer(value);

    while let Some(token) = lexer.next() {
        if token != Ok(TextToken::Open) {
            text.push_str(lexer.slice());
            continue;
        }
        if !text.is_empty() {
            segments.push(Segment::Static(std::mem::take(&mut text)));
        }
        let mut expr = lexer.morph::<ExprToken>();
        let expression = read_expression(&mut expr)
            .ok_or_else(|| Error::invalid_binding(value, "unterminated '@{'"))?;
        if expression.trim().is_empty() {
            return Err(Error::invalid_binding(value, "empty expression"));
        }
        segments.push(Segment::Dynamic(expression.trim().to_string()));
        lexer = expr.morph();
    }

    if !text.is_empty() {
        segments.push(Segment::Static(text));
    }
    Ok(Binding { segments })
}

/// Expression text up to the brace closing `@{`; `None` when the value ends first
fn read_expression(lexer: &mut Lexer<'_, ExprToken>) -> Option<String> {
    let mut expression = String::new();
    // braces opened inside the expression
    let mut depth = 0usize;
    while let Some(token) = lexer.next() {
        match token {
            Ok(ExprToken::RBrace) if depth == 0 => return Some(expression),
            Ok(ExprToken::RBrace) => depth -= 1,
            Ok(ExprToken::LBrace) => depth += 1,
            _ => {}
        }
        expression.push_str(lexer.slice());
    }
    None
}

impl Binding {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_static(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Static(_)))
    }

    /// Expression text when the whole value is one dynamic segment
    pub fn single_expression(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [Segment::Dynamic(expression)] => Some(expression),
            _ => None,
        }
    }

    /// Concatenated text when the value has no dynamic segment
    pub fn static_text(&self) -> Option<String> {
        if !self.is_static() {
            return None;
        }
        Some(
            self.segments
                .iter()
                .map(|s| match s {
                    Segment::Static(t) | Segment::Dynamic(t) => t.as_str(),
                })
                .collect(),
        )
    }

    /// Build the expression node assigning this value to a `target` slot.
    ///
    /// Static values become literals typed by `target`, a lone dynamic segment
    /// becomes a raw expression, mixed values become a string concatenation.
    pub fn to_expression(&self, tc: &mut TranslationContext, target: &TypeDescriptor) -> Result<NodeId> {
        if let Some(text) = self.static_text() {
            let kind = static_literal(&text, target)?;
            return tc.ast_mut().add(kind);
        }
        if let Some(expression) = self.single_expression() {
            return tc.ast_mut().add(NodeKind::RawExpr(expression.to_string()));
        }

        let mut parts = Vec::with_capacity(self.segments.len() + 1);
        if matches!(self.segments.first(), Some(Segment::Dynamic(_))) {
            parts.push("\"\"".to_string());
        }
        for segment in &self.segments {
            match segment {
                Segment::Static(text) => parts.push(Literal::String(text.clone()).to_string()),
                Segment::Dynamic(expression) => parts.push(format!("({})", expression)),
            }
        }
        tc.ast_mut().add(NodeKind::RawExpr(parts.join(" + ")))
    }
}

/// `java.lang` types that take literal values and may be written unqualified
const JAVA_LANG_LITERAL_TYPES: &[&str] = &[
    "String", "Object", "CharSequence", "Boolean", "Byte", "Short", "Integer", "Long", "Character",
];

fn static_literal(text: &str, target: &TypeDescriptor) -> Result<NodeKind> {
    if target.is_array() {
        return Ok(NodeKind::RawExpr(text.to_string()));
    }
    let implicit;
    let name = match target.qualified_name() {
        n if !target.has_package() && JAVA_LANG_LITERAL_TYPES.contains(&n) => {
            implicit = format!("java.lang.{}", n);
            implicit.as_str()
        }
        n => n,
    };
    let literal = match name {
        "java.lang.String" | "java.lang.Object" | "java.lang.CharSequence" => {
            Literal::String(text.to_string())
        }
        "boolean" | "java.lang.Boolean" => match text.trim() {
            "true" => Literal::Boolean(true),
            "false" => Literal::Boolean(false),
            other => {
                return Err(Error::invalid_binding(
                    other,
                    format!("not a {} value", target.simple_name()),
                ))
            }
        },
        "byte" | "java.lang.Byte" => Literal::Integer(integer::<i8>(text, target)?),
        "short" | "java.lang.Short" => Literal::Integer(integer::<i16>(text, target)?),
        "int" | "java.lang.Integer" => Literal::Integer(integer::<i32>(text, target)?),
        "long" | "java.lang.Long" => {
            return Ok(NodeKind::RawExpr(format!("{}L", integer::<i64>(text, target)?)))
        }
        "char" | "java.lang.Character" => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Literal::Char(c),
                _ => return Err(Error::invalid_binding(text, "expected a single character")),
            }
        }
        _ => return Ok(NodeKind::RawExpr(text.trim().to_string())),
    };
    Ok(NodeKind::Literal(literal))
}

/// Parse `text` within the range of `T`, the Java integer type of `target`
fn integer<T>(text: &str, target: &TypeDescriptor) -> Result<i64>
where
    T: FromStr + Into<i64>,
{
    text.trim()
        .parse::<T>()
        .map(Into::into)
        .map_err(|_| Error::invalid_binding(text, format!("not a {} value", target.simple_name())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::natives;

    fn render(tc: &TranslationContext, id: NodeId) -> String {
        match tc.ast().kind(id) {
            NodeKind::Literal(l) => l.to_string(),
            NodeKind::RawExpr(t) => t.clone(),
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_split_segments() {
        let b = parse_binding("Hello @{user.getName()}!").unwrap();
        assert_eq!(
            b.segments(),
            &[
                Segment::Static("Hello ".into()),
                Segment::Dynamic("user.getName()".into()),
                Segment::Static("!".into()),
            ]
        );
        assert!(!b.is_static());

        let b = parse_binding("@{ map.get(\"}\") }").unwrap();
        assert_eq!(b.single_expression(), Some("map.get(\"}\")"));

        let b = parse_binding("@{new int[]{1, 2}}").unwrap();
        assert_eq!(b.single_expression(), Some("new int[]{1, 2}"));

        let b = parse_binding("@{format(\"a@b}\", x)} and @{y}").unwrap();
        assert_eq!(
            b.segments(),
            &[
                Segment::Dynamic("format(\"a@b}\", x)".into()),
                Segment::Static(" and ".into()),
                Segment::Dynamic("y".into()),
            ]
        );

        let b = parse_binding("mail@host {x}").unwrap();
        assert_eq!(b.static_text().as_deref(), Some("mail@host {x}"));
    }

    #[test]
    fn test_malformed_bindings() {
        assert!(matches!(parse_binding("a @{b"), Err(Error::InvalidBinding { .. })));
        assert!(matches!(parse_binding("@{  }"), Err(Error::InvalidBinding { .. })));
    }

    #[test]
    fn test_expressions_follow_target_type() {
        let mut tc = TranslationContext::new("index.wui", &Config::default()).unwrap();
        let string = TypeDescriptor::from_native(&natives::STRING);
        let int = TypeDescriptor::from_native(&natives::INT);
        let boolean = TypeDescriptor::from_native(&natives::BOOLEAN);

        let id = parse_binding("say \"hi\"").unwrap().to_expression(&mut tc, &string).unwrap();
        assert_eq!(render(&tc, id), "\"say \\\"hi\\\"\"");
        let id = parse_binding(" 42 ").unwrap().to_expression(&mut tc, &int).unwrap();
        assert_eq!(render(&tc, id), "42");
        let id = parse_binding("true").unwrap().to_expression(&mut tc, &boolean).unwrap();
        assert_eq!(render(&tc, id), "true");
        assert!(parse_binding("yes").unwrap().to_expression(&mut tc, &boolean).is_err());

        let id = parse_binding("@{count}").unwrap().to_expression(&mut tc, &int).unwrap();
        assert_eq!(render(&tc, id), "count");
        let id = parse_binding("@{a}@{b} items").unwrap().to_expression(&mut tc, &string).unwrap();
        assert_eq!(render(&tc, id), "\"\" + (a) + (b) + \" items\"");
    }

    #[test]
    fn test_integer_literals_respect_target_range() {
        let mut tc = TranslationContext::new("index.wui", &Config::default()).unwrap();
        let cases = [
            ("byte", "127", Some("127")),
            ("byte", "-128", Some("-128")),
            ("byte", "128", None),
            ("short", "32767", Some("32767")),
            ("short", "-32769", None),
            ("int", "2147483647", Some("2147483647")),
            ("int", "-2147483648", Some("-2147483648")),
            ("int", "3000000000", None),
            ("Integer", "2147483648", None),
            ("long", "3000000000", Some("3000000000L")),
            ("long", "9223372036854775808", None),
        ];
        for (ty, value, expected) in cases {
            let target = TypeDescriptor::new(ty).unwrap();
            let result = parse_binding(value).unwrap().to_expression(&mut tc, &target);
            match expected {
                Some(text) => assert_eq!(render(&tc, result.unwrap()), text, "{} {}", ty, value),
                None => assert!(
                    matches!(result, Err(Error::InvalidBinding { .. })),
                    "{} {} should not fit",
                    ty,
                    value
                ),
            }
        }
    }
}
