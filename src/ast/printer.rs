use crate::consts::INDENT_WIDTH;

/// Text sink that indents by nesting level
///
/// Indentation is written lazily at the first `print` of each line, so callers
/// only track structure through [`SourcePrinter::indent`] / [`SourcePrinter::dedent`].
#[derive(Debug, Default)]
pub struct SourcePrinter {
    level: usize,
    indented: bool,
    output: String,
}

impl SourcePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        if !self.indented {
            for _ in 0..self.level * INDENT_WIDTH {
                self.output.push(' ');
            }
            self.indented = true;
        }
    }

    pub fn print(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(text);
    }

    pub fn println(&mut self, text: &str) {
        self.print(text);
        self.newline();
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
        self.indented = false;
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation_follows_level() {
        let mut p = SourcePrinter::new();
        p.println("a {");
        p.indent();
        p.print("b");
        p.println("();");
        p.newline();
        p.dedent();
        p.dedent();
        p.println("}");
        assert_eq!(p.into_output(), "a {\n    b();\n\n}\n");
    }
}
