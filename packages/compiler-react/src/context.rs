use sitecraft_parser::{StyleMap, StyleValue};
use std::cell::RefCell;
use std::rc::Rc;

/// Options for React generation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Name of the generated component (and its default export)
    pub component_name: String,
    /// Inline style of the root container
    pub container_style: StyleMap,
    /// Module the known widget components are imported from
    pub ui_library: String,
}

impl CompileOptions {
    pub fn with_component_name(mut self, name: impl Into<String>) -> Self {
        self.component_name = name.into();
        self
    }

    pub fn with_ui_library(mut self, module: impl Into<String>) -> Self {
        self.ui_library = module.into();
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        let container_style: StyleMap = [
            ("display", "grid"),
            ("gridTemplateColumns", "repeat(2, 1fr)"),
            ("gap", "12px"),
            ("padding", "20px"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), StyleValue::String(v.to_string())))
        .collect();

        Self {
            component_name: "GeneratedComponent".to_string(),
            container_style,
            ui_library: "antd".to_string(),
        }
    }
}

/// Compilation context for managing state during code generation
pub struct CompilerContext {
    buffer: Rc<RefCell<String>>,
    indent_level: Rc<RefCell<usize>>,
    pub options: CompileOptions,
}

impl CompilerContext {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            buffer: Rc::new(RefCell::new(String::new())),
            indent_level: Rc::new(RefCell::new(0)),
            options,
        }
    }

    pub fn add(&self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }

    pub fn add_line(&self, text: &str) {
        self.add_indented(text);
        self.add("\n");
    }

    /// Blank line (no trailing indentation)
    pub fn add_blank_line(&self) {
        self.add("\n");
    }

    pub fn add_indented(&self, text: &str) {
        let indent = "  ".repeat(*self.indent_level.borrow());
        let mut buffer = self.buffer.borrow_mut();
        buffer.push_str(&indent);
        buffer.push_str(text);
    }

    pub fn indent(&self) {
        *self.indent_level.borrow_mut() += 1;
    }

    pub fn dedent(&self) {
        let mut level = self.indent_level.borrow_mut();
        if *level > 0 {
            *level -= 1;
        }
    }

    pub fn get_output(&self) -> String {
        self.buffer.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation() {
        let ctx = CompilerContext::new(CompileOptions::default());
        ctx.add_line("a");
        ctx.indent();
        ctx.add_line("b");
        ctx.dedent();
        ctx.dedent();
        ctx.add_line("c");

        assert_eq!(ctx.get_output(), "a\n  b\nc\n");
    }
}
