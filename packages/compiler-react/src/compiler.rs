use crate::context::{CompileOptions, CompilerContext};
use sitecraft_parser::{
    is_jsx_name, KnownWidget, PropValue, StyleMap, StyleValue, WidgetKind, WidgetNode, ALT_PROP,
    SRC_PROP, STYLE_PROP,
};

/// Known widgets that are imported from the UI library, in the order they
/// may appear in the import list (after `Typography`)
const LIBRARY_WIDGETS: [KnownWidget; 5] = [
    KnownWidget::Button,
    KnownWidget::Image,
    KnownWidget::Table,
    KnownWidget::Calendar,
    KnownWidget::Form,
];

/// Words the lexer reserves; style keys spelled like these are quoted
const RESERVED_WORDS: [&str; 14] = [
    "import", "from", "as", "export", "default", "const", "let", "var", "function", "return",
    "true", "false", "null", "undefined",
];

/// Compile a widget list to a React component module
pub fn compile_to_react(widgets: &[WidgetNode], options: &CompileOptions) -> String {
    let ctx = CompilerContext::new(options.clone());

    compile_imports(widgets, &ctx);
    compile_component(widgets, &ctx);

    ctx.get_output()
}

/// Compile with the default options
pub fn generate(widgets: &[WidgetNode]) -> String {
    compile_to_react(widgets, &CompileOptions::default())
}

fn compile_imports(widgets: &[WidgetNode], ctx: &CompilerContext) {
    ctx.add_line("import React from 'react';");

    let names = library_imports(widgets);
    if !names.is_empty() {
        ctx.add_line(&format!(
            "import {{ {} }} from {};",
            names.join(", "),
            quote_js_string(&ctx.options.ui_library, '\'')
        ));
    }

    ctx.add_blank_line();
}

/// Library components used by the list: `Typography` first when any `Text`
/// node exists, then the others in discovery order
fn library_imports(widgets: &[WidgetNode]) -> Vec<&'static str> {
    let mut names = Vec::new();

    if widgets
        .iter()
        .any(|w| w.kind() == WidgetKind::Known(KnownWidget::Text))
    {
        names.push("Typography");
    }

    for widget in widgets {
        if let WidgetKind::Known(known) = widget.kind() {
            if LIBRARY_WIDGETS.contains(&known) && !names.contains(&known.as_str()) {
                names.push(known.as_str());
            }
        }
    }

    names
}

fn compile_component(widgets: &[WidgetNode], ctx: &CompilerContext) {
    let requested = ctx.options.component_name.as_str();
    let name = if is_identifier(requested) && !RESERVED_WORDS.contains(&requested) {
        ctx.options.component_name.clone()
    } else {
        CompileOptions::default().component_name
    };

    ctx.add_line(&format!("const {} = () => {{", name));
    ctx.indent();
    ctx.add_line("return (");
    ctx.indent();

    let container_style = &ctx.options.container_style;
    if container_style.is_empty() {
        ctx.add_line("<div>");
    } else {
        ctx.add_line(&format!("<div style={}>", style_object(container_style)));
    }

    ctx.indent();
    for widget in widgets {
        compile_widget(widget, ctx);
    }
    ctx.dedent();

    ctx.add_line("</div>");
    ctx.dedent();
    ctx.add_line(");");
    ctx.dedent();
    ctx.add_line("};");
    ctx.add_blank_line();
    ctx.add_line(&format!("export default {};", name));
}

fn compile_widget(widget: &WidgetNode, ctx: &CompilerContext) {
    let tag = match widget.kind() {
        WidgetKind::Known(KnownWidget::Text) => "Typography.Text",
        _ => widget.widget_type.as_str(),
    };

    let mut line = format!("<{}", tag);
    for (name, value) in ordered_props(widget) {
        if let Some(attr) = compile_attribute(name, value) {
            line.push(' ');
            line.push_str(&attr);
        }
    }

    if widget.is_self_closing() {
        line.push_str(" />");
    } else {
        line.push('>');
        line.push_str(&compile_content(&widget.content));
        line.push_str(&format!("</{}>", tag));
    }

    ctx.add_line(&line);
}

/// `style`, `src`, `alt`, then the rest in insertion order
fn ordered_props(widget: &WidgetNode) -> Vec<(&str, &PropValue)> {
    let leading = [STYLE_PROP, SRC_PROP, ALT_PROP];

    let mut props: Vec<(&str, &PropValue)> = leading
        .iter()
        .filter_map(|key| widget.props.get_key_value(*key))
        .map(|(k, v)| (k.as_str(), v))
        .collect();

    props.extend(
        widget
            .props
            .iter()
            .filter(|(k, _)| !leading.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v)),
    );

    props
}

/// Render one attribute, or `None` when the value has no JSX literal form
fn compile_attribute(name: &str, value: &PropValue) -> Option<String> {
    if !is_jsx_name(name) {
        return None;
    }

    let rendered = match value {
        PropValue::Style(style) if name == STYLE_PROP => {
            if style.is_empty() {
                return None;
            }
            style_object(style)
        }
        PropValue::Style(_) => return None,
        PropValue::String(s) if !s.contains('"') => format!("\"{}\"", s),
        other => format!("{{{}}}", js_literal(other)?),
    };

    Some(format!("{}={}", name, rendered))
}

fn compile_content(content: &str) -> String {
    let survives_as_text = content.trim() == content
        && !content.contains(|c| matches!(c, '{' | '}' | '<' | '>'));

    if survives_as_text {
        content.to_string()
    } else {
        format!("{{{}}}", quote_js_string(content, '"'))
    }
}

/// `{{ key: 'value', other: 12 }}`
fn style_object(style: &StyleMap) -> String {
    let entries: Vec<String> = style
        .iter()
        .filter_map(|(key, value)| {
            let value = match value {
                StyleValue::String(s) => quote_js_string(s, '\''),
                StyleValue::Number(n) => format_number(*n)?,
                StyleValue::Bool(b) => b.to_string(),
            };
            Some(format!("{}: {}", style_key(key), value))
        })
        .collect();

    format!("{{{{ {} }}}}", entries.join(", "))
}

fn style_key(key: &str) -> String {
    if is_identifier(key) && !RESERVED_WORDS.contains(&key) {
        key.to_string()
    } else {
        quote_js_string(key, '\'')
    }
}

fn js_literal(value: &PropValue) -> Option<String> {
    match value {
        PropValue::String(s) => Some(quote_js_string(s, '"')),
        PropValue::Number(n) => format_number(*n),
        PropValue::Bool(b) => Some(b.to_string()),
        PropValue::List(items) => {
            let items = items.iter().map(js_literal).collect::<Option<Vec<_>>>()?;
            Some(format!("[{}]", items.join(", ")))
        }
        PropValue::Style(_) => None,
    }
}

/// Non-finite numbers have no literal form
fn format_number(n: f64) -> Option<String> {
    n.is_finite().then(|| n.to_string())
}

/// Quote and escape a string as a JS string literal
pub(crate) fn quote_js_string(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);

    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }

    out.push(quote);
    out
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
