//! Lowering from the JSX syntax tree to the flat widget list.
//!
//! Descendants of the component's root container are flattened pre-order:
//! a parent is emitted before its descendants and fragments are transparent.
//! Values that are not literals are dropped without error.

use crate::ast::{AttrValue, JsxChild, JsxElement, JsxExpression, Literal, Program};
use crate::id_generator::IdGenerator;
use crate::widget::{PropValue, Props, StyleMap, StyleValue, WidgetNode, STYLE_PROP};

/// Flatten the root container's descendants into widgets with fresh ids
pub fn lower(program: &Program, ids: &mut IdGenerator) -> Vec<WidgetNode> {
    let mut widgets = Vec::new();
    lower_children(&program.component.root, ids, &mut widgets);
    widgets
}

fn lower_children(parent: &JsxElement, ids: &mut IdGenerator, out: &mut Vec<WidgetNode>) {
    for child in &parent.children {
        let JsxChild::Element(element) = child else {
            continue;
        };

        if element.name.is_fragment() {
            lower_children(element, ids, out);
            continue;
        }

        out.push(lower_element(element, ids));
        lower_children(element, ids, out);
    }
}

fn lower_element(element: &JsxElement, ids: &mut IdGenerator) -> WidgetNode {
    let mut props = Props::new();

    for attr in &element.attributes {
        if let Some(value) = attr_to_prop(&attr.name, &attr.value) {
            props.insert(attr.name.clone(), value);
        }
    }

    WidgetNode {
        id: ids.new_id(),
        widget_type: element.name.last_segment().to_string(),
        props,
        content: direct_text(element),
    }
}

/// Literal text directly inside an element: trimmed text chunks plus string
/// literal containers, space-joined
fn direct_text(element: &JsxElement) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for child in &element.children {
        match child {
            JsxChild::Text { value, .. } => {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed);
                }
            }
            JsxChild::Expression {
                expression: JsxExpression::Literal(Literal::String(s)),
                ..
            } if !s.is_empty() => parts.push(s),
            _ => {}
        }
    }

    parts.join(" ")
}

fn attr_to_prop(name: &str, value: &AttrValue) -> Option<PropValue> {
    match value {
        AttrValue::Absent => Some(PropValue::Bool(true)),
        AttrValue::Literal(Literal::Object(entries)) if name == STYLE_PROP => {
            Some(PropValue::Style(style_map(entries)))
        }
        AttrValue::Literal(literal) => literal_to_prop(literal),
        AttrValue::Dynamic => None,
    }
}

fn literal_to_prop(literal: &Literal) -> Option<PropValue> {
    match literal {
        Literal::String(s) => Some(PropValue::String(s.clone())),
        Literal::Number(n) => Some(PropValue::Number(*n)),
        Literal::Bool(b) => Some(PropValue::Bool(*b)),
        // All or nothing: a partially literal array is not the same array
        Literal::Array(items) => items
            .iter()
            .map(literal_to_prop)
            .collect::<Option<Vec<_>>>()
            .map(PropValue::List),
        Literal::Object(_) => None,
    }
}

fn style_map(entries: &[(String, Literal)]) -> StyleMap {
    entries
        .iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Literal::String(s) => StyleValue::String(s.clone()),
                Literal::Number(n) => StyleValue::Number(*n),
                Literal::Bool(b) => StyleValue::Bool(*b),
                Literal::Array(_) | Literal::Object(_) => return None,
            };
            Some((key.clone(), value))
        })
        .collect()
}
