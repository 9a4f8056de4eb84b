//! # Widget Model
//!
//! The structured side of a builder document: a flat, ordered list of
//! [`WidgetNode`]s. Order is document order (and canvas z-order).
//!
//! Prop values are a closed set of literal shapes. Anything the parser cannot
//! express as one of these variants is dropped rather than stored untyped.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable widget identifier (see [`crate::IdGenerator`])
pub type WidgetId = String;

/// Attribute name → value, in insertion order
pub type Props = IndexMap<String, PropValue>;

/// CSS-like property name → value, in insertion order
pub type StyleMap = IndexMap<String, StyleValue>;

/// Reserved prop keys
pub const STYLE_PROP: &str = "style";
pub const SRC_PROP: &str = "src";
pub const ALT_PROP: &str = "alt";
pub const IMAGES_PROP: &str = "images";

/// One element in the builder's model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetNode {
    pub id: WidgetId,

    #[serde(rename = "type")]
    pub widget_type: String,

    #[serde(default)]
    pub props: Props,

    #[serde(default)]
    pub content: String,
}

impl WidgetNode {
    pub fn new(id: impl Into<WidgetId>, widget_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            widget_type: widget_type.into(),
            props: Props::new(),
            content: String::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.style_mut().insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> WidgetKind {
        WidgetKind::classify(&self.widget_type)
    }

    /// Elements emitted without children or a closing tag
    pub fn is_self_closing(&self) -> bool {
        is_self_closing_type(&self.widget_type)
    }

    pub fn style(&self) -> Option<&StyleMap> {
        match self.props.get(STYLE_PROP) {
            Some(PropValue::Style(style)) => Some(style),
            _ => None,
        }
    }

    /// Get the style map, creating (or replacing a non-map value with) an empty one
    pub fn style_mut(&mut self) -> &mut StyleMap {
        let entry = self
            .props
            .entry(STYLE_PROP.to_string())
            .or_insert_with(|| PropValue::Style(StyleMap::new()));

        if !matches!(entry, PropValue::Style(_)) {
            *entry = PropValue::Style(StyleMap::new());
        }

        match entry {
            PropValue::Style(style) => style,
            _ => unreachable!("style prop was just normalized to a map"),
        }
    }

    /// Same node ignoring its id (ids are not persisted in source text)
    pub fn same_content(&self, other: &WidgetNode) -> bool {
        self.widget_type == other.widget_type
            && self.props == other.props
            && self.content == other.content
    }
}

pub fn is_self_closing_type(widget_type: &str) -> bool {
    matches!(widget_type, "Image" | "img")
}

/// Whether `name` reads back as a single JSX tag or attribute name
pub fn is_jsx_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '-' | ':'))
}

/// Compare two widget lists ignoring ids
pub fn same_widgets(a: &[WidgetNode], b: &[WidgetNode]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_content(y))
}

/// Widget types the builder knows how to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownWidget {
    Button,
    Image,
    Text,
    Table,
    Form,
    Calendar,
    SearchBar,
    ImageSlider,
}

impl KnownWidget {
    pub const ALL: [KnownWidget; 8] = [
        KnownWidget::Button,
        KnownWidget::Image,
        KnownWidget::Text,
        KnownWidget::Table,
        KnownWidget::Form,
        KnownWidget::Calendar,
        KnownWidget::SearchBar,
        KnownWidget::ImageSlider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KnownWidget::Button => "Button",
            KnownWidget::Image => "Image",
            KnownWidget::Text => "Text",
            KnownWidget::Table => "Table",
            KnownWidget::Form => "Form",
            KnownWidget::Calendar => "Calendar",
            KnownWidget::SearchBar => "SearchBar",
            KnownWidget::ImageSlider => "ImageSlider",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.as_str() == name)
    }
}

impl fmt::Display for KnownWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a widget type tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetKind {
    Known(KnownWidget),
    /// Any other identifier, emitted as a literal tag
    Passthrough(String),
}

impl WidgetKind {
    pub fn classify(widget_type: &str) -> Self {
        match KnownWidget::from_name(widget_type) {
            Some(known) => WidgetKind::Known(known),
            None => WidgetKind::Passthrough(widget_type.to_string()),
        }
    }
}

/// A literal prop value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    String(String),
    Number(f64),
    Bool(bool),
    List(Vec<PropValue>),
    Style(StyleMap),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            PropValue::String(_) | PropValue::Number(_) | PropValue::Bool(_)
        )
    }

    /// Narrow to a style value (only scalars qualify)
    pub fn to_style_value(&self) -> Option<StyleValue> {
        match self {
            PropValue::String(s) => Some(StyleValue::String(s.clone())),
            PropValue::Number(n) => Some(StyleValue::Number(*n)),
            PropValue::Bool(b) => Some(StyleValue::Bool(*b)),
            PropValue::List(_) | PropValue::Style(_) => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::String(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::String(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<StyleMap> for PropValue {
    fn from(value: StyleMap) -> Self {
        PropValue::Style(value)
    }
}

impl From<StyleValue> for PropValue {
    fn from(value: StyleValue) -> Self {
        match value {
            StyleValue::String(s) => PropValue::String(s),
            StyleValue::Number(n) => PropValue::Number(n),
            StyleValue::Bool(b) => PropValue::Bool(b),
        }
    }
}

/// A literal style value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    String(String),
    Number(f64),
    Bool(bool),
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::String(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::String(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        StyleValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            WidgetKind::classify("Button"),
            WidgetKind::Known(KnownWidget::Button)
        );
        assert_eq!(
            WidgetKind::classify("section"),
            WidgetKind::Passthrough("section".to_string())
        );
    }

    #[test]
    fn test_style_mut_replaces_non_map() {
        let mut node = WidgetNode::new("a-1", "Button").with_prop("style", "color: red");
        node.style_mut().insert("color".to_string(), "red".into());

        assert_eq!(
            node.style().and_then(|s| s.get("color")),
            Some(&StyleValue::String("red".to_string()))
        );
    }

    #[test]
    fn test_props_equality_ignores_order() {
        let a = WidgetNode::new("1", "Image")
            .with_prop("src", "/a.png")
            .with_prop("alt", "A");
        let b = WidgetNode::new("2", "Image")
            .with_prop("alt", "A")
            .with_prop("src", "/a.png");

        assert!(a.same_content(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_jsx_names() {
        assert!(is_jsx_name("Button"));
        assert!(is_jsx_name("data-id"));
        assert!(!is_jsx_name("Typography.Text"));
        assert!(!is_jsx_name("2col"));
        assert!(!is_jsx_name(""));
    }

    #[test]
    fn test_json_shape() {
        let node = WidgetNode::new("x-1", "Button")
            .with_content("Go")
            .with_style("fontSize", 16.0);

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "Button");
        assert_eq!(json["props"]["style"]["fontSize"], 16.0);

        let back: WidgetNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }
}
