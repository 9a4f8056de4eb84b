//! # Widget Mutations
//!
//! User-facing editing intents over the flat widget list.
//!
//! Every structural mutation is a pure function of the current list: the old
//! list goes in, a new list comes out, and a failed mutation leaves nothing
//! behind. The session then hands the new list to the store and records one
//! history entry.
//!
//! ### EditProperty routing
//! - style fields (`backgroundColor`, `fontSize`, ...) go into `props.style`
//! - `content` goes into the node content (`alt` for `Image`/`img`)
//! - every other field goes into `props`

use serde::{Deserialize, Serialize};
use sitecraft_parser::{
    is_jsx_name, is_self_closing_type, IdGenerator, KnownWidget, ParseError, PropValue,
    StyleValue, WidgetId, WidgetNode, ALT_PROP, IMAGES_PROP, SRC_PROP, STYLE_PROP,
};
use std::collections::HashSet;
use thiserror::Error;

/// Fields routed into `props.style` by [`Mutation::EditProperty`]
pub const STYLE_FIELDS: [&str; 17] = [
    "height",
    "width",
    "padding",
    "margin",
    "color",
    "fontSize",
    "fontWeight",
    "backgroundColor",
    "border",
    "borderRadius",
    "textAlign",
    "display",
    "gap",
    "objectFit",
    "lineHeight",
    "fontFamily",
    "opacity",
];

pub const CONTENT_FIELD: &str = "content";
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Editing intents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Add a widget with type-specific defaults at `index` (end if absent)
    AddWidget {
        widget_type: String,
        #[serde(default)]
        index: Option<usize>,
        #[serde(default)]
        content: Option<String>,
    },

    /// Remove the widget at `from` and reinsert it at `to`
    MoveWidget { from: usize, to: usize },

    DeleteWidget { id: WidgetId },

    EditProperty {
        id: WidgetId,
        field: String,
        value: PropValue,
    },

    /// Set one item of an array prop such as `images`
    SetListItem {
        id: WidgetId,
        field: String,
        index: usize,
        value: PropValue,
    },

    /// Replace the whole list (canvas drops, imports)
    ReplaceWidgets { widgets: Vec<WidgetNode> },

    /// Raw source edit; applied through the store's text path
    ReplaceSource { source: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Property '{field}' of {id} is not a list")]
    NotAList { id: String, field: String },

    #[error("Source edits are not structural")]
    NotStructural,
}

impl Mutation {
    /// Apply to `widgets`, returning the new list. Fresh ids come from `ids`.
    pub fn apply(
        &self,
        widgets: &[WidgetNode],
        ids: &mut IdGenerator,
    ) -> Result<Vec<WidgetNode>, MutationError> {
        let mut widgets = widgets.to_vec();

        match self {
            Mutation::AddWidget {
                widget_type,
                index,
                content,
            } => Self::apply_add(&mut widgets, ids, widget_type, *index, content.as_deref())?,

            Mutation::MoveWidget { from, to } => Self::apply_move(&mut widgets, *from, *to)?,

            Mutation::DeleteWidget { id } => {
                let index = position(&widgets, id)?;
                widgets.remove(index);
            }

            Mutation::EditProperty { id, field, value } => {
                let index = position(&widgets, id)?;
                Self::apply_edit_property(&mut widgets[index], field, value)?;
            }

            Mutation::SetListItem {
                id,
                field,
                index,
                value,
            } => {
                let node = position(&widgets, id)?;
                Self::apply_set_list_item(&mut widgets[node], field, *index, value)?;
            }

            Mutation::ReplaceWidgets { widgets: replacement } => {
                validate_widgets(replacement)?;
                for widget in replacement {
                    ids.observe(&widget.id);
                }
                widgets = replacement.clone();
            }

            Mutation::ReplaceSource { .. } => return Err(MutationError::NotStructural),
        }

        Ok(widgets)
    }

    /// Short description used as the history label
    pub fn label(&self) -> String {
        match self {
            Mutation::AddWidget { widget_type, .. } => format!("Add {}", widget_type),
            Mutation::MoveWidget { from, to } => format!("Move widget {} to {}", from, to),
            Mutation::DeleteWidget { .. } => "Delete widget".to_string(),
            Mutation::EditProperty { field, .. } => format!("Edit {}", field),
            Mutation::SetListItem { field, index, .. } => format!("Edit {}[{}]", field, index),
            Mutation::ReplaceWidgets { .. } => "Replace widgets".to_string(),
            Mutation::ReplaceSource { .. } => "Edit source".to_string(),
        }
    }

    fn apply_add(
        widgets: &mut Vec<WidgetNode>,
        ids: &mut IdGenerator,
        widget_type: &str,
        index: Option<usize>,
        content: Option<&str>,
    ) -> Result<(), MutationError> {
        if !is_jsx_name(widget_type) {
            return Err(MutationError::InvalidValue(format!(
                "'{}' is not a valid widget type",
                widget_type
            )));
        }

        let index = index.unwrap_or(widgets.len());
        if index > widgets.len() {
            return Err(MutationError::IndexOutOfRange {
                index,
                len: widgets.len(),
            });
        }

        let mut node = default_widget(ids.new_id(), widget_type);
        if let Some(content) = content {
            Self::apply_edit_property(&mut node, CONTENT_FIELD, &PropValue::from(content))?;
        }

        widgets.insert(index, node);
        Ok(())
    }

    fn apply_move(widgets: &mut Vec<WidgetNode>, from: usize, to: usize) -> Result<(), MutationError> {
        let len = widgets.len();
        for index in [from, to] {
            if index >= len {
                return Err(MutationError::IndexOutOfRange { index, len });
            }
        }

        let node = widgets.remove(from);
        widgets.insert(to, node);
        Ok(())
    }

    fn apply_edit_property(
        node: &mut WidgetNode,
        field: &str,
        value: &PropValue,
    ) -> Result<(), MutationError> {
        if STYLE_FIELDS.contains(&field) {
            let value = value
                .to_style_value()
                .filter(is_finite_style)
                .ok_or_else(|| {
                    MutationError::InvalidValue(format!(
                        "style field '{}' needs a finite scalar value",
                        field
                    ))
                })?;
            node.style_mut().insert(field.to_string(), value);
            return Ok(());
        }

        if field == CONTENT_FIELD {
            let text = scalar_text(value).ok_or_else(|| {
                MutationError::InvalidValue("content must be a scalar value".to_string())
            })?;

            // Void elements carry no content; their text lives in `alt`
            if node.is_self_closing() {
                node.props.insert(ALT_PROP.to_string(), PropValue::String(text));
            } else {
                node.content = text;
            }
            return Ok(());
        }

        // An empty style map clears the widget's style
        if let PropValue::Style(style) = value {
            if field == STYLE_PROP && style.is_empty() {
                node.props.shift_remove(STYLE_PROP);
                return Ok(());
            }
        }

        check_prop(field, value)?;
        node.props.insert(field.to_string(), value.clone());
        Ok(())
    }

    fn apply_set_list_item(
        node: &mut WidgetNode,
        field: &str,
        index: usize,
        value: &PropValue,
    ) -> Result<(), MutationError> {
        if !value.is_scalar() || !is_literal(value) {
            return Err(MutationError::InvalidValue(
                "list items must be finite scalar values".to_string(),
            ));
        }

        let Some(PropValue::List(items)) = node.props.get_mut(field) else {
            return Err(MutationError::NotAList {
                id: node.id.clone(),
                field: field.to_string(),
            });
        };

        match index.cmp(&items.len()) {
            std::cmp::Ordering::Less => items[index] = value.clone(),
            std::cmp::Ordering::Equal => items.push(value.clone()),
            std::cmp::Ordering::Greater => {
                return Err(MutationError::IndexOutOfRange {
                    index,
                    len: items.len(),
                });
            }
        }

        Ok(())
    }
}

/// A new widget of `widget_type` with its type-specific defaults
pub fn default_widget(id: WidgetId, widget_type: &str) -> WidgetNode {
    let sample = format!("Sample {}", widget_type);
    let node = WidgetNode::new(id, widget_type);

    match KnownWidget::from_name(widget_type) {
        Some(KnownWidget::Image) => node
            .with_prop(SRC_PROP, PLACEHOLDER_IMAGE)
            .with_prop(ALT_PROP, "Sample Image"),
        Some(KnownWidget::ImageSlider) => node
            .with_prop(
                IMAGES_PROP,
                PropValue::List(vec![PropValue::from(PLACEHOLDER_IMAGE)]),
            )
            .with_content(sample),
        Some(KnownWidget::SearchBar) => node
            .with_prop("placeholder", "Search...")
            .with_content(sample),
        _ if is_self_closing_type(widget_type) => node,
        _ => node.with_content(sample),
    }
}

fn position(widgets: &[WidgetNode], id: &str) -> Result<usize, MutationError> {
    widgets
        .iter()
        .position(|w| w.id == id)
        .ok_or_else(|| MutationError::NodeNotFound(id.to_string()))
}

fn scalar_text(value: &PropValue) -> Option<String> {
    match value {
        PropValue::String(s) => Some(s.clone()),
        PropValue::Number(n) => Some(n.to_string()),
        PropValue::Bool(b) => Some(b.to_string()),
        PropValue::List(_) | PropValue::Style(_) => None,
    }
}

/// Reject props the generator cannot write out as an equivalent attribute
fn check_prop(field: &str, value: &PropValue) -> Result<(), MutationError> {
    if !is_jsx_name(field) {
        return Err(MutationError::InvalidValue(format!(
            "'{}' is not a valid property name",
            field
        )));
    }

    let valid = match value {
        PropValue::Style(style) => {
            field == STYLE_PROP
                && !style.is_empty()
                && style
                    .iter()
                    .all(|(key, value)| !key.is_empty() && is_finite_style(value))
        }
        other => field != STYLE_PROP && is_literal(other),
    };

    if valid {
        Ok(())
    } else {
        Err(MutationError::InvalidValue(format!(
            "value has no literal form for property '{}'",
            field
        )))
    }
}

fn is_finite_style(value: &StyleValue) -> bool {
    match value {
        StyleValue::Number(n) => n.is_finite(),
        StyleValue::String(_) | StyleValue::Bool(_) => true,
    }
}

/// Scalars and lists of literals; style maps only live under `style`
fn is_literal(value: &PropValue) -> bool {
    match value {
        PropValue::String(_) | PropValue::Bool(_) => true,
        PropValue::Number(n) => n.is_finite(),
        PropValue::List(items) => items.iter().all(is_literal),
        PropValue::Style(_) => false,
    }
}

fn validate_widgets(widgets: &[WidgetNode]) -> Result<(), MutationError> {
    let mut seen = HashSet::new();

    for widget in widgets {
        if widget.id.is_empty() || !seen.insert(widget.id.as_str()) {
            return Err(MutationError::InvalidValue(format!(
                "widget ids must be unique and non-empty, found '{}'",
                widget.id
            )));
        }
        if !is_jsx_name(&widget.widget_type) {
            return Err(MutationError::InvalidValue(format!(
                "'{}' is not a valid widget type",
                widget.widget_type
            )));
        }
        if widget.is_self_closing() && !widget.content.is_empty() {
            return Err(MutationError::InvalidValue(format!(
                "{} is self-closing and cannot carry content",
                widget.widget_type
            )));
        }
        for (field, value) in &widget.props {
            check_prop(field, value)?;
        }
    }

    Ok(())
}

/// Outcome of a committed mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// History pointer after recording
    pub version: usize,

    /// Id of the widget created by an `AddWidget`
    pub created_id: Option<WidgetId>,

    /// Why a recorded source edit left the widgets stale
    pub parse_error: Option<ParseError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecraft_parser::StyleMap;

    fn ids() -> IdGenerator {
        IdGenerator::new("mutations")
    }

    fn add(widgets: &[WidgetNode], ids: &mut IdGenerator, widget_type: &str) -> Vec<WidgetNode> {
        Mutation::AddWidget {
            widget_type: widget_type.to_string(),
            index: None,
            content: None,
        }
        .apply(widgets, ids)
        .unwrap()
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::EditProperty {
            id: "w-1".to_string(),
            field: "backgroundColor".to_string(),
            value: PropValue::from("#fff"),
        };

        let json = serde_json::to_string(&mutation).unwrap();
        let back: Mutation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mutation);

        let add: Mutation =
            serde_json::from_str(r#"{"AddWidget":{"widget_type":"Button"}}"#).unwrap();
        assert_eq!(
            add,
            Mutation::AddWidget {
                widget_type: "Button".to_string(),
                index: None,
                content: None
            }
        );
    }

    #[test]
    fn test_add_defaults() {
        let mut ids = ids();
        let widgets = add(&[], &mut ids, "Button");
        let widgets = add(&widgets, &mut ids, "Image");
        let widgets = add(&widgets, &mut ids, "ImageSlider");
        let widgets = add(&widgets, &mut ids, "SearchBar");
        let widgets = add(&widgets, &mut ids, "section");

        assert_eq!(widgets[0].content, "Sample Button");
        assert!(widgets[1].content.is_empty());
        assert_eq!(widgets[1].props.get(SRC_PROP), Some(&PropValue::from(PLACEHOLDER_IMAGE)));
        assert_eq!(
            widgets[2].props.get(IMAGES_PROP),
            Some(&PropValue::List(vec![PLACEHOLDER_IMAGE.into()]))
        );
        assert_eq!(widgets[3].props.get("placeholder"), Some(&PropValue::from("Search...")));
        assert_eq!(widgets[4].content, "Sample section");
    }

    #[test]
    fn test_add_at_index_with_content() {
        let mut ids = ids();
        let widgets = add(&[], &mut ids, "Button");

        let widgets = Mutation::AddWidget {
            widget_type: "Text".to_string(),
            index: Some(0),
            content: Some("Hello".to_string()),
        }
        .apply(&widgets, &mut ids)
        .unwrap();

        assert_eq!(widgets[0].widget_type, "Text");
        assert_eq!(widgets[0].content, "Hello");
        assert_ne!(widgets[0].id, widgets[1].id);
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let mut ids = ids();
        let bad_type = Mutation::AddWidget {
            widget_type: "not a tag".to_string(),
            index: None,
            content: None,
        };
        assert!(matches!(
            bad_type.apply(&[], &mut ids),
            Err(MutationError::InvalidValue(_))
        ));

        let bad_index = Mutation::AddWidget {
            widget_type: "Button".to_string(),
            index: Some(1),
            content: None,
        };
        assert_eq!(
            bad_index.apply(&[], &mut ids),
            Err(MutationError::IndexOutOfRange { index: 1, len: 0 })
        );
    }

    #[test]
    fn test_move_preserves_relative_order() {
        let widgets: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| WidgetNode::new(*id, "Button"))
            .collect();

        let moved = Mutation::MoveWidget { from: 0, to: 2 }
            .apply(&widgets, &mut ids())
            .unwrap();
        let order: Vec<_> = moved.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a", "d"]);

        let result = Mutation::MoveWidget { from: 1, to: 4 }.apply(&widgets, &mut ids());
        assert_eq!(result, Err(MutationError::IndexOutOfRange { index: 4, len: 4 }));
    }

    #[test]
    fn test_delete_missing_widget() {
        let result = Mutation::DeleteWidget { id: "nope".to_string() }.apply(&[], &mut ids());
        assert_eq!(result, Err(MutationError::NodeNotFound("nope".to_string())));
    }

    #[test]
    fn test_edit_property_routing() {
        let widgets = vec![
            WidgetNode::new("b", "Button"),
            WidgetNode::new("i", "Image"),
        ];
        let mut ids = ids();

        let edit = |widgets: &[WidgetNode], ids: &mut IdGenerator, id: &str, field: &str, value: PropValue| {
            Mutation::EditProperty {
                id: id.to_string(),
                field: field.to_string(),
                value,
            }
            .apply(widgets, ids)
        };

        let widgets = edit(&widgets, &mut ids, "b", "backgroundColor", "#fff".into()).unwrap();
        let widgets = edit(&widgets, &mut ids, "b", "fontSize", 14.0.into()).unwrap();
        let widgets = edit(&widgets, &mut ids, "b", "content", "Save".into()).unwrap();
        let widgets = edit(&widgets, &mut ids, "b", "type", "primary".into()).unwrap();
        let widgets = edit(&widgets, &mut ids, "i", "content", "A cat".into()).unwrap();

        let style = widgets[0].style().unwrap();
        assert_eq!(style.get("backgroundColor"), Some(&StyleValue::from("#fff")));
        assert_eq!(style.get("fontSize"), Some(&StyleValue::Number(14.0)));
        assert_eq!(widgets[0].content, "Save");
        assert_eq!(widgets[0].props.get("type"), Some(&PropValue::from("primary")));
        assert_eq!(widgets[1].props.get(ALT_PROP), Some(&PropValue::from("A cat")));
        assert!(widgets[1].content.is_empty());

        let nested = PropValue::List(vec![]);
        assert!(matches!(
            edit(&widgets, &mut ids, "b", "color", nested),
            Err(MutationError::InvalidValue(_))
        ));
        assert!(matches!(
            edit(&widgets, &mut ids, "b", "bad name", "x".into()),
            Err(MutationError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_set_list_item() {
        let mut ids = ids();
        let widgets = add(&[], &mut ids, "ImageSlider");
        let id = widgets[0].id.clone();

        let set = |widgets: &[WidgetNode], index: usize| {
            Mutation::SetListItem {
                id: id.clone(),
                field: IMAGES_PROP.to_string(),
                index,
                value: PropValue::from("/next.png"),
            }
            .apply(widgets, &mut IdGenerator::new("other"))
        };

        let replaced = set(&widgets, 0).unwrap();
        let appended = set(&replaced, 1).unwrap();
        assert_eq!(
            appended[0].props.get(IMAGES_PROP),
            Some(&PropValue::List(vec!["/next.png".into(), "/next.png".into()]))
        );
        assert!(matches!(set(&widgets, 5), Err(MutationError::IndexOutOfRange { .. })));

        let not_a_list = Mutation::SetListItem {
            id,
            field: "placeholder".to_string(),
            index: 0,
            value: PropValue::from("x"),
        };
        assert!(matches!(
            not_a_list.apply(&widgets, &mut ids),
            Err(MutationError::NotAList { .. })
        ));
    }

    #[test]
    fn test_replace_widgets_validates_ids() {
        let mut ids = IdGenerator::new("replace");
        let duplicate = vec![WidgetNode::new("a", "Button"), WidgetNode::new("a", "Text")];

        let result = Mutation::ReplaceWidgets { widgets: duplicate }.apply(&[], &mut ids);
        assert!(matches!(result, Err(MutationError::InvalidValue(_))));

        let restored = format!("{}-9", ids.seed());
        let widgets = vec![WidgetNode::new(restored, "Button")];
        Mutation::ReplaceWidgets { widgets }.apply(&[], &mut ids).unwrap();
        assert!(ids.new_id().ends_with("-10"));
    }

    #[test]
    fn test_edit_rejects_values_without_literal_form() {
        let widgets = vec![WidgetNode::new("b", "Button").with_style("color", "red")];
        let edit = |field: &str, value: PropValue| {
            Mutation::EditProperty {
                id: "b".to_string(),
                field: field.to_string(),
                value,
            }
            .apply(&widgets, &mut ids())
        };

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                edit("fontSize", value.into()),
                Err(MutationError::InvalidValue(_))
            ));
            assert!(matches!(
                edit("tabIndex", value.into()),
                Err(MutationError::InvalidValue(_))
            ));

            let mut style = StyleMap::new();
            style.insert("opacity".to_string(), StyleValue::Number(value));
            assert!(matches!(
                edit(STYLE_PROP, PropValue::Style(style)),
                Err(MutationError::InvalidValue(_))
            ));
        }

        let cleared = edit(STYLE_PROP, PropValue::Style(StyleMap::new())).unwrap();
        assert!(cleared[0].style().is_none());
        assert!(!cleared[0].props.contains_key(STYLE_PROP));
    }

    #[test]
    fn test_replace_widgets_rejects_unwritable_lists() {
        let rejected = |widget: WidgetNode| {
            matches!(
                Mutation::ReplaceWidgets { widgets: vec![widget] }.apply(&[], &mut ids()),
                Err(MutationError::InvalidValue(_))
            )
        };

        let mut nan_style = StyleMap::new();
        nan_style.insert("width".to_string(), StyleValue::Number(f64::NAN));

        assert!(rejected(WidgetNode::new("a", "Image").with_content("caption")));
        assert!(rejected(WidgetNode::new("a", "img").with_content("caption")));
        assert!(rejected(WidgetNode::new("a", "Button").with_prop("bad name", "x")));
        assert!(rejected(WidgetNode::new("a", "Button").with_prop("theme", StyleMap::new())));
        assert!(rejected(WidgetNode::new("a", "Button").with_prop(STYLE_PROP, StyleMap::new())));
        assert!(rejected(WidgetNode::new("a", "Button").with_prop(STYLE_PROP, nan_style)));
        assert!(rejected(WidgetNode::new("a", "Button").with_prop("size", f64::INFINITY)));
        assert!(rejected(WidgetNode::new("a", "Button").with_prop(STYLE_PROP, "color: red")));
        assert!(rejected(WidgetNode::new("a", "ImageSlider").with_prop(
            IMAGES_PROP,
            PropValue::List(vec![PropValue::Style(StyleMap::new())]),
        )));

        let fine = WidgetNode::new("a", "Image")
            .with_prop(SRC_PROP, "/a.png")
            .with_prop(ALT_PROP, "caption")
            .with_style("width", 120.0);
        assert!(!rejected(fine));
    }

    #[test]
    fn test_replace_source_is_not_structural() {
        let result = Mutation::ReplaceSource { source: String::new() }.apply(&[], &mut ids());
        assert_eq!(result, Err(MutationError::NotStructural));
    }
}
