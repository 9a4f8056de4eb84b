//! # Session Persistence
//!
//! A session is saved as one JSON record holding the current document, the
//! selection, the whole history and the cosmetic view state. Restoring
//! rebuilds history and store together: the store always starts at the
//! history's current snapshot.
//!
//! Older records are migrated while loading:
//! - `code` is accepted for `sourceText`
//! - widget ids may be numbers
//! - a widget-level `style` map is folded into `props.style`
//! - layout fields (`x`, `y`) and unknown prop values are dropped

use crate::config::{EditorConfig, Theme};
use crate::document::{Document, WidgetStore, DEFAULT_TEMPLATE};
use crate::errors::EditorError;
use crate::history::{History, HistoryEntry};
use crate::session::{Cosmetics, EditSession};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sitecraft_compiler_react::compile_to_react;
use sitecraft_parser::{
    parse_with_ids, IdGenerator, PropValue, Props, StyleMap, StyleValue, WidgetId, WidgetNode,
    STYLE_PROP,
};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Serialized session record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default, alias = "code")]
    pub source_text: Option<String>,

    #[serde(default, deserialize_with = "deserialize_widgets_opt")]
    pub widgets: Option<Vec<WidgetNode>>,

    #[serde(default, deserialize_with = "deserialize_id_opt")]
    pub selected_widget_id: Option<WidgetId>,

    #[serde(default)]
    pub history: Option<Vec<PersistedEntry>>,

    #[serde(default)]
    pub pointer: Option<usize>,

    #[serde(default)]
    pub theme: Option<Theme>,

    #[serde(default)]
    pub zoom: Option<f64>,

    #[serde(default, alias = "isEditMode")]
    pub edit_mode: bool,

    #[serde(default, alias = "isVisualEditMode")]
    pub visual_edit_mode: bool,
}

/// One serialized history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEntry {
    #[serde(default, deserialize_with = "deserialize_widgets")]
    pub widgets: Vec<WidgetNode>,

    #[serde(default, alias = "code")]
    pub source_text: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stale: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PersistedState {
    /// Capture the full state of a session
    pub fn capture(session: &EditSession) -> Self {
        let history = session.history();
        let cosmetics = session.cosmetics();

        Self {
            source_text: Some(session.source_text().to_string()),
            widgets: Some(session.widgets().to_vec()),
            selected_widget_id: session.selected_id().map(str::to_string),
            history: Some(
                history
                    .entries()
                    .iter()
                    .map(|entry| PersistedEntry {
                        widgets: entry.document.widgets.clone(),
                        source_text: entry.document.source_text.clone(),
                        stale: entry.document.stale,
                        label: entry.label.clone(),
                    })
                    .collect(),
            ),
            pointer: Some(history.pointer()),
            theme: Some(cosmetics.theme),
            zoom: Some(cosmetics.zoom),
            edit_mode: cosmetics.edit_mode,
            visual_edit_mode: cosmetics.visual_edit_mode,
        }
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EditorError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

impl EditSession {
    /// Serializable snapshot of this session
    pub fn snapshot(&self) -> PersistedState {
        PersistedState::capture(self)
    }

    /// Rebuild a session from a persisted record
    pub fn restore(state: PersistedState, config: EditorConfig) -> Result<Self, EditorError> {
        let mut ids = IdGenerator::new(&config.session_name);
        let options = config.compile_options();
        let template = config.default_template.as_deref().unwrap_or(DEFAULT_TEMPLATE);

        // Restored ids must never be minted again
        let restored = state.widgets.iter().flatten().chain(
            state
                .history
                .iter()
                .flatten()
                .flat_map(|entry| entry.widgets.iter()),
        );
        for widget in restored {
            ids.observe(&widget.id);
        }

        let (entries, pointer) = match state.history {
            Some(entries) if !entries.is_empty() => {
                let pointer = state.pointer.unwrap_or(entries.len() - 1);
                let entries: Vec<HistoryEntry> = entries
                    .into_iter()
                    .map(|entry| {
                        let document = Document {
                            widgets: unique_ids(entry.widgets, &mut ids),
                            source_text: entry.source_text,
                            stale: entry.stale,
                        };
                        HistoryEntry::new(Arc::new(document), entry.label)
                    })
                    .collect();
                (entries, pointer)
            }
            // Without history the stored pointer means nothing
            _ => {
                let document = match (state.widgets, state.source_text) {
                    (Some(widgets), Some(source_text)) => {
                        let stale = parse_with_ids(&source_text, &mut ids.clone()).is_err();
                        Document {
                            widgets: unique_ids(widgets, &mut ids),
                            source_text,
                            stale,
                        }
                    }
                    (Some(widgets), None) => {
                        let widgets = unique_ids(widgets, &mut ids);
                        let source_text = compile_to_react(&widgets, &options);
                        Document::new(widgets, source_text)
                    }
                    (None, source_text) => {
                        let source_text = source_text.unwrap_or_else(|| template.to_string());
                        match parse_with_ids(&source_text, &mut ids) {
                            Ok(widgets) => Document::new(widgets, source_text),
                            Err(err) => {
                                warn!(error = %err, "restored source does not parse");
                                Document {
                                    widgets: Vec::new(),
                                    source_text,
                                    stale: true,
                                }
                            }
                        }
                    }
                };
                (vec![HistoryEntry::new(Arc::new(document), None)], 0)
            }
        };

        let history = History::from_parts(entries, pointer, config.history_limit)?;

        let store = WidgetStore::from_document(history.current(), ids, options);
        let cosmetics = Cosmetics {
            theme: state.theme.unwrap_or(config.theme),
            zoom: state.zoom.filter(|z| z.is_finite() && *z > 0.0).unwrap_or(config.zoom),
            edit_mode: state.edit_mode,
            visual_edit_mode: state.visual_edit_mode,
        };

        info!(
            entries = history.len(),
            pointer = history.pointer(),
            "restored session"
        );

        Ok(EditSession::from_parts(
            store,
            history,
            state.selected_widget_id,
            cosmetics,
            config,
        ))
    }
}

/// Give duplicate (or empty) ids within one list fresh ones
fn unique_ids(widgets: Vec<WidgetNode>, ids: &mut IdGenerator) -> Vec<WidgetNode> {
    let mut seen = HashSet::new();

    widgets
        .into_iter()
        .map(|mut widget| {
            if widget.id.is_empty() || !seen.insert(widget.id.clone()) {
                widget.id = ids.new_id();
                seen.insert(widget.id.clone());
            }
            widget
        })
        .collect()
}

// Legacy-tolerant widget decoding

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_id(self) -> WidgetId {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawWidget {
    id: RawId,

    #[serde(rename = "type")]
    widget_type: String,

    #[serde(default)]
    props: Option<IndexMap<String, Value>>,

    #[serde(default)]
    content: Option<Value>,

    /// Flat style map of the legacy widget shape
    #[serde(default)]
    style: Option<IndexMap<String, Value>>,
}

impl RawWidget {
    fn into_widget(self) -> WidgetNode {
        let mut props = Props::new();
        for (key, value) in self.props.unwrap_or_default() {
            if let Some(value) = value_to_prop(&key, value) {
                props.insert(key, value);
            }
        }

        let mut widget = WidgetNode {
            id: self.id.into_id(),
            widget_type: self.widget_type,
            props,
            content: self.content.and_then(value_to_text).unwrap_or_default(),
        };

        if let Some(legacy) = self.style {
            let legacy = style_map(legacy);
            if !legacy.is_empty() {
                let style = widget.style_mut();
                for (key, value) in legacy {
                    style.entry(key).or_insert(value);
                }
            }
        }

        widget
    }
}

fn value_to_prop(key: &str, value: Value) -> Option<PropValue> {
    match value {
        Value::String(s) => Some(PropValue::String(s)),
        Value::Number(n) => n.as_f64().map(PropValue::Number),
        Value::Bool(b) => Some(PropValue::Bool(b)),
        Value::Array(items) => items
            .into_iter()
            .map(|item| value_to_prop("", item))
            .collect::<Option<Vec<_>>>()
            .map(PropValue::List),
        Value::Object(map) if key == STYLE_PROP => {
            Some(PropValue::Style(style_map(map.into_iter().collect())))
        }
        Value::Object(_) | Value::Null => None,
    }
}

fn style_map(entries: IndexMap<String, Value>) -> StyleMap {
    entries
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) => StyleValue::String(s),
                Value::Number(n) => StyleValue::Number(n.as_f64()?),
                Value::Bool(b) => StyleValue::Bool(b),
                _ => return None,
            };
            Some((key, value))
        })
        .collect()
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn deserialize_widgets<'de, D>(deserializer: D) -> Result<Vec<WidgetNode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<RawWidget>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(RawWidget::into_widget).collect())
}

fn deserialize_widgets_opt<'de, D>(deserializer: D) -> Result<Option<Vec<WidgetNode>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<RawWidget>>::deserialize(deserializer)?;
    Ok(raw.map(|widgets| widgets.into_iter().map(RawWidget::into_widget).collect()))
}

fn deserialize_id_opt<'de, D>(deserializer: D) -> Result<Option<WidgetId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(RawId::into_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_widget_migration() {
        let json = r#"{
            "id": 1712345678901,
            "type": "Button",
            "x": 10,
            "y": 20,
            "style": { "color": "red", "width": 120, "shadow": { "x": 1 } },
            "props": { "style": { "color": "blue" }, "onClick": null, "size": "large" },
            "content": "Go"
        }"#;

        let raw: RawWidget = serde_json::from_str(json).unwrap();
        let widget = raw.into_widget();

        assert_eq!(widget.id, "1712345678901");
        assert_eq!(widget.content, "Go");
        assert_eq!(widget.props.get("size"), Some(&PropValue::from("large")));
        assert!(widget.props.get("onClick").is_none());

        let style = widget.style().unwrap();
        assert_eq!(style.get("color"), Some(&StyleValue::from("blue")));
        assert_eq!(style.get("width"), Some(&StyleValue::Number(120.0)));
        assert!(style.get("shadow").is_none());
    }

    #[test]
    fn test_legacy_record_keys() {
        let json = r#"{
            "code": "const A = () => <div><Text>Hi</Text></div>;",
            "widgets": [{ "id": "t1", "type": "Text", "props": {}, "content": "Hi" }],
            "selectedWidgetId": "t1",
            "isEditMode": true,
            "history": [
                { "widgets": [], "code": "const A = () => <div></div>;" },
                { "widgets": [{ "id": "t1", "type": "Text", "props": {}, "content": "Hi" }],
                  "code": "const A = () => <div><Text>Hi</Text></div>;" }
            ],
            "pointer": 1
        }"#;

        let state = PersistedState::from_json(json).unwrap();
        assert!(state.source_text.is_some());
        assert!(state.edit_mode);
        assert_eq!(state.history.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_unique_ids() {
        let mut ids = IdGenerator::new("dupes");
        let widgets = vec![
            WidgetNode::new("a", "Button"),
            WidgetNode::new("a", "Button"),
            WidgetNode::new("", "Text"),
        ];

        let widgets = unique_ids(widgets, &mut ids);
        let distinct: HashSet<_> = widgets.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(distinct.len(), 3);
        assert_eq!(widgets[0].id, "a");
    }
}
