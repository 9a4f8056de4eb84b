//! # Widget Model Store
//!
//! Owns the authoritative `(widgets, source_text)` pair.
//!
//! ```text
//! structural change:  widgets ──generate──▶ source_text
//! text change:        source_text ──parse──▶ widgets   (kept stale on failure)
//! ```
//!
//! The store always regenerates or reparses wholesale; it never diffs.
//! Snapshots are shared as `Arc<Document>` so history entries cost one
//! pointer each.

use serde::{Deserialize, Serialize};
use sitecraft_compiler_react::{compile_to_react, CompileOptions};
use sitecraft_parser::{parse_with_ids, IdGenerator, ParseError, WidgetNode};
use std::sync::Arc;
use tracing::{debug, warn};

/// Source text of a fresh session
pub const DEFAULT_TEMPLATE: &str = r#"import React from 'react';
import { Button } from 'antd';

const GeneratedComponent = () => {
  return (
    <div style={{ padding: '20px' }}>

    </div>
  );
};

export default GeneratedComponent;
"#;

/// One immutable `(widgets, source_text)` state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub widgets: Vec<WidgetNode>,
    pub source_text: String,

    /// `source_text` failed to parse; `widgets` are the last good list
    #[serde(default)]
    pub stale: bool,
}

impl Document {
    pub fn new(widgets: Vec<WidgetNode>, source_text: impl Into<String>) -> Self {
        Self {
            widgets,
            source_text: source_text.into(),
            stale: false,
        }
    }

    pub fn find(&self, id: &str) -> Option<&WidgetNode> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}

/// Holder of the current document
#[derive(Debug)]
pub struct WidgetStore {
    current: Arc<Document>,
    ids: IdGenerator,
    options: CompileOptions,
    last_parse_error: Option<ParseError>,
}

impl WidgetStore {
    /// Create a store whose document is `source` parsed
    pub fn from_source(
        source: &str,
        mut ids: IdGenerator,
        options: CompileOptions,
    ) -> Result<Self, ParseError> {
        let widgets = parse_with_ids(source, &mut ids)?;

        Ok(Self {
            current: Arc::new(Document::new(widgets, source)),
            ids,
            options,
            last_parse_error: None,
        })
    }

    /// Create a store around an existing snapshot
    pub fn from_document(document: Arc<Document>, ids: IdGenerator, options: CompileOptions) -> Self {
        Self {
            current: document,
            ids,
            options,
            last_parse_error: None,
        }
    }

    pub fn widgets(&self) -> &[WidgetNode] {
        &self.current.widgets
    }

    pub fn source_text(&self) -> &str {
        &self.current.source_text
    }

    /// The current snapshot
    pub fn document(&self) -> Arc<Document> {
        Arc::clone(&self.current)
    }

    pub fn is_stale(&self) -> bool {
        self.current.stale
    }

    pub fn last_parse_error(&self) -> Option<&ParseError> {
        self.last_parse_error.as_ref()
    }

    pub fn ids_mut(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Replace the widgets and regenerate the source text
    pub fn apply_structural_change(&mut self, widgets: Vec<WidgetNode>) -> Arc<Document> {
        let source_text = compile_to_react(&widgets, &self.options);
        debug!(widgets = widgets.len(), bytes = source_text.len(), "regenerated source");

        self.last_parse_error = None;
        self.current = Arc::new(Document::new(widgets, source_text));
        self.document()
    }

    /// Replace the source text and reparse it. On a parse failure the text
    /// is still taken, the previous widgets are kept and the document is
    /// marked stale.
    pub fn apply_text_change(&mut self, source_text: &str) -> Result<Arc<Document>, ParseError> {
        match parse_with_ids(source_text, &mut self.ids) {
            Ok(widgets) => {
                debug!(widgets = widgets.len(), "reparsed source");
                self.last_parse_error = None;
                self.current = Arc::new(Document::new(widgets, source_text));
                Ok(self.document())
            }
            Err(err) => {
                warn!(error = %err, "source edit does not parse, keeping previous widgets");
                self.current = Arc::new(Document {
                    widgets: self.current.widgets.clone(),
                    source_text: source_text.to_string(),
                    stale: true,
                });
                self.last_parse_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Start over at `source_text`. Ids keep counting; a template that does
    /// not parse yields an empty, stale document.
    pub fn reset_to(&mut self, source_text: &str) -> Arc<Document> {
        let document = match parse_with_ids(source_text, &mut self.ids) {
            Ok(widgets) => Document::new(widgets, source_text),
            Err(err) => {
                warn!(error = %err, "template does not parse");
                Document {
                    widgets: Vec::new(),
                    source_text: source_text.to_string(),
                    stale: true,
                }
            }
        };

        self.last_parse_error = None;
        self.current = Arc::new(document);
        self.document()
    }

    /// Swap in a recorded snapshot wholesale (undo, redo, restore)
    pub fn replace(&mut self, document: Arc<Document>) {
        self.last_parse_error = None;
        self.current = document;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> WidgetStore {
        WidgetStore::from_source(
            DEFAULT_TEMPLATE,
            IdGenerator::new("test"),
            CompileOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_default_template_is_empty() {
        let store = store();
        assert!(store.widgets().is_empty());
        assert_eq!(store.source_text(), DEFAULT_TEMPLATE);
        assert!(!store.is_stale());
    }

    #[test]
    fn test_structural_change_regenerates_source() {
        let mut store = store();
        let widgets = vec![WidgetNode::new("w-1", "Button").with_content("Go")];

        store.apply_structural_change(widgets);

        assert_eq!(store.widgets().len(), 1);
        assert!(store.source_text().contains("<Button>Go</Button>"));
    }

    #[test]
    fn test_text_change_reparses() {
        let mut store = store();
        let doc = store
            .apply_text_change("const A = () => <div><Text>Hi</Text></div>;")
            .unwrap();

        assert_eq!(doc.widgets[0].widget_type, "Text");
        assert!(!doc.stale);
    }

    #[test]
    fn test_broken_text_keeps_widgets() {
        let mut store = store();
        store.apply_structural_change(vec![WidgetNode::new("w-1", "Button")]);

        let broken = "const A = () => <div><Button>";
        let result = store.apply_text_change(broken);

        assert!(result.is_err());
        assert!(store.is_stale());
        assert_eq!(store.source_text(), broken);
        assert_eq!(store.widgets()[0].id, "w-1");
        assert!(store.last_parse_error().is_some());
    }

    #[test]
    fn test_snapshots_are_shared() {
        let mut store = store();
        let before = store.document();
        store.apply_structural_change(vec![WidgetNode::new("w-1", "Button")]);

        assert!(before.widgets.is_empty());
        store.replace(Arc::clone(&before));
        assert!(Arc::ptr_eq(&before, &store.document()));
    }
}
