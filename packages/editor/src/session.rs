//! # Edit Session
//!
//! The single stateful seam of the editor. An `EditSession` owns the widget
//! store, its history, the current selection and cosmetic view state.
//! Mutations themselves are pure ([`Mutation::apply`]); the session assigns
//! their result to the store and records exactly one history entry per
//! committed edit.

use crate::config::{EditorConfig, Theme};
use crate::document::{Document, WidgetStore, DEFAULT_TEMPLATE};
use crate::errors::EditorError;
use crate::history::History;
use crate::mutations::{Mutation, MutationError, MutationResult};
use serde::{Deserialize, Serialize};
use sitecraft_parser::{IdGenerator, ParseError, PropValue, WidgetId, WidgetNode};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// View state persisted with the session but not versioned by history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cosmetics {
    pub theme: Theme,
    pub zoom: f64,
    #[serde(default, alias = "isEditMode")]
    pub edit_mode: bool,
    #[serde(default, alias = "isVisualEditMode")]
    pub visual_edit_mode: bool,
}

impl Cosmetics {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            theme: config.theme,
            zoom: config.zoom,
            edit_mode: false,
            visual_edit_mode: false,
        }
    }
}

/// One user's editing session
#[derive(Debug)]
pub struct EditSession {
    store: WidgetStore,
    history: History,
    selected_id: Option<WidgetId>,
    cosmetics: Cosmetics,
    config: EditorConfig,
}

impl EditSession {
    /// Session on the built-in template with default configuration
    pub fn new() -> Result<Self, EditorError> {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Result<Self, EditorError> {
        let template = config.default_template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
        let store = WidgetStore::from_source(
            template,
            IdGenerator::new(&config.session_name),
            config.compile_options(),
        )?;
        let history = History::with_max_levels(store.document(), config.history_limit);

        Ok(Self {
            store,
            history,
            selected_id: None,
            cosmetics: Cosmetics::from_config(&config),
            config,
        })
    }

    /// Assemble a session from restored parts; the store must hold the
    /// history's current snapshot
    pub(crate) fn from_parts(
        store: WidgetStore,
        history: History,
        selected_id: Option<WidgetId>,
        cosmetics: Cosmetics,
        config: EditorConfig,
    ) -> Self {
        let mut session = Self {
            store,
            history,
            selected_id,
            cosmetics,
            config,
        };
        session.prune_selection();
        session
    }

    pub fn widgets(&self) -> &[WidgetNode] {
        self.store.widgets()
    }

    pub fn source_text(&self) -> &str {
        self.store.source_text()
    }

    pub fn document(&self) -> Arc<Document> {
        self.store.document()
    }

    /// The source text does not parse and the widgets are from the last good parse
    pub fn is_stale(&self) -> bool {
        self.store.is_stale()
    }

    pub fn last_parse_error(&self) -> Option<&ParseError> {
        self.store.last_parse_error()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub(crate) fn ids(&mut self) -> &mut IdGenerator {
        self.store.ids_mut()
    }

    /// Apply one mutation and record it
    #[instrument(skip(self), fields(label = %mutation.label()))]
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        if let Mutation::ReplaceSource { source } = &mutation {
            return Ok(self.apply_text_change(source));
        }

        let current = self.store.document();
        let widgets = mutation.apply(&current.widgets, self.store.ids_mut())?;

        let created_id = match &mutation {
            Mutation::AddWidget { index, .. } => widgets
                .get(index.unwrap_or(current.widgets.len()))
                .map(|w| w.id.clone()),
            _ => None,
        };

        self.store.apply_structural_change(widgets);
        self.prune_selection();

        let mut result = self.commit(Some(mutation.label()));
        result.created_id = created_id;
        Ok(result)
    }

    /// Replace the whole widget list
    pub fn apply_structural_change(
        &mut self,
        widgets: Vec<WidgetNode>,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::ReplaceWidgets { widgets })
    }

    /// Take a raw source edit. Always recorded; a parse failure leaves the
    /// widgets stale and is reported in the result.
    #[instrument(skip(self, source), fields(bytes = source.len()))]
    pub fn apply_text_change(&mut self, source: &str) -> MutationResult {
        let parse_error = self.store.apply_text_change(source).err();
        self.prune_selection();

        let mut result = self.commit(Some("Edit source".to_string()));
        result.parse_error = parse_error;
        result
    }

    /// Add a widget at the end, returning its id
    pub fn add_widget(&mut self, widget_type: &str) -> Result<WidgetId, EditorError> {
        self.add_widget_at(widget_type, None)
    }

    pub fn add_widget_at(
        &mut self,
        widget_type: &str,
        index: Option<usize>,
    ) -> Result<WidgetId, EditorError> {
        let result = self.apply(Mutation::AddWidget {
            widget_type: widget_type.to_string(),
            index,
            content: None,
        })?;

        result
            .created_id
            .ok_or_else(|| MutationError::NodeNotFound(format!("new {}", widget_type)).into())
    }

    pub fn move_widget(&mut self, from: usize, to: usize) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::MoveWidget { from, to })
    }

    pub fn delete_widget(&mut self, id: &str) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::DeleteWidget { id: id.to_string() })
    }

    pub fn edit_property(
        &mut self,
        id: &str,
        field: &str,
        value: impl Into<PropValue>,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::EditProperty {
            id: id.to_string(),
            field: field.to_string(),
            value: value.into(),
        })
    }

    pub fn set_list_item(
        &mut self,
        id: &str,
        field: &str,
        index: usize,
        value: impl Into<PropValue>,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::SetListItem {
            id: id.to_string(),
            field: field.to_string(),
            index,
            value: value.into(),
        })
    }

    fn commit(&mut self, label: Option<String>) -> MutationResult {
        self.history.record(self.store.document(), label);
        debug!(
            pointer = self.history.pointer(),
            entries = self.history.len(),
            "recorded history entry"
        );

        MutationResult {
            version: self.history.pointer(),
            created_id: None,
            parse_error: None,
        }
    }

    /// Step back one entry; `false` at the oldest entry
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(document) => {
                self.store.replace(document);
                self.prune_selection();
                debug!(pointer = self.history.pointer(), "undo");
                true
            }
            None => false,
        }
    }

    /// Step forward one entry; `false` at the newest entry
    #[instrument(skip(self))]
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(document) => {
                self.store.replace(document);
                self.prune_selection();
                debug!(pointer = self.history.pointer(), "redo");
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Back to the template with a single-entry history. Ids keep counting.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        let template = self
            .config
            .default_template
            .as_deref()
            .unwrap_or(DEFAULT_TEMPLATE)
            .to_string();

        let document = self.store.reset_to(&template);
        self.history.reset(document);
        self.selected_id = None;
        self.cosmetics = Cosmetics::from_config(&self.config);
        info!("session reset");
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected_widget(&self) -> Option<&WidgetNode> {
        let id = self.selected_id.as_deref()?;
        self.widgets().iter().find(|w| w.id == id)
    }

    /// Select a widget (or nothing). An unknown id clears the selection and
    /// returns `false`.
    pub fn set_selected_id(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) if self.store.document().contains(id) => {
                self.selected_id = Some(id.to_string());
                true
            }
            Some(_) => {
                self.selected_id = None;
                false
            }
            None => {
                self.selected_id = None;
                true
            }
        }
    }

    fn prune_selection(&mut self) {
        let missing = self
            .selected_id
            .as_deref()
            .is_some_and(|id| !self.store.document().contains(id));

        if missing {
            debug!(id = ?self.selected_id, "selection no longer exists");
            self.selected_id = None;
        }
    }

    pub fn cosmetics(&self) -> &Cosmetics {
        &self.cosmetics
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.cosmetics.theme = theme;
    }

    /// Ignored (returns `false`) unless `zoom` is finite and positive
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if zoom.is_finite() && zoom > 0.0 {
            self.cosmetics.zoom = zoom;
            true
        } else {
            false
        }
    }

    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.cosmetics.edit_mode = edit_mode;
    }

    pub fn set_visual_edit_mode(&mut self, visual_edit_mode: bool) {
        self.cosmetics.visual_edit_mode = visual_edit_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = EditSession::new().unwrap();
        assert!(session.widgets().is_empty());
        assert_eq!(session.source_text(), DEFAULT_TEMPLATE);
        assert!(!session.can_undo());
        assert!(!session.can_redo());
        assert_eq!(session.cosmetics().theme, Theme::Dark);
    }

    #[test]
    fn test_each_mutation_records_once() {
        let mut session = EditSession::new().unwrap();

        let id = session.add_widget("Button").unwrap();
        assert_eq!(session.history().len(), 2);

        session.edit_property(&id, "color", "red").unwrap();
        assert_eq!(session.history().len(), 3);

        assert!(session.move_widget(0, 3).is_err());
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn test_add_widget_errors_are_mutation_errors() {
        let mut session = EditSession::new().unwrap();

        assert!(matches!(
            session.add_widget_at("Button", Some(3)),
            Err(EditorError::Mutation(MutationError::IndexOutOfRange { index: 3, len: 0 }))
        ));
        assert!(matches!(
            session.add_widget("not a type"),
            Err(EditorError::Mutation(MutationError::InvalidValue(_)))
        ));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_selection_cleared_on_delete() {
        let mut session = EditSession::new().unwrap();
        let id = session.add_widget("Button").unwrap();

        assert!(session.set_selected_id(Some(&id)));
        session.delete_widget(&id).unwrap();
        assert!(session.selected_id().is_none());
    }

    #[test]
    fn test_selection_cleared_by_undo() {
        let mut session = EditSession::new().unwrap();
        let id = session.add_widget("Text").unwrap();
        session.set_selected_id(Some(&id));

        assert!(session.undo());
        assert!(session.selected_id().is_none());
    }

    #[test]
    fn test_unknown_selection_is_rejected() {
        let mut session = EditSession::new().unwrap();
        assert!(!session.set_selected_id(Some("missing")));
        assert!(session.selected_id().is_none());
        assert!(session.set_selected_id(None));
    }

    #[test]
    fn test_reset_keeps_counting_ids() {
        let mut session = EditSession::new().unwrap();
        let first = session.add_widget("Button").unwrap();
        session.set_zoom(2.0);

        session.reset();
        assert!(session.widgets().is_empty());
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.cosmetics().zoom, 1.0);

        let second = session.add_widget("Button").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_zoom_validation() {
        let mut session = EditSession::new().unwrap();
        assert!(!session.set_zoom(0.0));
        assert!(!session.set_zoom(f64::NAN));
        assert!(session.set_zoom(1.25));
        assert_eq!(session.cosmetics().zoom, 1.25);
    }

    #[test]
    fn test_custom_template() {
        let config = EditorConfig {
            default_template: Some("const Page = () => <main><Button>Hi</Button></main>;".to_string()),
            ..EditorConfig::default()
        };

        let session = EditSession::with_config(config).unwrap();
        assert_eq!(session.widgets().len(), 1);
    }

    #[test]
    fn test_broken_template_is_an_error() {
        let config = EditorConfig {
            default_template: Some("const Page = () => <main>".to_string()),
            ..EditorConfig::default()
        };

        assert!(matches!(
            EditSession::with_config(config),
            Err(EditorError::Parse(_))
        ));
    }
}
