use sitecraft_compiler_react::generate;
use sitecraft_editor::{
    EditSession, EditorConfig, Mutation, PersistedState, PropValue, Theme, WidgetNode,
};
use sitecraft_parser::parse;
use std::fmt::Display;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(context: &str, err: impl Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error("Serialization error", e))
}

fn from_json<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| js_error("Invalid JSON", e))
}

fn config_from(config_json: Option<String>) -> Result<EditorConfig, JsValue> {
    match config_json {
        Some(json) => from_json(&json),
        None => Ok(EditorConfig::default()),
    }
}

/// Parse builder source text and return the widget list as JSON
#[wasm_bindgen(js_name = parse)]
pub fn parse_js(source: &str) -> Result<String, JsValue> {
    let widgets = parse(source).map_err(|e| js_error("Parse error", e))?;
    to_json(&widgets)
}

/// Generate source text from a JSON widget list
#[wasm_bindgen(js_name = generate)]
pub fn generate_js(widgets_json: &str) -> Result<String, JsValue> {
    let widgets: Vec<WidgetNode> = from_json(widgets_json)?;
    Ok(generate(&widgets))
}

/// One editing session
#[wasm_bindgen]
pub struct Editor {
    session: EditSession,
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<Editor, JsValue> {
        let session = EditSession::with_config(config_from(config_json)?)
            .map_err(|e| js_error("Editor error", e))?;
        Ok(Editor { session })
    }

    /// Rebuild a session from a saved record (see `snapshot`)
    pub fn restore(state_json: &str, config_json: Option<String>) -> Result<Editor, JsValue> {
        let state = PersistedState::from_json(state_json).map_err(|e| js_error("Restore error", e))?;
        let session = EditSession::restore(state, config_from(config_json)?)
            .map_err(|e| js_error("Restore error", e))?;
        Ok(Editor { session })
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.session
            .snapshot()
            .to_json()
            .map_err(|e| js_error("Serialization error", e))
    }

    #[wasm_bindgen(js_name = getWidgets)]
    pub fn get_widgets(&self) -> Result<String, JsValue> {
        to_json(self.session.widgets())
    }

    #[wasm_bindgen(js_name = getSourceText)]
    pub fn get_source_text(&self) -> String {
        self.session.source_text().to_string()
    }

    #[wasm_bindgen(js_name = isStale)]
    pub fn is_stale(&self) -> bool {
        self.session.is_stale()
    }

    #[wasm_bindgen(js_name = lastParseError)]
    pub fn last_parse_error(&self) -> Option<String> {
        self.session.last_parse_error().map(|e| e.to_string())
    }

    /// Replace the widget list; returns the new history version
    #[wasm_bindgen(js_name = applyStructuralChange)]
    pub fn apply_structural_change(&mut self, widgets_json: &str) -> Result<usize, JsValue> {
        let widgets: Vec<WidgetNode> = from_json(widgets_json)?;
        let result = self
            .session
            .apply_structural_change(widgets)
            .map_err(|e| js_error("Mutation error", e))?;
        Ok(result.version)
    }

    /// Take a raw source edit; returns the parse error when the widgets went stale
    #[wasm_bindgen(js_name = applyTextChange)]
    pub fn apply_text_change(&mut self, source: &str) -> Option<String> {
        self.session
            .apply_text_change(source)
            .parse_error
            .map(|e| e.to_string())
    }

    /// Apply a JSON-encoded `Mutation`; returns the created widget id, if any
    pub fn apply(&mut self, mutation_json: &str) -> Result<Option<String>, JsValue> {
        let mutation: Mutation = from_json(mutation_json)?;
        let result = self
            .session
            .apply(mutation)
            .map_err(|e| js_error("Mutation error", e))?;
        Ok(result.created_id)
    }

    #[wasm_bindgen(js_name = addWidget)]
    pub fn add_widget(&mut self, widget_type: &str) -> Result<String, JsValue> {
        self.session
            .add_widget(widget_type)
            .map_err(|e| js_error("Mutation error", e))
    }

    #[wasm_bindgen(js_name = moveWidget)]
    pub fn move_widget(&mut self, from: usize, to: usize) -> Result<(), JsValue> {
        self.session
            .move_widget(from, to)
            .map(|_| ())
            .map_err(|e| js_error("Mutation error", e))
    }

    #[wasm_bindgen(js_name = deleteWidget)]
    pub fn delete_widget(&mut self, id: &str) -> Result<(), JsValue> {
        self.session
            .delete_widget(id)
            .map(|_| ())
            .map_err(|e| js_error("Mutation error", e))
    }

    /// `value_json` is any JSON literal: `"#fff"`, `12`, `true`, `["a"]`
    #[wasm_bindgen(js_name = editProperty)]
    pub fn edit_property(&mut self, id: &str, field: &str, value_json: &str) -> Result<(), JsValue> {
        let value: PropValue = from_json(value_json)?;
        self.session
            .edit_property(id, field, value)
            .map(|_| ())
            .map_err(|e| js_error("Mutation error", e))
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    #[wasm_bindgen(js_name = getSelectedId)]
    pub fn get_selected_id(&self) -> Option<String> {
        self.session.selected_id().map(str::to_string)
    }

    #[wasm_bindgen(js_name = setSelectedId)]
    pub fn set_selected_id(&mut self, id: Option<String>) -> bool {
        self.session.set_selected_id(id.as_deref())
    }

    #[wasm_bindgen(js_name = getCosmetics)]
    pub fn get_cosmetics(&self) -> Result<String, JsValue> {
        to_json(self.session.cosmetics())
    }

    /// `"light"` or `"dark"`
    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&mut self, theme: &str) -> Result<(), JsValue> {
        let theme: Theme = serde_json::from_value(serde_json::Value::String(theme.to_string()))
            .map_err(|e| js_error("Invalid theme", e))?;
        self.session.set_theme(theme);
        Ok(())
    }

    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        self.session.set_zoom(zoom)
    }

    #[wasm_bindgen(js_name = setEditMode)]
    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.session.set_edit_mode(edit_mode);
    }

    #[wasm_bindgen(js_name = setVisualEditMode)]
    pub fn set_visual_edit_mode(&mut self, visual_edit_mode: bool) {
        self.session.set_visual_edit_mode(visual_edit_mode);
    }
}
