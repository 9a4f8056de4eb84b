//! Browser tests, run with `wasm-pack test --headless --firefox`

#![cfg(target_arch = "wasm32")]

use sitecraft_wasm::{generate_js, parse_js, Editor};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn parse_reports_errors() {
    assert!(parse_js("const A = () => <div><Button>").is_err());
}

#[wasm_bindgen_test]
fn generate_rejects_bad_json() {
    assert!(generate_js("{ not json").is_err());
}

#[wasm_bindgen_test]
fn editor_rejects_bad_mutations() {
    let mut editor = Editor::new(None).unwrap();

    assert!(editor.move_widget(0, 1).is_err());
    assert!(editor.delete_widget("missing").is_err());
    assert!(editor.set_theme("sepia").is_err());
    assert!(!editor.can_undo());
}

#[wasm_bindgen_test]
fn editor_round_trip() {
    let mut editor = Editor::new(None).unwrap();
    let id = editor.add_widget("Button").unwrap();
    editor.edit_property(&id, "content", "\"Buy\"").unwrap();

    let widgets = editor.get_widgets().unwrap();
    let source = generate_js(&widgets).unwrap();
    assert!(source.contains("<Button>Buy</Button>"));
}
