use sitecraft_compiler_react::{compile_to_react, generate, CompileOptions};
use sitecraft_parser::{parse, same_widgets, PropValue, StyleMap, WidgetNode};

fn assert_round_trip(widgets: &[WidgetNode]) {
    let source = generate(widgets);
    let parsed = parse(&source).unwrap_or_else(|e| panic!("{}\n---\n{}", e, source));

    assert!(
        same_widgets(widgets, &parsed),
        "round trip changed the widgets\nbefore: {:#?}\nafter: {:#?}\nsource:\n{}",
        widgets,
        parsed,
        source
    );
}

#[test]
fn test_empty_list() {
    assert_round_trip(&[]);
}

#[test]
fn test_default_widgets() {
    assert_round_trip(&[
        WidgetNode::new("1", "Button").with_content("Sample Button"),
        WidgetNode::new("2", "Text").with_content("Sample Text"),
        WidgetNode::new("3", "Image")
            .with_prop("src", "/placeholder.svg")
            .with_prop("alt", "Sample Image"),
        WidgetNode::new("4", "Table").with_content("Sample Table"),
        WidgetNode::new("5", "Form").with_content("Sample Form"),
        WidgetNode::new("6", "Calendar").with_content("Sample Calendar"),
        WidgetNode::new("7", "SearchBar")
            .with_prop("placeholder", "Search...")
            .with_content("Sample SearchBar"),
        WidgetNode::new("8", "ImageSlider")
            .with_prop("images", PropValue::List(vec!["/placeholder.svg".into()]))
            .with_content("Sample ImageSlider"),
    ]);
}

#[test]
fn test_styles_and_scalars() {
    assert_round_trip(&[
        WidgetNode::new("1", "Button")
            .with_style("backgroundColor", "#fff")
            .with_style("fontSize", 16.0)
            .with_style("margin", -2.5)
            .with_style("z-index", 3.0)
            .with_style("from", "keyword key")
            .with_prop("block", true)
            .with_prop("disabled", false)
            .with_prop("data-x", "1")
            .with_content("Go"),
    ]);
}

#[test]
fn test_awkward_strings() {
    assert_round_trip(&[
        WidgetNode::new("1", "Text").with_content("Say \"hi\" & <wave> {now}"),
        WidgetNode::new("2", "Text").with_content(" leading and trailing "),
        WidgetNode::new("3", "Text").with_content("line one\nline two"),
        WidgetNode::new("4", "Button")
            .with_prop("title", "quote \" and backslash \\ and tab \t")
            .with_prop("raw", r"C:\dir\file")
            .with_style("fontFamily", "'Fira Code', monospace")
            .with_content("Unicode \u{2028} é 😀"),
    ]);
}

#[test]
fn test_passthrough_and_void_tags() {
    assert_round_trip(&[
        WidgetNode::new("1", "section").with_content("Intro"),
        WidgetNode::new("2", "img").with_prop("src", "/a.png").with_prop("alt", "A"),
        WidgetNode::new("3", "my-widget").with_prop("count", 12.0),
    ]);
}

#[test]
fn test_lists() {
    assert_round_trip(&[WidgetNode::new("1", "ImageSlider").with_prop(
        "images",
        PropValue::List(vec![
            "/one.png".into(),
            "/two \"quoted\".png".into(),
            PropValue::Number(3.0),
            PropValue::List(vec![PropValue::Bool(true)]),
        ]),
    )]);
}

#[test]
fn test_order_is_preserved() {
    let widgets: Vec<_> = (0..20)
        .map(|i| WidgetNode::new(i.to_string(), "Button").with_content(format!("Item {}", i)))
        .collect();
    assert_round_trip(&widgets);
}

#[test]
fn test_custom_container_style() {
    let mut container = StyleMap::new();
    container.insert("padding".to_string(), 8.0.into());

    let options = CompileOptions {
        container_style: container,
        ..CompileOptions::default()
    };
    let widgets = vec![WidgetNode::new("1", "Button").with_content("Go")];

    let source = compile_to_react(&widgets, &options);
    assert!(source.contains("<div style={{ padding: 8 }}>"));
    assert!(same_widgets(&widgets, &parse(&source).unwrap()));
}
