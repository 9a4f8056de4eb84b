use serde::{Deserialize, Serialize};

/// Byte range in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Root of a parsed source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub imports: Vec<Import>,
    pub component: Component,
    /// Name in a trailing `export default Name;`
    pub default_export: Option<String>,
    pub span: Span,
}

/// Import declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Import {
    pub default: Option<String>,
    pub namespace: Option<String>,
    pub named: Vec<ImportSpecifier>,
    pub source: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpecifier {
    pub imported: String,
    pub local: String,
}

/// The single top-level component definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub exported: bool,
    /// Root container returned by the component
    pub root: JsxElement,
    pub span: Span,
}

/// Element or fragment name. A fragment has no segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsxName {
    pub segments: Vec<String>,
}

impl JsxName {
    pub fn fragment() -> Self {
        Self { segments: vec![] }
    }

    pub fn is_fragment(&self) -> bool {
        self.segments.is_empty()
    }

    /// Final segment of a member path (`Typography.Text` -> `Text`)
    pub fn last_segment(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    pub fn full(&self) -> String {
        self.segments.join(".")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxElement {
    pub name: JsxName,
    pub attributes: Vec<JsxAttribute>,
    pub children: Vec<JsxChild>,
    pub self_closing: bool,
    pub span: Span,
}

impl JsxElement {
    /// Child elements, looking through fragments
    pub fn child_elements(&self) -> Vec<&JsxElement> {
        let mut out = Vec::new();
        for child in &self.children {
            if let JsxChild::Element(el) = child {
                if el.name.is_fragment() {
                    out.extend(el.child_elements());
                } else {
                    out.push(el);
                }
            }
        }
        out
    }

    pub fn attribute(&self, name: &str) -> Option<&JsxAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxAttribute {
    pub name: String,
    pub value: AttrValue,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum AttrValue {
    /// `<input disabled />`
    Absent,
    Literal(Literal),
    /// Any expression that is not a literal
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum JsxChild {
    Text { value: String, span: Span },
    Element(JsxElement),
    Expression { expression: JsxExpression, span: Span },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum JsxExpression {
    /// `{}` or `{/* comment */}`
    Empty,
    Literal(Literal),
    Dynamic,
}

/// Literal expression values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Literal {
    String(String),
    Number(f64),
    Bool(bool),
    Array(Vec<Literal>),
    Object(Vec<(String, Literal)>),
}
