//! Widget model and JSX source parser.
//!
//! ```
//! let widgets = sitecraft_parser::parse(
//!     "const Page = () => <div><Button>Go</Button></div>;",
//! ).unwrap();
//! assert_eq!(widgets[0].widget_type, "Button");
//! ```

pub mod ast;
pub mod error;
pub mod id_generator;
pub mod lower;
pub mod parser;
pub mod tokenizer;
pub mod widget;

pub use error::{format_error, ParseError, ParseResult};
pub use id_generator::{get_session_seed, IdGenerator};
pub use lower::lower;
pub use parser::{parse, parse_program, parse_with_ids, Parser};
pub use tokenizer::{tokenize, Token};
pub use widget::{
    is_jsx_name, is_self_closing_type, same_widgets, KnownWidget, PropValue, Props, StyleMap, StyleValue,
    WidgetId, WidgetKind, WidgetNode, ALT_PROP, IMAGES_PROP, SRC_PROP, STYLE_PROP,
};
