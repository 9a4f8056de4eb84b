//! # Sitecraft Editor
//!
//! Editing engine for the sitecraft builder. Keeps a widget list and its
//! React source text in sync, applies editing intents, and records a linear
//! undo/redo history of whole-document snapshots.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: JSX source → flat widget list       │
//! └─────────────────────────────────────────────┘
//!                     ↕
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - WidgetStore (current Document)           │
//! │  - Mutations (pure list → list)             │
//! │  - History (snapshots + pointer)            │
//! │  - Persistence (JSON session record)        │
//! └─────────────────────────────────────────────┘
//!                     ↕
//! ┌─────────────────────────────────────────────┐
//! │ compiler-react: widget list → JSX source    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One commit, one entry**: every committed edit records exactly one
//!    history snapshot; a failed edit records nothing
//! 2. **Wholesale sync**: structural edits regenerate the source, text edits
//!    reparse it; nothing is diffed
//! 3. **Broken text is kept**: a source edit that does not parse is stored
//!    and marked stale while the widgets stay at the last good parse
//!
//! ## Usage
//!
//! ```rust
//! use sitecraft_editor::EditSession;
//!
//! let mut session = EditSession::new()?;
//!
//! let id = session.add_widget("Button")?;
//! session.edit_property(&id, "content", "Sign up")?;
//! assert!(session.source_text().contains("<Button>Sign up</Button>"));
//!
//! session.undo();
//! assert!(session.source_text().contains("<Button>Sample Button</Button>"));
//! # Ok::<(), sitecraft_editor::EditorError>(())
//! ```

mod config;
mod document;
mod errors;
mod history;
mod mutations;
mod persistence;
mod session;

pub use config::{EditorConfig, Theme, DEFAULT_CONFIG_NAME};
pub use document::{Document, WidgetStore, DEFAULT_TEMPLATE};
pub use errors::EditorError;
pub use history::{History, HistoryEntry};
pub use mutations::{
    default_widget, Mutation, MutationError, MutationResult, CONTENT_FIELD, PLACEHOLDER_IMAGE,
    STYLE_FIELDS,
};
pub use persistence::{PersistedEntry, PersistedState};
pub use session::{Cosmetics, EditSession};

// Re-export the widget model for convenience
pub use sitecraft_parser::{PropValue, StyleValue, WidgetId, WidgetNode};
