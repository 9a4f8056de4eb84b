use crate::errors::EditorError;
use serde::{Deserialize, Serialize};
use sitecraft_compiler_react::CompileOptions;
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "sitecraft.config.json";

/// Editor color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Seeds widget ids
    #[serde(default = "default_session_name")]
    pub session_name: String,

    /// Maximum number of history entries (0 = unlimited)
    #[serde(default)]
    pub history_limit: usize,

    /// Name of the generated component
    #[serde(default = "default_component_name")]
    pub component_name: String,

    /// Module the known widgets are imported from
    #[serde(default = "default_ui_library")]
    pub ui_library: String,

    /// Source text of a fresh session, replacing the built-in template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_template: Option<String>,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

fn default_session_name() -> String {
    "main".to_string()
}

fn default_component_name() -> String {
    "GeneratedComponent".to_string()
}

fn default_ui_library() -> String {
    "antd".to_string()
}

fn default_zoom() -> f64 {
    1.0
}

impl EditorConfig {
    /// Load config from a directory
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(EditorConfig::default())
        }
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::default()
            .with_component_name(self.component_name.clone())
            .with_ui_library(self.ui_library.clone())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            session_name: default_session_name(),
            history_limit: 0,
            component_name: default_component_name(),
            ui_library: default_ui_library(),
            default_template: None,
            theme: Theme::default(),
            zoom: default_zoom(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "sessionName": "landing",
            "historyLimit": 50,
            "componentName": "Landing",
            "theme": "light"
        }"#;

        let config: EditorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.session_name, "landing");
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.component_name, "Landing");
        assert_eq!(config.ui_library, "antd");
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.zoom, 1.0);
        assert!(config.default_template.is_none());
    }

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.session_name, "main");
        assert_eq!(config.history_limit, 0);
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.compile_options().component_name, "GeneratedComponent");
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load(dir.path()).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "uiLibrary": "my-ui", "zoom": 1.5 }"#,
        )
        .unwrap();

        let config = EditorConfig::load(dir.path()).unwrap();
        assert_eq!(config.ui_library, "my-ui");
        assert_eq!(config.zoom, 1.5);
    }
}
