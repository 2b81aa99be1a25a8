//! Built-in recipe defaults (layer 1)
//!
//! Values every recipe starts from before host and repo files are merged.

use serde::{Deserialize, Serialize};

use recipe_core::{LayoutMode, DEFAULT_SETTINGS};

/// Built-in default recipe values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Minimum language standard (default: 17)
    pub minimum_standard: u32,

    /// Export compile_commands.json (default: true)
    pub export_compile_commands: bool,

    /// Build-folder layout (default: "standard")
    pub layout_mode: LayoutMode,

    /// Configuration axes (default: os, compiler, build_type, arch)
    pub settings: Vec<String>,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            minimum_standard: 17,
            export_compile_commands: true,
            layout_mode: LayoutMode::Standard,
            settings: DEFAULT_SETTINGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "minimum_standard": self.minimum_standard,
            "export_compile_commands": self.export_compile_commands,
            "layout_mode": self.layout_mode.as_str(),
            "settings": self.settings,
            "requires": [],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.minimum_standard, 17);
        assert!(defaults.export_compile_commands);
        assert_eq!(defaults.layout_mode, LayoutMode::Standard);
        assert_eq!(defaults.settings, vec!["os", "compiler", "build_type", "arch"]);
    }

    #[test]
    fn test_to_value() {
        let value = BuiltinDefaults::default().to_value();

        assert_eq!(value["minimum_standard"], 17);
        assert_eq!(value["layout_mode"], "standard");
        assert_eq!(value["settings"][3], "arch");
        assert!(value["requires"].as_array().unwrap().is_empty());
        assert!(value.get("presets_path").is_none());
    }

    #[test]
    fn test_to_value_deserializes_as_manifest() {
        let manifest: recipe_core::Manifest =
            serde_json::from_value(BuiltinDefaults::default().to_value()).unwrap();
        assert!(recipe_core::validate(&manifest).is_ok());
    }
}
