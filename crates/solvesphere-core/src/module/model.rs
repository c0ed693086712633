//! Process module domain models.

use serde::{Deserialize, Serialize};

/// Which half of the catalog the user works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppMode {
    Student,
    Business,
}

impl Default for AppMode {
    fn default() -> Self {
        AppMode::Student
    }
}

impl std::fmt::Display for AppMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppMode::Student => write!(f, "STUDENT"),
            AppMode::Business => write!(f, "BUSINESS"),
        }
    }
}

/// Whether a module's primary output is a structured solution or an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Text,
    Visual,
}

impl Default for ModuleKind {
    fn default() -> Self {
        ModuleKind::Text
    }
}

/// A named preset combining an instruction template and UI placeholder for
/// one problem category. Immutable; loaded from the static catalog at
/// startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessModule {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Icon name resolved by the presentation layer.
    pub icon: String,
    /// Instruction text prepended to the user's input for every solve.
    pub prompt_template: String,
    pub mode: AppMode,
    #[serde(default)]
    pub kind: ModuleKind,
    /// Placeholder shown in the empty input field.
    pub placeholder: String,
}

impl ProcessModule {
    pub fn is_visual(&self) -> bool {
        self.kind == ModuleKind::Visual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_serializes_screaming_snake() {
        let json = serde_json::to_string(&AppMode::Student).unwrap();
        assert_eq!(json, "\"STUDENT\"");
        let back: AppMode = serde_json::from_str("\"BUSINESS\"").unwrap();
        assert_eq!(back, AppMode::Business);
    }

    #[test]
    fn test_kind_defaults_to_text() {
        let json = r#"{
            "id": "m",
            "title": "t",
            "description": "d",
            "icon": "i",
            "promptTemplate": "p",
            "mode": "STUDENT",
            "placeholder": "ph"
        }"#;
        let module: ProcessModule = serde_json::from_str(json).unwrap();
        assert_eq!(module.kind, ModuleKind::Text);
        assert!(!module.is_visual());
    }
}
