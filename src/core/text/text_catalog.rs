// Catalog of every user-facing string.
//
// Texts live in a nested JSON document and are addressed by dotted keys such
// as `access_control.user_has_advanced`. Placeholders are written `{name}`.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

const BUNDLED_TEXTS: &str = include_str!("../../../resources/texts.json");

#[derive(Debug, Error)]
pub enum TextCatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Text catalog root must be a JSON object")]
    NotAnObject,
}

#[derive(Debug, Clone)]
pub struct TextCatalog {
    texts: HashMap<String, String>,
}

impl TextCatalog {
    /// Catalog shipped with the bot.
    pub fn bundled() -> Result<Self, TextCatalogError> {
        Self::from_json(BUNDLED_TEXTS)
    }

    /// Bundled catalog with entries from `path` layered on top.
    pub fn with_overrides(path: impl AsRef<Path>) -> Result<Self, TextCatalogError> {
        let mut catalog = Self::bundled()?;
        let overrides = Self::from_json(&std::fs::read_to_string(path)?)?;
        catalog.texts.extend(overrides.texts);
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, TextCatalogError> {
        let root: Value = serde_json::from_str(json)?;
        if !root.is_object() {
            return Err(TextCatalogError::NotAnObject);
        }

        let mut texts = HashMap::new();
        flatten(&root, String::new(), &mut texts);
        Ok(Self { texts })
    }

    pub fn get(&self, key: &str) -> String {
        self.format(key, &[])
    }

    /// Look up `key` and substitute `{name}` placeholders.
    ///
    /// An unknown key is logged and rendered as the key itself so the user
    /// still gets a reply.
    pub fn format(&self, key: &str, args: &[(&str, &dyn Display)]) -> String {
        let Some(template) = self.texts.get(key) else {
            tracing::warn!(key, "Missing text catalog entry");
            return key.to_string();
        };

        let mut text = template.clone();
        for (name, value) in args {
            text = text.replace(&format!("{{{}}}", name), &value.to_string());
        }
        text
    }
}

fn flatten(value: &Value, prefix: String, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(child, path, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix, text.clone());
        }
        // Numbers and booleans are kept so a catalog can hold e.g. limits
        other => {
            out.insert(prefix, other.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_bundled_catalog_has_every_message_key() {
        let catalog = TextCatalog::bundled().unwrap();
        let keys = [
            "access_control.guild_only_command",
            "access_control.user_not_in_guild",
            "access_control.admin_only_command",
            "access_control.blocked_user",
            "access_control.select_access_level_placeholder",
            "access_control.grant_access_level_message",
            "access_control.revoke_access_level_message",
            "access_control.access_level_granted",
            "access_control.access_level_revoked",
            "access_control.user_does_not_have_access_level",
            "access_control.user_has_advanced_and_blocked",
            "access_control.user_has_advanced",
            "access_control.user_has_blocked",
            "access_control.user_has_no_access_level",
            "fixpy.modal_title",
            "fixpy.code_input_label",
            "fixpy.code_input_placeholder",
            "errors.no_available_model",
            "errors.ai_response_generation_failed",
            "errors.access_command_processing_error",
            "errors.fixpy_command_processing_error",
            "errors.fixpy_modal_execution_error",
            "commands.grant.description",
            "commands.check.description",
            "commands.revoke.description",
            "commands.fixpy.description",
        ];

        for key in keys {
            assert_ne!(catalog.get(key), key, "missing {}", key);
        }
    }

    #[test]
    fn test_substitution() {
        let catalog = TextCatalog::bundled().unwrap();
        let text = catalog.format(
            "access_control.user_does_not_have_access_level",
            &[("user_id", &42u64), ("access_level", &"blocked")],
        );
        assert_eq!(text, "User 42 does not have blocked.");
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        let catalog = TextCatalog::from_json(r#"{"a": {"b": "c"}}"#).unwrap();
        assert_eq!(catalog.get("a.b"), "c");
        assert_eq!(catalog.get("a.missing"), "a.missing");
    }

    #[test]
    fn test_root_must_be_object() {
        assert!(matches!(
            TextCatalog::from_json(r#"["not", "an", "object"]"#),
            Err(TextCatalogError::NotAnObject)
        ));
    }

    #[test]
    fn test_overrides_replace_bundled_entries() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"errors": {{"no_available_model": "Kein Modell verfügbar."}}}}"#
        )
        .unwrap();

        let catalog = TextCatalog::with_overrides(file.path()).unwrap();
        assert_eq!(catalog.get("errors.no_available_model"), "Kein Modell verfügbar.");
        // Untouched keys still come from the bundled catalog
        assert_ne!(
            catalog.get("access_control.user_has_advanced"),
            "access_control.user_has_advanced"
        );
    }
}
