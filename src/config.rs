use crate::components::{ComponentRef, Components};
use crate::descriptor::DescriptorOverrides;
use crate::error::{FormError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_ID_PREFIX: &str = "formschema";

/// Host settings for a form, usually read from a JSON file:
///
/// ```json
/// {
///   "idPrefix": "signup",
///   "components": { "color": "ColorPicker" },
///   "descriptor": { "properties": { "bio": { "kind": "textarea" } } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormOptions {
    /// Prefix of field keys and element ids.
    pub id_prefix: String,
    /// Extra or replacement elements, by kind.
    pub components: IndexMap<String, String>,
    /// Descriptor overrides for the root field and, through it, its children.
    pub descriptor: DescriptorOverrides,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            components: IndexMap::new(),
            descriptor: DescriptorOverrides::default(),
        }
    }
}

impl FormOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| FormError::ConfigError(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// The native registry with this configuration's elements applied.
    pub fn components(&self) -> Components {
        let mut components = Components::new();
        for (kind, name) in &self.components {
            components.set(kind.clone(), ComponentRef::new(name.clone()));
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::native;

    #[test]
    fn test_defaults() {
        let options = FormOptions::from_json("{}").unwrap();
        assert_eq!(options.id_prefix, "formschema");
        assert!(options.components.is_empty());
    }

    #[test]
    fn test_components_override_registry() {
        let options =
            FormOptions::from_json(r#"{"components": {"color": "ColorPicker", "string": "TextInput"}}"#)
                .unwrap();
        let components = options.components();
        assert_eq!(components.get("color", None).name(), "ColorPicker");
        assert_eq!(components.get("string", None).name(), "TextInput");
        assert_eq!(components.get("boolean", None), &native::CHECKBOX);
    }

    #[test]
    fn test_invalid_options() {
        let result = FormOptions::from_json(r#"{"idPrefix": 3}"#);
        assert!(matches!(result, Err(FormError::ConfigError(_))));
    }
}
