//! Registry mapping field kinds to the elements that render them.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Identifier of a renderable element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRef(Cow<'static, str>);

impl ComponentRef {
    pub const fn native(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Elements that ship with the crate.
pub mod native {
    use super::ComponentRef;

    pub const ARRAY: ComponentRef = ComponentRef::native("ArrayElement");
    pub const ARRAY_BUTTON: ComponentRef = ComponentRef::native("ArrayButtonElement");
    pub const CHECKBOX: ComponentRef = ComponentRef::native("CheckboxElement");
    pub const FIELDSET: ComponentRef = ComponentRef::native("FieldsetElement");
    pub const FILE: ComponentRef = ComponentRef::native("FileElement");
    pub const INPUT: ComponentRef = ComponentRef::native("InputElement");
    pub const LIST: ComponentRef = ComponentRef::native("ListElement");
    pub const MESSAGE: ComponentRef = ComponentRef::native("MessageElement");
    pub const STATE: ComponentRef = ComponentRef::native("StateElement");
    pub const TEXTAREA: ComponentRef = ComponentRef::native("TextareaElement");
}

#[derive(Debug, Clone, PartialEq)]
pub struct Components {
    map: HashMap<String, ComponentRef>,
    default: ComponentRef,
}

impl Components {
    /// Registry seeded with a native element for every known kind.
    pub fn new() -> Self {
        let mut components = Self::empty(native::INPUT);

        components.set("array", native::ARRAY);
        components.set("boolean", native::CHECKBOX);
        components.set("string", native::INPUT);
        components.set("password", native::INPUT);
        components.set("file", native::FILE);
        components.set("image", native::INPUT);
        components.set("radio", native::STATE);
        components.set("checkbox", native::STATE);
        components.set("enum", native::FIELDSET);
        components.set("number", native::INPUT);
        components.set("integer", native::INPUT);
        components.set("object", native::FIELDSET);
        components.set("list", native::LIST);
        components.set("textarea", native::TEXTAREA);
        components.set("message", native::MESSAGE);
        components.set("button", native::ARRAY_BUTTON);

        components
    }

    /// Registry with no kinds; every lookup resolves to `default`.
    pub fn empty(default: ComponentRef) -> Self {
        Self {
            map: HashMap::new(),
            default,
        }
    }

    /// Registers or replaces the element for `kind`.
    pub fn set(&mut self, kind: impl Into<String>, component: ComponentRef) {
        self.map.insert(kind.into(), component);
    }

    pub fn set_default(&mut self, component: ComponentRef) {
        self.default = component;
    }

    pub fn default_component(&self) -> &ComponentRef {
        &self.default
    }

    /// The element registered for `kind`, if any.
    pub fn lookup(&self, kind: &str) -> Option<&ComponentRef> {
        self.map.get(kind)
    }

    /// The element registered for `kind`, else `fallback`, else the default.
    pub fn get<'a>(&'a self, kind: &str, fallback: Option<&'a ComponentRef>) -> &'a ComponentRef {
        self.lookup(kind).or(fallback).unwrap_or(&self.default)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }
}

impl Default for Components {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_kinds() {
        let components = Components::new();
        assert_eq!(components.get("boolean", None), &native::CHECKBOX);
        assert_eq!(components.get("list", None), &native::LIST);
        assert_eq!(components.get("object", None), &native::FIELDSET);
        assert_eq!(components.get("button", None), &native::ARRAY_BUTTON);
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let mut components = Components::new();
        let custom = ComponentRef::new("ColorPicker");
        components.set("color", custom.clone());
        assert_eq!(components.get("color", None), &custom);

        components.set("string", custom.clone());
        assert_eq!(components.get("string", None), &custom);

        let kinds: Vec<_> = components.kinds().collect();
        assert!(kinds.contains(&"color"));
        assert!(kinds.contains(&"string"));
    }

    #[test]
    fn test_unknown_kind_uses_fallback_then_default() {
        let components = Components::new();
        let fallback = ComponentRef::new("Fallback");
        assert_eq!(components.get("nope", Some(&fallback)), &fallback);
        assert_eq!(components.get("nope", None), &native::INPUT);

        let mut empty = Components::empty(ComponentRef::new("Plain"));
        assert_eq!(empty.get("string", None).name(), "Plain");
        empty.set_default(native::TEXTAREA);
        assert_eq!(empty.get("string", None), &native::TEXTAREA);
    }
}
