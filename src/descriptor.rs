//! Presentation descriptors: label, component and layout of a schema node,
//! independent of any live value.

use crate::components::{ComponentRef, Components};
use crate::field::{FieldPath, PathSegment};
use crate::schema::{Items, SchemaObject, SingleType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

pub const PUSH_LABEL: &str = "+";

/// Labels for the per-item array buttons, keyed like [`Descriptor::labels`].
const ITEM_BUTTON_LABELS: [(&str, &str); 3] = [("moveUp", "↑"), ("moveDown", "↓"), ("delete", "-")];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub component: ComponentRef,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub props: Map<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Layout {
    Scalar,
    Array(ArrayLayout),
    Object(ObjectLayout),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayLayout {
    /// JSON pointers of the item descriptors, in item order.
    pub items: Vec<String>,
    pub push_button: ButtonDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectLayout {
    pub order: Vec<String>,
    pub children_groups: Vec<ChildrenGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildrenGroup {
    pub id: String,
    pub label: Option<String>,
    pub properties: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonDescriptor {
    pub label: String,
    pub component: ComponentRef,
}

impl Descriptor {
    pub fn order(&self) -> &[String] {
        match &self.layout {
            Layout::Object(object) => &object.order,
            _ => &[],
        }
    }

    pub fn children_groups(&self) -> &[ChildrenGroup] {
        match &self.layout {
            Layout::Object(object) => &object.children_groups,
            _ => &[],
        }
    }

    pub fn push_button(&self) -> Option<&ButtonDescriptor> {
        match &self.layout {
            Layout::Array(array) => Some(&array.push_button),
            _ => None,
        }
    }

    pub fn label_for(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

/// Host-supplied presentation data merged over the derived descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescriptorOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub props: Map<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub groups: IndexMap<String, GroupOverrides>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, DescriptorOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemsOverrides>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupOverrides {
    pub label: Option<String>,
    pub properties: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemsOverrides {
    Tuple(Vec<DescriptorOverrides>),
    Single(Box<DescriptorOverrides>),
}

impl DescriptorOverrides {
    pub fn property(&self, key: &str) -> Option<&DescriptorOverrides> {
        self.properties.get(key)
    }

    pub fn item(&self, index: usize) -> Option<&DescriptorOverrides> {
        match self.items.as_ref()? {
            ItemsOverrides::Single(single) => Some(single),
            ItemsOverrides::Tuple(tuple) => tuple.get(index),
        }
    }

    /// Overrides for the field at `path` below this node.
    pub fn resolve(&self, path: &FieldPath) -> Option<&DescriptorOverrides> {
        path.segments()
            .try_fold(self, |overrides, segment| match segment {
                PathSegment::Property(key) => overrides.property(key),
                PathSegment::Index(index) => overrides.item(*index),
            })
    }
}

/// Builds descriptors against a component registry.
pub struct DescriptorBuilder<'a> {
    components: &'a Components,
}

impl<'a> DescriptorBuilder<'a> {
    pub fn new(components: &'a Components) -> Self {
        Self { components }
    }

    /// Descriptor for `schema` rendered as `kind` (the schema type when absent).
    pub fn get(&self, schema: &SchemaObject, kind: Option<&str>) -> Descriptor {
        let kind = kind
            .or_else(|| schema.type_name())
            .unwrap_or_default()
            .to_string();
        let fallback = schema
            .type_name()
            .and_then(|type_name| self.components.lookup(type_name));
        let component = self.components.get(&kind, fallback).clone();

        let mut descriptor = Descriptor {
            kind,
            label: schema.title.clone(),
            description: schema.description.clone(),
            component,
            attrs: BTreeMap::new(),
            props: Map::new(),
            labels: BTreeMap::new(),
            layout: Layout::Scalar,
        };

        if schema.is_scalar() {
            return descriptor;
        }

        if schema.primary_type() == Some(SingleType::Array) {
            descriptor.labels.extend(
                ITEM_BUTTON_LABELS
                    .iter()
                    .map(|(key, label)| (key.to_string(), label.to_string())),
            );
            descriptor.layout = Layout::Array(ArrayLayout {
                items: Vec::new(),
                push_button: ButtonDescriptor {
                    label: PUSH_LABEL.to_string(),
                    component: self.components.get("button", None).clone(),
                },
            });
        } else {
            descriptor.layout = Layout::Object(ObjectLayout {
                order: Vec::new(),
                children_groups: Vec::new(),
            });
        }

        descriptor
    }

    /// [`Self::get`] with host overrides merged in.
    pub fn with_overrides(
        &self,
        schema: &SchemaObject,
        kind: Option<&str>,
        overrides: Option<&DescriptorOverrides>,
    ) -> Descriptor {
        let Some(overrides) = overrides else {
            return self.get(schema, kind);
        };

        let kind = overrides.kind.as_deref().or(kind);
        let mut descriptor = self.get(schema, kind);

        if let Some(label) = &overrides.label {
            descriptor.label = Some(label.clone());
        }
        if let Some(description) = &overrides.description {
            descriptor.description = Some(description.clone());
        }
        if let Some(component) = &overrides.component {
            descriptor.component = ComponentRef::new(component.clone());
        }
        descriptor.attrs.extend(overrides.attrs.clone());
        descriptor.props.extend(overrides.props.clone());
        descriptor.labels.extend(overrides.labels.clone());

        match &mut descriptor.layout {
            Layout::Array(array) => {
                if let Some(label) = overrides.labels.get("push") {
                    array.push_button.label = label.clone();
                }
            }
            Layout::Object(object) => {
                object.order = overrides.order.clone();
                object.children_groups = overrides
                    .groups
                    .iter()
                    .map(|(id, group)| ChildrenGroup {
                        id: id.clone(),
                        label: group.label.clone(),
                        properties: group.properties.clone(),
                    })
                    .collect();
            }
            Layout::Scalar => {}
        }

        descriptor
    }
}

/// One descriptor per schema node, keyed by JSON pointer and shared by
/// every field parsed from that node.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: HashMap<String, Rc<Descriptor>>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pointer: &str) -> Option<&Rc<Descriptor>> {
        self.entries.get(pointer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn get_or_build(
        &mut self,
        pointer: &str,
        builder: &DescriptorBuilder<'_>,
        schema: &SchemaObject,
        kind: &str,
        overrides: Option<&DescriptorOverrides>,
    ) -> Rc<Descriptor> {
        if let Some(descriptor) = self.entries.get(pointer) {
            return Rc::clone(descriptor);
        }

        let mut descriptor = builder.with_overrides(schema, Some(kind), overrides);
        if let Layout::Array(array) = &mut descriptor.layout {
            array.items = item_pointers(pointer, schema);
        }

        let descriptor = Rc::new(descriptor);
        self.entries
            .insert(pointer.to_string(), Rc::clone(&descriptor));
        descriptor
    }
}

fn item_pointers(pointer: &str, schema: &SchemaObject) -> Vec<String> {
    let mut pointers = match &schema.items {
        Some(Items::Single(_)) => vec![format!("{pointer}/items")],
        Some(Items::Tuple(tuple)) => (0..tuple.len())
            .map(|i| format!("{pointer}/items/{i}"))
            .collect(),
        None => Vec::new(),
    };
    if matches!(schema.items, Some(Items::Tuple(_))) && schema.additional_items.is_some() {
        pointers.push(format!("{pointer}/additionalItems"));
    }
    pointers
}
