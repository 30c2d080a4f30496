//! The live field record and the small types it is made of.

use crate::descriptor::Descriptor;
use crate::schema::SchemaObject;
use crate::value;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FieldId(pub(crate) usize);

impl FieldId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Semantic role of a field, which decides how it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Object,
    Array,
    List,
    Radio,
    Checkbox,
    Hidden,
    File,
    Image,
    Textarea,
    Password,
    Enum,
    Button,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Null => "null",
            FieldKind::Object => "object",
            FieldKind::Array => "array",
            FieldKind::List => "list",
            FieldKind::Radio => "radio",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Hidden => "hidden",
            FieldKind::File => "file",
            FieldKind::Image => "image",
            FieldKind::Textarea => "textarea",
            FieldKind::Password => "password",
            FieldKind::Enum => "enum",
            FieldKind::Button => "button",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "string" => FieldKind::String,
            "number" => FieldKind::Number,
            "integer" => FieldKind::Integer,
            "boolean" => FieldKind::Boolean,
            "null" => FieldKind::Null,
            "object" => FieldKind::Object,
            "array" => FieldKind::Array,
            "list" => FieldKind::List,
            "radio" => FieldKind::Radio,
            "checkbox" => FieldKind::Checkbox,
            "hidden" => FieldKind::Hidden,
            "file" => FieldKind::File,
            "image" => FieldKind::Image,
            "textarea" => FieldKind::Textarea,
            "password" => FieldKind::Password,
            "enum" => FieldKind::Enum,
            "button" => FieldKind::Button,
            _ => return None,
        })
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which parse function built a field. Several kinds share one parser
/// (a textarea is parsed as a string), and one parser can yield several
/// kinds (a number inside an enum is a radio).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    Boolean,
    Number,
    Integer,
    String,
    Null,
    List,
    Array,
    Object,
    Enum,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Property(String),
    Index(usize),
}

/// Location of a field below the root, e.g. `user.address.city` or `tags[1]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    pub fn parse(s: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = s.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Property(std::mem::take(&mut current)));
                    }
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Property(std::mem::take(&mut current)));
                    }
                    let mut index = String::new();
                    for c in chars.by_ref() {
                        if c == ']' {
                            break;
                        }
                        index.push(c);
                    }
                    if let Ok(idx) = index.parse::<usize>() {
                        segments.push(PathSegment::Index(idx));
                    }
                }
                _ => current.push(ch),
            }
        }
        if !current.is_empty() {
            segments.push(PathSegment::Property(current));
        }

        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Property(name) if i == 0 => f.write_str(name)?,
                PathSegment::Property(name) => write!(f, ".{name}")?,
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub severity: Severity,
}

impl Message {
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Error)
    }
}

/// Numeric attribute that keeps integer bounds integral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Numeric {
    Integer(i64),
    Float(f64),
}

impl Numeric {
    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Integer(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Integer(i) => write!(f, "{i}"),
            Numeric::Float(x) => write!(f, "{x}"),
        }
    }
}

/// HTML input subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputType {
    Text,
    Date,
    DatetimeLocal,
    Email,
    Time,
    Url,
    Number,
    Checkbox,
    Radio,
    Hidden,
    File,
    Image,
    Password,
}

impl InputType {
    /// Subtype for a string `format`; unknown formats are plain text.
    pub fn for_format(format: Option<&str>) -> Self {
        match format {
            Some("date") => InputType::Date,
            Some("date-time") => InputType::DatetimeLocal,
            Some("email" | "idn-email") => InputType::Email,
            Some("time") => InputType::Time,
            Some("uri") => InputType::Url,
            _ => InputType::Text,
        }
    }
}

/// UI attributes derived from the schema node, plus the live ones
/// (`checked`, `value`) filled in by [`crate::Form::attrs`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attrs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Numeric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Numeric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<Numeric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minlength: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxlength: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Field that receives the value when an option child is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    /// Radio option: picking it replaces the enum field's value.
    Enum(FieldId),
    /// Checkbox option: toggling it adds or removes it from the array value.
    Checkbox(FieldId),
}

impl Owner {
    pub fn field(self) -> FieldId {
        match self {
            Owner::Enum(id) | Owner::Checkbox(id) => id,
        }
    }
}

/// Item bounds of an array field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayState {
    pub min_items: usize,
    pub max_items: Option<usize>,
    /// Leading positional items from a tuple `items`; they cannot be moved or removed.
    pub tuple_len: usize,
    /// Whether new items can be appended (single `items` or an `additionalItems` schema).
    pub extensible: bool,
    /// Children are checkbox options rather than item fields.
    pub checkboxes: bool,
}

impl ArrayState {
    pub fn can_push(&self, len: usize) -> bool {
        self.extensible && !self.checkboxes && self.max_items.is_none_or(|max| len < max)
    }

    pub fn can_remove(&self, index: usize, len: usize) -> bool {
        !self.checkboxes && index >= self.tuple_len && index < len && len > self.min_items
    }

    pub fn can_move_up(&self, index: usize, len: usize) -> bool {
        !self.checkboxes && index > self.tuple_len && index < len
    }

    pub fn can_move_down(&self, index: usize, len: usize) -> bool {
        !self.checkboxes && index >= self.tuple_len && index + 1 < len
    }
}

/// Children of an object gathered under a labelled section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldGroup {
    pub id: String,
    pub label: Option<String>,
    pub children: Vec<FieldId>,
}

/// One selectable entry of a list field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListOption {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) id: FieldId,
    pub(crate) key: String,
    pub(crate) kind: FieldKind,
    pub(crate) parser: ParserKind,
    pub(crate) pointer: String,
    pub(crate) schema: Rc<SchemaObject>,
    pub(crate) descriptor: Rc<Descriptor>,
    pub(crate) value: Option<Value>,
    pub(crate) initial_value: Option<Value>,
    pub(crate) attrs: Attrs,
    pub(crate) messages: Vec<Message>,
    pub(crate) children: Vec<FieldId>,
    pub(crate) groups: Vec<FieldGroup>,
    pub(crate) parent: Option<FieldId>,
    pub(crate) segment: Option<PathSegment>,
    pub(crate) owner: Option<Owner>,
    pub(crate) is_root: bool,
    pub(crate) required: bool,
    pub(crate) options: Vec<Value>,
    pub(crate) array: Option<ArrayState>,
}

impl Field {
    pub fn id(&self) -> FieldId {
        self.id
    }

    /// Stable identity for the lifetime of the field.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn parser(&self) -> ParserKind {
        self.parser
    }

    /// JSON pointer of the schema node the field was parsed from.
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    pub fn schema(&self) -> &SchemaObject {
        &self.schema
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn initial_value(&self) -> Option<&Value> {
        self.initial_value.as_ref()
    }

    /// Attributes derived from the schema node alone.
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn children(&self) -> &[FieldId] {
        &self.children
    }

    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn parent(&self) -> Option<FieldId> {
        self.parent
    }

    pub fn segment(&self) -> Option<&PathSegment> {
        self.segment.as_ref()
    }

    pub fn owner(&self) -> Option<Owner> {
        self.owner
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn array_state(&self) -> Option<&ArrayState> {
        self.array.as_ref()
    }

    /// Options of a list field, with the one equal to the current value selected.
    pub fn list_options(&self) -> Vec<ListOption> {
        self.options
            .iter()
            .map(|option| {
                let value = option_string(option);
                let label = self
                    .descriptor
                    .labels
                    .get(&value)
                    .cloned()
                    .unwrap_or_else(|| value.clone());
                ListOption {
                    label,
                    value,
                    selected: self.value.as_ref().is_some_and(|v| value::same(v, option)),
                }
            })
            .collect()
    }

    pub(crate) fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub(crate) fn clear_messages(&mut self) {
        self.messages.clear();
    }
}

/// Storage for the fields of one form. Slots of removed fields stay empty so
/// ids are never reused.
#[derive(Debug, Default)]
pub(crate) struct FieldArena {
    slots: Vec<Option<Field>>,
}

impl FieldArena {
    pub(crate) fn reserve(&mut self) -> FieldId {
        self.slots.push(None);
        FieldId(self.slots.len() - 1)
    }

    pub(crate) fn fill(&mut self, id: FieldId, field: Field) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            *slot = Some(field);
        }
    }

    pub(crate) fn get(&self, id: FieldId) -> Option<&Field> {
        self.slots.get(id.0)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: FieldId) -> Option<&mut Field> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    /// Drops `id` and everything below it.
    pub(crate) fn free(&mut self, id: FieldId) {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(field) = self.slots.get_mut(next.0).and_then(Option::take) {
                pending.extend(field.children);
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Field> {
        self.slots.iter().flatten()
    }

    pub(crate) fn len(&self) -> usize {
        self.iter().count()
    }
}

/// How an option value is written into a form control.
pub(crate) fn option_string(option: &Value) -> String {
    value::string(Some(option)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let mut path = FieldPath::root();
        path.push(PathSegment::Property("user".into()));
        path.push(PathSegment::Property("tags".into()));
        path.push(PathSegment::Index(2));
        path.push(PathSegment::Property("label".into()));
        assert_eq!(path.to_string(), "user.tags[2].label");
        assert_eq!(path.depth(), 4);
    }

    #[test]
    fn test_path_parse() {
        let path = FieldPath::parse("items[0].name");
        assert_eq!(path.depth(), 3);
        assert_eq!(path.to_string(), "items[0].name");
        assert!(FieldPath::parse("").is_root());
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in [FieldKind::Textarea, FieldKind::List, FieldKind::Radio] {
            assert_eq!(FieldKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(FieldKind::parse("color"), None);
    }

    #[test]
    fn test_array_bounds() {
        let state = ArrayState {
            min_items: 1,
            max_items: Some(3),
            tuple_len: 1,
            extensible: true,
            checkboxes: false,
        };
        assert!(state.can_push(2));
        assert!(!state.can_push(3));
        assert!(!state.can_remove(0, 3));
        assert!(state.can_remove(2, 3));
        assert!(!state.can_move_up(1, 3));
        assert!(state.can_move_up(2, 3));
        assert!(state.can_move_down(1, 3));
        assert!(!state.can_move_down(2, 3));
    }
}
