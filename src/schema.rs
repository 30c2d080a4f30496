use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Cow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum JsonSchema {
    Boolean(bool),
    Object(Box<SchemaObject>),
}

impl JsonSchema {
    /// The schema object behind this node. `true` reads as the empty schema,
    /// `false` admits nothing and yields `None`.
    pub fn resolve(&self) -> Option<Cow<'_, SchemaObject>> {
        match self {
            JsonSchema::Boolean(true) => Some(Cow::Owned(SchemaObject::default())),
            JsonSchema::Boolean(false) => None,
            JsonSchema::Object(obj) => Some(Cow::Borrowed(obj.as_ref())),
        }
    }

    pub fn as_object(&self) -> Option<&SchemaObject> {
        match self {
            JsonSchema::Object(obj) => Some(obj),
            JsonSchema::Boolean(_) => None,
        }
    }
}

impl From<SchemaObject> for JsonSchema {
    fn from(obj: SchemaObject) -> Self {
        JsonSchema::Object(Box::new(obj))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "$schema")]
    #[serde(default, deserialize_with = "lenient")]
    pub schema: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "$id")]
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    pub type_: Option<SchemaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub properties: Option<IndexMap<String, JsonSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub required: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub items: Option<Items>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub additional_items: Option<Box<JsonSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "enum")]
    #[serde(default, deserialize_with = "lenient")]
    pub enum_: Option<Vec<serde_json::Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "const")]
    pub const_: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub read_only: Option<bool>,

    // Number constraints
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub minimum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub maximum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub exclusive_minimum: Option<ExclusiveBound>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub exclusive_maximum: Option<ExclusiveBound>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub multiple_of: Option<f64>,

    // String constraints
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "count")]
    pub min_length: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "count")]
    pub max_length: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub content_media_type: Option<String>,

    // Array constraints
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "count")]
    pub min_items: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "count")]
    pub max_items: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default, deserialize_with = "lenient")]
    pub unique_items: Option<bool>,
}

/// Reads a keyword, treating a value of the wrong JSON type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Reads a non-negative integer keyword; `2.0` counts, `2.5` and `-1` do not.
fn count<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(non_negative_integer)
        .and_then(|n| T::try_from(n).ok()))
}

fn non_negative_integer(value: &Value) -> Option<u64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
            .map(|f| f as u64)
    })
}

/// `items` is either one schema for every element or a positional tuple.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Items {
    Tuple(Vec<JsonSchema>),
    Single(Box<JsonSchema>),
}

/// Draft-06 numeric bound, or the draft-04 flag that makes `minimum`/`maximum` exclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ExclusiveBound {
    Flag(bool),
    Value(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SchemaType {
    Single(SingleType),
    Multiple(Vec<SingleType>),
    Unknown(serde_json::Value),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SingleType {
    Null,
    Boolean,
    Object,
    Array,
    Number,
    String,
    Integer,
}

impl SingleType {
    pub fn as_str(self) -> &'static str {
        match self {
            SingleType::Null => "null",
            SingleType::Boolean => "boolean",
            SingleType::Object => "object",
            SingleType::Array => "array",
            SingleType::Number => "number",
            SingleType::String => "string",
            SingleType::Integer => "integer",
        }
    }

    pub fn is_scalar(self) -> bool {
        !matches!(self, SingleType::Array | SingleType::Object)
    }

    /// The type a literal value would be declared with.
    pub fn of_value(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => SingleType::Null,
            serde_json::Value::Bool(_) => SingleType::Boolean,
            serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => SingleType::Integer,
            serde_json::Value::Number(_) => SingleType::Number,
            serde_json::Value::String(_) => SingleType::String,
            serde_json::Value::Array(_) => SingleType::Array,
            serde_json::Value::Object(_) => SingleType::Object,
        }
    }
}

impl SchemaObject {
    /// The type that drives field handling. Union types resolve to their
    /// first non-null member; unrecognized names resolve to nothing.
    pub fn primary_type(&self) -> Option<SingleType> {
        match self.type_.as_ref()? {
            SchemaType::Single(single) => Some(*single),
            SchemaType::Multiple(types) => types
                .iter()
                .copied()
                .find(|t| *t != SingleType::Null)
                .or_else(|| types.first().copied()),
            SchemaType::Unknown(_) => None,
        }
    }

    /// Raw `type` name as written, including names this crate does not know.
    pub fn type_name(&self) -> Option<&str> {
        match self.type_.as_ref()? {
            SchemaType::Unknown(serde_json::Value::String(name)) => Some(name),
            SchemaType::Unknown(_) => None,
            _ => self.primary_type().map(SingleType::as_str),
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.primary_type().is_some_and(SingleType::is_scalar)
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|r| r.iter().any(|name| name == property))
    }

    pub fn has_enum(&self) -> bool {
        self.enum_.is_some()
    }

    /// Schema of a single option of this node's `enum`, used for radio and
    /// checkbox children.
    pub(crate) fn option_schema(&self, option: &serde_json::Value) -> SchemaObject {
        let type_ = self
            .primary_type()
            .filter(|t| t.is_scalar())
            .unwrap_or_else(|| SingleType::of_value(option));
        SchemaObject {
            type_: Some(SchemaType::Single(type_)),
            const_: Some(option.clone()),
            read_only: self.read_only,
            format: self.format.clone(),
            ..Default::default()
        }
    }
}

/// True iff the node's type is one of boolean, integer, null, number, string.
pub fn is_scalar(schema: &JsonSchema) -> bool {
    schema.as_object().is_some_and(SchemaObject::is_scalar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> JsonSchema {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_scalar_types() {
        for t in ["boolean", "integer", "null", "number", "string"] {
            let schema = parse(&format!(r#"{{ "type": "{t}" }}"#));
            assert!(is_scalar(&schema), "{t} should be scalar");
        }
    }

    #[test]
    fn test_structural_and_unknown_types() {
        for json in [
            r#"{ "type": "array" }"#,
            r#"{ "type": "object" }"#,
            r#"{ "type": "invalid_type" }"#,
            r#"{ "title": "no type" }"#,
            "true",
        ] {
            assert!(!is_scalar(&parse(json)), "{json} should not be scalar");
        }
    }

    #[test]
    fn test_union_type_prefers_non_null() {
        let schema = parse(r#"{ "type": ["null", "integer"] }"#);
        assert_eq!(
            schema.as_object().unwrap().primary_type(),
            Some(SingleType::Integer)
        );
    }

    #[test]
    fn test_unknown_type_name_is_kept() {
        let schema = parse(r#"{ "type": "color" }"#);
        let obj = schema.as_object().unwrap();
        assert_eq!(obj.primary_type(), None);
        assert_eq!(obj.type_name(), Some("color"));
    }

    #[test]
    fn test_tuple_and_single_items() {
        let tuple = parse(r#"{ "type": "array", "items": [{ "type": "string" }, true] }"#);
        assert!(matches!(
            tuple.as_object().unwrap().items,
            Some(Items::Tuple(ref v)) if v.len() == 2
        ));

        let single = parse(r#"{ "type": "array", "items": { "type": "string" } }"#);
        assert!(matches!(
            single.as_object().unwrap().items,
            Some(Items::Single(_))
        ));
    }

    #[test]
    fn test_exclusive_bounds_both_drafts() {
        let draft6 = parse(r#"{ "type": "number", "exclusiveMinimum": 5 }"#);
        assert_eq!(
            draft6.as_object().unwrap().exclusive_minimum,
            Some(ExclusiveBound::Value(5.0))
        );

        let draft4 = parse(r#"{ "type": "number", "minimum": 5, "exclusiveMinimum": true }"#);
        assert_eq!(
            draft4.as_object().unwrap().exclusive_minimum,
            Some(ExclusiveBound::Flag(true))
        );
    }

    #[test]
    fn test_integral_float_counts_are_accepted() {
        let schema = parse(r#"{ "type": "string", "minLength": 2.0, "maxLength": 2.5 }"#);
        let obj = schema.as_object().unwrap();
        assert_eq!(obj.min_length, Some(2));
        assert_eq!(obj.max_length, None);

        let schema = parse(r#"{ "type": "array", "minItems": -1, "maxItems": "3" }"#);
        let obj = schema.as_object().unwrap();
        assert_eq!(obj.min_items, None);
        assert_eq!(obj.max_items, None);
    }

    #[test]
    fn test_mistyped_keywords_read_as_absent() {
        let schema = parse(
            r#"{ "type": "integer", "title": 5, "minimum": "low", "required": "x", "exclusiveMinimum": "no" }"#,
        );
        let obj = schema.as_object().unwrap();
        assert_eq!(obj.primary_type(), Some(SingleType::Integer));
        assert_eq!(obj.title, None);
        assert_eq!(obj.minimum, None);
        assert_eq!(obj.required, None);
        assert_eq!(obj.exclusive_minimum, None);
    }

    #[test]
    fn test_properties_keep_declared_order() {
        let schema = parse(
            r#"{ "type": "object", "properties": { "zeta": {}, "alpha": {}, "mid": {} } }"#,
        );
        let keys: Vec<_> = schema
            .as_object()
            .unwrap()
            .properties
            .as_ref()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }
}
