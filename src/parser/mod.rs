//! Turns schema nodes into fields.
//!
//! [`resolve_kind`] decides which parser handles a node, then the node goes
//! through the shared base step ([`parse_field`]), the initial value step
//! ([`parse_value`]) and the parser's own extension. Structural parsers
//! recurse into their children with a fresh [`ParseContext`].

mod array;
mod enumeration;
mod list;
mod object;
mod scalar;

pub(crate) use array::item_schema;
pub(crate) use scalar::NULL_VALUE;

use crate::components::Components;
use crate::descriptor::{DescriptorBuilder, DescriptorCache, DescriptorOverrides};
use crate::field::{Attrs, Field, FieldArena, FieldId, FieldKind, InputType, Owner, ParserKind, PathSegment};
use crate::id::UniqueId;
use crate::schema::{JsonSchema, SchemaObject, SingleType};
use crate::value;
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, trace};

/// Attribute step of a scalar parser.
type Extension = fn(&SchemaObject, FieldKind, &mut Attrs);

const SCALAR_EXTENSIONS: [(ParserKind, Extension); 5] = [
    (ParserKind::Boolean, scalar::boolean),
    (ParserKind::Number, scalar::number),
    (ParserKind::Integer, scalar::integer),
    (ParserKind::String, scalar::string),
    (ParserKind::Null, scalar::null),
];

fn extension(parser: ParserKind) -> Option<Extension> {
    SCALAR_EXTENSIONS
        .iter()
        .find(|(kind, _)| *kind == parser)
        .map(|(_, extend)| *extend)
}

/// Where a node sits in the tree being built.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParseContext<'o> {
    pub parent: Option<FieldId>,
    pub segment: Option<PathSegment>,
    pub pointer: String,
    pub owner: Option<Owner>,
    pub required: bool,
    pub overrides: Option<&'o DescriptorOverrides>,
}

impl<'o> ParseContext<'o> {
    pub fn root(overrides: Option<&'o DescriptorOverrides>) -> Self {
        Self {
            pointer: "#".to_string(),
            overrides,
            ..Self::default()
        }
    }

    /// Context of the `index`th item of the array field `parent`.
    pub fn item(
        parent: FieldId,
        index: usize,
        pointer: String,
        overrides: Option<&'o DescriptorOverrides>,
    ) -> Self {
        Self {
            parent: Some(parent),
            segment: Some(PathSegment::Index(index)),
            pointer,
            overrides,
            ..Self::default()
        }
    }

    /// Context of an option child picked into `owner`.
    fn option(owner: Owner, pointer: String) -> Self {
        Self {
            parent: Some(owner.field()),
            pointer,
            owner: Some(owner),
            ..Self::default()
        }
    }
}

pub(crate) struct Parser<'a> {
    pub components: &'a Components,
    pub descriptors: &'a mut DescriptorCache,
    pub ids: &'a mut UniqueId,
    pub arena: &'a mut FieldArena,
}

impl Parser<'_> {
    /// Parses `schema` into a new field. A `false` schema admits no value
    /// and yields no field.
    pub fn parse(
        &mut self,
        schema: &JsonSchema,
        model: Option<&Value>,
        cx: ParseContext<'_>,
    ) -> Option<FieldId> {
        let node = schema.resolve()?;
        let id = self.arena.reserve();
        self.parse_into(id, &node, model, cx);
        Some(id)
    }

    /// Parses `node` into the already reserved slot `id`.
    pub fn parse_into(
        &mut self,
        id: FieldId,
        node: &SchemaObject,
        model: Option<&Value>,
        cx: ParseContext<'_>,
    ) {
        let (parser, kind) = resolve_kind(node, &cx);
        let descriptor_kind = cx
            .overrides
            .and_then(|o| o.kind.as_deref())
            .unwrap_or(kind.as_str());
        let builder = DescriptorBuilder::new(self.components);
        let descriptor =
            self.descriptors
                .get_or_build(&cx.pointer, &builder, node, descriptor_kind, cx.overrides);

        let mut field = Field {
            id,
            key: self.ids.next_key(),
            kind,
            parser,
            pointer: cx.pointer.clone(),
            schema: Rc::new(node.clone()),
            descriptor,
            value: None,
            initial_value: None,
            attrs: parse_field(node, &cx, kind),
            messages: Vec::new(),
            children: Vec::new(),
            groups: Vec::new(),
            parent: cx.parent,
            segment: cx.segment.clone(),
            owner: cx.owner,
            is_root: cx.parent.is_none(),
            required: cx.required,
            options: Vec::new(),
            array: None,
        };

        let initial = model
            .or(node.default.as_ref())
            .or(node.const_.as_ref());

        match parser {
            ParserKind::List => list::parse(node, initial, &mut field),
            ParserKind::Enum => enumeration::parse(self, node, initial, &cx, &mut field),
            ParserKind::Object => object::parse(self, node, initial, &cx, &mut field),
            ParserKind::Array => array::parse(self, node, initial, &cx, &mut field),
            scalar => {
                field.value = parse_value(scalar, node, initial);
                if let Some(extend) = extension(scalar) {
                    extend(node, kind, &mut field.attrs);
                }
            }
        }
        field.initial_value = field.value.clone();

        trace!(
            key = %field.key,
            kind = %kind,
            pointer = %field.pointer,
            children = field.children.len(),
            "parsed field"
        );
        self.arena.fill(id, field);
    }
}

/// Picks the parser for `node` and the kind of field it produces.
pub(crate) fn resolve_kind(node: &SchemaObject, cx: &ParseContext<'_>) -> (ParserKind, FieldKind) {
    let primary = node.primary_type();
    let scalar = primary.and_then(scalar_parser);

    if let Some(owner) = cx.owner {
        let kind = match owner {
            Owner::Enum(_) => FieldKind::Radio,
            Owner::Checkbox(_) => FieldKind::Checkbox,
        };
        return (scalar.unwrap_or(ParserKind::String), kind);
    }

    let requested = cx.overrides.and_then(|o| o.kind.as_deref()).and_then(|name| {
        let kind = FieldKind::parse(name);
        if kind.is_none() {
            debug!(kind = name, pointer = %cx.pointer, "custom kind only selects a component");
        }
        kind
    });

    if node.has_enum() && primary.is_none_or(SingleType::is_scalar) {
        return match requested {
            Some(FieldKind::List) => (ParserKind::List, FieldKind::List),
            _ => (ParserKind::Enum, FieldKind::Enum),
        };
    }

    match primary {
        Some(SingleType::Array) => (ParserKind::Array, FieldKind::Array),
        Some(SingleType::Object) => (ParserKind::Object, FieldKind::Object),
        None if node.properties.is_some() => (ParserKind::Object, FieldKind::Object),
        Some(SingleType::Null) => (ParserKind::Null, FieldKind::Hidden),
        Some(SingleType::Boolean) => (ParserKind::Boolean, hidden_or(FieldKind::Boolean, requested)),
        Some(SingleType::Integer) => (ParserKind::Integer, hidden_or(FieldKind::Integer, requested)),
        Some(SingleType::Number) => (ParserKind::Number, hidden_or(FieldKind::Number, requested)),
        Some(SingleType::String) | None => (ParserKind::String, string_kind(node, requested)),
    }
}

fn scalar_parser(t: SingleType) -> Option<ParserKind> {
    match t {
        SingleType::Boolean => Some(ParserKind::Boolean),
        SingleType::Integer => Some(ParserKind::Integer),
        SingleType::Number => Some(ParserKind::Number),
        SingleType::String => Some(ParserKind::String),
        SingleType::Null => Some(ParserKind::Null),
        SingleType::Array | SingleType::Object => None,
    }
}

fn hidden_or(natural: FieldKind, requested: Option<FieldKind>) -> FieldKind {
    match requested {
        Some(FieldKind::Hidden) => FieldKind::Hidden,
        _ => natural,
    }
}

fn string_kind(node: &SchemaObject, requested: Option<FieldKind>) -> FieldKind {
    match requested {
        Some(
            kind @ (FieldKind::Textarea
            | FieldKind::Password
            | FieldKind::File
            | FieldKind::Image
            | FieldKind::Hidden),
        ) => kind,
        _ if node.content_media_type.is_some() => FieldKind::File,
        _ => FieldKind::String,
    }
}

/// Base step shared by every parser.
pub(crate) fn parse_field(node: &SchemaObject, cx: &ParseContext<'_>, kind: FieldKind) -> Attrs {
    Attrs {
        input_type: match kind {
            FieldKind::Radio => Some(InputType::Radio),
            FieldKind::Checkbox => Some(InputType::Checkbox),
            FieldKind::Hidden => Some(InputType::Hidden),
            _ => None,
        },
        required: cx.required,
        readonly: node.read_only.unwrap_or(false),
        ..Attrs::default()
    }
}

/// Coerces a raw value the way the given parser stores it.
///
/// Enum and list fields coerce through the scalar type their schema
/// declares, and keep the raw value when the schema is untyped.
pub fn parse_value(parser: ParserKind, schema: &SchemaObject, raw: Option<&Value>) -> Option<Value> {
    match parser {
        ParserKind::Boolean => Some(Value::Bool(value::boolean(raw))),
        ParserKind::Integer => value::integer(raw).map(Value::from),
        ParserKind::Number => value::number(raw).and_then(value::float_value),
        ParserKind::String => value::string(raw).map(Value::String),
        ParserKind::Null => Some(Value::Null),
        ParserKind::List | ParserKind::Enum => match schema.primary_type().and_then(scalar_parser) {
            Some(scalar) => parse_value(scalar, schema, raw),
            None => raw.cloned(),
        },
        ParserKind::Array => Some(Value::Array(value::array(raw))),
        ParserKind::Object => Some(Value::Object(value::object(raw))),
    }
}

/// Escapes a property name for use in a JSON pointer.
fn pointer_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(json: serde_json::Value) -> SchemaObject {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_resolve_kind_by_type() {
        let cx = ParseContext::root(None);
        assert_eq!(
            resolve_kind(&node(json!({"type": "boolean"})), &cx),
            (ParserKind::Boolean, FieldKind::Boolean)
        );
        assert_eq!(
            resolve_kind(&node(json!({"type": "null"})), &cx),
            (ParserKind::Null, FieldKind::Hidden)
        );
        assert_eq!(
            resolve_kind(&node(json!({"properties": {}})), &cx),
            (ParserKind::Object, FieldKind::Object)
        );
        assert_eq!(
            resolve_kind(&node(json!({})), &cx),
            (ParserKind::String, FieldKind::String)
        );
        assert_eq!(
            resolve_kind(&node(json!({"type": ["null", "integer"]})), &cx),
            (ParserKind::Integer, FieldKind::Integer)
        );
    }

    #[test]
    fn test_resolve_kind_with_requested_kind() {
        let textarea = DescriptorOverrides {
            kind: Some("textarea".into()),
            ..Default::default()
        };
        let list = DescriptorOverrides {
            kind: Some("list".into()),
            ..Default::default()
        };
        let string = node(json!({"type": "string"}));
        let choice = node(json!({"type": "string", "enum": ["a", "b"]}));

        assert_eq!(
            resolve_kind(&string, &ParseContext::root(Some(&textarea))).1,
            FieldKind::Textarea
        );
        assert_eq!(resolve_kind(&choice, &ParseContext::root(None)).1, FieldKind::Enum);
        assert_eq!(
            resolve_kind(&choice, &ParseContext::root(Some(&list))),
            (ParserKind::List, FieldKind::List)
        );
    }

    #[test]
    fn test_resolve_kind_for_options() {
        let cx = ParseContext::option(Owner::Enum(FieldId(0)), "#/enum/0".into());
        assert_eq!(
            resolve_kind(&node(json!({"type": "integer", "const": 1})), &cx),
            (ParserKind::Integer, FieldKind::Radio)
        );
    }

    #[test]
    fn test_parse_value_per_parser() {
        let any = SchemaObject::default();
        assert_eq!(parse_value(ParserKind::Boolean, &any, None), Some(json!(false)));
        assert_eq!(parse_value(ParserKind::Integer, &any, Some(&json!("5"))), Some(json!(5)));
        assert_eq!(parse_value(ParserKind::Integer, &any, Some(&json!("x"))), None);
        assert_eq!(parse_value(ParserKind::Number, &any, Some(&json!("2.5"))), Some(json!(2.5)));
        assert_eq!(parse_value(ParserKind::Null, &any, Some(&json!("x"))), Some(json!(null)));
        assert_eq!(parse_value(ParserKind::Array, &any, Some(&json!("x"))), Some(json!([])));
        assert_eq!(parse_value(ParserKind::Object, &any, None), Some(json!({})));
    }

    #[test]
    fn test_parse_value_for_enum_follows_declared_type() {
        let typed = node(json!({"type": "integer", "enum": [1, 2]}));
        assert_eq!(parse_value(ParserKind::Enum, &typed, Some(&json!("2"))), Some(json!(2)));

        let untyped = node(json!({"enum": ["a", 1]}));
        assert_eq!(parse_value(ParserKind::Enum, &untyped, Some(&json!(1))), Some(json!(1)));
    }

    #[test]
    fn test_pointer_token_escapes() {
        assert_eq!(pointer_token("a/b~c"), "a~1b~0c");
    }
}
