use super::{ParseContext, Parser, parse_value};
use crate::field::{Field, Owner, ParserKind};
use crate::schema::SchemaObject;
use serde_json::Value;

/// One radio child per enum value. The children hold their option as value;
/// picking one writes it into this field.
pub(super) fn parse(
    parser: &mut Parser<'_>,
    node: &SchemaObject,
    initial: Option<&Value>,
    cx: &ParseContext<'_>,
    field: &mut Field,
) {
    field.value = parse_value(ParserKind::Enum, node, initial);

    for (i, option) in node.enum_.iter().flatten().enumerate() {
        let option_schema = node.option_schema(option);
        let child_cx =
            ParseContext::option(Owner::Enum(field.id), format!("{}/enum/{i}", cx.pointer));
        let child = parser.arena.reserve();
        parser.parse_into(child, &option_schema, None, child_cx);
        field.children.push(child);
    }
}
