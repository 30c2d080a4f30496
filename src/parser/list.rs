use super::parse_value;
use crate::field::{Field, ParserKind};
use crate::schema::SchemaObject;
use serde_json::Value;

/// A select box: the enum values become options, no child fields.
pub(super) fn parse(node: &SchemaObject, initial: Option<&Value>, field: &mut Field) {
    field.options = node.enum_.clone().unwrap_or_default();
    field.value = parse_value(ParserKind::List, node, initial);
}
