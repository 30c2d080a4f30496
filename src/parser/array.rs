use super::{ParseContext, Parser};
use crate::field::{ArrayState, Field, Owner, ParserKind};
use crate::schema::{Items, JsonSchema, SchemaObject};
use crate::value;
use serde_json::Value;

pub(super) fn parse(
    parser: &mut Parser<'_>,
    node: &SchemaObject,
    initial: Option<&Value>,
    cx: &ParseContext<'_>,
    field: &mut Field,
) {
    let model = value::array(initial);
    let mut state = ArrayState {
        min_items: node.min_items.unwrap_or(0),
        max_items: node.max_items,
        ..ArrayState::default()
    };

    match &node.items {
        Some(Items::Single(item)) => match checkbox_item(node, item) {
            Some(item) => {
                state.checkboxes = true;
                for (i, option) in item.enum_.iter().flatten().enumerate() {
                    let option_schema = item.option_schema(option);
                    let child_cx = ParseContext::option(
                        Owner::Checkbox(field.id),
                        format!("{}/items/enum/{i}", cx.pointer),
                    );
                    let child = parser.arena.reserve();
                    parser.parse_into(child, &option_schema, None, child_cx);
                    field.children.push(child);
                }
            }
            None => {
                state.extensible = true;
                let count = model.len().max(state.min_items);
                for i in 0..count {
                    parse_item(parser, item, model.get(i), i, format!("{}/items", cx.pointer), cx, field);
                }
            }
        },
        Some(Items::Tuple(tuple)) => {
            state.tuple_len = tuple.len();
            for (i, item) in tuple.iter().enumerate() {
                parse_item(parser, item, model.get(i), i, format!("{}/items/{i}", cx.pointer), cx, field);
            }
            if let Some(additional) = additional_items(node) {
                state.extensible = true;
                for i in tuple.len()..model.len() {
                    parse_item(
                        parser,
                        additional,
                        model.get(i),
                        i,
                        format!("{}/additionalItems", cx.pointer),
                        cx,
                        field,
                    );
                }
            }
        }
        None => {}
    }

    field.value = if state.checkboxes || node.items.is_none() {
        super::parse_value(ParserKind::Array, node, initial)
    } else {
        Some(Value::Array(value::defined(field.children.iter().map(|child| {
            parser.arena.get(*child).and_then(|f| f.value.clone())
        }))))
    };
    field.array = Some(state);
}

/// Schema and descriptor pointer for a new item appended at `index`.
pub(crate) fn item_schema<'s>(
    node: &'s SchemaObject,
    pointer: &str,
    index: usize,
) -> Option<(&'s JsonSchema, String)> {
    match node.items.as_ref()? {
        Items::Single(item) => Some((&**item, format!("{pointer}/items"))),
        Items::Tuple(tuple) => match tuple.get(index) {
            Some(item) => Some((item, format!("{pointer}/items/{index}"))),
            None => additional_items(node).map(|s| (s, format!("{pointer}/additionalItems"))),
        },
    }
}

fn parse_item(
    parser: &mut Parser<'_>,
    schema: &JsonSchema,
    model: Option<&Value>,
    index: usize,
    pointer: String,
    cx: &ParseContext<'_>,
    field: &mut Field,
) {
    let overrides = cx.overrides.and_then(|o| o.item(index));
    let child_cx = ParseContext::item(field.id, index, pointer, overrides);
    if let Some(child) = parser.parse(schema, model, child_cx) {
        field.children.push(child);
    }
}

/// The item schema when the array is a set of scalar enum options.
fn checkbox_item<'s>(node: &SchemaObject, item: &'s JsonSchema) -> Option<&'s SchemaObject> {
    if node.unique_items != Some(true) {
        return None;
    }
    item.as_object().filter(|item| {
        item.has_enum() && item.primary_type().is_none_or(|t| t.is_scalar())
    })
}

fn additional_items(node: &SchemaObject) -> Option<&JsonSchema> {
    node.additional_items
        .as_deref()
        .filter(|schema| !matches!(schema, JsonSchema::Boolean(false)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(json: serde_json::Value) -> SchemaObject {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_item_schema_for_single_items() {
        let array = node(serde_json::json!({"type": "array", "items": {"type": "string"}}));
        let (_, pointer) = item_schema(&array, "#", 4).unwrap();
        assert_eq!(pointer, "#/items");
    }

    #[test]
    fn test_item_schema_for_tuples() {
        let closed = node(serde_json::json!({
            "type": "array",
            "items": [{"type": "string"}, {"type": "integer"}]
        }));
        assert_eq!(item_schema(&closed, "#", 1).unwrap().1, "#/items/1");
        assert!(item_schema(&closed, "#", 2).is_none());

        let open = node(serde_json::json!({
            "type": "array",
            "items": [{"type": "string"}],
            "additionalItems": {"type": "number"}
        }));
        assert_eq!(item_schema(&open, "#", 3).unwrap().1, "#/additionalItems");
    }

    #[test]
    fn test_checkbox_item_needs_unique_enum_items() {
        let set = node(serde_json::json!({
            "type": "array",
            "uniqueItems": true,
            "items": {"type": "string", "enum": ["a", "b"]}
        }));
        let Some(Items::Single(item)) = &set.items else {
            panic!("single items expected");
        };
        assert!(checkbox_item(&set, item).is_some());

        let list = node(serde_json::json!({
            "type": "array",
            "items": {"type": "string", "enum": ["a", "b"]}
        }));
        let Some(Items::Single(item)) = &list.items else {
            panic!("single items expected");
        };
        assert!(checkbox_item(&list, item).is_none());
    }
}
