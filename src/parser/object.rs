use super::{ParseContext, Parser, pointer_token};
use crate::field::{Field, FieldGroup, FieldId, PathSegment};
use crate::schema::SchemaObject;
use crate::value;
use serde_json::Value;

pub(super) fn parse(
    parser: &mut Parser<'_>,
    node: &SchemaObject,
    initial: Option<&Value>,
    cx: &ParseContext<'_>,
    field: &mut Field,
) {
    let model = value::object(initial);
    // Keys the schema does not declare are carried through untouched.
    let mut map = model.clone();
    let mut parsed: Vec<(String, FieldId)> = Vec::new();

    if let Some(properties) = &node.properties {
        for key in ordered_keys(properties.keys(), field.descriptor.order()) {
            let Some(property) = properties.get(&key) else {
                continue;
            };
            let child_cx = ParseContext {
                parent: Some(field.id),
                segment: Some(PathSegment::Property(key.clone())),
                pointer: format!("{}/properties/{}", cx.pointer, pointer_token(&key)),
                owner: None,
                required: node.is_required(&key),
                overrides: cx.overrides.and_then(|o| o.property(&key)),
            };
            let Some(child) = parser.parse(property, model.get(&key), child_cx) else {
                continue;
            };
            match parser.arena.get(child).and_then(Field::value) {
                Some(v) => map.insert(key.clone(), v.clone()),
                None => map.remove(&key),
            };
            field.children.push(child);
            parsed.push((key, child));
        }
    }

    field.value = Some(Value::Object(map));
    field.groups = field
        .descriptor
        .children_groups()
        .iter()
        .map(|group| FieldGroup {
            id: group.id.clone(),
            label: group.label.clone(),
            children: group
                .properties
                .iter()
                .filter_map(|name| parsed.iter().find(|(key, _)| key == name).map(|(_, id)| *id))
                .collect(),
        })
        .collect();
}

/// Keys named in `order` that the schema declares, then the remaining
/// declared keys in declaration order.
fn ordered_keys<'k>(declared: impl Iterator<Item = &'k String> + Clone, order: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for key in order {
        if declared.clone().any(|d| d == key) && !keys.contains(key) {
            keys.push(key.clone());
        }
    }
    for key in declared {
        if !keys.contains(key) {
            keys.push(key.clone());
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_keys_puts_listed_keys_first() {
        let declared = ["a".to_string(), "b".to_string(), "c".to_string()];
        let order = ["c".to_string(), "x".to_string(), "a".to_string()];
        assert_eq!(ordered_keys(declared.iter(), &order), ["c", "a", "b"]);
        assert_eq!(ordered_keys(declared.iter(), &[]), ["a", "b", "c"]);
    }
}
