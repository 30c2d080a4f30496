use crate::field::{Attrs, FieldKind, InputType, Numeric, option_string};
use crate::pattern;
use crate::schema::{ExclusiveBound, SchemaObject};
use crate::value;
use tracing::warn;

/// Shift applied to exclusive float bounds, since an input only knows
/// inclusive `min` and `max`.
const FLOAT_STEP: f64 = 0.1;

/// Placeholder value of a null field; non-empty so it never reads as missing.
pub(crate) const NULL_VALUE: &str = "\u{0}";

pub(super) fn boolean(_node: &SchemaObject, _kind: FieldKind, attrs: &mut Attrs) {
    attrs.input_type.get_or_insert(InputType::Checkbox);
}

pub(super) fn number(node: &SchemaObject, _kind: FieldKind, attrs: &mut Attrs) {
    attrs.input_type.get_or_insert(InputType::Number);

    let minimum = match node.exclusive_minimum {
        Some(ExclusiveBound::Value(v)) => Some(v + FLOAT_STEP),
        Some(ExclusiveBound::Flag(true)) => node.minimum.map(|m| m + FLOAT_STEP),
        _ => node.minimum,
    };
    let maximum = match node.exclusive_maximum {
        Some(ExclusiveBound::Value(v)) => Some(v - FLOAT_STEP),
        Some(ExclusiveBound::Flag(true)) => node.maximum.map(|m| m - FLOAT_STEP),
        _ => node.maximum,
    };

    attrs.min = minimum.map(Numeric::Float);
    attrs.max = maximum.map(Numeric::Float);
    attrs.step = node.multiple_of.map(Numeric::Float);
}

pub(super) fn integer(node: &SchemaObject, _kind: FieldKind, attrs: &mut Attrs) {
    attrs.input_type.get_or_insert(InputType::Number);

    let minimum = match node.exclusive_minimum {
        Some(ExclusiveBound::Value(v)) => Some(v + 1.0),
        Some(ExclusiveBound::Flag(true)) => node.minimum.map(|m| m + 1.0),
        _ => node.minimum,
    };
    let maximum = match node.exclusive_maximum {
        Some(ExclusiveBound::Value(v)) => Some(v - 1.0),
        Some(ExclusiveBound::Flag(true)) => node.maximum.map(|m| m - 1.0),
        _ => node.maximum,
    };

    attrs.min = minimum.map(integral);
    attrs.max = maximum.map(integral);
    attrs.step = node.multiple_of.map(integral);
}

/// Whole numbers that fit an `i64` render without a fraction; anything else
/// is kept as written.
fn integral(f: f64) -> Numeric {
    match value::whole(f) {
        Some(i) if f.fract() == 0.0 => Numeric::Integer(i),
        _ => Numeric::Float(f),
    }
}

pub(super) fn string(node: &SchemaObject, kind: FieldKind, attrs: &mut Attrs) {
    if attrs.input_type.is_none() {
        attrs.input_type = match kind {
            FieldKind::Textarea => None,
            FieldKind::Password => Some(InputType::Password),
            FieldKind::File => Some(InputType::File),
            FieldKind::Image => Some(InputType::Image),
            _ => Some(InputType::for_format(node.format.as_deref())),
        };
    }
    if kind == FieldKind::File {
        attrs.accept = node.content_media_type.clone();
    }

    attrs.minlength = node.min_length;
    attrs.maxlength = node.max_length;

    if matches!(kind, FieldKind::Radio | FieldKind::Checkbox) {
        return;
    }
    if let Some(source) = &node.pattern {
        if let Err(err) = pattern::compile(source) {
            warn!(pattern = %source, error = %err, "schema pattern does not compile");
        }
        attrs.pattern = Some(source.clone());
    } else if let Some(constant) = &node.const_ {
        attrs.pattern = Some(pattern::exact(&option_string(constant)));
    }
}

pub(super) fn null(_node: &SchemaObject, kind: FieldKind, attrs: &mut Attrs) {
    if kind == FieldKind::Hidden {
        attrs.value = Some(NULL_VALUE.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs_for(
        extend: fn(&SchemaObject, FieldKind, &mut Attrs),
        schema: serde_json::Value,
        kind: FieldKind,
    ) -> Attrs {
        let node: SchemaObject = serde_json::from_value(schema).unwrap();
        let mut attrs = Attrs::default();
        extend(&node, kind, &mut attrs);
        attrs
    }

    #[test]
    fn test_number_exclusive_bounds_shift_by_a_tenth() {
        let attrs = attrs_for(
            number,
            json!({"type": "number", "exclusiveMinimum": 5, "exclusiveMaximum": 10}),
            FieldKind::Number,
        );
        assert_eq!(attrs.input_type, Some(InputType::Number));
        assert_eq!(attrs.min, Some(Numeric::Float(5.1)));
        assert_eq!(attrs.max, Some(Numeric::Float(9.9)));
    }

    #[test]
    fn test_number_draft4_exclusive_flags() {
        let attrs = attrs_for(
            number,
            json!({"type": "number", "minimum": 1, "exclusiveMinimum": true, "maximum": 3}),
            FieldKind::Number,
        );
        assert_eq!(attrs.min, Some(Numeric::Float(1.1)));
        assert_eq!(attrs.max, Some(Numeric::Float(3.0)));
    }

    #[test]
    fn test_integer_exclusive_bounds_shift_by_one() {
        let attrs = attrs_for(
            integer,
            json!({"type": "integer", "exclusiveMinimum": 5, "maximum": 9.5, "multipleOf": 2}),
            FieldKind::Integer,
        );
        assert_eq!(attrs.min, Some(Numeric::Integer(6)));
        assert_eq!(attrs.max, Some(Numeric::Float(9.5)));
        assert_eq!(attrs.step, Some(Numeric::Integer(2)));
    }

    #[test]
    fn test_integer_bounds_are_copied_not_rounded() {
        let attrs = attrs_for(
            integer,
            json!({"type": "integer", "exclusiveMinimum": 5.5, "exclusiveMaximum": 10, "minimum": 1}),
            FieldKind::Integer,
        );
        assert_eq!(attrs.min, Some(Numeric::Float(6.5)));
        assert_eq!(attrs.max, Some(Numeric::Integer(9)));

        let attrs = attrs_for(integer, json!({"type": "integer", "minimum": 0}), FieldKind::Integer);
        assert_eq!(attrs.min, Some(Numeric::Integer(0)));
    }

    #[test]
    fn test_huge_integer_bounds_are_not_clamped() {
        let attrs = attrs_for(
            integer,
            json!({"type": "integer", "minimum": -1e300, "maximum": 1e300}),
            FieldKind::Integer,
        );
        assert_eq!(attrs.min, Some(Numeric::Float(-1e300)));
        assert_eq!(attrs.max, Some(Numeric::Float(1e300)));
    }

    #[test]
    fn test_string_format_and_lengths() {
        let attrs = attrs_for(
            string,
            json!({"type": "string", "format": "date", "minLength": 2, "maxLength": 8}),
            FieldKind::String,
        );
        assert_eq!(attrs.input_type, Some(InputType::Date));
        assert_eq!(attrs.minlength, Some(2));
        assert_eq!(attrs.maxlength, Some(8));
    }

    #[test]
    fn test_string_const_becomes_exact_pattern() {
        let attrs = attrs_for(string, json!({"type": "string", "const": "AB"}), FieldKind::String);
        assert_eq!(attrs.pattern.as_deref(), Some("^AB$"));
    }

    #[test]
    fn test_textarea_has_no_input_type() {
        let attrs = attrs_for(string, json!({"type": "string"}), FieldKind::Textarea);
        assert_eq!(attrs.input_type, None);
    }

    #[test]
    fn test_file_accepts_media_type() {
        let attrs = attrs_for(
            string,
            json!({"type": "string", "contentMediaType": "image/png"}),
            FieldKind::File,
        );
        assert_eq!(attrs.input_type, Some(InputType::File));
        assert_eq!(attrs.accept.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_null_gets_placeholder_value() {
        let attrs = attrs_for(null, json!({"type": "null"}), FieldKind::Hidden);
        assert_eq!(attrs.value.as_deref(), Some(NULL_VALUE));
    }
}
