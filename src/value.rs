//! Coercion from raw UI values to typed model values.
//!
//! Every function here is total: malformed input comes back as `None`
//! (the "no value set" state) and never as an error or a NaN.

use serde_json::{Map, Number, Value};

/// True only for a literal `true`.
pub fn boolean(x: Option<&Value>) -> bool {
    matches!(x, Some(Value::Bool(true)))
}

/// Base-10 integer. Strings are read like `parseInt`: leading whitespace,
/// an optional sign, then as many digits as there are.
pub fn integer(x: Option<&Value>) -> Option<i64> {
    match x? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => integer_prefix(s),
        _ => None,
    }
}

/// Integer part of `f`, or `None` when it is not finite or does not fit an `i64`.
pub fn whole(f: f64) -> Option<i64> {
    let t = f.trunc();
    (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then_some(t as i64)
}

/// Floating point number, read like `parseFloat`. Non-finite results are
/// treated as unparsable.
pub fn number(x: Option<&Value>) -> Option<f64> {
    match x? {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => float_prefix(s),
        _ => None,
    }
}

pub fn string(x: Option<&Value>) -> Option<String> {
    x.map(|value| match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(n),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => string(Some(other)).unwrap_or_default(),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    })
}

pub fn object(x: Option<&Value>) -> Map<String, Value> {
    match x {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

/// The elements of a sequence, or an empty sequence for anything else.
pub fn array(x: Option<&Value>) -> Vec<Value> {
    match x {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// Compacts live item values, dropping the unset ones and keeping order.
pub fn defined<I>(items: I) -> Vec<Value>
where
    I: IntoIterator<Item = Option<Value>>,
{
    items.into_iter().flatten().collect()
}

/// Wraps a float as a JSON number; `None` for NaN and infinities.
pub fn float_value(f: f64) -> Option<Value> {
    Number::from_f64(f).map(Value::Number)
}

/// Equality that treats `5` and `5.0` as the same number.
pub fn same(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Renders whole floats without a trailing `.0`, the way a browser shows
/// them in an input.
pub fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

fn integer_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-' | b'+')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|f| f.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boolean_is_strict() {
        assert!(boolean(Some(&json!(true))));
        assert!(!boolean(Some(&json!("true"))));
        assert!(!boolean(Some(&json!(1))));
        assert!(!boolean(None));
    }

    #[test]
    fn test_integer_parsing() {
        assert_eq!(integer(Some(&json!("5"))), Some(5));
        assert_eq!(integer(Some(&json!("  -12px"))), Some(-12));
        assert_eq!(integer(Some(&json!("7.9"))), Some(7));
        assert_eq!(integer(Some(&json!(7.9))), Some(7));
        assert_eq!(integer(Some(&json!("abc"))), None);
        assert_eq!(integer(Some(&json!(""))), None);
        assert_eq!(integer(Some(&json!(true))), None);
        assert_eq!(integer(None), None);
    }

    #[test]
    fn test_integer_out_of_range_is_unset() {
        assert_eq!(integer(Some(&json!(1e300))), None);
        assert_eq!(integer(Some(&json!(u64::MAX))), None);
        assert_eq!(integer(Some(&json!(-1e19))), None);
        assert_eq!(integer(Some(&json!("99999999999999999999"))), None);
        assert_eq!(integer(Some(&json!(i64::MIN))), Some(i64::MIN));
        assert_eq!(integer(Some(&json!(-2.5e3))), Some(-2500));
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(number(Some(&json!("5.25"))), Some(5.25));
        assert_eq!(number(Some(&json!(".5"))), Some(0.5));
        assert_eq!(number(Some(&json!("1e3kg"))), Some(1000.0));
        assert_eq!(number(Some(&json!("3."))), Some(3.0));
        assert_eq!(number(Some(&json!("abc"))), None);
        assert_eq!(number(Some(&json!("."))), None);
        assert_eq!(number(Some(&json!(null))), None);
    }

    #[test]
    fn test_string_conversion() {
        assert_eq!(string(None), None);
        assert_eq!(string(Some(&json!("a"))), Some("a".to_string()));
        assert_eq!(string(Some(&json!(5))), Some("5".to_string()));
        assert_eq!(string(Some(&json!(5.0))), Some("5".to_string()));
        assert_eq!(string(Some(&json!(2.5))), Some("2.5".to_string()));
        assert_eq!(string(Some(&json!(false))), Some("false".to_string()));
        assert_eq!(string(Some(&json!(null))), Some("null".to_string()));
        assert_eq!(string(Some(&json!([1, "b"]))), Some("1,b".to_string()));
    }

    #[test]
    fn test_object_and_array_fallbacks() {
        assert!(object(None).is_empty());
        assert!(object(Some(&json!("x"))).is_empty());
        assert_eq!(object(Some(&json!({"a": 1}))).get("a"), Some(&json!(1)));

        assert!(array(None).is_empty());
        assert!(array(Some(&json!({"a": 1}))).is_empty());
        assert_eq!(array(Some(&json!([1, 2]))), vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_defined_drops_unset_entries_in_order() {
        let items = vec![Some(json!("a")), None, Some(json!("c")), None];
        assert_eq!(defined(items), vec![json!("a"), json!("c")]);
    }

    #[test]
    fn test_same_compares_numbers_loosely() {
        assert!(same(&json!(5), &json!(5.0)));
        assert!(!same(&json!(5), &json!("5")));
        assert!(same(&json!("a"), &json!("a")));
    }
}
