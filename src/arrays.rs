use crate::value;
use serde_json::Value;

/// Swaps two positions; false when either is out of range.
pub fn swap<T>(items: &mut [T], a: usize, b: usize) -> bool {
    if a >= items.len() || b >= items.len() {
        return false;
    }
    items.swap(a, b);
    true
}

pub fn contains(values: &[Value], needle: &Value) -> bool {
    values.iter().any(|v| value::same(v, needle))
}

/// Adds `option` when `present` and it is missing, removes every copy
/// otherwise. Existing order is kept; additions go last.
pub fn toggle(values: &mut Vec<Value>, option: &Value, present: bool) {
    if present {
        if !contains(values, option) {
            values.push(option.clone());
        }
    } else {
        values.retain(|v| !value::same(v, option));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_swap_bounds() {
        let mut items = vec![1, 2, 3];
        assert!(swap(&mut items, 0, 2));
        assert_eq!(items, [3, 2, 1]);
        assert!(!swap(&mut items, 1, 3));
    }

    #[test]
    fn test_toggle_membership() {
        let mut values = vec![json!("a")];
        toggle(&mut values, &json!("b"), true);
        toggle(&mut values, &json!("a"), true);
        assert_eq!(values, vec![json!("a"), json!("b")]);
        toggle(&mut values, &json!("a"), false);
        assert_eq!(values, vec![json!("b")]);
    }
}
