//! Helpers for the HTML `pattern` attribute.

use regex::Regex;

/// Characters with a meaning in ECMAScript patterns. `-` and `/` are left
/// alone: escaping them is a syntax error under the `v` flag browsers
/// compile `pattern` with.
const SPECIAL: &[char] = &[
    '\\', '^', '$', '.', '|', '?', '*', '+', '(', ')', '[', ']', '{', '}',
];

pub fn escape(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Pattern accepting exactly `literal`.
pub fn exact(literal: &str) -> String {
    format!("^{}$", escape(literal))
}

/// Compiles `pattern` with the whole-value anchoring browsers apply.
pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape("a.b"), r"a\.b");
        assert_eq!(escape("(1+1)*2"), r"\(1\+1\)\*2");
        assert_eq!(escape("x-y/z"), "x-y/z");
    }

    #[test]
    fn test_exact_pattern_matches_only_literal() {
        let re = compile(&exact("AB")).unwrap();
        assert!(re.is_match("AB"));
        assert!(!re.is_match("ABC"));
        assert!(!re.is_match("A"));

        let re = compile(&exact("1.5$")).unwrap();
        assert!(re.is_match("1.5$"));
        assert!(!re.is_match("1x5$"));
    }

    #[test]
    fn test_compile_anchors_whole_value() {
        let re = compile("[a-z]+").unwrap();
        assert!(re.is_match("abc"));
        assert!(!re.is_match("abc1"));
        assert!(compile("(").is_err());
    }
}
