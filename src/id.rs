use crate::field::FieldPath;
use convert_case::{Case, Casing};

/// Hands out field keys `"{prefix}-{n}"`. The counter restarts with each
/// parse pass, so parsing the same input twice yields the same keys.
#[derive(Debug, Clone)]
pub struct UniqueId {
    prefix: String,
    next: usize,
}

impl UniqueId {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    pub fn next_key(&mut self) -> String {
        self.next += 1;
        format!("{}-{}", self.prefix, self.next)
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }

    /// Element id for a field path, e.g. `formschema-user-first-name`.
    pub fn element_id(&self, path: &FieldPath) -> String {
        if path.is_root() {
            return self.prefix.clone();
        }
        let words: String = path
            .to_string()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();
        format!("{}-{}", self.prefix, words.trim().to_case(Case::Kebab))
    }
}

impl Default for UniqueId {
    fn default() -> Self {
        Self::new("formschema")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_count_up_and_reset() {
        let mut ids = UniqueId::new("form");
        assert_eq!(ids.next_key(), "form-1");
        assert_eq!(ids.next_key(), "form-2");
        ids.reset();
        assert_eq!(ids.next_key(), "form-1");
    }

    #[test]
    fn test_element_id_from_path() {
        let ids = UniqueId::default();
        assert_eq!(
            ids.element_id(&FieldPath::parse("user.firstName")),
            "formschema-user-first-name"
        );
        assert_eq!(ids.element_id(&FieldPath::root()), "formschema");
    }
}
