//! Tiny path queries: `users/user[@id='3']`.
//!
//! Each step names a child element and may carry one attribute equality
//! predicate. That is all the backend needs to address records. Predicate
//! values that are both numbers compare as numbers, so `id=" 1"` and
//! `id="01"` address the same record as `id="1"`.

use std::fmt;

use crate::xml::element::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    name: String,
    predicate: Option<(String, String)>,
}

impl Step {
    pub fn matches(&self, el: &Element) -> bool {
        if el.name != self.name {
            return false;
        }
        match &self.predicate {
            Some((key, value)) => el.attr(key).is_some_and(|actual| same_value(actual, value)),
            None => true,
        }
    }
}

fn same_value(actual: &str, expected: &str) -> bool {
    if actual == expected {
        return true;
    }
    match (actual.trim().parse::<u64>(), expected.trim().parse::<u64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    steps: Vec<Step>,
}

impl Path {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// `section/item[@attr='value']`, the shape every record lookup uses.
    pub fn keyed(section: &str, item: &str, attr: &str, value: impl fmt::Display) -> Self {
        Self {
            steps: vec![
                Step {
                    name: section.to_string(),
                    predicate: None,
                },
                Step {
                    name: item.to_string(),
                    predicate: Some((attr.to_string(), value.to_string())),
                },
            ],
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(&step.name)?;
            if let Some((key, value)) = &step.predicate {
                write!(f, "[@{key}='{value}']")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let path = Path::keyed("users", "user", "id", 3);
        assert_eq!(path.to_string(), "users/user[@id='3']");
    }

    #[test]
    fn test_numeric_predicates_ignore_padding() {
        let root = Element::new("data").with_child(
            Element::new("users")
                .with_child(Element::new("user").with_attr("id", " 1"))
                .with_child(Element::new("user").with_attr("id", "02"))
                .with_child(Element::new("user").with_attr("id", "x")),
        );

        let hit = root.find(&Path::keyed("users", "user", "id", 1)).unwrap();
        assert_eq!(hit.attr("id"), Some(" 1"));
        let hit = root.find(&Path::keyed("users", "user", "id", 2)).unwrap();
        assert_eq!(hit.attr("id"), Some("02"));
        assert!(root.find(&Path::keyed("users", "user", "id", "x")).is_some());
        assert!(root.find(&Path::keyed("users", "user", "id", 12)).is_none());
    }

    #[test]
    fn test_find_first_match() {
        let root = Element::new("data").with_child(
            Element::new("users")
                .with_child(Element::new("user").with_attr("id", "1").with_text("first"))
                .with_child(Element::new("user").with_attr("id", "2"))
                .with_child(Element::new("user").with_attr("id", "1").with_text("second")),
        );

        let hit = root.find(&Path::keyed("users", "user", "id", 1)).unwrap();
        assert_eq!(hit.text(), "first");
        assert!(root.find(&Path::keyed("users", "user", "id", 7)).is_none());
        assert!(root.find(&Path::keyed("chats", "chat", "id", 1)).is_none());
    }
}
