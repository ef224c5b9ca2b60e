use std::collections::HashSet;

/// A set of item names used as either side of an association rule.
///
/// Items are unique and keep the order they were first seen in, so iterating
/// a consequent is deterministic across loads of the same file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemSet {
    items: Vec<String>,
}

impl ItemSet {
    /// Create a new item set from any list of names, dropping repeats
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for item in items {
            let item = item.into();
            if seen.insert(item.clone()) {
                unique.push(item);
            }
        }
        Self { items: unique }
    }

    /// Create a set holding one item
    pub fn single(item: impl Into<String>) -> Self {
        Self { items: vec![item.into()] }
    }

    /// Get the number of distinct items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate items in first-occurrence order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// True when every item of this set is present in `other`.
    pub fn is_subset_of(&self, other: &HashSet<&str>) -> bool {
        self.items.iter().all(|item| other.contains(item.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_set_dedup_keeps_first_order() {
        let set = ItemSet::new(vec!["b", "a", "b", "c", "a"]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_item_set_single() {
        let set = ItemSet::single("Yesterday");
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Yesterday"]);
    }

    #[test]
    fn test_item_set_subset() {
        let liked: HashSet<&str> = ["x", "y"].into_iter().collect();
        assert!(ItemSet::new(vec!["x"]).is_subset_of(&liked));
        assert!(ItemSet::new(vec!["y", "x"]).is_subset_of(&liked));
        assert!(!ItemSet::new(vec!["x", "z"]).is_subset_of(&liked));
    }
}
