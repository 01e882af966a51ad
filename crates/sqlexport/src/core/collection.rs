//! Ordered, uniquely named collections used throughout the schema model.
//!
//! Insertion order is semantically significant: it is the order entities are
//! emitted into the generated script.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// A schema entity addressable by name.
///
/// `full_name` defaults to the plain name; owner-qualified entities (tables
/// with a schema qualifier) override it as `owner.name`.
pub trait Named {
    /// The entity's declared name.
    fn name(&self) -> &str;

    /// The entity's unique name within its collection.
    fn full_name(&self) -> String {
        self.name().to_string()
    }
}

/// Validate an entity name at construction time.
///
/// Empty or whitespace-only names are rejected.
pub(crate) fn validate_name(name: &str, what: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ExportError::schema(format!("{} name cannot be empty", what)));
    }
    Ok(())
}

/// Insertion-ordered collection of named items with a unique full-name index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedCollection<T: Named> {
    items: IndexMap<String, T>,
}

impl<T: Named> Default for NamedCollection<T> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }
}

impl<T: Named> NamedCollection<T> {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item, indexing it by its full name.
    ///
    /// Fails without mutating the collection if an item with the same full
    /// name is already present.
    pub fn add(&mut self, item: T) -> Result<()> {
        let key = item.full_name();
        if self.items.contains_key(&key) {
            return Err(ExportError::schema(format!(
                "duplicate name '{}' in collection",
                key
            )));
        }
        self.items.insert(key, item);
        Ok(())
    }

    /// Look up an item by name.
    ///
    /// The full name is matched first; a bare (unqualified) name falls back
    /// to the first item whose declared name matches, in insertion order.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.items
            .get(name)
            .or_else(|| self.items.values().find(|item| item.name() == name))
    }

    /// Mutable lookup with the same name resolution as [`get`](Self::get).
    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        if self.items.contains_key(name) {
            return self.items.get_mut(name);
        }
        self.items.values_mut().find(|item| item.name() == name)
    }

    /// Zero-based position of the named item, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.items
            .get_index_of(name)
            .or_else(|| self.items.values().position(|item| item.name() == name))
    }

    /// Remove and return the named item, preserving the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        if let Some(index) = self.index_of(name) {
            return self.items.shift_remove_index(index).map(|(_, item)| item);
        }
        None
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Item at a zero-based position.
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.items.get_index(index).map(|(_, item)| item)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the collection holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    /// Iterate items mutably in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut()
    }
}

impl<'a, T: Named> IntoIterator for &'a NamedCollection<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        name: String,
        owner: Option<String>,
    }

    impl Item {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                owner: None,
            }
        }

        fn owned(owner: &str, name: &str) -> Self {
            Self {
                name: name.to_string(),
                owner: Some(owner.to_string()),
            }
        }
    }

    impl Named for Item {
        fn name(&self) -> &str {
            &self.name
        }

        fn full_name(&self) -> String {
            match &self.owner {
                Some(owner) => format!("{}.{}", owner, self.name),
                None => self.name.clone(),
            }
        }
    }

    #[test]
    fn test_add_and_lookup() {
        let mut coll = NamedCollection::new();
        coll.add(Item::new("alpha")).unwrap();
        coll.add(Item::new("beta")).unwrap();
        coll.add(Item::new("gamma")).unwrap();

        assert_eq!(coll.len(), 3);
        assert_eq!(coll.get("beta").unwrap().name(), "beta");
        assert_eq!(coll.index_of("gamma"), Some(2));
        assert!(coll.get("delta").is_none());
    }

    #[test]
    fn test_duplicate_add_fails_without_mutation() {
        let mut coll = NamedCollection::new();
        coll.add(Item::new("alpha")).unwrap();
        coll.add(Item::new("beta")).unwrap();

        let err = coll.add(Item::new("alpha")).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
        assert_eq!(coll.len(), 2);
        assert_eq!(coll.index_of("alpha"), Some(0));
        assert_eq!(coll.index_of("beta"), Some(1));
    }

    #[test]
    fn test_preserves_insertion_order() {
        let mut coll = NamedCollection::new();
        for name in ["z", "a", "m"] {
            coll.add(Item::new(name)).unwrap();
        }
        let order: Vec<&str> = coll.iter().map(Named::name).collect();
        assert_eq!(order, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_bare_name_fallback() {
        let mut coll = NamedCollection::new();
        coll.add(Item::owned("dbo", "country")).unwrap();

        assert!(coll.get("dbo.country").is_some());
        assert!(coll.get("country").is_some());
        assert_eq!(coll.index_of("country"), Some(0));
    }

    #[test]
    fn test_remove_keeps_order_and_index() {
        let mut coll = NamedCollection::new();
        for name in ["a", "b", "c"] {
            coll.add(Item::new(name)).unwrap();
        }

        let removed = coll.remove("b").unwrap();
        assert_eq!(removed.name(), "b");
        assert_eq!(coll.len(), 2);
        assert_eq!(coll.index_of("a"), Some(0));
        assert_eq!(coll.index_of("c"), Some(1));
        assert!(coll.remove("b").is_none());
    }

    #[test]
    fn test_clear() {
        let mut coll = NamedCollection::new();
        coll.add(Item::new("a")).unwrap();
        coll.clear();
        assert!(coll.is_empty());
        assert!(coll.get("a").is_none());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("users", "table").is_ok());
        assert!(validate_name("", "table").is_err());
        assert!(validate_name("   ", "column").is_err());
    }
}
