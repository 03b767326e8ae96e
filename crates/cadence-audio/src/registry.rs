use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{AudioError, Result};

/// Maps unique names to shared objects.
///
/// Registration is append-only: a name, once taken, stays bound to the same
/// object for the lifetime of the registry. Each kind of named resource gets
/// its own registry, so namespaces never overlap.
pub struct NamedRegistry<T: ?Sized> {
    entries: HashMap<String, Rc<T>>,
}

impl<T: ?Sized> NamedRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register `object` under `name`.
    ///
    /// The registry keeps its own shared reference; the caller's `Rc` stays
    /// valid.
    pub fn register(&mut self, name: &str, object: Rc<T>) -> Result<()> {
        if name.is_empty() {
            return Err(AudioError::InvalidName(name.to_string()));
        }
        if self.entries.contains_key(name) {
            return Err(AudioError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.entries.insert(name.to_string(), object);
        Ok(())
    }

    /// Fetch the object registered under `name` (case-sensitive).
    pub fn get(&self, name: &str) -> Result<Rc<T>> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| AudioError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<T: ?Sized> Default for NamedRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;

    #[test]
    fn get_returns_registered_object() {
        let mut registry = NamedRegistry::new();
        let object = Rc::new(42u32);
        registry.register("answer", Rc::clone(&object)).unwrap();

        let found = registry.get("answer").unwrap();
        assert!(Rc::ptr_eq(&found, &object));
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = NamedRegistry::new();
        registry.register("list1", Rc::new(1u32)).unwrap();

        let err = registry.register("list1", Rc::new(2u32)).unwrap_err();
        assert!(matches!(err, AudioError::DuplicateName { ref name } if name == "list1"));
        // First registration wins.
        assert_eq!(*registry.get("list1").unwrap(), 1);
    }

    #[test]
    fn missing_name_is_not_found() {
        let registry: NamedRegistry<u32> = NamedRegistry::new();
        assert!(matches!(
            registry.get("notExisting"),
            Err(AudioError::NotFound { .. })
        ));
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut registry = NamedRegistry::new();
        assert!(matches!(
            registry.register("", Rc::new(0u32)),
            Err(AudioError::InvalidName(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut registry = NamedRegistry::new();
        registry.register("Music", Rc::new(1u32)).unwrap();
        registry.register("music", Rc::new(2u32)).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["Music", "music"]);
    }

    #[test]
    fn caller_keeps_mutable_access_through_shared_cell() {
        let mut registry = NamedRegistry::new();
        let cell = Rc::new(RefCell::new(Vec::<u8>::new()));
        registry.register("buffer", Rc::clone(&cell)).unwrap();

        cell.borrow_mut().push(7);
        assert_eq!(*registry.get("buffer").unwrap().borrow(), vec![7]);
    }

    proptest! {
        #[test]
        fn second_registration_always_fails(name in "[a-zA-Z0-9_-]{1,16}") {
            let mut registry = NamedRegistry::new();
            prop_assert!(registry.get(&name).is_err());
            prop_assert!(registry.register(&name, Rc::new(())).is_ok());
            let duplicate = matches!(
                registry.register(&name, Rc::new(())),
                Err(AudioError::DuplicateName { .. })
            );
            prop_assert!(duplicate);
            prop_assert_eq!(registry.len(), 1);
        }
    }
}
