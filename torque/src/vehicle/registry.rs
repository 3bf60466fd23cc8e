use core::fmt;

use hashbrown::HashMap;

use crate::component::ComponentType;
use crate::components;
use crate::identifier::Identifier;

/// Error from registering an entry in a [`Registry`].
#[derive(Clone, Debug, Eq, PartialEq, displaydoc::Display, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// {0} is already registered
    Duplicate(Identifier),
}

/// A set of values looked up by [`Identifier`], each of which may be registered only once.
#[derive(Clone)]
pub struct Registry<T> {
    entries: HashMap<Identifier, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&Identifier> = self.entries.keys().collect();
        ids.sort();
        f.debug_set().entries(ids).finish()
    }
}

impl<T> Registry<T> {
    /// Constructs an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` under `identifier`.
    ///
    /// Fails, leaving the registry unchanged, if `identifier` is already registered.
    pub fn register(&mut self, identifier: Identifier, value: T) -> Result<(), RegistryError> {
        match self.entries.entry(identifier) {
            hashbrown::hash_map::Entry::Occupied(entry) => {
                Err(RegistryError::Duplicate(entry.key().clone()))
            }
            hashbrown::hash_map::Entry::Vacant(entry) => {
                log::debug!("registered {}", entry.key());
                entry.insert(value);
                Ok(())
            }
        }
    }

    /// Returns the value registered under `identifier`.
    pub fn get(&self, identifier: &Identifier) -> Option<&T> {
        self.entries.get(identifier)
    }

    #[allow(missing_docs)]
    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.entries.contains_key(identifier)
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &T)> + '_ {
        self.entries.iter()
    }
}

/// The [`ComponentType`]s that vehicle types may be built from.
#[derive(Clone, Debug)]
pub struct ComponentRegistry {
    types: Registry<ComponentType>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentRegistry {
    /// Constructs a registry containing the [built-in component types](crate::components).
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for component_type in components::builtin_types() {
            if let Err(error) = registry.register(component_type) {
                unreachable!("built-in component types conflict: {error}");
            }
        }
        registry
    }

    /// Constructs a registry containing no component types.
    pub fn empty() -> Self {
        Self {
            types: Registry::new(),
        }
    }

    /// Adds a component type. Fails if one with the same identifier is already registered.
    pub fn register(&mut self, component_type: ComponentType) -> Result<(), RegistryError> {
        self.types
            .register(component_type.identifier().clone(), component_type)
    }

    /// Returns the component type with the given identifier.
    pub fn get(&self, identifier: &Identifier) -> Option<&ComponentType> {
        self.types.get(identifier)
    }

    /// Iterates over the registered component types, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentType> + '_ {
        self.types.iter().map(|(_, component_type)| component_type)
    }
}
