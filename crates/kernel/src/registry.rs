use skyhop_common::EntityId;

/// Name of the player-controlled sphere.
pub const HERO: &str = "hero";
/// Name of the obstacle that slides towards the hero.
pub const ENEMY: &str = "enemy";
/// Name of the static floor slab.
pub const GROUND: &str = "ground";

/// Errors from registry operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("entity name {0:?} is already registered")]
    DuplicateName(String),
}

#[derive(Debug, Clone)]
struct EntityRecord {
    name: String,
}

/// Arena of named entities.
///
/// Handles are indices into the arena and are never reused, so a handle stored
/// on a physics body or a drawable stays valid for the life of the registry.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    records: Vec<EntityRecord>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a uniquely named entity and return its handle.
    pub fn register(&mut self, name: impl Into<String>) -> Result<EntityId, RegistryError> {
        let name = name.into();
        if self.find(&name).is_some() {
            return Err(RegistryError::DuplicateName(name));
        }
        let id = EntityId(self.records.len() as u32);
        tracing::debug!(%id, %name, "entity registered");
        self.records.push(EntityRecord { name });
        Ok(id)
    }

    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.records.get(id.index()).map(|r| r.name.as_str())
    }

    pub fn find(&self, name: &str) -> Option<EntityId> {
        self.records
            .iter()
            .position(|r| r.name == name)
            .map(|i| EntityId(i as u32))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        id.index() < self.records.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Entities in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &str)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (EntityId(i as u32), r.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_follow_registration_order() {
        let mut reg = EntityRegistry::new();
        let a = reg.register(HERO).unwrap();
        let b = reg.register(GROUND).unwrap();
        assert_eq!(a, EntityId(0));
        assert_eq!(b, EntityId(1));
        assert_eq!(reg.name(b), Some(GROUND));
        assert_eq!(reg.find(HERO), Some(a));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut reg = EntityRegistry::new();
        reg.register(ENEMY).unwrap();
        assert_eq!(
            reg.register(ENEMY),
            Err(RegistryError::DuplicateName(ENEMY.into()))
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn unknown_handle_has_no_name() {
        let reg = EntityRegistry::new();
        assert!(reg.name(EntityId(3)).is_none());
        assert!(!reg.contains(EntityId(0)));
        assert!(reg.is_empty());
    }
}
