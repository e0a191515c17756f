//! Live entity storage keyed by monotonically increasing identifiers

use std::collections::BTreeMap;
use std::fmt;

/// Identity of a live projectile or enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity allocator. Starts at 1 and only grows until reset.
#[derive(Debug, Clone)]
pub struct IdCounter {
    next: u32,
}

impl Default for IdCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdCounter {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Value the next allocation will return
    pub fn peek(&self) -> u32 {
        self.next
    }

    pub fn reset(&mut self) {
        self.next = 1;
    }
}

/// Map of live entities, iterated in ascending id order
#[derive(Debug, Clone)]
pub struct EntityStore<T> {
    entries: BTreeMap<EntityId, T>,
    ids: IdCounter,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            ids: IdCounter::default(),
        }
    }
}

impl<T> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id and insert the entity built for it
    pub fn insert_with(&mut self, build: impl FnOnce(EntityId) -> T) -> EntityId {
        let id = self.ids.allocate();
        self.entries.insert(id, build(id));
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Snapshot of live ids, safe to hold while removing entries
    pub fn ids(&self) -> Vec<EntityId> {
        self.entries.keys().copied().collect()
    }

    /// Number of identities handed out since the last reset, plus one
    pub fn id_counter(&self) -> u32 {
        self.ids.peek()
    }

    /// Drop every entity and restart identities at 1
    pub fn reset(&mut self) {
        self.entries.clear();
        self.ids.reset();
    }
}
