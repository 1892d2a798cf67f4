use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use hbnb_types::{Entity, EntityId, EntityKind};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::table::{Change, Staged, Tables};
use crate::traits::EntityStore;

/// In-memory entity store.
///
/// Intended for tests, embedding, and the default server mode. Committed
/// entities and staged changes live behind one `RwLock`. Entities are cloned
/// on read and write.
pub struct InMemoryEntityStore {
    state: RwLock<Staged>,
}

impl InMemoryEntityStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Staged::default()),
        }
    }

    /// Create a store already holding `entities`, committed in order.
    pub fn with_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut tables = Tables::default();
        for entity in entities {
            tables.upsert(entity);
        }
        Self {
            state: RwLock::new(Staged::with_tables(tables)),
        }
    }

    /// Total number of committed entities across all kinds.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.committed.len())
    }

    /// Returns `true` if nothing is committed.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of changes staged since the last persist.
    pub fn pending_len(&self) -> StoreResult<usize> {
        Ok(self.read()?.pending.len())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Staged>> {
        self.state.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Staged>> {
        self.state.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for InMemoryEntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore for InMemoryEntityStore {
    fn get(&self, kind: EntityKind, id: &EntityId) -> StoreResult<Option<Entity>> {
        Ok(self.read()?.committed.get(kind, id).cloned())
    }

    fn all(&self, kind: EntityKind) -> StoreResult<Vec<Entity>> {
        Ok(self.read()?.committed.all(kind))
    }

    fn create(&self, entity: Entity) -> StoreResult<()> {
        self.write()?.pending.push(Change::Upsert(entity));
        Ok(())
    }

    fn delete(&self, kind: EntityKind, id: &EntityId) -> StoreResult<()> {
        self.write()?.pending.push(Change::Remove(kind, id.clone()));
        Ok(())
    }

    fn persist(&self) -> StoreResult<()> {
        let applied = self.write()?.commit();
        debug!(applied, "in-memory store persisted");
        Ok(())
    }

    fn discard(&self) -> StoreResult<()> {
        self.write()?.pending.clear();
        Ok(())
    }

    fn snapshot(&self, kinds: &[EntityKind]) -> StoreResult<Vec<Vec<Entity>>> {
        let state = self.read()?;
        Ok(kinds.iter().map(|kind| state.committed.all(*kind)).collect())
    }

    fn count(&self, kind: EntityKind) -> StoreResult<usize> {
        Ok(self.read()?.committed.count(kind))
    }
}

impl std::fmt::Debug for InMemoryEntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("InMemoryEntityStore");
        if let Ok(state) = self.state.read() {
            s.field("entity_count", &state.committed.len())
                .field("pending", &state.pending.len());
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::EntityStoreExt;
    use hbnb_types::{Amenity, City, Place, State};

    fn seeded() -> (InMemoryEntityStore, State, City) {
        let state = State::new("California").with_id("s-1");
        let city = City::new(state.id.clone(), "San Francisco").with_id("c-1");
        let store =
            InMemoryEntityStore::with_entities([state.clone().into(), city.clone().into()]);
        (store, state, city)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    #[test]
    fn get_returns_committed_entity() {
        let (store, state, _) = seeded();
        let found = store.get(EntityKind::State, &state.id).unwrap();
        assert_eq!(found, Some(Entity::State(state)));
    }

    #[test]
    fn get_missing_returns_none() {
        let (store, _, _) = seeded();
        assert!(store
            .get(EntityKind::State, &EntityId::new("nope"))
            .unwrap()
            .is_none());
        // Same id under another kind does not resolve.
        assert!(store
            .get(EntityKind::City, &EntityId::new("s-1"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn typed_reads() {
        let (store, state, city) = seeded();
        let s: State = store.get_as(&state.id).unwrap().unwrap();
        assert_eq!(s.name, "California");
        let cities: Vec<City> = store.all_as().unwrap();
        assert_eq!(cities, vec![city]);
    }

    #[test]
    fn snapshot_lists_requested_kinds_in_order() {
        let (store, state, city) = seeded();
        let lists = store
            .snapshot(&[EntityKind::City, EntityKind::Place, EntityKind::State])
            .unwrap();
        assert_eq!(lists.len(), 3);
        assert_eq!(lists[0], vec![Entity::City(city.clone())]);
        assert!(lists[1].is_empty());
        assert_eq!(lists[2], vec![Entity::State(state)]);

        let (states, cities): (Vec<State>, Vec<City>) = store.pair_as().unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(cities, vec![city]);
    }

    #[test]
    fn snapshot_ignores_pending_changes() {
        let (store, _, city) = seeded();
        store
            .put(Place::named(city.id.clone(), EntityId::new("u-1"), "Staged"))
            .unwrap();
        let (cities, places): (Vec<City>, Vec<Place>) = store.pair_as().unwrap();
        assert_eq!(cities.len(), 1);
        assert!(places.is_empty());
    }

    // -----------------------------------------------------------------------
    // Staging and persist
    // -----------------------------------------------------------------------

    #[test]
    fn create_is_invisible_until_persist() {
        let store = InMemoryEntityStore::new();
        let amenity = Amenity::new("Wifi");
        store.put(amenity.clone()).unwrap();
        assert_eq!(store.pending_len().unwrap(), 1);
        assert!(store.get_as::<Amenity>(&amenity.id).unwrap().is_none());

        store.persist().unwrap();
        assert_eq!(store.pending_len().unwrap(), 0);
        assert_eq!(store.get_as::<Amenity>(&amenity.id).unwrap(), Some(amenity));
    }

    #[test]
    fn delete_applies_on_persist() {
        let (store, state, _) = seeded();
        store.delete(EntityKind::State, &state.id).unwrap();
        assert!(store.get(EntityKind::State, &state.id).unwrap().is_some());
        store.persist().unwrap();
        assert!(store.get(EntityKind::State, &state.id).unwrap().is_none());
    }

    #[test]
    fn discard_drops_staged_changes() {
        let (store, state, _) = seeded();
        store.put(Amenity::new("Pool")).unwrap();
        store.delete(EntityKind::State, &state.id).unwrap();
        store.discard().unwrap();
        store.persist().unwrap();
        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(store.count(EntityKind::Amenity).unwrap(), 0);
    }

    #[test]
    fn replacement_keeps_order() {
        let (store, _, city) = seeded();
        let user = EntityId::new("u-1");
        let p1 = Place::named(city.id.clone(), user.clone(), "One").with_id("p-1");
        let p2 = Place::named(city.id.clone(), user, "Two").with_id("p-2");
        store.put(p1.clone()).unwrap();
        store.put(p2).unwrap();
        store.persist().unwrap();

        let mut renamed = p1;
        renamed
            .attributes
            .insert("name".into(), serde_json::json!("One again"));
        store.put(renamed).unwrap();
        store.persist().unwrap();

        let places: Vec<Place> = store.all_as().unwrap();
        assert_eq!(places[0].id.as_str(), "p-1");
        assert_eq!(places[0].name(), Some("One again"));
        assert_eq!(places[1].id.as_str(), "p-2");
    }

    #[test]
    fn count_per_kind() {
        let (store, _, _) = seeded();
        assert_eq!(store.count(EntityKind::State).unwrap(), 1);
        assert_eq!(store.count(EntityKind::City).unwrap(), 1);
        assert_eq!(store.count(EntityKind::Place).unwrap(), 0);
        assert!(!store.is_empty().unwrap());
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_reads_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let (store, state, _) = seeded();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let id = state.id.clone();
                thread::spawn(move || {
                    let found = store.get(EntityKind::State, &id).unwrap();
                    assert!(found.is_some());
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
    }

    #[test]
    fn works_as_trait_object() {
        let (store, state, _) = seeded();
        let dynamic: &dyn EntityStore = &store;
        let s: Option<State> = dynamic.get_as(&state.id).unwrap();
        assert!(s.is_some());
    }

    #[test]
    fn debug_format() {
        let (store, _, _) = seeded();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryEntityStore"));
        assert!(debug.contains("entity_count"));
    }
}
