use hbnb_types::{Entity, EntityId, EntityKind, Record};

use crate::error::{StoreError, StoreResult};

/// Typed key-value access to entities.
///
/// All implementations must satisfy these invariants:
/// - `create` and `delete` only stage a change. Nothing becomes visible to
///   `get`/`all` until `persist` applies every staged change, in order.
/// - `persist` is all-or-nothing: either every staged change lands or none
///   does and the error is returned.
/// - `all` yields entities in a stable store-defined order (first insertion
///   order for the in-tree backends). Replacing an entity keeps its slot.
/// - Lookups of unknown ids return `Ok(None)`, never an error.
pub trait EntityStore: Send + Sync {
    /// Read an entity by kind and id.
    fn get(&self, kind: EntityKind, id: &EntityId) -> StoreResult<Option<Entity>>;

    /// List every committed entity of a kind, in store order.
    fn all(&self, kind: EntityKind) -> StoreResult<Vec<Entity>>;

    /// Stage an insert (or replacement, when the id already exists).
    fn create(&self, entity: Entity) -> StoreResult<()>;

    /// Stage the removal of an entity. Removing an unknown id is a no-op
    /// when persisted.
    fn delete(&self, kind: EntityKind, id: &EntityId) -> StoreResult<()>;

    /// Apply all staged changes.
    fn persist(&self) -> StoreResult<()>;

    /// Drop all staged changes without applying them.
    fn discard(&self) -> StoreResult<()>;

    /// List several kinds at once, one `Vec` per requested kind, all taken
    /// from the same committed state.
    ///
    /// Default implementation lists each kind in turn, which is only
    /// consistent if nothing persists in between. Backends with a single
    /// lock should override it.
    fn snapshot(&self, kinds: &[EntityKind]) -> StoreResult<Vec<Vec<Entity>>> {
        kinds.iter().map(|kind| self.all(*kind)).collect()
    }

    /// Number of committed entities of a kind.
    ///
    /// Default implementation lists the kind. Backends may override.
    fn count(&self, kind: EntityKind) -> StoreResult<usize> {
        Ok(self.all(kind)?.len())
    }
}

/// Typed helpers over any [`EntityStore`], including trait objects.
pub trait EntityStoreExt: EntityStore {
    /// Read a record of type `T` by id.
    fn get_as<T: Record>(&self, id: &EntityId) -> StoreResult<Option<T>> {
        self.get(T::KIND, id)?.map(downcast::<T>).transpose()
    }

    /// List every record of type `T`, in store order.
    fn all_as<T: Record>(&self) -> StoreResult<Vec<T>> {
        self.all(T::KIND)?.into_iter().map(downcast::<T>).collect()
    }

    /// List every record of types `A` and `B` from one consistent snapshot.
    fn pair_as<A: Record, B: Record>(&self) -> StoreResult<(Vec<A>, Vec<B>)> {
        let mut lists = self.snapshot(&[A::KIND, B::KIND])?.into_iter();
        let first = lists.next().unwrap_or_default();
        let second = lists.next().unwrap_or_default();
        Ok((
            first.into_iter().map(downcast::<A>).collect::<StoreResult<_>>()?,
            second.into_iter().map(downcast::<B>).collect::<StoreResult<_>>()?,
        ))
    }

    /// Stage an insert or replacement of a typed record.
    fn put<T: Record>(&self, record: T) -> StoreResult<()> {
        self.create(record.into())
    }
}

impl<S: EntityStore + ?Sized> EntityStoreExt for S {}

fn downcast<T: Record>(entity: Entity) -> StoreResult<T> {
    let key = entity.storage_key();
    T::from_entity(entity).map_err(|e| StoreError::Corrupt {
        key,
        reason: e.to_string(),
    })
}
