//! Ordered entity tables and the staging area shared by the in-tree
//! backends.

use std::collections::{BTreeMap, HashMap};

use hbnb_types::{Entity, EntityId, EntityKind};

/// A staged change, applied in order on persist.
#[derive(Clone, Debug)]
pub(crate) enum Change {
    Upsert(Entity),
    Remove(EntityKind, EntityId),
}

/// Entities of a single kind in first-insertion order.
#[derive(Clone, Debug, Default)]
struct KindTable {
    next_slot: u64,
    slots: HashMap<EntityId, u64>,
    rows: BTreeMap<u64, Entity>,
}

impl KindTable {
    fn upsert(&mut self, entity: Entity) {
        let slot = match self.slots.get(entity.id()) {
            Some(slot) => *slot,
            None => {
                let slot = self.next_slot;
                self.next_slot += 1;
                self.slots.insert(entity.id().clone(), slot);
                slot
            }
        };
        self.rows.insert(slot, entity);
    }

    fn remove(&mut self, id: &EntityId) -> bool {
        match self.slots.remove(id) {
            Some(slot) => self.rows.remove(&slot).is_some(),
            None => false,
        }
    }
}

/// Committed entities of every kind.
#[derive(Clone, Debug, Default)]
pub(crate) struct Tables {
    kinds: BTreeMap<EntityKind, KindTable>,
}

impl Tables {
    pub(crate) fn get(&self, kind: EntityKind, id: &EntityId) -> Option<&Entity> {
        let table = self.kinds.get(&kind)?;
        let slot = table.slots.get(id)?;
        table.rows.get(slot)
    }

    pub(crate) fn all(&self, kind: EntityKind) -> Vec<Entity> {
        self.kinds
            .get(&kind)
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, kind: EntityKind) -> usize {
        self.kinds.get(&kind).map_or(0, |t| t.rows.len())
    }

    pub(crate) fn upsert(&mut self, entity: Entity) {
        self.kinds.entry(entity.kind()).or_default().upsert(entity);
    }

    pub(crate) fn remove(&mut self, kind: EntityKind, id: &EntityId) -> bool {
        self.kinds.get_mut(&kind).is_some_and(|t| t.remove(id))
    }

    pub(crate) fn apply(&mut self, changes: &[Change]) {
        for change in changes {
            match change {
                Change::Upsert(entity) => self.upsert(entity.clone()),
                Change::Remove(kind, id) => {
                    self.remove(*kind, id);
                }
            }
        }
    }

    /// Every entity, grouped by kind, each group in insertion order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.kinds.values().flat_map(|t| t.rows.values())
    }

    pub(crate) fn len(&self) -> usize {
        self.kinds.values().map(|t| t.rows.len()).sum()
    }
}

/// Committed tables plus the changes staged since the last persist.
#[derive(Debug, Default)]
pub(crate) struct Staged {
    pub(crate) committed: Tables,
    pub(crate) pending: Vec<Change>,
}

impl Staged {
    pub(crate) fn with_tables(committed: Tables) -> Self {
        Self {
            committed,
            pending: Vec::new(),
        }
    }

    /// The tables as they would look after persisting.
    pub(crate) fn preview(&self) -> Tables {
        let mut next = self.committed.clone();
        next.apply(&self.pending);
        next
    }

    pub(crate) fn commit(&mut self) -> usize {
        let changes = std::mem::take(&mut self.pending);
        self.committed.apply(&changes);
        changes.len()
    }
}
