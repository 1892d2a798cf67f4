//! JSON file backend.
//!
//! The whole store is one JSON object keyed by `"<Class>.<id>"`, each value
//! being the record's fields plus a `__class__` tag:
//!
//! ```text
//! {
//!   "State.421a55f4-...": { "__class__": "State", "id": "421a55f4-...", "name": "Nevada", ... },
//!   "Place.f0ea3c16-...": { "__class__": "Place", "city_id": "...", "name": "Loft", ... }
//! }
//! ```
//!
//! Every persist rewrites the file through a sibling temp file and an
//! atomic rename, so a crash mid-write leaves the previous version intact.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use hbnb_types::{Entity, EntityId, EntityKind};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::table::{Change, Staged, Tables};
use crate::traits::EntityStore;

/// Entity store persisted to a single JSON document.
pub struct JsonFileStore {
    path: PathBuf,
    state: RwLock<Staged>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading it if the file exists.
    ///
    /// A missing file yields an empty store; the file is created on the
    /// first persist.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let tables = if path.exists() {
            load(&path)?
        } else {
            debug!(path = %path.display(), "store file missing, starting empty");
            Tables::default()
        };
        info!(path = %path.display(), entities = tables.len(), "opened JSON file store");
        Ok(Self {
            path,
            state: RwLock::new(Staged::with_tables(tables)),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the backing file, dropping staged changes.
    pub fn reload(&self) -> StoreResult<()> {
        let tables = if self.path.exists() {
            load(&self.path)?
        } else {
            Tables::default()
        };
        *self.write()? = Staged::with_tables(tables);
        Ok(())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Staged>> {
        self.state.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Staged>> {
        self.state.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl EntityStore for JsonFileStore {
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
        let mut state = self.write()?;
        // Write the post-persist image first; only commit in memory once the
        // file is safely replaced.
        let next = state.preview();
        save(&self.path, &next)?;
        let applied = state.commit();
        debug!(path = %self.path.display(), applied, "JSON file store persisted");
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

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn load(path: &Path) -> StoreResult<Tables> {
    let bytes = fs::read(path)?;
    let mut tables = Tables::default();
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(tables);
    }
    let document: Map<String, Value> = serde_json::from_slice(&bytes)?;
    for (key, value) in document {
        let entity: Entity = serde_json::from_value(value).map_err(|e| StoreError::Corrupt {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        if entity.storage_key() != key {
            return Err(StoreError::Corrupt {
                reason: format!("filed under wrong key, expected {}", entity.storage_key()),
                key,
            });
        }
        tables.upsert(entity);
    }
    Ok(tables)
}

fn save(path: &Path, tables: &Tables) -> StoreResult<()> {
    let mut document = Map::new();
    for entity in tables.iter() {
        document.insert(entity.storage_key(), serde_json::to_value(entity)?);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer(&mut writer, &Value::Object(document))?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}
