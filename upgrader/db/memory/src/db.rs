use {
    crate::{DbError, DbResult},
    std::{
        collections::BTreeMap,
        iter, mem,
        ops::Bound,
        sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    },
    upgrader_app::Db,
    upgrader_types::{Batch, Op, Order, Record, Storage},
};

struct MemDbInner {
    /// Version of the DB. Initilialized to `None` when the DB instance is
    /// created. Set of 0 the first time the changeset is committed, and
    /// incremented by 1 each time afterwards.
    latest_version: Option<u64>,
    /// A key-value storage: key => value
    state_storage: BTreeMap<Vec<u8>, Vec<u8>>,
    /// Uncommitted changes
    changeset: Batch,
}

impl MemDbInner {
    fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.changeset.get(key) {
            Some(Op::Insert(value)) => Some(value.clone()),
            Some(Op::Delete) => None,
            None => self.state_storage.get(key).cloned(),
        }
    }

    fn scan(&self, min: Bound<&[u8]>, max: Bound<&[u8]>) -> BTreeMap<Vec<u8>, Vec<u8>> {
        let mut merged = self
            .state_storage
            .range::<[u8], _>((min, max))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<BTreeMap<_, _>>();

        for (key, op) in self.changeset.range::<[u8], _>((min, max)) {
            if let Op::Insert(value) = op {
                merged.insert(key.clone(), value.clone());
            } else {
                merged.remove(key);
            }
        }

        merged
    }
}

/// An in-memory, versioned database.
///
/// Writes go into a changeset, which is either committed or discarded as a
/// whole. Cloning a `MemDb` gives a new handle to the same database.
pub struct MemDb {
    inner: Arc<RwLock<MemDbInner>>,
}

impl MemDb {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemDbInner {
                latest_version: None,
                state_storage: BTreeMap::new(),
                changeset: Batch::new(),
            })),
        }
    }

    /// Get direct immutable access to the committed state, ignoring the
    /// changeset. Only intended for testing and debugging purposes.
    pub fn with_committed_storage<C, T>(&self, callback: C) -> T
    where
        C: FnOnce(&BTreeMap<Vec<u8>, Vec<u8>>) -> T,
    {
        self.with_read(|inner| callback(&inner.state_storage))
    }

    /// Whether there are uncommitted changes.
    pub fn has_changeset(&self) -> bool {
        self.with_read(|inner| !inner.changeset.is_empty())
    }

    fn with_read<C, T>(&self, callback: C) -> T
    where
        C: FnOnce(RwLockReadGuard<MemDbInner>) -> T,
    {
        let lock = self.inner.read().unwrap_or_else(|err| {
            panic!("MemDb is poisoned: {err:?}");
        });
        callback(lock)
    }

    fn with_write<C, T>(&self, callback: C) -> T
    where
        C: FnOnce(RwLockWriteGuard<MemDbInner>) -> T,
    {
        let lock = self.inner.write().unwrap_or_else(|err| {
            panic!("MemDb is poisoned: {err:?}");
        });
        callback(lock)
    }
}

impl Default for MemDb {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemDb {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Db for MemDb {
    type Error = DbError;
    type Storage = StateStorage;

    fn state_storage(&self) -> StateStorage {
        StateStorage { db: self.clone() }
    }

    fn latest_version(&self) -> Option<u64> {
        self.with_read(|inner| inner.latest_version)
    }

    fn commit(&self) -> DbResult<u64> {
        self.with_write(|mut inner| {
            let version = match inner.latest_version {
                Some(version) => version
                    .checked_add(1)
                    .ok_or(DbError::VersionOverflow { version })?,
                None => 0,
            };

            let changeset = mem::take(&mut inner.changeset);

            for (key, op) in changeset {
                if let Op::Insert(value) = op {
                    inner.state_storage.insert(key, value);
                } else {
                    inner.state_storage.remove(&key);
                }
            }

            inner.latest_version = Some(version);

            Ok(version)
        })
    }

    fn discard_changeset(&self) {
        self.with_write(|mut inner| inner.changeset.clear());
    }
}

// ------------------------------- state storage -------------------------------

/// A handle to the state storage of a [`MemDb`]. Reads see the uncommitted
/// changeset; writes go into it.
#[derive(Clone)]
pub struct StateStorage {
    db: MemDb,
}

impl Storage for StateStorage {
    fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.db.with_read(|inner| inner.read(key))
    }

    fn scan<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Box::new(iter::empty());
            }
        }

        let min = min.map_or(Bound::Unbounded, Bound::Included);
        let max = max.map_or(Bound::Unbounded, Bound::Excluded);

        // Here we must collect the records, because the iterator only lives
        // as long as the read lock, which goes out of scope at the end of the
        // closure.
        let merged = self.db.with_read(|inner| inner.scan(min, max));

        match order {
            Order::Ascending => Box::new(merged.into_iter()),
            Order::Descending => Box::new(merged.into_iter().rev()),
        }
    }

    fn write(&mut self, key: &[u8], value: &[u8]) {
        self.db.with_write(|mut inner| {
            inner
                .changeset
                .insert(key.to_vec(), Op::Insert(value.to_vec()));
        });
    }

    fn remove(&mut self, key: &[u8]) {
        self.db.with_write(|mut inner| {
            inner.changeset.insert(key.to_vec(), Op::Delete);
        });
    }

    fn flush(&mut self, batch: Batch) {
        self.db.with_write(|mut inner| inner.changeset.extend(batch));
    }
}

// ----------------------------------- tests -----------------------------------
