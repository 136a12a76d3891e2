use {
    crate::{Batch, Op, Order, Record},
    dyn_clone::DynClone,
};

/// An ordered key-value store.
///
/// Implementors are layered on top of each other (a [`Buffer`](crate::Buffer)
/// over a [`PrefixStore`](crate::PrefixStore) over a database handle), which
/// needs them to be clonable behind a `dyn`. `DynClone` provides that.
pub trait Storage: DynClone + Send + Sync {
    /// `None` if the key doesn't exist.
    fn read(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn has(&self, key: &[u8]) -> bool {
        self.read(key).is_some()
    }

    /// Records with `min <= key < max`, in the given order. Inverted bounds
    /// give an empty iterator rather than a panic.
    fn scan<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a>;

    fn write(&mut self, key: &[u8], value: &[u8]);

    /// No-op if the key doesn't exist.
    fn remove(&mut self, key: &[u8]);

    /// Apply a batch of ops. The default applies them one at a time.
    fn flush(&mut self, batch: Batch) {
        for (key, op) in batch {
            match op {
                Op::Insert(value) => self.write(&key, &value),
                Op::Delete => self.remove(&key),
            }
        }
    }
}

/// A read-only view over a borrowed storage.
///
/// Used as the base of a [`Buffer`](crate::Buffer) when the underlying store
/// must not be touched until the buffered writes are known to be good.
#[derive(Clone)]
pub struct StorageWrapper<'a> {
    storage: &'a dyn Storage,
}

impl<'a> StorageWrapper<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }
}

impl Storage for StorageWrapper<'_> {
    fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.storage.read(key)
    }

    fn scan<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a> {
        self.storage.scan(min, max, order)
    }

    fn write(&mut self, _key: &[u8], _value: &[u8]) {
        unimplemented!("StorageWrapper is read-only");
    }

    fn remove(&mut self, _key: &[u8]) {
        unimplemented!("StorageWrapper is read-only");
    }
}

dyn_clone::clone_trait_object!(Storage);
