use {
    crate::Codec,
    std::{borrow::Cow, marker::PhantomData},
    upgrader_types::{namespace_with_key, StdError, StdResult, Storage},
};

/// A typed handle to a single storage slot.
pub struct Path<'a, T, C> {
    storage_key: Cow<'a, [u8]>,
    data: PhantomData<T>,
    codec: PhantomData<C>,
}

impl<'a, T, C> Path<'a, T, C>
where
    C: Codec<T>,
{
    /// The slot of an entry in a keyed collection.
    pub fn new(namespace: &[u8], key: &[u8]) -> Self {
        Self {
            storage_key: Cow::Owned(namespace_with_key(namespace, key)),
            data: PhantomData,
            codec: PhantomData,
        }
    }

    /// A slot under a fixed key, used as is.
    pub const fn from_raw(storage_key: &'a [u8]) -> Self {
        Self {
            storage_key: Cow::Borrowed(storage_key),
            data: PhantomData,
            codec: PhantomData,
        }
    }

    pub fn storage_key(&self) -> &[u8] {
        &self.storage_key
    }

    pub fn may_load(&self, storage: &dyn Storage) -> StdResult<Option<T>> {
        storage
            .read(self.storage_key())
            .map(|raw| C::decode(&raw))
            .transpose()
    }

    pub fn load(&self, storage: &dyn Storage) -> StdResult<T> {
        self.may_load(storage)?
            .ok_or_else(|| StdError::data_not_found::<T>(self.storage_key()))
    }

    pub fn save(&self, storage: &mut dyn Storage, data: &T) -> StdResult<()> {
        let raw = C::encode(data)?;
        storage.write(self.storage_key(), &raw);
        Ok(())
    }

    pub fn remove(&self, storage: &mut dyn Storage) {
        storage.remove(self.storage_key());
    }
}
