use {
    crate::{Borsh, Codec, Path, PrimaryKey},
    std::marker::PhantomData,
    upgrader_types::{encode_length, increment_last_byte, trim, Order, StdResult, Storage},
};

/// A collection of values of the same type, each stored under its own key
/// inside a common namespace.
pub struct Map<'a, K, T, C = Borsh>
where
    C: Codec<T>,
{
    namespace: &'a [u8],
    key: PhantomData<K>,
    data: PhantomData<T>,
    codec: PhantomData<C>,
}

impl<'a, K, T, C> Map<'a, K, T, C>
where
    C: Codec<T>,
{
    pub const fn new(namespace: &'a str) -> Self {
        Self {
            namespace: namespace.as_bytes(),
            key: PhantomData,
            data: PhantomData,
            codec: PhantomData,
        }
    }
}

impl<K, T, C> Map<'_, K, T, C>
where
    K: PrimaryKey,
    C: Codec<T>,
{
    fn path(&self, key: K) -> Path<'static, T, C> {
        Path::new(self.namespace, &key.raw_key())
    }

    pub fn may_load(&self, storage: &dyn Storage, key: K) -> StdResult<Option<T>> {
        self.path(key).may_load(storage)
    }

    pub fn save(&self, storage: &mut dyn Storage, key: K, data: &T) -> StdResult<()> {
        self.path(key).save(storage, data)
    }

    /// Every entry in the map, in the order of raw keys.
    pub fn range<'b>(
        &self,
        storage: &'b dyn Storage,
        order: Order,
    ) -> Box<dyn Iterator<Item = StdResult<(K::Output, T)>> + 'b>
    where
        K::Output: 'b,
        T: 'b,
        C: 'b,
    {
        let mut prefix = encode_length(self.namespace).to_vec();
        prefix.extend_from_slice(self.namespace);

        let max = increment_last_byte(prefix.clone());

        let iter = storage
            .scan(Some(prefix.as_slice()), Some(max.as_slice()), order)
            .map(move |(raw_key, raw_value)| -> StdResult<_> {
                let key = K::from_slice(&trim(&prefix, &raw_key))?;
                let value = C::decode(&raw_value)?;
                Ok((key, value))
            });

        Box::new(iter)
    }
}

// ----------------------------------- tests -----------------------------------
