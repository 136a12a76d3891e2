use {
    crate::{Borsh, Codec, Path},
    std::ops::Deref,
};

/// A single value stored under a fixed key.
pub struct Item<'a, T, C = Borsh>
where
    C: Codec<T>,
{
    path: Path<'a, T, C>,
}

impl<'a, T, C> Item<'a, T, C>
where
    C: Codec<T>,
{
    pub const fn new(storage_key: &'a str) -> Self {
        Self {
            path: Path::from_raw(storage_key.as_bytes()),
        }
    }
}

// Loading, saving and removing all go through the path.
impl<'a, T, C> Deref for Item<'a, T, C>
where
    C: Codec<T>,
{
    type Target = Path<'a, T, C>;

    fn deref(&self) -> &Self::Target {
        &self.path
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {
        super::Item,
        upgrader_types::{BlockInfo, MockStorage, StdError, Storage, Timestamp},
    };

    const LAST_BLOCK: Item<BlockInfo> = Item::new("last_block");

    const BLOCK: BlockInfo = BlockInfo {
        height: 12,
        timestamp: Timestamp::from_seconds(160),
    };

    #[test]
    fn loading_before_saving() {
        let storage = MockStorage::new();

        assert_eq!(LAST_BLOCK.may_load(&storage).unwrap(), None);
        assert!(matches!(
            LAST_BLOCK.load(&storage),
            Err(StdError::DataNotFound { .. })
        ));
    }

    #[test]
    fn saving_overwrites_under_the_raw_key() {
        let mut storage = MockStorage::new();

        LAST_BLOCK.save(&mut storage, &BLOCK).unwrap();
        LAST_BLOCK
            .save(&mut storage, &BlockInfo { height: 13, ..BLOCK })
            .unwrap();

        assert_eq!(LAST_BLOCK.load(&storage).unwrap().height, 13);
        assert!(storage.has(b"last_block"));
    }

    #[test]
    fn removing_twice_is_fine() {
        let mut storage = MockStorage::new();
        LAST_BLOCK.save(&mut storage, &BLOCK).unwrap();

        LAST_BLOCK.remove(&mut storage);
        LAST_BLOCK.remove(&mut storage);

        assert!(!storage.has(LAST_BLOCK.storage_key()));
    }
}
