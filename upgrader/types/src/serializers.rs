use {
    crate::{StdError, StdResult},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{de::DeserializeOwned, ser::Serialize},
};

// ----------------------------------- json ------------------------------------

/// JSON output, used for the plan and for the upgrade-info file handed to an
/// external supervisor.
pub trait JsonSerExt {
    fn to_json_string(&self) -> StdResult<String>;

    fn to_json_string_pretty(&self) -> StdResult<String>;
}

impl<T> JsonSerExt for T
where
    T: Serialize,
{
    fn to_json_string(&self) -> StdResult<String> {
        serde_json::to_string(self).map_err(|err| StdError::serialize::<T, _>("json", err))
    }

    fn to_json_string_pretty(&self) -> StdResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| StdError::serialize::<T, _>("json", err))
    }
}

pub trait JsonDeExt {
    fn deserialize_json<D>(self) -> StdResult<D>
    where
        D: DeserializeOwned;
}

impl<B> JsonDeExt for &B
where
    B: AsRef<[u8]> + ?Sized,
{
    fn deserialize_json<D>(self) -> StdResult<D>
    where
        D: DeserializeOwned,
    {
        serde_json::from_slice(self.as_ref())
            .map_err(|err| StdError::deserialize::<D, _>("json", err))
    }
}

// ----------------------------------- borsh -----------------------------------

/// Borsh output, the encoding of everything kept in storage.
pub trait BorshSerExt {
    fn to_borsh_vec(&self) -> StdResult<Vec<u8>>;
}

impl<T> BorshSerExt for T
where
    T: BorshSerialize,
{
    fn to_borsh_vec(&self) -> StdResult<Vec<u8>> {
        borsh::to_vec(self).map_err(|err| StdError::serialize::<T, _>("borsh", err))
    }
}

pub trait BorshDeExt {
    fn deserialize_borsh<D>(self) -> StdResult<D>
    where
        D: BorshDeserialize;
}

impl<B> BorshDeExt for &B
where
    B: AsRef<[u8]> + ?Sized,
{
    fn deserialize_borsh<D>(self) -> StdResult<D>
    where
        D: BorshDeserialize,
    {
        borsh::from_slice(self.as_ref()).map_err(|err| StdError::deserialize::<D, _>("borsh", err))
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, crate::BlockInfo};

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = crate::MOCK_BLOCK.to_borsh_vec().unwrap();
        bytes.push(0);

        assert!(matches!(
            bytes.deserialize_borsh::<BlockInfo>(),
            Err(StdError::Deserialize { codec: "borsh", .. })
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            br#"{"height":"#.deserialize_json::<BlockInfo>(),
            Err(StdError::Deserialize { codec: "json", .. })
        ));
    }
}
