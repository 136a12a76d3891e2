use {
    std::borrow::Cow,
    upgrader_types::{StdError, StdResult},
};

/// A key of a [`Map`](crate::Map), converted to raw bytes and back.
pub trait PrimaryKey {
    /// What raw keys decode into; may differ from the key type, e.g. `&str`
    /// decodes into `String`.
    type Output;

    fn raw_key(&self) -> Cow<[u8]>;

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output>;
}

// Upgrade names.
impl PrimaryKey for &str {
    type Output = String;

    fn raw_key(&self) -> Cow<[u8]> {
        Cow::Borrowed(self.as_bytes())
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        String::from_utf8(bytes.to_vec())
            .map_err(|err| StdError::deserialize::<Self::Output, _>("utf8", err))
    }
}

// ----------------------------------- tests -----------------------------------
