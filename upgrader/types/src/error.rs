use {data_encoding::BASE64, std::any::type_name, thiserror::Error};

/// Errors from reading, writing or converting stored data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StdError {
    #[error("no `{ty}` stored under key {key}")]
    DataNotFound { ty: &'static str, key: String },

    #[error("can't encode `{ty}` as {codec}: {reason}")]
    Serialize {
        codec: &'static str,
        ty: &'static str,
        reason: String,
    },

    #[error("can't decode `{ty}` from {codec}: {reason}")]
    Deserialize {
        codec: &'static str,
        ty: &'static str,
        reason: String,
    },
}

impl StdError {
    /// The key is reported base64-encoded, since storage keys are arbitrary
    /// bytes.
    pub fn data_not_found<T>(key: &[u8]) -> Self {
        let ty = type_name::<T>();
        let key = BASE64.encode(key);

        Self::DataNotFound { ty, key }
    }

    pub fn serialize<T, R>(codec: &'static str, reason: R) -> Self
    where
        R: ToString,
    {
        let ty = type_name::<T>();
        let reason = reason.to_string();

        Self::Serialize { codec, ty, reason }
    }

    pub fn deserialize<T, R>(codec: &'static str, reason: R) -> Self
    where
        R: ToString,
    {
        let ty = type_name::<T>();
        let reason = reason.to_string();

        Self::Deserialize { codec, ty, reason }
    }
}

pub type StdResult<T> = core::result::Result<T, StdError>;

// ----------------------------------- tests -----------------------------------
