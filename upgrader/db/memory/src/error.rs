use {upgrader_app::AppError, upgrader_types::StdError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error("cannot commit: version {version} is the maximum")]
    VersionOverflow { version: u64 },
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        AppError::Db(err.to_string())
    }
}

pub type DbResult<T> = core::result::Result<T, DbError>;
