use {
    thiserror::Error,
    upgrader_types::{PlanError, StdError, Target, Timestamp},
};

/// A signal that block processing must stop.
///
/// This is not a failure of the block itself: it means the software running
/// this node does not match what the chain expects at this point. The node
/// must not proceed past the current block; what happens next (exit, swap the
/// binary, wait for an operator) is up to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Halt {
    #[error("UPGRADE `{name}` NEEDED at height {height}: {info}")]
    UpgradeNeeded {
        name: String,
        height: u64,
        info: String,
    },

    #[error("BINARY UPDATED BEFORE TRIGGER! unknown upgrade `{name}` at height {height}: in binary but not executed on chain")]
    HandlerBeforeTrigger { name: String, height: u64 },
}

impl Halt {
    /// Name of the upgrade that caused the halt.
    pub fn name(&self) -> &str {
        match self {
            Halt::UpgradeNeeded { name, .. } | Halt::HandlerBeforeTrigger { name, .. } => name,
        }
    }

    /// Height of the block at which the halt occurred.
    pub fn height(&self) -> u64 {
        match self {
            Halt::UpgradeNeeded { height, .. } | Halt::HandlerBeforeTrigger { height, .. } => {
                *height
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error("DB error: {0}")]
    Db(String),

    #[error("invalid upgrade plan: {0}")]
    InvalidPlan(PlanError),

    #[error("invalid upgrade schedule: {reason}")]
    InvalidSchedule { reason: PlanError },

    #[error("upgrade cannot be scheduled in the past! target: {target}, current height: {height}, current time: {time}")]
    ScheduleInPast {
        target: Target,
        height: u64,
        time: Timestamp,
    },

    #[error("upgrade with name `{name}` has already been completed at height {height}")]
    AlreadyCompleted { name: String, height: u64 },

    #[error("chain is already initialized at height {height}")]
    AlreadyInitialized { height: u64 },

    #[error("incorrect block height! expecting: {expect}, actual: {actual}")]
    IncorrectBlockHeight { expect: u64, actual: u64 },

    #[error("upgrade handler `{name}` failed: {reason}")]
    Handler { name: String, reason: String },

    #[error(transparent)]
    Halt(#[from] Halt),
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::EmptyName => AppError::InvalidPlan(err),
            PlanError::MissingTarget | PlanError::ConflictingTargets => {
                AppError::InvalidSchedule { reason: err }
            },
        }
    }
}

impl AppError {
    /// Create an error to be returned by an upgrade handler.
    pub fn handler<N, R>(name: N, reason: R) -> Self
    where
        N: Into<String>,
        R: ToString,
    {
        Self::Handler {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_halt(&self) -> bool {
        matches!(self, AppError::Halt(_))
    }

    pub fn as_halt(&self) -> Option<&Halt> {
        match self {
            AppError::Halt(halt) => Some(halt),
            _ => None,
        }
    }
}

pub type AppResult<T> = core::result::Result<T, AppError>;

// ----------------------------------- tests -----------------------------------
