use thiserror::Error;

#[derive(Error, Debug)]
pub enum BadlandsError {
    #[error("Entity not found: {0:?}")]
    EntityNotFound(crate::core::types::EntityId),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, BadlandsError>;

/// Why a single entity action produced no state change.
///
/// These never escape a tick: the scheduler turns them into events and moves on.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFailure {
    #[error("attacker is too exhausted to fight")]
    Exhausted,

    #[error("target is out of range")]
    OutOfRange,

    #[error("target is not alive")]
    TargetDead,

    #[error("attacker is not alive")]
    AttackerDead,

    #[error("target cannot take part in this action")]
    InvalidTarget,

    #[error("target no longer exists")]
    MissingTarget,

    #[error("no free cell to act on")]
    Blocked,
}

impl ActionFailure {
    /// Stable reason code for logs and reports
    pub fn reason(&self) -> &'static str {
        match self {
            ActionFailure::Exhausted => "exhausted",
            ActionFailure::OutOfRange => "out_of_range",
            ActionFailure::TargetDead => "target_dead",
            ActionFailure::AttackerDead => "attacker_dead",
            ActionFailure::InvalidTarget => "invalid_target",
            ActionFailure::MissingTarget => "missing_target",
            ActionFailure::Blocked => "blocked",
        }
    }
}
