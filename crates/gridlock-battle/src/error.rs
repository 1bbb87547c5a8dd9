use gridlock_core::GridError;

/// Lookup failures when resolving content by id
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContentError {
    #[error("unknown trigger '{0}'")]
    UnknownTrigger(String),

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("unknown enemy definition '{0}'")]
    UnknownEnemy(String),

    #[error("enemy '{enemy}' references undefined phase '{phase}'")]
    UnknownPhase { enemy: String, phase: String },
}

/// Errors raised while loading or building a battle scenario
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("invalid position for {who}: {source}")]
    Grid {
        who: String,
        #[source]
        source: GridError,
    },

    #[error("scenario has no enemies")]
    NoEnemies,

    #[error("duplicate enemy id '{0}'")]
    DuplicateEnemyId(String),

    #[error("action '{action}' is {found:?} but was listed under {expected:?}")]
    LaneMismatch {
        action: String,
        expected: crate::ai::CoreType,
        found: crate::ai::CoreType,
    },
}
