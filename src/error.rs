use thiserror::Error;

/// Errors raised while decoding or querying webnucleo data.
#[derive(Error, Debug)]
pub enum WnError {
    #[error("Reaction '{reaction}' has no single_rate, rate_table, non_smoker_fit or user_rate data")]
    UnknownRateType { reaction: String },
    #[error("Function not defined for key {key}")]
    UserFunctionNotFound { key: String },
    #[error("Rate table must contain at least one point")]
    EmptyRateTable,
    #[error("Rate table columns differ in length: t9={t9}, rate={rate}, sef={sef}")]
    MismatchedTableLengths { t9: usize, rate: usize, sef: usize },
    #[error("Table has repeated t9 value {0}")]
    DuplicateTableTemperature(f64),
    #[error("NON-SMOKER rate must contain at least one fit")]
    EmptyFitList,
    #[error("Invalid nuclide Z={z}, A={a}")]
    InvalidNuclide { z: u32, a: u32 },
    #[error("Invalid nuclide name '{0}'")]
    InvalidNuclideName(String),
    #[error("nucleon must be 'z', 'n', or 'a', got '{0}'")]
    InvalidNucleon(String),
    #[error("Property key must have a name")]
    EmptyPropertyKey,
    #[error("Too many property names (at most 3), got {0}")]
    TooManyPropertyTags(usize),
    #[error("Property {0} not found")]
    PropertyNotFound(String),
    #[error("Property {property} has non-numeric value '{value}'")]
    InvalidPropertyValue { property: String, value: String },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Convenience type for `Result<T, WnError>`.
pub type Result<T> = std::result::Result<T, WnError>;
