use thiserror::Error;

/// Errors at the edges of the estimator: parsing selections and configuration.
///
/// The estimation itself never fails; these only come from turning text into inputs.
#[derive(Debug, Error)]
pub enum PerformanceError {
    #[error("invalid component selection: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid model configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Model configuration rejected by [`crate::model_config::ModelConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("band table `{table}` must have strictly ascending upper bounds")]
    UnorderedBands { table: String },

    #[error("band table `{table}` has out-of-range factor {factor}")]
    InvalidFactor { table: String, factor: f64 },

    #[error("`{field}` must be in (0, 1], got {value}")]
    FractionOutOfRange { field: String, value: f64 },

    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: String, value: f64 },

    #[error("`{field}` bounds are inverted: min {min} > max {max}")]
    InvertedBounds { field: String, min: f64, max: f64 },

    #[error("flight phase time ratios must sum to a positive value")]
    EmptyPhaseMix,
}
