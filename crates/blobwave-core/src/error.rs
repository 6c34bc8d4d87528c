use thiserror::Error;

/// Rejected configuration values. Raised at construction time so a director
/// never enters its frame loop with empty point arrays or degenerate timing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{shape} needs at least {min} points, got {got}")]
    PointCount {
        shape: &'static str,
        min: usize,
        got: usize,
    },
    #[error("radius bound `{name}` must be finite and non-negative, got {value}")]
    InvalidRadius { name: &'static str, value: f32 },
    #[error("min radius {min} exceeds max radius {max}")]
    InvertedRadius { min: f32, max: f32 },
    #[error("`{name}` must be finite and positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("`{name}` must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("duration jitter must be at least 1")]
    ZeroDurationJitter,
}

/// Errors from the director's control surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DirectorError {
    #[error("no visual state registered under id {0}")]
    UnknownState(i32),
    #[error("visual state {0} is active and cannot be removed")]
    StateInUse(i32),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub(crate) fn require_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

pub(crate) fn require_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
