use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("lifecycle violation: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ChartError {
    /// Returns the lifecycle violation carried by this error, if any.
    #[must_use]
    pub fn lifecycle(&self) -> Option<&LifecycleError> {
        match self {
            Self::Lifecycle(err) => Some(err),
            _ => None,
        }
    }
}

/// Programmer errors raised when a component is driven out of order.
///
/// Data problems never map here: malformed points degrade visually instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("`{component}` is already initialized")]
    AlreadyInitialized { component: &'static str },

    #[error("`{component}` is not initialized")]
    NotInitialized { component: &'static str },

    #[error("`{component}` was destroyed")]
    Destroyed { component: &'static str },

    #[error("`{component}` requires an initialized price series")]
    PriceSeriesRequired { component: &'static str },

    #[error("chart surface was removed")]
    SurfaceRemoved,

    #[error("unknown series handle {raw}")]
    UnknownSeries { raw: u32 },

    #[error("chart engine is not mounted")]
    NotMounted,

    #[error("chart engine is already mounted")]
    AlreadyMounted,
}
