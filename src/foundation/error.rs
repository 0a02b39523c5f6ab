/// Convenience result type used across psxblend.
pub type BlendResult<T> = Result<T, BlendError>;

/// Top-level error taxonomy used by document, asset and render APIs.
///
/// The blend formulas themselves are total and never produce one of these.
#[derive(thiserror::Error, Debug)]
pub enum BlendError {
    /// Invalid user-provided document or render configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A layer image could not be located or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Internal inconsistency while compositing a region.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlendError {
    /// Build a [`BlendError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BlendError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`BlendError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`BlendError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
