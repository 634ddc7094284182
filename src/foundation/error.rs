/// Convenience result type used across Charmloom.
pub type CharmloomResult<T> = Result<T, CharmloomError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is recoverable: the design session stays usable and the
/// caller may retry the failed step.
#[derive(thiserror::Error, Debug)]
pub enum CharmloomError {
    /// Invalid user-provided or session data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The rasterizer could not produce a flattened image buffer.
    #[error("capture error: {0}")]
    Capture(String),

    /// Network-level or non-2xx failure talking to the enhancement service.
    #[error("transport error: {0}")]
    Transport(String),

    /// No usable image could be extracted from the service reply.
    #[error("normalization error: {0}")]
    Normalization(String),

    /// A session's placements resolved to zero catalog identities.
    #[error("identity error: {0}")]
    Identity(String),

    /// The design-creation request failed; nothing was persisted.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// The design record was created but the order line was not appended.
    ///
    /// Surfaced distinctly from [`CharmloomError::Persistence`] because a
    /// design record now exists and is not rolled back.
    #[error("order line append failed for created design '{design_id}': {detail}")]
    OrderAppend {
        /// Identity of the design record created before the failure.
        design_id: String,
        /// Failure detail from the order-line collaborator.
        detail: String,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CharmloomError {
    /// Build a [`CharmloomError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CharmloomError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`CharmloomError::Transport`] value.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Build a [`CharmloomError::Normalization`] value.
    pub fn normalization(msg: impl Into<String>) -> Self {
        Self::Normalization(msg.into())
    }

    /// Build a [`CharmloomError::Identity`] value.
    pub fn identity(msg: impl Into<String>) -> Self {
        Self::Identity(msg.into())
    }

    /// Build a [`CharmloomError::Persistence`] value.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Build a [`CharmloomError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
