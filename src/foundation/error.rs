/// Convenience result type used across glyphic.
pub type GlyphResult<T> = Result<T, GlyphError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum GlyphError {
    /// Binding output that breaks the per-family knob contract.
    #[error("contract violation: {0}")]
    Contract(String),

    /// A binding was handed an unusable expression model.
    #[error("binding error: {0}")]
    Binding(String),

    /// Selected family has no registered binding or renderer.
    #[error("unknown family: {0}")]
    UnknownFamily(String),

    /// A collaborator the pipeline needs (content, renderer) is unavailable.
    #[error("missing dependency: {0}")]
    MissingDependency(String),

    /// Renderer construction or per-frame failure.
    #[error("render error: {0}")]
    Render(String),

    /// Invalid user-provided data (surface sizes, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlyphError {
    /// Build a [`GlyphError::Contract`] value.
    pub fn contract(msg: impl Into<String>) -> Self {
        Self::Contract(msg.into())
    }

    /// Build a [`GlyphError::Binding`] value.
    pub fn binding(msg: impl Into<String>) -> Self {
        Self::Binding(msg.into())
    }

    /// Build a [`GlyphError::UnknownFamily`] value.
    pub fn unknown_family(name: impl Into<String>) -> Self {
        Self::UnknownFamily(name.into())
    }

    /// Build a [`GlyphError::MissingDependency`] value.
    pub fn missing(msg: impl Into<String>) -> Self {
        Self::MissingDependency(msg.into())
    }

    /// Build a [`GlyphError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`GlyphError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GlyphError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error aborts a render attempt (as opposed to being recoverable upstream).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Validation(_) | Self::Serde(_))
    }
}

impl From<serde_json::Error> for GlyphError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
