/// Convenience result type used across Stitchline.
pub type StitchlineResult<T> = Result<T, StitchlineError>;

/// Top-level error taxonomy used by tracker APIs.
#[derive(thiserror::Error, Debug)]
pub enum StitchlineError {
    /// Invalid user-provided or grid configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while reading or writing the progress record.
    #[error("storage error: {0}")]
    Storage(String),

    /// Errors while rasterizing a scene.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StitchlineError {
    /// Build a [`StitchlineError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StitchlineError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`StitchlineError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StitchlineError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            StitchlineError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            StitchlineError::storage("x")
                .to_string()
                .contains("storage error:")
        );
        assert!(
            StitchlineError::render("x")
                .to_string()
                .contains("render error:")
        );
        assert!(
            StitchlineError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = StitchlineError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
