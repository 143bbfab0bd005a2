use crate::runner::RunError;

pub type PassloomResult<T> = Result<T, PassloomError>;

#[derive(thiserror::Error, Debug)]
pub enum PassloomError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("render pass '{0}' is required as the composite base layer but is unavailable")]
    MissingBasePass(String),

    #[error("fill error: {0}")]
    Fill(String),

    #[error(transparent)]
    Command(#[from] RunError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PassloomError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn fill(msg: impl Into<String>) -> Self {
        Self::Fill(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            PassloomError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(PassloomError::fill("x").to_string().contains("fill error:"));
        assert!(
            PassloomError::MissingBasePass("Unlit".into())
                .to_string()
                .contains("'Unlit'")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = PassloomError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
