pub type ShowroomResult<T> = Result<T, ShowroomError>;

#[derive(thiserror::Error, Debug)]
pub enum ShowroomError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error("state error: {0}")]
    State(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShowroomError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ShowroomError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            ShowroomError::animation("x")
                .to_string()
                .contains("animation error:")
        );
        assert!(ShowroomError::state("x").to_string().contains("state error:"));
        assert!(
            ShowroomError::render("x")
                .to_string()
                .contains("render error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ShowroomError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
