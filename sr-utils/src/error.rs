pub type SkinResult<T> = Result<T, SkinError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SkinError {
    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    #[error("texture fetch failed: {0}")]
    TextureFetchFailed(String),

    #[error("invalid texture dimensions {width}x{height}")]
    InvalidTextureDimensions { width: u32, height: u32 },

    #[error("cape not available for {0}")]
    CapeNotAvailable(String),

    #[error("model build failed: {0}")]
    ModelBuildFailed(String),

    #[error("render failed: {0}")]
    RenderFailed(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("timed out: {0}")]
    Timeout(String),
}

impl SkinError {
    pub fn profile_not_found(msg: impl Into<String>) -> Self {
        Self::ProfileNotFound(msg.into())
    }

    pub fn fetch_failed(msg: impl Into<String>) -> Self {
        Self::TextureFetchFailed(msg.into())
    }

    pub fn cape_not_available(player: impl Into<String>) -> Self {
        Self::CapeNotAvailable(player.into())
    }

    pub fn model_build_failed(msg: impl Into<String>) -> Self {
        Self::ModelBuildFailed(msg.into())
    }

    pub fn render_failed(msg: impl Into<String>) -> Self {
        Self::RenderFailed(msg.into())
    }

    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Expected "nothing there" outcomes, as opposed to failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ProfileNotFound(_) | Self::CapeNotAvailable(_))
    }
}
