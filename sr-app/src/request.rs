use sr_utils::{PlayerSkinModel, SkinError, SkinResult};

/// Largest accepted output edge, in pixels.
pub const MAX_OUTPUT_SIZE: u32 = 4096;
pub const DEFAULT_THETA: f32 = 30.0;
pub const DEFAULT_PHI: f32 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeadRequest {
    pub width: Option<u32>,
    /// Defaults to the width.
    pub height: Option<u32>,
    pub flip: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Degrees around the vertical axis.
    pub theta: Option<f32>,
    /// Degrees of elevation.
    pub phi: Option<f32>,
    /// Walk cycle time; zero or unset is the rest pose.
    pub time: Option<f32>,
    /// Overrides the arm model of the profile.
    pub model: Option<PlayerSkinModel>,
    pub flip: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpriteRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub model: Option<PlayerSkinModel>,
    pub flip: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CapeRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub flip: bool,
}

fn dimension(name: &str, value: Option<u32>, default: u32) -> SkinResult<u32> {
    match value.unwrap_or(default) {
        0 => Err(SkinError::invalid_parameter(format!("{name} must be positive"))),
        v if v > MAX_OUTPUT_SIZE => Err(SkinError::invalid_parameter(format!(
            "{name} {v} exceeds {MAX_OUTPUT_SIZE}"
        ))),
        v => Ok(v),
    }
}

fn finite(name: &str, value: Option<f32>, default: f32) -> SkinResult<f32> {
    let value = value.unwrap_or(default);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SkinError::invalid_parameter(format!("{name} must be finite")))
    }
}

/// Width and height with defaults applied and limits checked.
pub(crate) fn output_size(
    width: Option<u32>,
    height: Option<u32>,
    default: (u32, u32),
) -> SkinResult<(u32, u32)> {
    Ok((
        dimension("width", width, default.0)?,
        dimension("height", height, default.1)?,
    ))
}

impl HeadRequest {
    pub(crate) fn size(&self, default: u32) -> SkinResult<(u32, u32)> {
        let width = dimension("width", self.width, default)?;
        let height = dimension("height", self.height, width)?;
        Ok((width, height))
    }
}

impl BodyRequest {
    /// (theta, phi, time)
    pub(crate) fn view(&self) -> SkinResult<(f32, f32, f32)> {
        Ok((
            finite("theta", self.theta, DEFAULT_THETA)?,
            finite("phi", self.phi, DEFAULT_PHI)?,
            finite("time", self.time, 0.0)?,
        ))
    }
}
