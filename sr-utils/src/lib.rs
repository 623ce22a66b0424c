use std::fmt;
use std::str::FromStr;

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Clock, ManualClock, SystemClock, TtlLruCache};
pub use config::{CONFIG_ENV_PREFIX, RenderConfig};
pub use error::{SkinError, SkinResult};

/// Arm geometry of a player skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerSkinModel {
    #[default]
    Classic,
    Slim,
}

impl PlayerSkinModel {
    pub fn is_slim(self) -> bool {
        matches!(self, Self::Slim)
    }

    /// Arm width in texels.
    pub fn arm_width(self) -> u32 {
        match self {
            Self::Classic => 4,
            Self::Slim => 3,
        }
    }

    /// Reads the `metadata.model` field of a profile texture entry.
    pub fn from_metadata(model: Option<&str>) -> Self {
        match model {
            Some(m) if m.eq_ignore_ascii_case("slim") => Self::Slim,
            _ => Self::Classic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Slim => "slim",
        }
    }
}

impl FromStr for PlayerSkinModel {
    type Err = SkinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" | "default" | "steve" | "wide" => Ok(Self::Classic),
            "slim" | "alex" => Ok(Self::Slim),
            other => Err(SkinError::invalid_parameter(format!(
                "unknown skin model '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PlayerSkinModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
