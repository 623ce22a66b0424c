use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::{SkinError, SkinResult};

pub const CONFIG_ENV_PREFIX: &str = "SKINRENDER_";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Name -> UUID lookup, `{base}/{name}`.
    pub name_service_url: String,
    /// Session profile lookup, `{base}/{uuid}`.
    pub session_service_url: String,
    /// Capes-by-name fallback, `{base}/{name}.png`.
    pub cape_service_url: String,
    pub network_timeout_ms: u64,
    pub render_timeout_ms: u64,
    pub renderer_pool_size: usize,
    pub cache_capacity: usize,
    pub cache_ttl_secs: u64,
    pub head_size: u32,
    pub body_width: u32,
    pub body_height: u32,
    pub sprite_width: u32,
    pub sprite_height: u32,
    pub cape_width: u32,
    pub cape_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            name_service_url: "https://api.mojang.com/users/profiles/minecraft".to_string(),
            session_service_url: "https://sessionserver.mojang.com/session/minecraft/profile"
                .to_string(),
            cape_service_url: "http://s.optifine.net/capes".to_string(),
            network_timeout_ms: 10_000,
            render_timeout_ms: 10_000,
            renderer_pool_size: 2,
            cache_capacity: 256,
            cache_ttl_secs: 15 * 60,
            head_size: 128,
            body_width: 256,
            body_height: 512,
            sprite_width: 160,
            sprite_height: 320,
            cape_width: 160,
            cape_height: 256,
        }
    }
}

impl RenderConfig {
    /// Defaults, then the optional TOML file, then `.env` and `SKINRENDER_*` variables.
    pub fn load(path: Option<&Path>) -> SkinResult<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    SkinError::invalid_parameter(format!("config {}: {e}", path.display()))
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!("loaded environment from {}", env_file.display());
        }
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> SkinResult<Self> {
        toml::from_str(raw).map_err(|e| SkinError::invalid_parameter(format!("config: {e}")))
    }

    /// Applies `SKINRENDER_<FIELD>` overrides. Unparsable or zero numbers are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(&format!("{CONFIG_ENV_PREFIX}{name}"));
        let number = |name: &str| {
            var(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|&n| n > 0)
        };

        if let Some(v) = var("NAME_SERVICE_URL") {
            self.name_service_url = v;
        }
        if let Some(v) = var("SESSION_SERVICE_URL") {
            self.session_service_url = v;
        }
        if let Some(v) = var("CAPE_SERVICE_URL") {
            self.cape_service_url = v;
        }
        if let Some(n) = number("NETWORK_TIMEOUT_MS") {
            self.network_timeout_ms = n;
        }
        if let Some(n) = number("RENDER_TIMEOUT_MS") {
            self.render_timeout_ms = n;
        }
        if let Some(n) = number("RENDERER_POOL_SIZE") {
            self.renderer_pool_size = n as usize;
        }
        if let Some(n) = number("CACHE_CAPACITY") {
            self.cache_capacity = n as usize;
        }
        if let Some(n) = number("CACHE_TTL_SECS") {
            self.cache_ttl_secs = n;
        }
    }

    pub fn network_timeout(&self) -> Duration {
        Duration::from_millis(self.network_timeout_ms)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
