use std::collections::HashMap;
use std::future::Future;

use sr_model::{CapeTexture, SkinTexture};
use sr_net::{NetClient, Profile, normalize_uuid};
use sr_utils::{RenderConfig, SkinError, SkinResult};

/// Where profiles and texture pixels come from.
pub trait TextureProvider: Send + Sync + 'static {
    fn resolve_profile(&self, player_id: &str)
    -> impl Future<Output = SkinResult<Profile>> + Send;

    fn load_skin(&self, url: &str) -> impl Future<Output = SkinResult<SkinTexture>> + Send;

    fn load_cape(&self, url: &str) -> impl Future<Output = SkinResult<CapeTexture>> + Send;
}

/// The live profile and texture services.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: NetClient,
}

impl HttpProvider {
    pub fn new(config: &RenderConfig) -> SkinResult<Self> {
        Ok(Self {
            client: NetClient::new(config)?,
        })
    }
}

impl TextureProvider for HttpProvider {
    async fn resolve_profile(&self, player_id: &str) -> SkinResult<Profile> {
        self.client.resolve_profile(player_id).await
    }

    async fn load_skin(&self, url: &str) -> SkinResult<SkinTexture> {
        self.client.load_skin(url).await
    }

    async fn load_cape(&self, url: &str) -> SkinResult<CapeTexture> {
        self.client.load_cape(url).await
    }
}

/// Fixed profiles and PNG bytes held in memory, for local files and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    profiles: HashMap<String, Profile>,
    textures: HashMap<String, Vec<u8>>,
}

fn profile_key(player_id: &str) -> String {
    let player_id = player_id.trim();
    normalize_uuid(player_id).unwrap_or_else(|| player_id.to_ascii_lowercase())
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `profile` under both its name and its id.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.insert(profile_key(&profile.id), profile.clone());
        self.profiles.insert(profile_key(&profile.name), profile);
        self
    }

    pub fn with_texture(mut self, url: impl Into<String>, png: Vec<u8>) -> Self {
        self.textures.insert(url.into(), png);
        self
    }

    fn texture(&self, url: &str) -> SkinResult<&[u8]> {
        self.textures
            .get(url)
            .map(Vec::as_slice)
            .ok_or_else(|| SkinError::fetch_failed(format!("{url}: not found")))
    }
}

impl TextureProvider for StaticProvider {
    async fn resolve_profile(&self, player_id: &str) -> SkinResult<Profile> {
        self.profiles
            .get(&profile_key(player_id))
            .cloned()
            .ok_or_else(|| SkinError::profile_not_found(player_id))
    }

    async fn load_skin(&self, url: &str) -> SkinResult<SkinTexture> {
        SkinTexture::from_png_bytes(self.texture(url)?)
    }

    async fn load_cape(&self, url: &str) -> SkinResult<CapeTexture> {
        CapeTexture::from_png_bytes(self.texture(url)?)
    }
}
