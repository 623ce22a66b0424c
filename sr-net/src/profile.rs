use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use sr_model::CapeTexture;
use sr_utils::{PlayerSkinModel, SkinError, SkinResult};
use tracing::{debug, info};

use crate::NetClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Undashed lowercase UUID.
    pub id: String,
    pub name: String,
    pub skin_url: String,
    pub cape_url: Option<String>,
    pub model: PlayerSkinModel,
}

#[derive(Debug, Deserialize)]
struct NameLookup {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SessionProfile {
    id: String,
    name: String,
    #[serde(default)]
    properties: Vec<ProfileProperty>,
}

#[derive(Debug, Deserialize)]
struct ProfileProperty {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct TexturesPayload {
    textures: TextureSet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
struct TextureSet {
    skin: Option<TextureEntry>,
    cape: Option<TextureEntry>,
}

#[derive(Debug, Deserialize)]
struct TextureEntry {
    url: String,
    #[serde(default)]
    metadata: Option<TextureMetadata>,
}

#[derive(Debug, Deserialize)]
struct TextureMetadata {
    model: Option<String>,
}

/// Skin and cape URLs plus arm model decoded from a `textures` property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTextures {
    pub skin_url: Option<String>,
    pub cape_url: Option<String>,
    pub model: PlayerSkinModel,
}

/// Strips dashes and lowercases a UUID, `None` if `id` is not one.
pub fn normalize_uuid(id: &str) -> Option<String> {
    let dashed = match id.len() {
        32 => false,
        36 => true,
        _ => return None,
    };
    if dashed {
        let bytes = id.as_bytes();
        if [8, 13, 18, 23].iter().any(|&i| bytes[i] != b'-') {
            return None;
        }
    }
    let plain: String = id.chars().filter(|&c| c != '-').collect();
    if plain.len() != 32 || !plain.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(plain.to_ascii_lowercase())
}

fn is_player_name(name: &str) -> bool {
    (1..=16).contains(&name.len())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Decodes the base64 JSON `textures` property value.
pub fn decode_textures(value: &str) -> SkinResult<DecodedTextures> {
    let raw = STANDARD
        .decode(value.trim())
        .map_err(|e| SkinError::profile_not_found(format!("textures property: {e}")))?;
    let payload: TexturesPayload = serde_json::from_slice(&raw)
        .map_err(|e| SkinError::profile_not_found(format!("textures payload: {e}")))?;
    let TextureSet { skin, cape } = payload.textures;
    let model = PlayerSkinModel::from_metadata(
        skin.as_ref()
            .and_then(|entry| entry.metadata.as_ref())
            .and_then(|meta| meta.model.as_deref()),
    );
    Ok(DecodedTextures {
        skin_url: skin.map(|entry| entry.url),
        cape_url: cape.map(|entry| entry.url),
        model,
    })
}

impl NetClient {
    /// Resolves a player name or UUID to its skin and cape URLs.
    pub async fn resolve_profile(&self, player_id: &str) -> SkinResult<Profile> {
        let player_id = player_id.trim();
        let uuid = match normalize_uuid(player_id) {
            Some(uuid) => uuid,
            None if is_player_name(player_id) => self.lookup_uuid(player_id).await?,
            None => return Err(SkinError::profile_not_found(player_id)),
        };

        let url = format!("{}/{}", self.session_service_url, uuid);
        let (status, body) = self.fetch(&url).await?;
        if !status.is_success() || body.is_empty() {
            debug!(%status, %uuid, "session profile missing");
            return Err(SkinError::profile_not_found(player_id));
        }
        let session: SessionProfile = serde_json::from_slice(&body)
            .map_err(|e| SkinError::profile_not_found(format!("{player_id}: {e}")))?;
        let textures = session
            .properties
            .iter()
            .find(|property| property.name == "textures")
            .ok_or_else(|| SkinError::profile_not_found(format!("{player_id}: no textures")))?;
        let decoded = decode_textures(&textures.value)?;
        let skin_url = decoded
            .skin_url
            .ok_or_else(|| SkinError::profile_not_found(format!("{player_id}: no skin")))?;

        let cape_url = match decoded.cape_url {
            Some(url) => Some(url),
            None => self.lookup_cape_by_name(&session.name).await,
        };

        let profile = Profile {
            id: normalize_uuid(&session.id).unwrap_or(uuid),
            name: session.name,
            skin_url,
            cape_url,
            model: decoded.model,
        };
        info!(
            id = %profile.id,
            name = %profile.name,
            model = %profile.model,
            cape = profile.cape_url.is_some(),
            "resolved profile"
        );
        Ok(profile)
    }

    async fn lookup_uuid(&self, name: &str) -> SkinResult<String> {
        let url = format!("{}/{}", self.name_service_url, name);
        let (status, body) = self.fetch(&url).await?;
        if !status.is_success() || body.is_empty() {
            debug!(%status, %name, "name lookup missed");
            return Err(SkinError::profile_not_found(name));
        }
        let lookup: NameLookup = serde_json::from_slice(&body)
            .map_err(|e| SkinError::profile_not_found(format!("{name}: {e}")))?;
        normalize_uuid(&lookup.id).ok_or_else(|| SkinError::profile_not_found(name))
    }

    /// Best effort: any failure, including a body that is not a usable cape
    /// texture, means "no cape".
    async fn lookup_cape_by_name(&self, name: &str) -> Option<String> {
        let url = format!("{}/{}.png", self.cape_service_url, name);
        let body = match self.fetch(&url).await {
            Ok((status, body)) if status.is_success() => body,
            Ok((status, _)) => {
                debug!(%status, %name, "no cape by name");
                return None;
            }
            Err(err) => {
                debug!(%name, "cape lookup failed: {err}");
                return None;
            }
        };
        match CapeTexture::from_png_bytes(&body) {
            Ok(_) => Some(url),
            Err(err) => {
                debug!(%name, "cape by name unusable: {err}");
                None
            }
        }
    }
}
