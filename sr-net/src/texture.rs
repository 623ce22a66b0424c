use sr_model::{CapeTexture, SkinTexture};
use sr_utils::{SkinError, SkinResult};
use tracing::{debug, warn};

use crate::NetClient;

impl NetClient {
    /// Downloads raw texture bytes; any non-2xx status is a fetch failure.
    pub async fn fetch_texture(&self, url: &str) -> SkinResult<Vec<u8>> {
        let (status, body) = self.fetch(url).await?;
        if !status.is_success() {
            warn!(%url, %status, "texture download failed");
            return Err(SkinError::fetch_failed(format!("GET {url}: {status}")));
        }
        debug!(%url, bytes = body.len(), "texture downloaded");
        Ok(body)
    }

    pub async fn load_skin(&self, url: &str) -> SkinResult<SkinTexture> {
        let bytes = self.fetch_texture(url).await?;
        SkinTexture::from_png_bytes(&bytes)
    }

    pub async fn load_cape(&self, url: &str) -> SkinResult<CapeTexture> {
        let bytes = self.fetch_texture(url).await?;
        CapeTexture::from_png_bytes(&bytes)
    }
}
