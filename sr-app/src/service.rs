use std::sync::Arc;
use std::time::Instant;

use sr_model::{CapeTexture, Model, ModelOptions, SkinTexture, build_model};
use sr_net::Profile;
use sr_render::{
    PoseParams, RendererPool, SoftwareRasterizer, encode_png, render_cape_flat,
    render_full_sprite, render_head_icon, render_pose,
};
use sr_utils::{
    Clock, PlayerSkinModel, RenderConfig, SkinError, SkinResult, SystemClock, TtlLruCache,
};
use tracing::{debug, info};

use crate::request::output_size;
use crate::{BodyRequest, CapeRequest, HeadRequest, SpriteRequest, TextureProvider};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ModelKey {
    skin_url: String,
    cape_url: Option<String>,
    model: PlayerSkinModel,
    flip: bool,
}

/// What a skin id points at.
#[derive(Debug, Clone)]
struct Source {
    name: String,
    skin_url: String,
    cape_url: Option<String>,
    model: PlayerSkinModel,
}

impl From<Profile> for Source {
    fn from(profile: Profile) -> Self {
        Self {
            name: profile.name,
            skin_url: profile.skin_url,
            cape_url: profile.cape_url,
            model: profile.model,
        }
    }
}

fn is_direct_url(skin_id: &str) -> bool {
    skin_id.starts_with("http://") || skin_id.starts_with("https://")
}

/// The four render entry points with their caches and renderer pool.
pub struct SkinService<P> {
    provider: P,
    config: RenderConfig,
    profiles: TtlLruCache<String, Source>,
    skins: TtlLruCache<String, Arc<SkinTexture>>,
    capes: TtlLruCache<String, Arc<CapeTexture>>,
    models: TtlLruCache<ModelKey, Arc<Model>>,
    pool: RendererPool<SoftwareRasterizer>,
}

impl<P: TextureProvider> SkinService<P> {
    pub fn new(provider: P, config: RenderConfig) -> Self {
        Self::with_clock(provider, config, Arc::new(SystemClock))
    }

    pub fn with_clock(provider: P, config: RenderConfig, clock: Arc<dyn Clock>) -> Self {
        let (capacity, ttl) = (config.cache_capacity, config.cache_ttl());
        Self {
            profiles: TtlLruCache::with_clock(capacity, ttl, Arc::clone(&clock)),
            skins: TtlLruCache::with_clock(capacity, ttl, Arc::clone(&clock)),
            capes: TtlLruCache::with_clock(capacity, ttl, Arc::clone(&clock)),
            models: TtlLruCache::with_clock(capacity, ttl, Arc::clone(&clock)),
            pool: RendererPool::new(config.renderer_pool_size, SoftwareRasterizer::new),
            provider,
            config,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn source(&self, skin_id: &str) -> SkinResult<Source> {
        let skin_id = skin_id.trim();
        if skin_id.is_empty() {
            return Err(SkinError::invalid_parameter("empty skin id"));
        }
        if is_direct_url(skin_id) {
            return Ok(Source {
                name: skin_id.to_string(),
                skin_url: skin_id.to_string(),
                cape_url: None,
                model: PlayerSkinModel::Classic,
            });
        }
        self.profiles
            .get_or_try_init(skin_id.to_ascii_lowercase(), || async {
                self.provider.resolve_profile(skin_id).await.map(Source::from)
            })
            .await
    }

    async fn skin(&self, url: &str) -> SkinResult<Arc<SkinTexture>> {
        self.skins
            .get_or_try_init(url.to_string(), || async {
                self.provider.load_skin(url).await.map(Arc::new)
            })
            .await
    }

    async fn cape(&self, url: &str) -> SkinResult<Arc<CapeTexture>> {
        self.capes
            .get_or_try_init(url.to_string(), || async {
                self.provider.load_cape(url).await.map(Arc::new)
            })
            .await
    }

    /// The shared model for a skin id; repeated calls return the same `Arc`.
    pub async fn model_for(
        &self,
        skin_id: &str,
        model: Option<PlayerSkinModel>,
        flip: bool,
    ) -> SkinResult<Arc<Model>> {
        let source = self.source(skin_id).await?;
        self.model_from(&source, model, flip).await
    }

    async fn model_from(
        &self,
        source: &Source,
        model: Option<PlayerSkinModel>,
        flip: bool,
    ) -> SkinResult<Arc<Model>> {
        let key = ModelKey {
            skin_url: source.skin_url.clone(),
            cape_url: source.cape_url.clone(),
            model: model.unwrap_or(source.model),
            flip,
        };
        self.models
            .get_or_try_init(key.clone(), || async {
                let skin = self.skin(&key.skin_url).await?;
                let cape = match &key.cape_url {
                    Some(url) => Some(self.cape(url).await?),
                    None => None,
                };
                let options = ModelOptions {
                    model: key.model,
                    flip: key.flip,
                };
                let built = build_model(skin.image(), cape.as_deref(), options)
                    .ok_or_else(|| SkinError::model_build_failed(key.skin_url.clone()))?;
                debug!(skin = %key.skin_url, faces = built.face_count(), "model cached");
                Ok(Arc::new(built))
            })
            .await
    }

    /// Rasterizes on a pooled surface off the async workers.
    async fn render_on_pool(&self, model: Arc<Model>, params: PoseParams) -> SkinResult<Vec<u8>> {
        let pool = self.pool.clone();
        let wait = self.config.render_timeout();
        let job = tokio::task::spawn_blocking(move || {
            let mut renderer = pool.checkout(wait)?;
            let image = render_pose(&mut *renderer, &model, &params)?;
            drop(renderer);
            encode_png(&image)
        });
        match tokio::time::timeout(wait, job).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(SkinError::render_failed(format!("render task: {e}"))),
            Err(_) => Err(SkinError::timeout("rendering")),
        }
    }

    pub async fn render_head(&self, skin_id: &str, request: &HeadRequest) -> SkinResult<Vec<u8>> {
        let (width, height) = request.size(self.config.head_size)?;
        let started = Instant::now();
        let source = self.source(skin_id).await?;
        let skin = self.skin(&source.skin_url).await?;
        let png = encode_png(&render_head_icon(&skin, width, height, request.flip)?)?;
        info!(kind = "head", player = %source.name, width, height, elapsed = ?started.elapsed(), "rendered");
        Ok(png)
    }

    pub async fn render_body(&self, skin_id: &str, request: &BodyRequest) -> SkinResult<Vec<u8>> {
        let (width, height) = output_size(
            request.width,
            request.height,
            (self.config.body_width, self.config.body_height),
        )?;
        let (theta, phi, time) = request.view()?;
        let started = Instant::now();
        let source = self.source(skin_id).await?;
        let model = self.model_from(&source, request.model, request.flip).await?;
        let params = PoseParams {
            width,
            height,
            theta,
            phi,
            time,
        };
        let png = self.render_on_pool(model, params).await?;
        info!(kind = "body", player = %source.name, width, height, elapsed = ?started.elapsed(), "rendered");
        Ok(png)
    }

    pub async fn render_full_skin(
        &self,
        skin_id: &str,
        request: &SpriteRequest,
    ) -> SkinResult<Vec<u8>> {
        let (width, height) = output_size(
            request.width,
            request.height,
            (self.config.sprite_width, self.config.sprite_height),
        )?;
        let started = Instant::now();
        let source = self.source(skin_id).await?;
        let skin = self.skin(&source.skin_url).await?;
        let model = request.model.unwrap_or(source.model);
        let png = encode_png(&render_full_sprite(&skin, model, width, height, request.flip)?)?;
        info!(kind = "sprite", player = %source.name, width, height, elapsed = ?started.elapsed(), "rendered");
        Ok(png)
    }

    pub async fn render_cape(&self, skin_id: &str, request: &CapeRequest) -> SkinResult<Vec<u8>> {
        let (width, height) = output_size(
            request.width,
            request.height,
            (self.config.cape_width, self.config.cape_height),
        )?;
        let source = self.source(skin_id).await?;
        let url = source
            .cape_url
            .as_deref()
            .ok_or_else(|| SkinError::cape_not_available(source.name.clone()))?;
        let cape = self.cape(url).await?;
        let png = encode_png(&render_cape_flat(&cape, width, height, request.flip)?)?;
        info!(kind = "cape", player = %source.name, width, height, scale = cape.scale(), "rendered");
        Ok(png)
    }
}
