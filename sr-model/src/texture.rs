use image::{ImageFormat, RgbaImage};
use sr_utils::{PlayerSkinModel, SkinError, SkinResult};

use super::{BodyPart, CAPE_FOOTPRINT, FaceSet, Layer, SkinFormat, cape_scale, rectangles};

#[derive(Debug, Clone)]
pub struct SkinTexture {
    image: RgbaImage,
    format: SkinFormat,
    has_overlay: bool,
}

impl SkinTexture {
    pub fn from_image(image: RgbaImage) -> SkinResult<Self> {
        let (width, height) = image.dimensions();
        let format = SkinFormat::from_dimensions(width, height)
            .ok_or(SkinError::InvalidTextureDimensions { width, height })?;
        // The classic sleeve rectangles cover the slim ones.
        let has_overlay = BodyPart::ALL
            .iter()
            .any(|&part| detect_part_overlay(&image, format, PlayerSkinModel::Classic, part));
        Ok(Self {
            image,
            format,
            has_overlay,
        })
    }

    pub fn from_png_bytes(bytes: &[u8]) -> SkinResult<Self> {
        Self::from_image(decode_png(bytes)?)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn format(&self) -> SkinFormat {
        self.format
    }

    pub fn has_overlay(&self) -> bool {
        self.has_overlay
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Copy of the pixels with every alpha forced to 255.
    pub fn opaque(&self) -> RgbaImage {
        opaque_copy(&self.image)
    }
}

pub fn opaque_copy(image: &RgbaImage) -> RgbaImage {
    let mut out = image.clone();
    for px in out.pixels_mut() {
        px.0[3] = u8::MAX;
    }
    out
}

#[derive(Debug, Clone)]
pub struct CapeTexture {
    image: RgbaImage,
    scale: u32,
}

impl CapeTexture {
    /// Rejects empty images and those too small for the cape block at
    /// the scale their height implies.
    pub fn from_image(image: RgbaImage) -> SkinResult<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(SkinError::InvalidTextureDimensions { width, height });
        }
        let scale = cape_scale(height);
        let [block_w, block_h] = CAPE_FOOTPRINT.map(|n| u64::from(n) * u64::from(scale));
        if block_w > u64::from(width) || block_h > u64::from(height) {
            return Err(SkinError::InvalidTextureDimensions { width, height });
        }
        Ok(Self { image, scale })
    }

    pub fn from_png_bytes(bytes: &[u8]) -> SkinResult<Self> {
        Self::from_image(decode_png(bytes)?)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Texels per logical cape unit, always at least 1.
    pub fn scale(&self) -> u32 {
        self.scale
    }
}

fn decode_png(bytes: &[u8]) -> SkinResult<RgbaImage> {
    image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map(|decoded| decoded.to_rgba8())
        .map_err(|e| SkinError::fetch_failed(format!("texture is not a readable PNG: {e}")))
}

/// Whether the skin carries any outer layer worth drawing.
pub fn detect_overlay(texture: &SkinTexture) -> bool {
    texture.has_overlay
}

/// True when any texel of the part's overlay rectangles is not fully opaque.
/// A fully opaque overlay block is filler, not a real outer layer.
pub fn detect_part_overlay(
    image: &RgbaImage,
    format: SkinFormat,
    model: PlayerSkinModel,
    part: BodyPart,
) -> bool {
    if format == SkinFormat::Legacy {
        return false;
    }
    rectangles(format, model, part, Layer::Overlay)
        .is_some_and(|faces| has_transparency(image, &faces))
}

fn has_transparency(image: &RgbaImage, faces: &FaceSet) -> bool {
    let (width, height) = image.dimensions();
    faces.as_array().iter().any(|rect| {
        (0..rect.rows()).any(|row| {
            (0..rect.columns()).any(|col| {
                let (x, y) = rect.texel(col, row);
                if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                    return false;
                }
                image.get_pixel(x as u32, y as u32).0[3] < u8::MAX
            })
        })
    })
}
