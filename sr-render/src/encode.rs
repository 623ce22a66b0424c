use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use sr_utils::{SkinError, SkinResult};

/// Lossless PNG bytes of `image`.
pub fn encode_png(image: &RgbaImage) -> SkinResult<Vec<u8>> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(SkinError::render_failed(format!(
            "cannot encode {width}x{height} image"
        )));
    }
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| SkinError::render_failed(format!("png encode: {e}")))?;
    Ok(out)
}
