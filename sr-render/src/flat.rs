use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use sr_model::{
    BodyPart, CAPE_FACES, CAPE_SIZE, CapeTexture, FaceSet, Layer, Rectangle, SkinTexture,
    detect_part_overlay, rectangles,
};
use sr_utils::{PlayerSkinModel, SkinError, SkinResult};

use crate::raster::source_over;

/// Unscaled size of the full sprite canvas.
pub const SPRITE_SIZE: (u32, u32) = (16, 32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Blit {
    /// Copy with alpha forced to 255.
    Opaque,
    /// Source-over blend.
    Over,
}

fn blit(canvas: &mut RgbaImage, src: &RgbaImage, rect: Rectangle, dx: u32, dy: u32, mode: Blit) {
    let (sw, sh) = src.dimensions();
    let (cw, ch) = canvas.dimensions();
    for row in 0..rect.rows() {
        for col in 0..rect.columns() {
            let (x, y) = rect.texel(col, row);
            let (tx, ty) = (dx + col, dy + row);
            if x < 0 || y < 0 || x as u32 >= sw || y as u32 >= sh || tx >= cw || ty >= ch {
                continue;
            }
            let texel = *src.get_pixel(x as u32, y as u32);
            match mode {
                Blit::Opaque => {
                    let [r, g, b, _] = texel.0;
                    canvas.put_pixel(tx, ty, Rgba([r, g, b, u8::MAX]));
                }
                Blit::Over => {
                    let dst = canvas.get_pixel_mut(tx, ty);
                    *dst = source_over(*dst, texel);
                }
            }
        }
    }
}

fn check_size(width: u32, height: u32) -> SkinResult<()> {
    if width == 0 || height == 0 {
        return Err(SkinError::invalid_parameter(format!(
            "output size {width}x{height}"
        )));
    }
    Ok(())
}

/// The rectangle a flat view shows for `part`: the front face, or the back
/// face read left to right when seen from behind.
fn visible_face(faces: &FaceSet, back: bool) -> Rectangle {
    if back {
        faces.back.mirrored_x()
    } else {
        faces.front
    }
}

fn draw_part(
    canvas: &mut RgbaImage,
    skin: &SkinTexture,
    model: PlayerSkinModel,
    part: BodyPart,
    (dx, dy): (u32, u32),
    back: bool,
) -> SkinResult<()> {
    let format = skin.format();
    let base = rectangles(format, model, part, Layer::Base).ok_or_else(|| {
        SkinError::render_failed(format!("no base layer for {}", part.name()))
    })?;
    blit(canvas, skin.image(), visible_face(&base, back), dx, dy, Blit::Opaque);

    if detect_part_overlay(skin.image(), format, model, part) {
        if let Some(overlay) = rectangles(format, model, part, Layer::Overlay) {
            blit(canvas, skin.image(), visible_face(&overlay, back), dx, dy, Blit::Over);
        }
    }
    Ok(())
}

fn scale_to(canvas: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if canvas.dimensions() == (width, height) {
        return canvas.clone();
    }
    imageops::resize(canvas, width, height, FilterType::Nearest)
}

/// Face of the head with the hat over it, scaled to `width`x`height`.
pub fn render_head_icon(
    skin: &SkinTexture,
    width: u32,
    height: u32,
    flip: bool,
) -> SkinResult<RgbaImage> {
    check_size(width, height)?;
    let mut canvas = RgbaImage::new(8, 8);
    draw_part(&mut canvas, skin, PlayerSkinModel::Classic, BodyPart::Head, (0, 0), flip)?;
    Ok(scale_to(&canvas, width, height))
}

/// Canvas position of each part on the 16x32 sprite.
fn sprite_slot(part: BodyPart, model: PlayerSkinModel, back: bool) -> (u32, u32) {
    let near_arm_x = 4 - model.arm_width();
    // Seen from behind, the player's left side is on the viewer's left.
    let (viewer_left_arm, viewer_left_leg) = if back {
        (BodyPart::LeftArm, BodyPart::LeftLeg)
    } else {
        (BodyPart::RightArm, BodyPart::RightLeg)
    };
    match part {
        BodyPart::Head => (4, 0),
        BodyPart::Torso => (4, 8),
        arm if arm.is_arm() => {
            if arm == viewer_left_arm {
                (near_arm_x, 8)
            } else {
                (12, 8)
            }
        }
        leg => {
            if leg == viewer_left_leg {
                (4, 20)
            } else {
                (8, 20)
            }
        }
    }
}

/// Unfolded front (or back) view of the whole player.
pub fn render_full_sprite(
    skin: &SkinTexture,
    model: PlayerSkinModel,
    width: u32,
    height: u32,
    flip: bool,
) -> SkinResult<RgbaImage> {
    check_size(width, height)?;
    let (cw, ch) = SPRITE_SIZE;
    let mut canvas = RgbaImage::new(cw, ch);
    for part in BodyPart::ALL {
        let slot = sprite_slot(part, model, flip);
        draw_part(&mut canvas, skin, model, part, slot, flip)?;
    }
    Ok(scale_to(&canvas, width, height))
}

/// The outer face of the cape, or its inner face when `flip` is set.
pub fn render_cape_flat(
    cape: &CapeTexture,
    width: u32,
    height: u32,
    flip: bool,
) -> SkinResult<RgbaImage> {
    check_size(width, height)?;
    let scale = cape.scale().max(1);
    let faces = CAPE_FACES.scaled(scale as i32);
    let [w, h, _] = CAPE_SIZE;
    let mut canvas = RgbaImage::new(w * scale, h * scale);
    blit(&mut canvas, cape.image(), visible_face(&faces, flip), 0, 0, Blit::Over);
    Ok(scale_to(&canvas, width, height))
}
