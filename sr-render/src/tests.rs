use std::time::Duration;

use image::{Rgba, RgbaImage};
use sr_model::{CapeTexture, ModelOptions, SkinTexture, build_model};
use sr_utils::{PlayerSkinModel, SkinError};

use super::*;

const GREY: Rgba<u8> = Rgba([90, 90, 90, 255]);
const RED: Rgba<u8> = Rgba([200, 30, 30, 255]);

fn fill(image: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    for dy in 0..h {
        for dx in 0..w {
            image.put_pixel(x + dx, y + dy, color);
        }
    }
}

fn coordinate_skin(height: u32) -> SkinTexture {
    let image = RgbaImage::from_fn(64, height, |x, y| Rgba([(x * 4) as u8, (y * 4) as u8, 3, 255]));
    SkinTexture::from_image(image).unwrap()
}

#[test]
fn transparent_jacket_shows_torso_in_sprite() {
    let mut image = RgbaImage::from_pixel(64, 64, GREY);
    fill(&mut image, 20, 20, 8, 12, RED);
    // The whole jacket block.
    fill(&mut image, 16, 32, 24, 16, Rgba([0, 0, 0, 0]));
    let skin = SkinTexture::from_image(image).unwrap();

    let sprite = render_full_sprite(&skin, PlayerSkinModel::Classic, 16, 32, false).unwrap();
    for y in 8..20 {
        for x in 4..12 {
            assert_eq!(*sprite.get_pixel(x, y), RED, "({x}, {y})");
        }
    }
}

#[test]
fn translucent_hat_is_blended_over_the_face() {
    let mut image = RgbaImage::from_pixel(64, 64, GREY);
    fill(&mut image, 8, 8, 8, 8, Rgba([0, 0, 200, 255]));
    fill(&mut image, 40, 8, 8, 8, Rgba([200, 0, 0, 0]));
    image.put_pixel(40, 8, Rgba([200, 0, 0, 255]));
    let skin = SkinTexture::from_image(image).unwrap();

    let icon = render_head_icon(&skin, 8, 8, false).unwrap();
    assert_eq!(icon.get_pixel(0, 0).0, [200, 0, 0, 255]);
    assert_eq!(icon.get_pixel(1, 0).0, [0, 0, 200, 255]);
}

#[test]
fn head_icon_scales_with_nearest_neighbour() {
    let skin = coordinate_skin(64);
    let icon = render_head_icon(&skin, 64, 64, false).unwrap();
    assert_eq!(icon.dimensions(), (64, 64));
    assert_eq!(icon.get_pixel(0, 0).0, [32, 32, 3, 255]);
    assert_eq!(icon.get_pixel(7, 7).0, [32, 32, 3, 255]);
    assert_eq!(icon.get_pixel(8, 0).0, [36, 32, 3, 255]);
}

#[test]
fn flipped_head_icon_shows_the_back() {
    let skin = coordinate_skin(64);
    let icon = render_head_icon(&skin, 8, 8, true).unwrap();
    // Back of the head is the block at (24, 8), read left to right.
    assert_eq!(icon.get_pixel(0, 0).0, [96, 32, 3, 255]);
    assert_eq!(icon.get_pixel(7, 0).0, [124, 32, 3, 255]);
}

#[test]
fn legacy_sprite_mirrors_right_limbs() {
    let skin = coordinate_skin(32);
    let sprite = render_full_sprite(&skin, PlayerSkinModel::Classic, 16, 32, false).unwrap();
    for row in 0..12 {
        for col in 0..4 {
            assert_eq!(
                sprite.get_pixel(12 + col, 8 + row),
                sprite.get_pixel(3 - col, 8 + row),
                "arm ({col}, {row})"
            );
            assert_eq!(
                sprite.get_pixel(8 + col, 20 + row),
                sprite.get_pixel(4 + 3 - col, 20 + row),
                "leg ({col}, {row})"
            );
        }
    }
    // Right arm front block starts at (44, 20).
    assert_eq!(sprite.get_pixel(0, 8).0, [176, 80, 3, 255]);
}

#[test]
fn slim_sprite_leaves_outer_columns_empty() {
    let skin = coordinate_skin(64);
    let sprite = render_full_sprite(&skin, PlayerSkinModel::Slim, 16, 32, false).unwrap();
    assert_eq!(sprite.get_pixel(0, 8)[3], 0);
    assert_eq!(sprite.get_pixel(15, 8)[3], 0);
    assert_eq!(sprite.get_pixel(1, 8)[3], 255);
    assert_eq!(sprite.get_pixel(14, 8)[3], 255);
}

#[test]
fn flat_modes_reject_empty_output() {
    let skin = coordinate_skin(64);
    assert!(matches!(
        render_head_icon(&skin, 0, 8, false),
        Err(SkinError::InvalidParameter(_))
    ));
    assert!(matches!(
        render_full_sprite(&skin, PlayerSkinModel::Classic, 16, 0, false),
        Err(SkinError::InvalidParameter(_))
    ));
}

#[test]
fn cape_flat_shows_outer_face() {
    let mut image = RgbaImage::from_pixel(64, 32, GREY);
    image.put_pixel(1, 1, RED);
    let cape = CapeTexture::from_image(image).unwrap();
    let front = render_cape_flat(&cape, 10, 16, false).unwrap();
    assert_eq!(*front.get_pixel(0, 0), RED);
    assert_eq!(*front.get_pixel(1, 0), GREY);
    let scaled = render_cape_flat(&cape, 20, 32, false).unwrap();
    assert_eq!(*scaled.get_pixel(1, 1), RED);
}

#[test]
fn posed_body_is_framed_and_deterministic() {
    let image = RgbaImage::from_pixel(64, 64, GREY);
    let model = build_model(&image, None, ModelOptions::default()).unwrap();
    let params = PoseParams {
        width: 120,
        height: 200,
        theta: 0.0,
        phi: 0.0,
        time: 0.0,
    };

    let mut raster = SoftwareRasterizer::new();
    let first = render_pose(&mut raster, &model, &params).unwrap();
    let second = render_pose(&mut raster, &model, &params).unwrap();
    assert_eq!(first.dimensions(), (120, 200));
    assert_eq!(first, second);
    // Torso at the center, empty corners.
    assert_eq!(first.get_pixel(60, 100)[3], 255);
    assert_eq!(first.get_pixel(0, 0)[3], 0);
    assert_eq!(first.get_pixel(119, 199)[3], 0);

    let walking = render_pose(&mut raster, &model, &PoseParams { time: 0.4, ..params }).unwrap();
    assert_ne!(first, walking);
}

#[test]
fn posed_render_rejects_bad_params() {
    let image = RgbaImage::from_pixel(64, 64, GREY);
    let model = build_model(&image, None, ModelOptions::default()).unwrap();
    let mut raster = SoftwareRasterizer::new();
    let params = PoseParams {
        width: 0,
        height: 10,
        theta: 0.0,
        phi: 0.0,
        time: 0.0,
    };
    assert!(matches!(
        render_pose(&mut raster, &model, &params),
        Err(SkinError::InvalidParameter(_))
    ));
    let params = PoseParams {
        width: 10,
        theta: f32::NAN,
        ..params
    };
    assert!(matches!(
        render_pose(&mut raster, &model, &params),
        Err(SkinError::InvalidParameter(_))
    ));
}

#[test]
fn cape_is_visible_from_behind() {
    let image = RgbaImage::from_pixel(64, 64, GREY);
    let cape = CapeTexture::from_image(RgbaImage::from_pixel(64, 32, RED)).unwrap();
    let model = build_model(&image, Some(&cape), ModelOptions::default()).unwrap();
    let params = PoseParams {
        width: 120,
        height: 200,
        theta: 180.0,
        phi: 0.0,
        time: 0.0,
    };
    let mut raster = SoftwareRasterizer::new();
    let back = render_pose(&mut raster, &model, &params).unwrap();
    let center = back.get_pixel(60, 100);
    assert_eq!(center[3], 255);
    // Shaded red, not the grey torso.
    assert!(center[0] > center[1] + 50, "{center:?}");
}

#[test]
fn pool_hands_out_each_surface_once() {
    let pool = RendererPool::new(1, SoftwareRasterizer::new);
    assert_eq!(pool.size(), 1);
    let guard = pool.checkout(Duration::from_millis(10)).unwrap();
    assert_eq!(pool.available(), 0);
    assert!(matches!(
        pool.checkout(Duration::from_millis(20)),
        Err(SkinError::Timeout(_))
    ));
    drop(guard);
    assert_eq!(pool.available(), 1);
    let mut again = pool.checkout(Duration::from_millis(10)).unwrap();
    again.begin(4, 4);
    assert_eq!(again.finish().dimensions(), (4, 4));
}

#[test]
fn png_output_decodes() {
    let image = RgbaImage::from_pixel(3, 2, RED);
    let bytes = encode_png(&image).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded, image);
    assert!(matches!(
        encode_png(&RgbaImage::new(0, 0)),
        Err(SkinError::RenderFailed(_))
    ));
}
