use std::f32::consts::PI;

use bevy_math::{Quat, Vec3};
use image::{Rgba, RgbaImage};
use sr_utils::PlayerSkinModel;

use super::*;

fn opaque_skin(height: u32) -> RgbaImage {
    RgbaImage::from_pixel(64, height, Rgba([120, 90, 60, 255]))
}

/// Every texel gets a color derived from its own coordinates.
fn coordinate_skin(height: u32) -> RgbaImage {
    RgbaImage::from_fn(64, height, |x, y| Rgba([(x * 4) as u8, (y * 4) as u8, 7, 255]))
}

fn head_box() -> BoxGeometry {
    BoxGeometry::from_texels([8, 8, 8])
}

fn head_faces() -> FaceSet {
    rectangles(SkinFormat::Modern, PlayerSkinModel::Classic, BodyPart::Head, Layer::Base)
        .unwrap()
}

fn face_at(mesh: &Mesh, face: Face, cell: [u16; 2]) -> &TexelFace {
    mesh.faces
        .iter()
        .find(|f| f.face == face && f.cell == cell)
        .unwrap()
}

#[test]
fn modern_layout_origins() {
    let torso = rectangles(SkinFormat::Modern, PlayerSkinModel::Classic, BodyPart::Torso, Layer::Base)
        .unwrap();
    assert_eq!(torso.front, Rectangle::new(20, 20, 8, 12));
    let jacket = rectangles(
        SkinFormat::Modern,
        PlayerSkinModel::Classic,
        BodyPart::Torso,
        Layer::Overlay,
    )
    .unwrap();
    assert_eq!(jacket.front, Rectangle::new(20, 36, 8, 12));
    let left_arm = rectangles(SkinFormat::Modern, PlayerSkinModel::Classic, BodyPart::LeftArm, Layer::Base)
        .unwrap();
    assert_eq!(left_arm.front, Rectangle::new(36, 52, 4, 12));
    let slim_arm = rectangles(SkinFormat::Modern, PlayerSkinModel::Slim, BodyPart::RightArm, Layer::Base)
        .unwrap();
    assert_eq!(slim_arm.front, Rectangle::new(44, 20, 3, 12));
    assert_eq!(slim_arm.back, Rectangle::new(53, 20, -3, 12));
}

#[test]
fn legacy_has_no_overlay_rectangles() {
    for part in BodyPart::ALL {
        for model in [PlayerSkinModel::Classic, PlayerSkinModel::Slim] {
            assert!(rectangles(SkinFormat::Legacy, model, part, Layer::Overlay).is_none());
            assert!(rectangles(SkinFormat::Legacy, model, part, Layer::Base).is_some());
        }
    }
}

#[test]
fn arm_dimensions_follow_model() {
    assert_eq!(part_dimensions(BodyPart::RightArm, PlayerSkinModel::Classic), [4, 12, 4]);
    assert_eq!(part_dimensions(BodyPart::LeftArm, PlayerSkinModel::Slim), [3, 12, 4]);
    assert_eq!(part_dimensions(BodyPart::Head, PlayerSkinModel::Slim), [8, 8, 8]);
}

#[test]
fn scaled_negative_rectangle_starts_at_far_texel() {
    let rect = Rectangle::new(47, 20, -4, 12).scaled(2);
    assert_eq!(rect, Rectangle::new(95, 40, -8, 24));
    assert_eq!(rect.texel(7, 0), (88, 40));
    let mirrored = Rectangle::new(44, 20, 4, 12).mirrored_x();
    assert_eq!(mirrored, Rectangle::new(47, 20, -4, 12));
    assert_eq!(mirrored.mirrored_x(), Rectangle::new(44, 20, 4, 12));
}

#[test]
fn opaque_head_covers_every_texel() {
    let mesh = color_faces(&head_box(), &opaque_skin(64), &head_faces()).unwrap();
    assert_eq!(mesh.face_count(), 6 * 64);
    assert_eq!(mesh.materials, vec![Material { alpha: 255 }]);
    assert!(!mesh.double_sided);
}

#[test]
fn transparent_texel_leaves_hole() {
    let mut image = opaque_skin(64);
    // First texel of the head front.
    image.put_pixel(8, 8, Rgba([0, 0, 0, 0]));
    let mesh = color_faces(&head_box(), &image, &head_faces()).unwrap();
    assert_eq!(mesh.face_count(), 6 * 64 - 1);
    assert!(
        !mesh
            .faces
            .iter()
            .any(|f| f.face == Face::Front && f.cell == [0, 0])
    );
    assert!(!mesh.double_sided);
}

#[test]
fn translucent_texel_makes_mesh_double_sided() {
    let mut image = opaque_skin(64);
    image.put_pixel(8, 8, Rgba([200, 10, 10, 128]));
    let mesh = color_faces(&head_box(), &image, &head_faces()).unwrap();
    assert!(mesh.double_sided);
    assert_eq!(mesh.materials, vec![Material { alpha: 255 }, Material { alpha: 128 }]);
    let face = face_at(&mesh, Face::Front, [0, 0]);
    assert_eq!(face.color, [200, 10, 10]);
    assert_eq!(mesh.material(face), Material { alpha: 128 });
}

#[test]
fn empty_sampling_yields_nothing() {
    let clear = RgbaImage::new(64, 64);
    assert!(color_faces(&head_box(), &clear, &head_faces()).is_none());

    let outside = box_faces(80, 80, 8, 8, 8);
    assert!(color_faces(&head_box(), &opaque_skin(64), &outside).is_none());
}

#[test]
fn front_cell_corners_sit_on_the_box() {
    let mesh = color_faces(&head_box(), &opaque_skin(64), &head_faces()).unwrap();
    let face = face_at(&mesh, Face::Front, [0, 0]);
    assert_eq!(face.corners[0], Vec3::new(-4.0, 4.0, 4.0));
    assert_eq!(face.corners[2], Vec3::new(-3.0, 3.0, 4.0));
    assert_eq!(face.normal, Vec3::Z);
    let top = face_at(&mesh, Face::Top, [7, 7]);
    assert_eq!(top.center(), Vec3::new(3.5, 4.0, 3.5));
}

#[test]
fn arm_widths_follow_model() {
    let image = opaque_skin(64);
    let classic = build_model(&image, None, ModelOptions::default()).unwrap();
    let slim = build_model(
        &image,
        None,
        ModelOptions {
            model: PlayerSkinModel::Slim,
            flip: false,
        },
    )
    .unwrap();

    let classic_arm = classic.part(BodyPart::RightArm).unwrap();
    let slim_arm = slim.part(BodyPart::RightArm).unwrap();
    assert_eq!(classic_arm.base.geometry.size.x, 4.0);
    assert_eq!(slim_arm.base.geometry.size.x, 3.0);
    assert_eq!(classic_arm.base.face_count(), 2 * (4 * 12 + 12 * 4 + 4 * 4));
    assert_eq!(slim_arm.base.face_count(), 2 * (3 * 12 + 12 * 4 + 3 * 4));
    assert_eq!(slim_arm.pivot, Vec3::new(-5.5, 6.0, 0.0));
    assert_eq!(classic.part(BodyPart::LeftArm).unwrap().pivot, Vec3::new(6.0, 6.0, 0.0));
}

#[test]
fn fully_opaque_overlays_are_skipped() {
    let model = build_model(&opaque_skin(64), None, ModelOptions::default()).unwrap();
    assert_eq!(model.parts.len(), 6);
    assert!(model.parts.iter().all(|group| group.overlay.is_none()));
    assert!(model.cape.is_none());
}

#[test]
fn hat_overlay_is_inflated_and_keeps_holes() {
    let mut image = opaque_skin(64);
    image.put_pixel(40, 8, Rgba([0, 0, 0, 0]));
    let model = build_model(&image, None, ModelOptions::default()).unwrap();

    let head = model.part(BodyPart::Head).unwrap();
    let hat = head.overlay.as_ref().unwrap();
    assert_eq!(hat.geometry.size, Vec3::splat(8.0 + HAT_INFLATE));
    assert_eq!(hat.face_count(), 6 * 64 - 1);
    assert_eq!(head.base.face_count(), 6 * 64);
    for part in [BodyPart::Torso, BodyPart::RightArm, BodyPart::LeftLeg] {
        assert!(model.part(part).unwrap().overlay.is_none());
    }
}

#[test]
fn base_layer_ignores_texture_alpha() {
    let mut image = opaque_skin(64);
    image.put_pixel(8, 8, Rgba([5, 6, 7, 0]));
    let model = build_model(&image, None, ModelOptions::default()).unwrap();
    let head = &model.part(BodyPart::Head).unwrap().base;
    assert_eq!(head.face_count(), 6 * 64);
    assert_eq!(face_at(head, Face::Front, [0, 0]).color, [5, 6, 7]);
    assert!(!head.double_sided);
}

#[test]
fn legacy_left_limbs_mirror_right_limbs() {
    let model = build_model(&coordinate_skin(32), None, ModelOptions::default()).unwrap();
    assert_eq!(model.format, SkinFormat::Legacy);
    assert!(model.parts.iter().all(|group| group.overlay.is_none()));

    for (right, left) in [
        (BodyPart::RightArm, BodyPart::LeftArm),
        (BodyPart::RightLeg, BodyPart::LeftLeg),
    ] {
        let right = &model.part(right).unwrap().base;
        let left = &model.part(left).unwrap().base;
        assert_eq!(right.face_count(), left.face_count());
        for row in 0..12u16 {
            for col in 0..4u16 {
                assert_eq!(
                    face_at(left, Face::Front, [col, row]).color,
                    face_at(right, Face::Front, [3 - col, row]).color
                );
            }
        }
        // The inner side of the left limb reuses the right limb's inner side.
        assert_eq!(
            face_at(left, Face::Right, [0, 0]).color,
            face_at(right, Face::Left, [0, 0]).color
        );
    }
}

#[test]
fn flip_turns_the_root() {
    let flipped = build_model(
        &opaque_skin(64),
        None,
        ModelOptions {
            model: PlayerSkinModel::Classic,
            flip: true,
        },
    )
    .unwrap();
    assert!(flipped.flipped);
    assert!(flipped.root_rotation().abs_diff_eq(Quat::from_rotation_y(PI), 1e-6));

    let upright = build_model(&opaque_skin(64), None, ModelOptions::default()).unwrap();
    assert_eq!(upright.root_rotation(), Quat::IDENTITY);
    assert_eq!(upright.face_count(), flipped.face_count());
}

#[test]
fn cape_keeps_world_size_at_any_scale() {
    let small = CapeTexture::from_image(RgbaImage::from_pixel(64, 32, Rgba([1, 2, 3, 255]))).unwrap();
    let large =
        CapeTexture::from_image(RgbaImage::from_pixel(128, 64, Rgba([1, 2, 3, 255]))).unwrap();
    assert_eq!(large.scale(), 2);

    let image = opaque_skin(64);
    let with_small = build_model(&image, Some(&small), ModelOptions::default()).unwrap();
    let with_large = build_model(&image, Some(&large), ModelOptions::default()).unwrap();
    let small_cape = with_small.cape.as_ref().unwrap();
    let large_cape = with_large.cape.as_ref().unwrap();

    let one_scale = 2 * (10 * 16 + 16 + 10);
    assert_eq!(small_cape.mesh.face_count(), one_scale);
    assert_eq!(large_cape.mesh.face_count(), 4 * one_scale);
    assert_eq!(small_cape.mesh.geometry.size, Vec3::new(10.0, 16.0, 1.0));
    assert_eq!(large_cape.mesh.geometry.size, Vec3::new(10.0, 16.0, 1.0));
    assert_eq!(small_cape.pivot, Vec3::new(0.0, 8.0, -2.0));
}

#[test]
fn transparent_cape_is_dropped() {
    let cape = CapeTexture::from_image(RgbaImage::new(64, 32)).unwrap();
    let model = build_model(&opaque_skin(64), Some(&cape), ModelOptions::default()).unwrap();
    assert!(model.cape.is_none());
}

#[test]
fn invalid_skin_size_builds_nothing() {
    assert!(build_model(&RgbaImage::new(32, 32), None, ModelOptions::default()).is_none());
    assert!(build_model(&RgbaImage::new(64, 48), None, ModelOptions::default()).is_none());
}

#[test]
fn oversized_face_set_on_small_image_is_sampled_safely() {
    let image = RgbaImage::from_pixel(22, 17, Rgba([1, 2, 3, 255]));
    let faces = CAPE_FACES.scaled(200);
    assert!(faces.texel_count() > 10_000_000);
    let geometry = BoxGeometry::from_texels(CAPE_SIZE);
    assert!(color_faces(&geometry, &image, &faces).is_none());

    let mesh = color_faces(&geometry, &image, &CAPE_FACES).unwrap();
    assert_eq!(mesh.face_count(), 2 * (10 * 16 + 16 + 10));
}
