use std::f32::consts::PI;

use bevy_math::{Quat, Vec3};
use image::RgbaImage;
use sr_utils::PlayerSkinModel;
use tracing::debug;

use super::{
    BodyPart, BoxGeometry, CAPE_FACES, CAPE_SIZE, CapeTexture, Mesh, SkinFormat,
    color_faces, detect_part_overlay, opaque_copy, skin_layout,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModelOptions {
    pub model: PlayerSkinModel,
    /// Turn the whole model 180 degrees about Y.
    pub flip: bool,
}

/// One body part. The meshes are centered on `pivot + offset`; limb swing
/// rotates about `pivot`.
#[derive(Debug, Clone, PartialEq)]
pub struct PartGroup {
    pub part: BodyPart,
    pub pivot: Vec3,
    pub offset: Vec3,
    pub base: Mesh,
    pub overlay: Option<Mesh>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapeGroup {
    pub pivot: Vec3,
    /// Rest orientation; sway is applied on top of it.
    pub rotation: Quat,
    pub offset: Vec3,
    pub mesh: Mesh,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub format: SkinFormat,
    pub model: PlayerSkinModel,
    pub flipped: bool,
    pub parts: Vec<PartGroup>,
    pub cape: Option<CapeGroup>,
}

impl Model {
    pub fn part(&self, part: BodyPart) -> Option<&PartGroup> {
        self.parts.iter().find(|group| group.part == part)
    }

    pub fn root_rotation(&self) -> Quat {
        if self.flipped {
            Quat::from_rotation_y(PI)
        } else {
            Quat::IDENTITY
        }
    }

    pub fn face_count(&self) -> usize {
        let parts: usize = self
            .parts
            .iter()
            .map(|group| {
                group.base.face_count() + group.overlay.as_ref().map_or(0, Mesh::face_count)
            })
            .sum();
        parts + self.cape.as_ref().map_or(0, |cape| cape.mesh.face_count())
    }

    pub fn is_empty(&self) -> bool {
        self.face_count() == 0
    }
}

fn placement(part: BodyPart, model: PlayerSkinModel) -> (Vec3, Vec3) {
    let arm_x = if model.is_slim() { 5.5 } else { 6.0 };
    match part {
        BodyPart::Head => (Vec3::new(0.0, 12.0, 0.0), Vec3::ZERO),
        BodyPart::Torso => (Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO),
        BodyPart::RightArm => (Vec3::new(-arm_x, 6.0, 0.0), Vec3::new(0.0, -4.0, 0.0)),
        BodyPart::LeftArm => (Vec3::new(arm_x, 6.0, 0.0), Vec3::new(0.0, -4.0, 0.0)),
        BodyPart::RightLeg => (Vec3::new(-2.0, -4.0, 0.0), Vec3::new(0.0, -6.0, 0.0)),
        BodyPart::LeftLeg => (Vec3::new(2.0, -4.0, 0.0), Vec3::new(0.0, -6.0, 0.0)),
    }
}

/// Builds the colored player model for a skin image and optional cape.
///
/// Returns `None` when `image` is not a 64x32 or 64x64 skin.
pub fn build_model(
    image: &RgbaImage,
    cape: Option<&CapeTexture>,
    options: ModelOptions,
) -> Option<Model> {
    let format = SkinFormat::from_dimensions(image.width(), image.height())?;
    let layout = skin_layout(format, options.model);
    let opaque = opaque_copy(image);

    let mut parts = Vec::with_capacity(BodyPart::ALL.len());
    for part in BodyPart::ALL {
        let part_layout = layout.part(part);
        let geometry = BoxGeometry::from_texels(part_layout.size);
        let base = color_faces(&geometry, &opaque, &part_layout.base)?;

        let overlay = match part_layout.overlay {
            Some(faces) if detect_part_overlay(image, format, options.model, part) => {
                color_faces(&geometry.inflated(part_layout.overlay_inflate), image, &faces)
            }
            _ => None,
        };
        debug!(
            part = part.name(),
            base_faces = base.face_count(),
            overlay_faces = overlay.as_ref().map_or(0, Mesh::face_count),
            "colored part"
        );

        let (pivot, offset) = placement(part, options.model);
        parts.push(PartGroup {
            part,
            pivot,
            offset,
            base,
            overlay,
        });
    }

    let cape = cape.and_then(build_cape);
    let model = Model {
        format,
        model: options.model,
        flipped: options.flip,
        parts,
        cape,
    };
    debug!(
        ?format,
        model = %options.model,
        flip = options.flip,
        faces = model.face_count(),
        "built player model"
    );
    Some(model)
}

fn build_cape(cape: &CapeTexture) -> Option<CapeGroup> {
    let scale = cape.scale().max(1);
    let [w, h, d] = CAPE_SIZE;
    let geometry = BoxGeometry::from_texels([w, h, d]);
    let mesh = color_faces(&geometry, cape.image(), &CAPE_FACES.scaled(scale as i32))?;
    Some(CapeGroup {
        pivot: Vec3::new(0.0, 8.0, -2.0),
        rotation: Quat::from_rotation_y(PI),
        offset: Vec3::new(0.0, -8.0, 0.5),
        mesh,
    })
}
