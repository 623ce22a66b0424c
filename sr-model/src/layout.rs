use sr_utils::PlayerSkinModel;

use super::{BodyPart, FaceSet, Layer, Rectangle, SkinFormat};
use crate::part_layout;

/// Outer layers sit this far outside the part, per dimension.
pub const OVERLAY_EPSILON: f32 = 0.5;
/// The hat is layered one step further out than the other overlays.
pub const HAT_INFLATE: f32 = OVERLAY_EPSILON * 2.0;

/// Cape box in cape texels at scale 1.
pub const CAPE_SIZE: [u32; 3] = [10, 16, 1];
pub const CAPE_FACES: FaceSet = box_faces(0, 0, 10, 16, 1);
/// Width and height of the unwrapped cape block at scale 1.
pub const CAPE_FOOTPRINT: [u32; 2] = [
    2 * (CAPE_SIZE[0] + CAPE_SIZE[2]),
    CAPE_SIZE[1] + CAPE_SIZE[2],
];

/// Faces of a `w`x`h`x`d` box whose texture block starts at (`u`, `v`),
/// using the vanilla box unwrap:
///
/// ```text
///         d     w     w
///      +-----+-----+-----+
///    d |     | top | bot |
///      +-----+-----+-----+-----+
///    h |right|front|left |back |
///      +-----+-----+-----+-----+
///         d     w     d     w
/// ```
pub const fn box_faces(u: i32, v: i32, w: i32, h: i32, d: i32) -> FaceSet {
    FaceSet {
        right: Rectangle::new(u, v + d, d, h),
        left: Rectangle::new(u + d + w + d - 1, v + d, -d, h),
        top: Rectangle::new(u + d, v, w, d),
        bottom: Rectangle::new(u + d + w, v + d - 1, w, -d),
        front: Rectangle::new(u + d, v + d, w, h),
        back: Rectangle::new(u + d + w + d + w - 1, v + d, -w, h),
    }
}

/// The same block reflected across X, as legacy skins reuse right-limb
/// pixels for the left limbs.
pub const fn mirrored_box_faces(u: i32, v: i32, w: i32, h: i32, d: i32) -> FaceSet {
    let faces = box_faces(u, v, w, h, d);
    FaceSet {
        right: faces.left,
        left: faces.right,
        top: faces.top.mirrored_x(),
        bottom: faces.bottom.mirrored_x(),
        front: faces.front.mirrored_x(),
        back: faces.back.mirrored_x(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartLayout {
    pub part: BodyPart,
    /// Box dimensions (w, h, d) in texels.
    pub size: [u32; 3],
    pub base: FaceSet,
    pub overlay: Option<FaceSet>,
    pub overlay_inflate: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinLayout {
    pub format: SkinFormat,
    pub model: PlayerSkinModel,
    /// Indexed by [`BodyPart::index`].
    pub parts: [PartLayout; 6],
}

impl SkinLayout {
    pub fn part(&self, part: BodyPart) -> &PartLayout {
        &self.parts[part.index()]
    }
}

const MODERN_HEAD: PartLayout = part_layout! {
    part: BodyPart::Head,
    size: (8, 8, 8),
    base: box_faces(0, 0, 8, 8, 8),
    overlay: Some(box_faces(32, 0, 8, 8, 8)),
    inflate: HAT_INFLATE,
};

const MODERN_TORSO: PartLayout = part_layout! {
    part: BodyPart::Torso,
    size: (8, 12, 4),
    base: box_faces(16, 16, 8, 12, 4),
    overlay: Some(box_faces(16, 32, 8, 12, 4)),
    inflate: OVERLAY_EPSILON,
};

const MODERN_RIGHT_LEG: PartLayout = part_layout! {
    part: BodyPart::RightLeg,
    size: (4, 12, 4),
    base: box_faces(0, 16, 4, 12, 4),
    overlay: Some(box_faces(0, 32, 4, 12, 4)),
    inflate: OVERLAY_EPSILON,
};

const MODERN_LEFT_LEG: PartLayout = part_layout! {
    part: BodyPart::LeftLeg,
    size: (4, 12, 4),
    base: box_faces(16, 48, 4, 12, 4),
    overlay: Some(box_faces(0, 48, 4, 12, 4)),
    inflate: OVERLAY_EPSILON,
};

const fn modern_arms(w: i32) -> [PartLayout; 2] {
    [
        part_layout! {
            part: BodyPart::RightArm,
            size: (w, 12, 4),
            base: box_faces(40, 16, w, 12, 4),
            overlay: Some(box_faces(40, 32, w, 12, 4)),
            inflate: OVERLAY_EPSILON,
        },
        part_layout! {
            part: BodyPart::LeftArm,
            size: (w, 12, 4),
            base: box_faces(32, 48, w, 12, 4),
            overlay: Some(box_faces(48, 48, w, 12, 4)),
            inflate: OVERLAY_EPSILON,
        },
    ]
}

const LEGACY_HEAD: PartLayout = part_layout! {
    part: BodyPart::Head,
    size: (8, 8, 8),
    base: box_faces(0, 0, 8, 8, 8),
    overlay: None,
    inflate: 0.0,
};

const LEGACY_TORSO: PartLayout = part_layout! {
    part: BodyPart::Torso,
    size: (8, 12, 4),
    base: box_faces(16, 16, 8, 12, 4),
    overlay: None,
    inflate: 0.0,
};

const LEGACY_RIGHT_LEG: PartLayout = part_layout! {
    part: BodyPart::RightLeg,
    size: (4, 12, 4),
    base: box_faces(0, 16, 4, 12, 4),
    overlay: None,
    inflate: 0.0,
};

// Left leg (mirrored right leg)
const LEGACY_LEFT_LEG: PartLayout = part_layout! {
    part: BodyPart::LeftLeg,
    size: (4, 12, 4),
    base: mirrored_box_faces(0, 16, 4, 12, 4),
    overlay: None,
    inflate: 0.0,
};

const fn legacy_arms(w: i32) -> [PartLayout; 2] {
    [
        part_layout! {
            part: BodyPart::RightArm,
            size: (w, 12, 4),
            base: box_faces(40, 16, w, 12, 4),
            overlay: None,
            inflate: 0.0,
        },
        // Left arm (mirrored right arm)
        part_layout! {
            part: BodyPart::LeftArm,
            size: (w, 12, 4),
            base: mirrored_box_faces(40, 16, w, 12, 4),
            overlay: None,
            inflate: 0.0,
        },
    ]
}

const fn skin_table(
    format: SkinFormat,
    model: PlayerSkinModel,
    head: PartLayout,
    torso: PartLayout,
    arms: [PartLayout; 2],
    legs: [PartLayout; 2],
) -> SkinLayout {
    SkinLayout {
        format,
        model,
        parts: [head, torso, arms[0], arms[1], legs[0], legs[1]],
    }
}

pub static MODERN_CLASSIC: SkinLayout = skin_table(
    SkinFormat::Modern,
    PlayerSkinModel::Classic,
    MODERN_HEAD,
    MODERN_TORSO,
    modern_arms(4),
    [MODERN_RIGHT_LEG, MODERN_LEFT_LEG],
);

pub static MODERN_SLIM: SkinLayout = skin_table(
    SkinFormat::Modern,
    PlayerSkinModel::Slim,
    MODERN_HEAD,
    MODERN_TORSO,
    modern_arms(3),
    [MODERN_RIGHT_LEG, MODERN_LEFT_LEG],
);

pub static LEGACY_CLASSIC: SkinLayout = skin_table(
    SkinFormat::Legacy,
    PlayerSkinModel::Classic,
    LEGACY_HEAD,
    LEGACY_TORSO,
    legacy_arms(4),
    [LEGACY_RIGHT_LEG, LEGACY_LEFT_LEG],
);

pub static LEGACY_SLIM: SkinLayout = skin_table(
    SkinFormat::Legacy,
    PlayerSkinModel::Slim,
    LEGACY_HEAD,
    LEGACY_TORSO,
    legacy_arms(3),
    [LEGACY_RIGHT_LEG, LEGACY_LEFT_LEG],
);

pub fn skin_layout(format: SkinFormat, model: PlayerSkinModel) -> &'static SkinLayout {
    match (format, model) {
        (SkinFormat::Modern, PlayerSkinModel::Classic) => &MODERN_CLASSIC,
        (SkinFormat::Modern, PlayerSkinModel::Slim) => &MODERN_SLIM,
        (SkinFormat::Legacy, PlayerSkinModel::Classic) => &LEGACY_CLASSIC,
        (SkinFormat::Legacy, PlayerSkinModel::Slim) => &LEGACY_SLIM,
    }
}

/// Rectangles coloring `part` on `layer`; `None` for layers the format lacks.
pub fn rectangles(
    format: SkinFormat,
    model: PlayerSkinModel,
    part: BodyPart,
    layer: Layer,
) -> Option<FaceSet> {
    let layout = skin_layout(format, model).part(part);
    match layer {
        Layer::Base => Some(layout.base),
        Layer::Overlay => layout.overlay,
    }
}

/// Box dimensions (w, h, d) of a part in texels.
pub fn part_dimensions(part: BodyPart, model: PlayerSkinModel) -> [u32; 3] {
    skin_layout(SkinFormat::Modern, model).part(part).size
}
