#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkinFormat {
    /// 64x32, no overlay layers, left limbs mirror the right ones.
    Legacy,
    /// 64x64, independent limbs and overlay layers.
    Modern,
}

impl SkinFormat {
    pub const WIDTH: u32 = 64;

    pub fn from_dimensions(width: u32, height: u32) -> Option<Self> {
        match (width, height) {
            (64, 32) => Some(Self::Legacy),
            (64, 64) => Some(Self::Modern),
            _ => None,
        }
    }

    pub fn height(self) -> u32 {
        match self {
            Self::Legacy => 32,
            Self::Modern => 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Head,
    Torso,
    RightArm,
    LeftArm,
    RightLeg,
    LeftLeg,
}

impl BodyPart {
    pub const ALL: [BodyPart; 6] = [
        Self::Head,
        Self::Torso,
        Self::RightArm,
        Self::LeftArm,
        Self::RightLeg,
        Self::LeftLeg,
    ];

    pub const fn index(self) -> usize {
        match self {
            Self::Head => 0,
            Self::Torso => 1,
            Self::RightArm => 2,
            Self::LeftArm => 3,
            Self::RightLeg => 4,
            Self::LeftLeg => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Torso => "torso",
            Self::RightArm => "right_arm",
            Self::LeftArm => "left_arm",
            Self::RightLeg => "right_leg",
            Self::LeftLeg => "left_leg",
        }
    }

    /// Name of the outer layer worn over this part.
    pub fn overlay_name(self) -> &'static str {
        match self {
            Self::Head => "hat",
            Self::Torso => "jacket",
            Self::RightArm => "right_sleeve",
            Self::LeftArm => "left_sleeve",
            Self::RightLeg => "right_pants",
            Self::LeftLeg => "left_pants",
        }
    }

    pub fn is_arm(self) -> bool {
        matches!(self, Self::RightArm | Self::LeftArm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Base,
    Overlay,
}

/// A block of texels. `(x, y)` is the first texel sampled; the walk covers
/// `|w|` columns stepping by `signum(w)` and `|h|` rows stepping by `signum(h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rectangle {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn columns(self) -> u32 {
        self.w.unsigned_abs()
    }

    pub const fn rows(self) -> u32 {
        self.h.unsigned_abs()
    }

    pub const fn area(self) -> usize {
        (self.columns() * self.rows()) as usize
    }

    pub const fn step_x(self) -> i32 {
        if self.w < 0 { -1 } else { 1 }
    }

    pub const fn step_y(self) -> i32 {
        if self.h < 0 { -1 } else { 1 }
    }

    /// Texture coordinate of the texel at `col`, `row` of the walk.
    #[inline]
    pub const fn texel(self, col: u32, row: u32) -> (i32, i32) {
        (
            self.x + col as i32 * self.step_x(),
            self.y + row as i32 * self.step_y(),
        )
    }

    /// Same texels, columns walked in the opposite direction.
    pub const fn mirrored_x(self) -> Self {
        Self {
            x: self.x + (self.columns() as i32 - 1) * self.step_x(),
            y: self.y,
            w: -self.w,
            h: self.h,
        }
    }

    /// Same texels, rows walked in the opposite direction.
    pub const fn mirrored_y(self) -> Self {
        Self {
            x: self.x,
            y: self.y + (self.rows() as i32 - 1) * self.step_y(),
            w: self.w,
            h: -self.h,
        }
    }

    /// The block covering the same area on a texture `factor` times larger,
    /// walked in the same directions.
    pub const fn scaled(self, factor: i32) -> Self {
        let x = if self.w < 0 {
            (self.x + 1) * factor - 1
        } else {
            self.x * factor
        };
        let y = if self.h < 0 {
            (self.y + 1) * factor - 1
        } else {
            self.y * factor
        };
        Self {
            x,
            y,
            w: self.w * factor,
            h: self.h * factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Right,
    Left,
    Top,
    Bottom,
    Front,
    Back,
}

impl Face {
    /// Declaration order of the rectangles in a [`FaceSet`].
    pub const ALL: [Face; 6] = [
        Self::Right,
        Self::Left,
        Self::Top,
        Self::Bottom,
        Self::Front,
        Self::Back,
    ];
}

/// The six rectangles coloring one box.
///
/// Each face is sampled onto a fixed grid on the box: columns run toward +X
/// (+Z for the two side faces), rows run toward -Y (+Z for top and bottom).
/// Rectangle signs adapt the texture's own orientation to that grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceSet {
    pub right: Rectangle,
    pub left: Rectangle,
    pub top: Rectangle,
    pub bottom: Rectangle,
    pub front: Rectangle,
    pub back: Rectangle,
}

impl FaceSet {
    pub const fn as_array(&self) -> [Rectangle; 6] {
        [
            self.right,
            self.left,
            self.top,
            self.bottom,
            self.front,
            self.back,
        ]
    }

    pub const fn get(&self, face: Face) -> Rectangle {
        match face {
            Face::Right => self.right,
            Face::Left => self.left,
            Face::Top => self.top,
            Face::Bottom => self.bottom,
            Face::Front => self.front,
            Face::Back => self.back,
        }
    }

    pub const fn scaled(&self, factor: i32) -> Self {
        Self {
            right: self.right.scaled(factor),
            left: self.left.scaled(factor),
            top: self.top.scaled(factor),
            bottom: self.bottom.scaled(factor),
            front: self.front.scaled(factor),
            back: self.back.scaled(factor),
        }
    }

    pub const fn texel_count(&self) -> usize {
        self.right.area()
            + self.left.area()
            + self.top.area()
            + self.bottom.area()
            + self.front.area()
            + self.back.area()
    }
}
