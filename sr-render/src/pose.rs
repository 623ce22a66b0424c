use sr_model::BodyPart;

pub const ARM_SWING_DEG: f32 = 18.0;
pub const LEG_SWING_DEG: f32 = 20.0;
pub const CAPE_REST_DEG: f32 = 10.0;
pub const CAPE_SWAY_DEG: f32 = 5.0;
/// Radians of walk cycle per unit of time.
pub const WALK_SPEED: f32 = 4.0;
pub const CAPE_SPEED: f32 = 2.5;

/// Joint angles in radians, rotations about the X axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub right_arm: f32,
    pub left_arm: f32,
    pub right_leg: f32,
    pub left_leg: f32,
    /// Backward lift of the cape from hanging straight down.
    pub cape: f32,
}

impl Pose {
    /// Everything straight, cape hanging flat.
    pub fn rest() -> Self {
        Self::default()
    }

    /// Walk cycle sampled at `time`; exactly zero gives [`Pose::rest`].
    pub fn at(time: f32) -> Self {
        if time == 0.0 {
            return Self::rest();
        }
        let swing = (time * WALK_SPEED).sin();
        let arm = ARM_SWING_DEG.to_radians() * swing;
        let leg = LEG_SWING_DEG.to_radians() * swing;
        let sway = CAPE_REST_DEG + CAPE_SWAY_DEG * (time * CAPE_SPEED).sin();
        Self {
            right_arm: arm,
            left_arm: -arm,
            right_leg: -leg,
            left_leg: leg,
            cape: sway.to_radians(),
        }
    }

    pub fn limb_angle(&self, part: BodyPart) -> f32 {
        match part {
            BodyPart::RightArm => self.right_arm,
            BodyPart::LeftArm => self.left_arm,
            BodyPart::RightLeg => self.right_leg,
            BodyPart::LeftLeg => self.left_leg,
            BodyPart::Head | BodyPart::Torso => 0.0,
        }
    }
}
