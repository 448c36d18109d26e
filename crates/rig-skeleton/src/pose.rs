use glam::Vec3;

/// Per-frame animation offsets accumulated on top of a bone's rest transform
///
/// Position is in pixels, rotation in degrees, scale is a multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationPose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl AnimationPose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Accumulate offsets; `scale` is added directly, so pass `(s - 1) * w`
    pub fn add(&mut self, position: Vec3, rotation: Vec3, scale: Vec3) {
        self.position += position;
        self.rotation += rotation;
        self.scale += scale;
    }
}

impl Default for AnimationPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}
