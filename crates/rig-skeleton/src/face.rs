use glam::Vec3;

/// One of the six axis-aligned faces of a cuboid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FaceDirection {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl FaceDirection {
    /// All faces in index order
    pub const ALL: [Self; 6] = [
        Self::Down,
        Self::Up,
        Self::North,
        Self::South,
        Self::West,
        Self::East,
    ];

    /// Position of this face in [`FaceDirection::ALL`] and in per-face arrays
    pub fn index(self) -> usize {
        match self {
            Self::Down => 0,
            Self::Up => 1,
            Self::North => 2,
            Self::South => 3,
            Self::West => 4,
            Self::East => 5,
        }
    }

    /// Outward unit normal
    pub fn normal(self) -> Vec3 {
        match self {
            Self::Down => Vec3::NEG_Y,
            Self::Up => Vec3::Y,
            Self::North => Vec3::NEG_Z,
            Self::South => Vec3::Z,
            Self::West => Vec3::NEG_X,
            Self::East => Vec3::X,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
            Self::North => "north",
            Self::South => "south",
            Self::West => "west",
            Self::East => "east",
        }
    }
}

impl std::fmt::Display for FaceDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, face) in FaceDirection::ALL.iter().enumerate() {
            assert_eq!(face.index(), i);
        }
    }

    #[test]
    fn test_opposite_normals_cancel() {
        for face in FaceDirection::ALL {
            assert_eq!(face.normal() + face.opposite().normal(), Vec3::ZERO);
            assert_eq!(face.opposite().opposite(), face);
        }
    }
}
