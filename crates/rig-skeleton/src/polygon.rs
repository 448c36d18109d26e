use glam::{Mat3, Vec2, Vec3};

use crate::face::FaceDirection;

/// Bone-local vertex: position in model units plus normalized texture coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, uv: Vec2) -> Self {
        Self { position, uv }
    }
}

/// A triangle or quad ready to be handed to a renderer
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    pub material: Option<String>,
    pub vertices: Vec<Vertex>,
    /// One normal per vertex
    pub normals: Vec<Vec3>,
}

impl Polygon {
    pub fn new(material: Option<String>, vertices: Vec<Vertex>, normals: Vec<Vec3>) -> Self {
        Self {
            material,
            vertices,
            normals,
        }
    }

    /// Build a flat-shaded quad facing `facing`
    ///
    /// Mirrored quads have their winding reversed and the x component of
    /// the normal negated before `normal_matrix` is applied.
    pub fn quad(
        material: Option<String>,
        mut vertices: [Vertex; 4],
        normal_matrix: &Mat3,
        mirror: bool,
        facing: FaceDirection,
    ) -> Self {
        let mut normal = facing.normal();
        if mirror {
            vertices.reverse();
            normal.x = -normal.x;
        }
        let normal = (*normal_matrix * normal).normalize_or_zero();

        Self {
            material,
            vertices: vertices.to_vec(),
            normals: vec![normal; 4],
        }
    }

    pub fn is_quad(&self) -> bool {
        self.vertices.len() == 4
    }

    pub fn is_triangle(&self) -> bool {
        self.vertices.len() == 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners() -> [Vertex; 4] {
        [
            Vertex::new(Vec3::new(1.0, 0.0, 0.0), Vec2::new(1.0, 0.0)),
            Vertex::new(Vec3::new(0.0, 0.0, 0.0), Vec2::new(0.0, 0.0)),
            Vertex::new(Vec3::new(0.0, 1.0, 0.0), Vec2::new(0.0, 1.0)),
            Vertex::new(Vec3::new(1.0, 1.0, 0.0), Vec2::new(1.0, 1.0)),
        ]
    }

    #[test]
    fn test_quad_normals_match_facing() {
        let quad = Polygon::quad(None, corners(), &Mat3::IDENTITY, false, FaceDirection::East);
        assert!(quad.is_quad());
        assert!(quad.normals.iter().all(|n| *n == Vec3::X));
        assert_eq!(quad.vertices, corners().to_vec());
    }

    #[test]
    fn test_mirrored_quad_reverses_winding() {
        let quad = Polygon::quad(None, corners(), &Mat3::IDENTITY, true, FaceDirection::East);
        let mut expected = corners();
        expected.reverse();
        assert_eq!(quad.vertices, expected.to_vec());
        assert!(quad.normals.iter().all(|n| *n == Vec3::NEG_X));
    }
}
