//! Plain-data bone descriptions consumed by the compiler
//!
//! Everything in here is immutable input: decoders build these from asset
//! text and hand them to [`crate::compile`]. Positions are in pixel units
//! (1/16 of a model unit) and rotations are in degrees.

use glam::{Vec2, Vec3};

use crate::error::{CompileError, Result};
use crate::face::FaceDirection;

/// Material instance used when a cuboid face does not name one
pub const DEFAULT_MATERIAL: &str = "texture";

/// Material instance attached to every poly mesh polygon
pub const POLY_MESH_MATERIAL: &str = "poly_mesh.texture";

/// A single named bone before compilation
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoneDefinition {
    pub name: String,
    pub parent: Option<String>,
    pub pivot: Vec3,
    /// Static rotation in degrees
    pub rotation: Vec3,
    pub mirror: bool,
    pub inflate: f32,
    pub cuboids: Vec<Cuboid>,
    pub poly_mesh: Option<PolyMesh>,
    pub locators: Vec<Locator>,
}

impl BoneDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_pivot(mut self, pivot: Vec3) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_rotation(mut self, degrees: Vec3) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn with_inflate(mut self, inflate: f32) -> Self {
        self.inflate = inflate;
        self
    }

    pub fn with_cuboid(mut self, cuboid: Cuboid) -> Self {
        self.cuboids.push(cuboid);
        self
    }

    pub fn with_poly_mesh(mut self, mesh: PolyMesh) -> Self {
        self.poly_mesh = Some(mesh);
        self
    }

    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locators.push(locator);
        self
    }

    /// Whether this bone hangs directly off the model root
    ///
    /// A missing parent or one beginning with `root_marker` (`"parent."` by
    /// default) means the bone refers to the model itself.
    pub fn is_root(&self, root_marker: &str) -> bool {
        match &self.parent {
            None => true,
            Some(parent) => parent.starts_with(root_marker),
        }
    }
}

/// Quarter-turn rotation applied to a face's UV rectangle
///
/// Serialized as whole degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i32", into = "i32"))]
pub enum UvRotation {
    #[default]
    Rot0,
    Rot90,
    Rot180,
    Rot270,
}

impl UvRotation {
    /// Parse a rotation given in degrees; only exact quarter turns are accepted
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::Rot0),
            90 => Some(Self::Rot90),
            180 => Some(Self::Rot180),
            270 => Some(Self::Rot270),
            _ => None,
        }
    }

    pub fn degrees(self) -> i32 {
        self.quarter_turns() as i32 * 90
    }

    /// How many corners the UV assignment shifts by
    pub fn quarter_turns(self) -> usize {
        match self {
            Self::Rot0 => 0,
            Self::Rot90 => 1,
            Self::Rot180 => 2,
            Self::Rot270 => 3,
        }
    }
}

impl TryFrom<i32> for UvRotation {
    type Error = CompileError;

    fn try_from(degrees: i32) -> Result<Self> {
        Self::from_degrees(degrees).ok_or(CompileError::InvalidUvRotation(degrees))
    }
}

impl From<UvRotation> for i32 {
    fn from(rotation: UvRotation) -> Self {
        rotation.degrees()
    }
}

/// Texture region for one face of a cuboid, in pixels
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CuboidFace {
    pub uv: Vec2,
    pub uv_size: Vec2,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotation: UvRotation,
    pub material: String,
}

impl CuboidFace {
    pub fn new(uv: Vec2, uv_size: Vec2) -> Self {
        Self {
            uv,
            uv_size,
            rotation: UvRotation::Rot0,
            material: DEFAULT_MATERIAL.to_string(),
        }
    }

    pub fn with_rotation(mut self, rotation: UvRotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }
}

/// Axis-aligned box primitive
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Cuboid {
    pub origin: Vec3,
    pub size: Vec3,
    /// Rotation in degrees about [`Cuboid::pivot`]
    pub rotation: Vec3,
    /// Defaults to the box centre when absent
    pub pivot: Option<Vec3>,
    pub inflate: Option<f32>,
    pub mirror: Option<bool>,
    /// Indexed by [`FaceDirection::index`]
    pub faces: [Option<CuboidFace>; 6],
}

impl Cuboid {
    pub fn new(origin: Vec3, size: Vec3) -> Self {
        Self {
            origin,
            size,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, degrees: Vec3, pivot: Vec3) -> Self {
        self.rotation = degrees;
        self.pivot = Some(pivot);
        self
    }

    pub fn with_inflate(mut self, inflate: f32) -> Self {
        self.inflate = Some(inflate);
        self
    }

    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub fn with_face(mut self, direction: FaceDirection, face: CuboidFace) -> Self {
        self.faces[direction.index()] = Some(face);
        self
    }

    /// Lay out all six faces from a single texture offset
    ///
    /// This is the classic unwrapped box layout: the side strip runs
    /// east, north, west, south beneath the up and down caps.
    pub fn with_box_uv(mut self, uv: Vec2) -> Self {
        self.faces = box_uv(uv, self.size);
        self
    }

    pub fn face(&self, direction: FaceDirection) -> Option<&CuboidFace> {
        self.faces[direction.index()].as_ref()
    }

    pub fn has_faces(&self) -> bool {
        self.faces.iter().any(Option::is_some)
    }

    pub fn pivot(&self) -> Vec3 {
        self.pivot.unwrap_or(self.origin + self.size * 0.5)
    }
}

/// Compute the six face regions of a box-UV mapped cuboid
pub fn box_uv(uv: Vec2, size: Vec3) -> [Option<CuboidFace>; 6] {
    let (u, v) = (uv.x, uv.y);
    let (sx, sy, sz) = (size.x, size.y, size.z);

    let mut faces: [Option<CuboidFace>; 6] = Default::default();
    let mut set = |direction: FaceDirection, u: f32, v: f32, w: f32, h: f32| {
        faces[direction.index()] = Some(CuboidFace::new(Vec2::new(u, v), Vec2::new(w, h)));
    };

    set(FaceDirection::North, u + sz, v + sz, sx, sy);
    set(FaceDirection::East, u, v + sz, sz, sy);
    set(FaceDirection::South, u + sx + sz * 2.0, v + sz, sx, sy);
    set(FaceDirection::West, u + sx + sz, v + sz, sz, sy);
    set(FaceDirection::Up, u + sz, v, sx, sz);
    set(FaceDirection::Down, u + sx + sz, v, sx, sz);

    faces
}

/// Primitive arity of a poly mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolyType {
    #[cfg_attr(feature = "serde", serde(rename = "tri_list"))]
    Triangles,
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "quad_list"))]
    Quads,
}

impl PolyType {
    pub fn vertices(self) -> usize {
        match self {
            Self::Triangles => 3,
            Self::Quads => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Triangles => "tri_list",
            Self::Quads => "quad_list",
        }
    }
}

/// One polygon of a poly mesh, as indices into the shared arrays
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexedPolygon {
    pub positions: Vec<usize>,
    pub normals: Vec<usize>,
    pub uvs: Vec<usize>,
}

impl IndexedPolygon {
    /// Polygon whose position, normal and uv indices are all the same
    pub fn uniform(indices: &[usize]) -> Self {
        Self {
            positions: indices.to_vec(),
            normals: indices.to_vec(),
            uvs: indices.to_vec(),
        }
    }
}

/// Free-form mesh attached to a bone
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PolyMesh {
    /// UVs are already in 0..1 rather than pixels
    pub normalized_uvs: bool,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub polys: Vec<IndexedPolygon>,
    pub poly_type: PolyType,
}

impl PolyMesh {
    /// Check arity and index bounds of every polygon
    ///
    /// Returns a human readable reason for the first problem found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let arity = self.poly_type.vertices();
        for (i, poly) in self.polys.iter().enumerate() {
            let arrays = [
                ("positions", &poly.positions, self.positions.len()),
                ("normals", &poly.normals, self.normals.len()),
                ("uvs", &poly.uvs, self.uvs.len()),
            ];
            for (label, indices, available) in arrays {
                if indices.len() != arity {
                    return Err(format!(
                        "polygon {i} has {} {label} indices, expected {arity} for {}",
                        indices.len(),
                        self.poly_type.name()
                    ));
                }
                if let Some(bad) = indices.iter().find(|&&index| index >= available) {
                    return Err(format!(
                        "polygon {i} {label} index {bad} out of range (len {available})"
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Named attachment point in bone-local pixel space
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Locator {
    pub identifier: String,
    pub position: Vec3,
}

impl Locator {
    pub fn new(identifier: impl Into<String>, position: Vec3) -> Self {
        Self {
            identifier: identifier.into(),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_detection() {
        assert!(BoneDefinition::new("body").is_root("parent."));
        assert!(
            BoneDefinition::new("body")
                .with_parent("parent.root")
                .is_root("parent.")
        );
        assert!(!BoneDefinition::new("head").with_parent("body").is_root("parent."));
    }

    #[test]
    fn test_default_pivot_is_centre() {
        let cuboid = Cuboid::new(Vec3::new(-4.0, 0.0, -2.0), Vec3::new(8.0, 12.0, 4.0));
        assert_eq!(cuboid.pivot(), Vec3::new(0.0, 6.0, 0.0));
    }

    #[test]
    fn test_box_uv_layout() {
        let faces = box_uv(Vec2::new(0.0, 16.0), Vec3::new(8.0, 12.0, 4.0));
        let region = |d: FaceDirection| {
            let face = faces[d.index()].as_ref().map(|f| (f.uv, f.uv_size));
            face.unwrap_or_default()
        };

        assert_eq!(region(FaceDirection::East), (Vec2::new(0.0, 20.0), Vec2::new(4.0, 12.0)));
        assert_eq!(region(FaceDirection::North), (Vec2::new(4.0, 20.0), Vec2::new(8.0, 12.0)));
        assert_eq!(region(FaceDirection::West), (Vec2::new(12.0, 20.0), Vec2::new(4.0, 12.0)));
        assert_eq!(region(FaceDirection::South), (Vec2::new(16.0, 20.0), Vec2::new(8.0, 12.0)));
        assert_eq!(region(FaceDirection::Up), (Vec2::new(4.0, 16.0), Vec2::new(8.0, 4.0)));
        assert_eq!(region(FaceDirection::Down), (Vec2::new(12.0, 16.0), Vec2::new(8.0, 4.0)));
        assert!(faces.iter().flatten().all(|f| f.material == DEFAULT_MATERIAL));
    }

    #[test]
    fn test_uv_rotation_from_degrees() {
        assert_eq!(UvRotation::from_degrees(90), Some(UvRotation::Rot90));
        assert_eq!(UvRotation::from_degrees(-90), Some(UvRotation::Rot270));
        assert_eq!(UvRotation::from_degrees(45), None);
        assert_eq!(UvRotation::Rot180.degrees(), 180);

        assert_eq!(UvRotation::try_from(-180), Ok(UvRotation::Rot180));
        assert_eq!(
            UvRotation::try_from(45),
            Err(CompileError::InvalidUvRotation(45))
        );
        assert_eq!(i32::from(UvRotation::Rot270), 270);
    }

    #[test]
    fn test_poly_mesh_validation() {
        let mut mesh = PolyMesh {
            positions: vec![Vec3::ZERO; 3],
            normals: vec![Vec3::Y; 3],
            uvs: vec![Vec2::ZERO; 3],
            polys: vec![IndexedPolygon::uniform(&[0, 1, 2])],
            poly_type: PolyType::Triangles,
            ..PolyMesh::default()
        };
        assert!(mesh.validate().is_ok());

        mesh.poly_type = PolyType::Quads;
        assert!(mesh.validate().is_err());

        mesh.poly_type = PolyType::Triangles;
        mesh.polys[0].uvs = vec![0, 1, 3];
        let reason = mesh.validate().unwrap_err();
        assert!(reason.contains("uvs index 3"));
    }
}
