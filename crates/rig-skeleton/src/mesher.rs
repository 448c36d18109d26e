//! Cuboid and poly mesh expansion into bone-local polygons
//!
//! All input is in pixel units; the output is in model units (1/16 scale)
//! with the y axis flipped so that renderers can apply the usual
//! `(-1, -1, 1)` world scale on top.

use glam::{Mat3, Mat4, Vec2, Vec3};

use crate::definition::{Cuboid, POLY_MESH_MATERIAL, PolyMesh};
use crate::face::FaceDirection;
use crate::matrix_stack::MatrixStack;
use crate::polygon::{Polygon, Vertex};

/// Pixels per model unit
pub const PIXEL_SCALE: f32 = 16.0;

/// Texture dimensions in pixels, used to normalize UVs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureSize {
    pub width: f32,
    pub height: f32,
}

impl TextureSize {
    /// Zero or negative dimensions are clamped to one pixel
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
        }
    }

    fn normalize(&self, u: f32, v: f32) -> Vec2 {
        Vec2::new(u / self.width, v / self.height)
    }
}

impl Default for TextureSize {
    fn default() -> Self {
        Self::new(16, 16)
    }
}

/// Expand a cuboid into quads
///
/// `bone_inflate` and `bone_mirror` apply when the cuboid does not override
/// them. Faces without a UV entry are skipped, as are faces whose two
/// spanning extents are not both non-zero.
pub fn mesh_cuboid(
    cuboid: &Cuboid,
    bone_inflate: f32,
    bone_mirror: bool,
    texture: TextureSize,
) -> Vec<Polygon> {
    if !cuboid.has_faces() {
        return Vec::new();
    }

    let inflate = cuboid.inflate.unwrap_or(bone_inflate) / PIXEL_SCALE;
    let min = cuboid.origin / PIXEL_SCALE - Vec3::splat(inflate);
    let max = (cuboid.origin + cuboid.size) / PIXEL_SCALE + Vec3::splat(inflate);

    if max.cmplt(min).any() {
        log::trace!("Cuboid at {} has a negative extent, skipping", cuboid.origin);
        return Vec::new();
    }
    if min == max {
        return Vec::new();
    }

    let (mut x, y, z) = (min.x, min.y, min.z);
    let (mut x1, y1, z1) = (max.x, max.y, max.z);

    let mirror = cuboid.mirror.unwrap_or(bone_mirror);
    if mirror {
        std::mem::swap(&mut x, &mut x1);
    }

    let pivot = cuboid.pivot();
    let pivot = Vec3::new(pivot.x, -pivot.y, pivot.z) / PIXEL_SCALE;
    let rotation = cuboid.rotation;

    let mut stack = MatrixStack::new();
    stack.translate(pivot);
    stack.rotate_zyx(
        rotation.z.to_radians(),
        rotation.y.to_radians(),
        rotation.x.to_radians(),
    );
    stack.translate(-pivot);

    let mesher = FaceMesher {
        cuboid,
        position: stack.position(),
        normal: stack.normal(),
        mirror,
        texture,
    };

    let mut polygons = Vec::with_capacity(6);
    let mut emit = |direction, corners: [[f32; 3]; 4]| {
        if let Some(polygon) = mesher.face(direction, corners) {
            polygons.push(polygon);
        }
    };

    if y != y1 {
        if x != x1 {
            emit(
                FaceDirection::North,
                [[x1, y1, z], [x, y1, z], [x, y, z], [x1, y, z]],
            );
            emit(
                FaceDirection::South,
                [[x, y1, z1], [x1, y1, z1], [x1, y, z1], [x, y, z1]],
            );
        }
        if z != z1 {
            emit(
                FaceDirection::East,
                [[x, y1, z], [x, y1, z1], [x, y, z1], [x, y, z]],
            );
            emit(
                FaceDirection::West,
                [[x1, y1, z1], [x1, y1, z], [x1, y, z], [x1, y, z1]],
            );
        }
    }

    if x != x1 && z != z1 {
        emit(
            FaceDirection::Down,
            [[x, y, z1], [x1, y, z1], [x1, y, z], [x, y, z]],
        );
        emit(
            FaceDirection::Up,
            [[x1, y1, z1], [x, y1, z1], [x, y1, z], [x1, y1, z]],
        );
    }

    polygons
}

struct FaceMesher<'a> {
    cuboid: &'a Cuboid,
    position: Mat4,
    normal: Mat3,
    mirror: bool,
    texture: TextureSize,
}

impl FaceMesher<'_> {
    fn face(&self, direction: FaceDirection, corners: [[f32; 3]; 4]) -> Option<Polygon> {
        let face = self.cuboid.face(direction)?;

        let (u, v) = (face.uv.x, face.uv.y);
        let (u1, v1) = (u + face.uv_size.x, v + face.uv_size.y);
        let uvs = [
            self.texture.normalize(u1, v),
            self.texture.normalize(u, v),
            self.texture.normalize(u, v1),
            self.texture.normalize(u1, v1),
        ];
        let shift = face.rotation.quarter_turns();

        let vertices = std::array::from_fn(|i| {
            let [cx, cy, cz] = corners[i];
            Vertex::new(
                self.position.transform_point3(Vec3::new(cx, -cy, cz)),
                uvs[(i + shift) % 4],
            )
        });

        Some(Polygon::quad(
            Some(face.material.clone()),
            vertices,
            &self.normal,
            self.mirror,
            direction.opposite(),
        ))
    }
}

/// Expand a poly mesh into polygons
///
/// Polygons that index outside the shared arrays are dropped; compile
/// validates meshes up front so this only matters for direct callers.
pub fn mesh_poly_mesh(mesh: &PolyMesh, texture: TextureSize) -> Vec<Polygon> {
    let arity = mesh.poly_type.vertices();
    mesh.polys
        .iter()
        .filter_map(|poly| {
            let mut vertices = Vec::with_capacity(arity);
            let mut normals = Vec::with_capacity(arity);
            for i in 0..arity {
                let position = mesh.positions.get(*poly.positions.get(i)?)?;
                let normal = mesh.normals.get(*poly.normals.get(i)?)?;
                let uv = mesh.uvs.get(*poly.uvs.get(i)?)?;

                let uv = if mesh.normalized_uvs {
                    *uv
                } else {
                    texture.normalize(uv.x, uv.y)
                };
                vertices.push(Vertex::new(
                    Vec3::new(position.x, -position.y, position.z),
                    Vec2::new(uv.x, 1.0 - uv.y),
                ));
                normals.push(Vec3::new(normal.x, -normal.y, normal.z));
            }
            Some(Polygon::new(
                Some(POLY_MESH_MATERIAL.to_string()),
                vertices,
                normals,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{CuboidFace, IndexedPolygon, PolyType, UvRotation};

    fn unit_face() -> CuboidFace {
        CuboidFace::new(Vec2::ZERO, Vec2::new(16.0, 16.0))
    }

    fn full_cube() -> Cuboid {
        FaceDirection::ALL
            .into_iter()
            .fold(Cuboid::new(Vec3::ZERO, Vec3::splat(16.0)), |cuboid, d| {
                cuboid.with_face(d, unit_face())
            })
    }

    #[test]
    fn test_no_uvs_no_polygons() {
        let cuboid = Cuboid::new(Vec3::ZERO, Vec3::splat(4.0));
        assert!(mesh_cuboid(&cuboid, 0.0, false, TextureSize::default()).is_empty());
    }

    #[test]
    fn test_full_cube_has_six_quads() {
        let polygons = mesh_cuboid(&full_cube(), 0.0, false, TextureSize::default());
        assert_eq!(polygons.len(), 6);
        assert!(polygons.iter().all(Polygon::is_quad));
        assert!(
            polygons
                .iter()
                .all(|p| p.material.as_deref() == Some("texture"))
        );
    }

    #[test]
    fn test_planar_cuboid_emits_two_faces() {
        let mut cuboid = full_cube();
        cuboid.size = Vec3::new(16.0, 0.0, 16.0);
        let polygons = mesh_cuboid(&cuboid, 0.0, false, TextureSize::default());
        assert_eq!(polygons.len(), 2);
    }

    #[test]
    fn test_negative_extent_after_inflate() {
        let mut cuboid = full_cube();
        cuboid.size = Vec3::new(4.0, 4.0, 4.0);
        assert!(mesh_cuboid(&cuboid, -3.0, false, TextureSize::default()).is_empty());
    }

    #[test]
    fn test_inflate_expands_box() {
        let polygons = mesh_cuboid(&full_cube(), 8.0, false, TextureSize::default());
        let max_x = polygons
            .iter()
            .flat_map(|p| p.vertices.iter())
            .map(|v| v.position.x)
            .fold(f32::MIN, f32::max);
        assert!((max_x - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_uv_rotation_shifts_corners() {
        let plain = Cuboid::new(Vec3::ZERO, Vec3::splat(16.0))
            .with_face(FaceDirection::North, unit_face());
        let rotated = Cuboid::new(Vec3::ZERO, Vec3::splat(16.0)).with_face(
            FaceDirection::North,
            unit_face().with_rotation(UvRotation::Rot90),
        );

        let a = &mesh_cuboid(&plain, 0.0, false, TextureSize::default())[0];
        let b = &mesh_cuboid(&rotated, 0.0, false, TextureSize::default())[0];
        for i in 0..4 {
            assert_eq!(a.vertices[i].position, b.vertices[i].position);
            assert_eq!(b.vertices[i].uv, a.vertices[(i + 1) % 4].uv);
        }
    }

    #[test]
    fn test_rotation_about_pivot() {
        let cuboid = Cuboid::new(Vec3::ZERO, Vec3::new(16.0, 16.0, 16.0))
            .with_face(FaceDirection::Up, unit_face())
            .with_rotation(Vec3::new(0.0, 90.0, 0.0), Vec3::ZERO);
        let polygons = mesh_cuboid(&cuboid, 0.0, false, TextureSize::default());
        // Rotating 90 degrees about y through the origin moves +x to -z
        for v in &polygons[0].vertices {
            assert!(v.position.z <= 1e-6);
            assert!(v.position.x.abs() < 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_poly_mesh_flips_axes() {
        let mesh = PolyMesh {
            normalized_uvs: false,
            positions: vec![Vec3::new(1.0, 2.0, 3.0); 3],
            normals: vec![Vec3::Y; 3],
            uvs: vec![Vec2::new(8.0, 4.0); 3],
            polys: vec![IndexedPolygon::uniform(&[0, 1, 2])],
            poly_type: PolyType::Triangles,
        };
        let polygons = mesh_poly_mesh(&mesh, TextureSize::new(16, 16));
        assert_eq!(polygons.len(), 1);

        let polygon = &polygons[0];
        assert!(polygon.is_triangle());
        assert_eq!(polygon.material.as_deref(), Some(POLY_MESH_MATERIAL));
        assert_eq!(polygon.vertices[0].position, Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(polygon.vertices[0].uv, Vec2::new(0.5, 0.75));
        assert_eq!(polygon.normals[0], Vec3::NEG_Y);
    }
}
