//! Integration tests for the render pass

use glam::{Vec2, Vec3};
use pretty_assertions::assert_eq;
use rig_skeleton::{
    BoneDefinition, Cuboid, CuboidFace, FaceDirection, MatrixStack, Polygon, compile,
};

fn plate(name: &str) -> BoneDefinition {
    BoneDefinition::new(name).with_cuboid(
        Cuboid::new(Vec3::ZERO, Vec3::splat(16.0))
            .with_face(FaceDirection::Up, CuboidFace::new(Vec2::ZERO, Vec2::splat(16.0))),
    )
}

fn rendered_names(tree: &rig_skeleton::CompiledTree) -> Vec<String> {
    let mut seen = Vec::new();
    let mut stack = MatrixStack::new();
    tree.render(
        &mut |_: &MatrixStack, polygon: &Polygon| {
            seen.push(polygon.material.clone().unwrap_or_default());
        },
        &mut stack,
    );
    assert_eq!(stack.depth(), 0);
    seen
}

#[test]
fn test_render_visits_every_polygon() {
    let bones = [
        plate("body"),
        BoneDefinition::new("empty").with_parent("body"),
        plate("leaf").with_parent("empty"),
    ];
    let tree = compile(16, 16, &bones).unwrap();
    assert_eq!(rendered_names(&tree).len(), 2);
}

#[test]
fn test_hidden_bone_skips_subtree() {
    let bones = [plate("body"), plate("arm").with_parent("body")];
    let mut tree = compile(16, 16, &bones).unwrap();
    tree.bone_mut("body").unwrap().set_visible(false);
    assert!(rendered_names(&tree).is_empty());

    tree.bone_mut("body").unwrap().set_visible(true);
    tree.bone_mut("arm").unwrap().set_visible(false);
    assert_eq!(rendered_names(&tree).len(), 1);
}

#[test]
fn test_render_applies_pose() {
    let bones = [plate("body")];
    let mut tree = compile(16, 16, &bones).unwrap();
    tree.bone_mut("body").unwrap().pose_mut().position = Vec3::new(0.0, 0.0, 32.0);

    let mut min_z = f32::MAX;
    let mut stack = MatrixStack::new();
    tree.render(
        &mut |stack: &MatrixStack, polygon: &Polygon| {
            for vertex in &polygon.vertices {
                min_z = min_z.min(stack.transform_point(vertex.position).z);
            }
        },
        &mut stack,
    );
    assert!((min_z - 2.0).abs() < 1e-5);
}

#[test]
fn test_copied_closure_transform_offsets_pivot() {
    let bones = [plate("body").with_pivot(Vec3::new(16.0, 0.0, 0.0))];
    let mut tree = compile(16, 16, &bones).unwrap();
    tree.copy_angles(None, &|_: &mut MatrixStack| {});

    let mut min_x = f32::MAX;
    let mut stack = MatrixStack::new();
    tree.render(
        &mut |stack: &MatrixStack, polygon: &Polygon| {
            for vertex in &polygon.vertices {
                min_x = min_x.min(stack.transform_point(vertex.position).x);
            }
        },
        &mut stack,
    );
    // The closure does not account for the pivot, so geometry shifts back by it
    assert!((min_x + 1.0).abs() < 1e-5);
}
