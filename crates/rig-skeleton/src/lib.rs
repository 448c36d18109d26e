//! Skeleton compilation for Bedrock-style geometry
//!
//! Bones arrive as a flat list of [`BoneDefinition`]s that reference their
//! parents by name. [`compile`] validates the list, expands cuboids and
//! poly meshes into [`Polygon`]s and links everything into a
//! [`CompiledTree`] that can be posed, rendered and queried for locators.
//!
//! ```rust,no_run
//! use glam::{Vec2, Vec3};
//! use rig_skeleton::{BoneDefinition, Cuboid, MatrixStack, compile};
//!
//! let bones = vec![
//!     BoneDefinition::new("body")
//!         .with_pivot(Vec3::new(0.0, 24.0, 0.0))
//!         .with_cuboid(
//!             Cuboid::new(Vec3::new(-4.0, 12.0, -2.0), Vec3::new(8.0, 12.0, 4.0))
//!                 .with_box_uv(Vec2::new(16.0, 16.0)),
//!         ),
//!     BoneDefinition::new("head").with_parent("body"),
//! ];
//!
//! let tree = compile(64, 64, &bones)?;
//! let mut stack = MatrixStack::new();
//! tree.render(&mut |stack: &MatrixStack, polygon: &rig_skeleton::Polygon| {
//!     let _world = stack.transform_point(polygon.vertices[0].position);
//! }, &mut stack);
//! # Ok::<(), rig_skeleton::CompileError>(())
//! ```

pub mod bone;
pub mod debug;
pub mod definition;
pub mod error;
pub mod face;
pub mod locator;
pub mod matrix_stack;
pub mod mesher;
pub mod polygon;
pub mod pose;
pub mod render;
pub mod tree;

pub use bone::{BoneId, CompiledBone, CopiedTransform, TransformSource};
pub use definition::{
    BoneDefinition, Cuboid, CuboidFace, IndexedPolygon, Locator, PolyMesh, PolyType, UvRotation,
    box_uv,
};
pub use error::{CompileError, Result};
pub use face::FaceDirection;
pub use locator::{LocatorTracker, LocatorTransformation};
pub use matrix_stack::MatrixStack;
pub use mesher::{TextureSize, mesh_cuboid, mesh_poly_mesh};
pub use polygon::{Polygon, Vertex};
pub use pose::AnimationPose;
pub use render::GeometryRenderer;
pub use tree::{CompileOptions, CompiledTree, compile, compile_with_options};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
