//! Compiled bones and copied transforms

use glam::{Mat3, Mat4, Vec3};

use crate::debug;
use crate::definition::{BoneDefinition, Locator};
use crate::matrix_stack::MatrixStack;
use crate::mesher::PIXEL_SCALE;
use crate::polygon::Polygon;
use crate::pose::AnimationPose;

/// Index of a bone inside its [`crate::CompiledTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(pub usize);

impl BoneId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Something whose transform a bone can mimic
pub trait TransformSource {
    /// Post-multiply this source's transform onto `stack`
    fn apply(&self, stack: &mut MatrixStack);

    /// Whether the applied transform already accounts for the receiving
    /// bone's pivot
    fn includes_pivot(&self) -> bool {
        false
    }
}

impl<F> TransformSource for F
where
    F: Fn(&mut MatrixStack),
{
    fn apply(&self, stack: &mut MatrixStack) {
        self(stack);
    }
}

impl TransformSource for CompiledBone {
    fn apply(&self, stack: &mut MatrixStack) {
        self.translate_and_rotate(stack);
    }

    fn includes_pivot(&self) -> bool {
        true
    }
}

/// Snapshot of a [`TransformSource`] taken by [`CompiledBone::copy_transform`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopiedTransform {
    pub position: Mat4,
    pub normal: Mat3,
    pub pivot_included: bool,
}

/// A bone with its generated geometry and mutable pose
#[derive(custom_debug::Debug, Clone)]
pub struct CompiledBone {
    id: BoneId,
    #[debug(with = name_fmt)]
    definition: BoneDefinition,
    #[debug(with = debug::trimmed_collection_fmt)]
    polygons: Vec<Polygon>,
    parent: Option<BoneId>,
    children: Vec<BoneId>,
    /// Pixel-space pivot with y flipped
    pivot: Vec3,
    /// Static rotation in radians
    rotation: Vec3,
    pose: AnimationPose,
    visible: bool,
    copied: Option<CopiedTransform>,
}

fn name_fmt(definition: &BoneDefinition, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "{:?}", definition.name)
}

impl CompiledBone {
    pub(crate) fn new(id: BoneId, definition: BoneDefinition, polygons: Vec<Polygon>) -> Self {
        let mut bone = Self {
            id,
            definition,
            polygons,
            parent: None,
            children: Vec::new(),
            pivot: Vec3::ZERO,
            rotation: Vec3::ZERO,
            pose: AnimationPose::IDENTITY,
            visible: true,
            copied: None,
        };
        bone.reset_transform();
        bone
    }

    pub(crate) fn attach_child(&mut self, child: BoneId) {
        self.children.push(child);
    }

    pub(crate) fn set_parent(&mut self, parent: BoneId) {
        self.parent = Some(parent);
    }

    pub fn id(&self) -> BoneId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn definition(&self) -> &BoneDefinition {
        &self.definition
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn parent(&self) -> Option<BoneId> {
        self.parent
    }

    pub fn children(&self) -> &[BoneId] {
        &self.children
    }

    pub fn locators(&self) -> &[Locator] {
        &self.definition.locators
    }

    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn pose(&self) -> &AnimationPose {
        &self.pose
    }

    pub fn pose_mut(&mut self) -> &mut AnimationPose {
        &mut self.pose
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hidden bones skip rendering along with their whole subtree
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn copied_transform(&self) -> Option<&CopiedTransform> {
        self.copied.as_ref()
    }

    /// Restore rest pivot and rotation, clear the pose and any copied transform
    pub fn reset_transform(&mut self) {
        let pivot = self.definition.pivot;
        let rotation = self.definition.rotation;
        self.pivot = Vec3::new(pivot.x, -pivot.y, pivot.z);
        self.rotation = Vec3::new(
            rotation.x.to_radians(),
            rotation.y.to_radians(),
            rotation.z.to_radians(),
        );
        self.pose.reset();
        self.copied = None;
    }

    /// Mimic the transform produced by `source` on every later pass
    pub fn copy_transform(&mut self, source: &(impl TransformSource + ?Sized)) {
        let mut stack = MatrixStack::new();
        source.apply(&mut stack);
        self.copied = Some(CopiedTransform {
            position: stack.position(),
            normal: stack.normal(),
            pivot_included: source.includes_pivot(),
        });
    }

    /// Compose this bone's parent-relative transform onto `stack`
    ///
    /// Order: copied transform, pivot plus pose translation, pose scale,
    /// rest rotation plus pose rotation (z, y, x), pivot back out.
    pub fn translate_and_rotate(&self, stack: &mut MatrixStack) {
        if let Some(copied) = &self.copied {
            stack.multiply_with_normal(&copied.position, &copied.normal);
        }

        let pose = &self.pose;
        let pivot = self.pivot;
        stack.translate(
            Vec3::new(
                pose.position.x + pivot.x,
                -pose.position.y + pivot.y,
                pose.position.z + pivot.z,
            ) / PIXEL_SCALE,
        );
        stack.scale(pose.scale);
        stack.rotate_zyx(
            self.rotation.z + pose.rotation.z.to_radians(),
            self.rotation.y + pose.rotation.y.to_radians(),
            self.rotation.x + pose.rotation.x.to_radians(),
        );
        stack.translate(-pivot / PIXEL_SCALE);
    }

    /// Offset applied before emitting geometry when a copied transform
    /// did not account for this bone's pivot
    pub(crate) fn apply_copy_offset(&self, stack: &mut MatrixStack) {
        if let Some(copied) = &self.copied
            && !copied.pivot_included
        {
            stack.translate(-self.pivot / PIXEL_SCALE);
        }
    }
}
