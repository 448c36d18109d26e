//! Absolute transforms of named attachment points

use std::collections::HashMap;

use glam::{Mat4, Vec3};

use crate::bone::{BoneId, CompiledBone};
use crate::definition::Locator;
use crate::matrix_stack::MatrixStack;
use crate::mesher::PIXEL_SCALE;

/// A locator and the matrix computed for it on the last update
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorTransformation {
    locator: Locator,
    bone: BoneId,
    matrix: Mat4,
}

impl LocatorTransformation {
    pub fn name(&self) -> &str {
        &self.locator.identifier
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Bone the locator is declared on
    pub fn bone(&self) -> BoneId {
        self.bone
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// World-space origin of the locator
    pub fn position(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }
}

/// Name-indexed locator matrices, refreshed by [`LocatorTracker::update`]
#[derive(Debug, Clone, Default)]
pub struct LocatorTracker {
    transformations: Vec<LocatorTransformation>,
    by_name: HashMap<String, usize>,
}

impl LocatorTracker {
    /// Collect every locator declared on `bones`
    ///
    /// When two bones declare the same identifier the later one wins.
    pub fn new(bones: &[CompiledBone]) -> Self {
        let mut tracker = Self::default();
        for bone in bones {
            for locator in bone.locators() {
                let transformation = LocatorTransformation {
                    locator: locator.clone(),
                    bone: bone.id(),
                    matrix: Mat4::IDENTITY,
                };
                if let Some(&existing) = tracker.by_name.get(&locator.identifier) {
                    log::warn!(
                        "Locator '{}' declared more than once, keeping the one on bone '{}'",
                        locator.identifier,
                        bone.name()
                    );
                    tracker.transformations[existing] = transformation;
                } else {
                    tracker
                        .by_name
                        .insert(locator.identifier.clone(), tracker.transformations.len());
                    tracker.transformations.push(transformation);
                }
            }
        }
        tracker
    }

    pub fn get(&self, name: &str) -> Option<&LocatorTransformation> {
        self.by_name
            .get(name)
            .and_then(|&index| self.transformations.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocatorTransformation> {
        self.transformations.iter()
    }

    pub fn len(&self) -> usize {
        self.transformations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformations.is_empty()
    }

    /// Recompute every locator matrix from the current bone poses
    pub fn update(&mut self, bones: &[CompiledBone], roots: &[BoneId]) {
        if self.transformations.is_empty() {
            return;
        }

        let mut stack = MatrixStack::new();
        stack.scale(Vec3::new(-1.0, -1.0, 1.0));
        for &root in roots {
            self.walk(bones, root, &mut stack);
        }
    }

    fn walk(&mut self, bones: &[CompiledBone], id: BoneId, stack: &mut MatrixStack) {
        let Some(bone) = bones.get(id.index()) else {
            return;
        };

        stack.push();
        bone.translate_and_rotate(stack);

        for locator in bone.locators() {
            let Some(&index) = self.by_name.get(&locator.identifier) else {
                continue;
            };
            let transformation = &mut self.transformations[index];
            if transformation.bone != id {
                continue;
            }

            stack.push();
            let offset = locator.position;
            stack.translate(Vec3::new(offset.x, -offset.y, offset.z) / PIXEL_SCALE);
            transformation.matrix = stack.position();
            stack.pop();
        }

        for &child in bone.children() {
            self.walk(bones, child, stack);
        }

        stack.pop();
    }
}
