//! Position and normal transform stack used while walking a skeleton

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    position: Mat4,
    normal: Mat3,
}

impl Entry {
    const IDENTITY: Self = Self {
        position: Mat4::IDENTITY,
        normal: Mat3::IDENTITY,
    };
}

/// Stack of position matrices with matching normal matrices
///
/// The bottom entry can never be popped; popping it logs a warning and
/// leaves the stack untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixStack {
    stack: Vec<Entry>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Entry::IDENTITY],
        }
    }

    fn top(&self) -> &Entry {
        // The base entry is never removed, so the stack is never empty
        &self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Entry {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Number of pushed entries above the base
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn push(&mut self) {
        let top = *self.top();
        self.stack.push(top);
    }

    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        } else {
            log::warn!("MatrixStack::pop called with nothing pushed");
        }
    }

    pub fn translate(&mut self, offset: Vec3) {
        let top = self.top_mut();
        top.position *= Mat4::from_translation(offset);
    }

    pub fn scale(&mut self, scale: Vec3) {
        let top = self.top_mut();
        top.position *= Mat4::from_scale(scale);

        if scale.x == scale.y && scale.y == scale.z {
            // Uniform scale only affects normals through its sign
            if scale.x < 0.0 {
                top.normal = top.normal * -1.0;
            }
        } else if scale.x != 0.0 && scale.y != 0.0 && scale.z != 0.0 {
            top.normal *= Mat3::from_diagonal(scale.recip());
        }
    }

    pub fn rotate(&mut self, rotation: Quat) {
        let top = self.top_mut();
        top.position *= Mat4::from_quat(rotation);
        top.normal *= Mat3::from_quat(rotation);
    }

    /// Rotate about z, then y, then x; angles in radians
    pub fn rotate_zyx(&mut self, z: f32, y: f32, x: f32) {
        if z == 0.0 && y == 0.0 && x == 0.0 {
            return;
        }
        self.rotate(Quat::from_euler(EulerRot::ZYX, z, y, x));
    }

    /// Post-multiply precomputed position and normal matrices
    pub fn multiply_with_normal(&mut self, position: &Mat4, normal: &Mat3) {
        let top = self.top_mut();
        top.position *= *position;
        top.normal *= *normal;
    }

    pub fn position(&self) -> Mat4 {
        self.top().position
    }

    pub fn normal(&self) -> Mat3 {
        self.top().normal
    }

    /// Apply the current position matrix to a point
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.top().position.transform_point3(point)
    }

    /// Apply the current normal matrix to a direction, renormalizing it
    pub fn transform_normal(&self, normal: Vec3) -> Vec3 {
        (self.top().normal * normal).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_push_pop_restores() {
        let mut stack = MatrixStack::new();
        stack.translate(Vec3::new(1.0, 2.0, 3.0));
        stack.push();
        stack.scale(Vec3::splat(2.0));
        assert_eq!(stack.depth(), 1);
        stack.pop();
        assert_eq!(stack.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_pop_underflow_is_ignored() {
        let mut stack = MatrixStack::new();
        stack.translate(Vec3::X);
        stack.pop();
        assert_eq!(stack.transform_point(Vec3::ZERO), Vec3::X);
    }

    #[test]
    fn test_rotate_zyx_applies_x_first() {
        let mut stack = MatrixStack::new();
        stack.rotate_zyx(FRAC_PI_2, 0.0, FRAC_PI_2);
        // x rotation takes +y to +z, z rotation leaves +z alone
        assert!(approx(stack.transform_point(Vec3::Y), Vec3::Z));
    }

    #[test]
    fn test_non_uniform_scale_normals() {
        let mut stack = MatrixStack::new();
        stack.scale(Vec3::new(2.0, 1.0, 1.0));
        assert!(approx(stack.transform_normal(Vec3::X), Vec3::X));

        let mut flipped = MatrixStack::new();
        flipped.scale(Vec3::new(-1.0, -1.0, -1.0));
        assert!(approx(flipped.transform_normal(Vec3::Y), Vec3::NEG_Y));
    }
}
