use crate::matrix_stack::MatrixStack;
use crate::polygon::Polygon;

/// Receives every polygon of a skeleton during [`crate::CompiledTree::render`]
///
/// The stack holds the polygon's bone transform; vertices are still in
/// bone-local space.
pub trait GeometryRenderer {
    fn render(&mut self, stack: &MatrixStack, polygon: &Polygon);
}

impl<F> GeometryRenderer for F
where
    F: FnMut(&MatrixStack, &Polygon),
{
    fn render(&mut self, stack: &MatrixStack, polygon: &Polygon) {
        self(stack, polygon);
    }
}
