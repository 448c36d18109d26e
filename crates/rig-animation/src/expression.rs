//! Scalar inputs that may be computed by an external expression evaluator

use glam::Vec3;

/// Evaluates expression strings to numbers
///
/// `this` is the contextual value the expression may refer to: the
/// channel's start value for keyframes, the weight factor for blend weights.
pub trait Environment {
    fn resolve(&self, expression: &str, this: f32) -> f32;
}

impl<F> Environment for F
where
    F: Fn(&str, f32) -> f32,
{
    fn resolve(&self, expression: &str, this: f32) -> f32 {
        self(expression, this)
    }
}

/// Environment for data without expressions; every expression yields zero
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExpressions;

impl Environment for NoExpressions {
    fn resolve(&self, expression: &str, _this: f32) -> f32 {
        log::trace!("No evaluator for expression '{}', using 0", expression);
        0.0
    }
}

/// A keyframe component or blend weight
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Scalar {
    Constant(f32),
    Expression(String),
}

impl Scalar {
    pub const ZERO: Self = Self::Constant(0.0);
    pub const ONE: Self = Self::Constant(1.0);

    pub fn expression(source: impl Into<String>) -> Self {
        Self::Expression(source.into())
    }

    /// Evaluate, mapping NaN and infinities to zero
    pub fn resolve(&self, env: &(impl Environment + ?Sized), this: f32) -> f32 {
        let value = match self {
            Self::Constant(value) => *value,
            Self::Expression(source) => env.resolve(source, this),
        };
        if value.is_finite() { value } else { 0.0 }
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Self::Constant(value)
    }
}

impl From<&str> for Scalar {
    fn from(source: &str) -> Self {
        Self::Expression(source.to_string())
    }
}

/// Three scalars resolved together
pub fn resolve_triplet(values: &[Scalar; 3], env: &(impl Environment + ?Sized), this: f32) -> Vec3 {
    Vec3::new(
        values[0].resolve(env, this),
        values[1].resolve(env, this),
        values[2].resolve(env, this),
    )
}

/// Constant triplet from a vector
pub fn constant_triplet(value: Vec3) -> [Scalar; 3] {
    [value.x.into(), value.y.into(), value.z.into()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_ignores_environment() {
        let env = |_: &str, _: f32| -> f32 { 42.0 };
        assert_eq!(Scalar::Constant(3.0).resolve(&env, 0.0), 3.0);
    }

    #[test]
    fn test_expression_receives_this() {
        let env = |source: &str, this: f32| -> f32 {
            if source == "this * 2" { this * 2.0 } else { 0.0 }
        };
        assert_eq!(Scalar::expression("this * 2").resolve(&env, 1.5), 3.0);
    }

    #[test]
    fn test_non_finite_results_become_zero() {
        let env = |_: &str, _: f32| -> f32 { f32::NAN };
        assert_eq!(Scalar::expression("1 / 0").resolve(&env, 0.0), 0.0);
        assert_eq!(Scalar::Constant(f32::INFINITY).resolve(&NoExpressions, 0.0), 0.0);
    }
}
