//! Progress remapping curves used between keyframes
//!
//! The extended curves follow <https://easings.net/>. Every curve maps
//! `0..=1` onto `0..=1`; overshooting curves (back, elastic) are clamped.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::AnimationError;

/// Interpolation mode of a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Easing {
    #[default]
    Linear,
    /// Spline through the neighbouring keyframes; progress itself is linear
    CatmullRom,
    /// Hold the previous value until the destination keyframe is reached
    Step,
    InSine,
    OutSine,
    InOutSine,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InBack,
    OutBack,
    InOutBack,
    InElastic,
    OutElastic,
    InOutElastic,
    InBounce,
    OutBounce,
    InOutBounce,
}

impl Easing {
    pub const ALL: [Self; 33] = [
        Self::Linear,
        Self::CatmullRom,
        Self::Step,
        Self::InSine,
        Self::OutSine,
        Self::InOutSine,
        Self::InQuad,
        Self::OutQuad,
        Self::InOutQuad,
        Self::InCubic,
        Self::OutCubic,
        Self::InOutCubic,
        Self::InQuart,
        Self::OutQuart,
        Self::InOutQuart,
        Self::InQuint,
        Self::OutQuint,
        Self::InOutQuint,
        Self::InExpo,
        Self::OutExpo,
        Self::InOutExpo,
        Self::InCirc,
        Self::OutCirc,
        Self::InOutCirc,
        Self::InBack,
        Self::OutBack,
        Self::InOutBack,
        Self::InElastic,
        Self::OutElastic,
        Self::InOutElastic,
        Self::InBounce,
        Self::OutBounce,
        Self::InOutBounce,
    ];

    /// Whether values are interpolated along a Catmull-Rom spline
    pub fn is_spline(self) -> bool {
        self == Self::CatmullRom
    }

    /// Remap `x` and clamp the result to `0..=1`
    pub fn apply(self, x: f32) -> f32 {
        self.raw(x).clamp(0.0, 1.0)
    }

    fn raw(self, x: f32) -> f32 {
        const BACK_C1: f32 = 1.701_58;
        const BACK_C3: f32 = BACK_C1 + 1.0;
        const BACK_C2: f32 = BACK_C1 * 1.525;
        const ELASTIC_C4: f32 = (2.0 * PI) / 3.0;
        const ELASTIC_C5: f32 = (2.0 * PI) / 4.5;

        match self {
            Self::Linear | Self::CatmullRom => x,
            Self::Step => {
                if x >= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::InSine => 1.0 - (x * PI / 2.0).cos(),
            Self::OutSine => (x * PI / 2.0).sin(),
            Self::InOutSine => -((x * PI).cos() - 1.0) / 2.0,
            Self::InQuad => x.powi(2),
            Self::OutQuad => 1.0 - (1.0 - x).powi(2),
            Self::InOutQuad => in_out(x, 2.0, 2),
            Self::InCubic => x.powi(3),
            Self::OutCubic => 1.0 - (1.0 - x).powi(3),
            Self::InOutCubic => in_out(x, 4.0, 3),
            Self::InQuart => x.powi(4),
            Self::OutQuart => 1.0 - (1.0 - x).powi(4),
            Self::InOutQuart => in_out(x, 8.0, 4),
            Self::InQuint => x.powi(5),
            Self::OutQuint => 1.0 - (1.0 - x).powi(5),
            Self::InOutQuint => in_out(x, 16.0, 5),
            Self::InExpo => {
                if x == 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * x - 10.0)
                }
            }
            Self::OutExpo => {
                if x == 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * x)
                }
            }
            Self::InOutExpo => {
                if x == 0.0 || x == 1.0 {
                    x
                } else if x < 0.5 {
                    2f32.powf(20.0 * x - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * x + 10.0)) / 2.0
                }
            }
            Self::InCirc => 1.0 - (1.0 - x * x).max(0.0).sqrt(),
            Self::OutCirc => (1.0 - (x - 1.0).powi(2)).max(0.0).sqrt(),
            Self::InOutCirc => {
                if x < 0.5 {
                    (1.0 - (1.0 - 4.0 * x * x).max(0.0).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * x + 2.0).powi(2)).max(0.0).sqrt() + 1.0) / 2.0
                }
            }
            Self::InBack => BACK_C3 * x.powi(3) - BACK_C1 * x.powi(2),
            Self::OutBack => {
                let a = x - 1.0;
                1.0 + BACK_C3 * a.powi(3) + BACK_C1 * a.powi(2)
            }
            Self::InOutBack => {
                if x < 0.5 {
                    (2.0 * x).powi(2) * ((BACK_C2 + 1.0) * 2.0 * x - BACK_C2) / 2.0
                } else {
                    ((2.0 * x - 2.0).powi(2) * ((BACK_C2 + 1.0) * (x * 2.0 - 2.0) + BACK_C2) + 2.0)
                        / 2.0
                }
            }
            Self::InElastic => {
                if x == 0.0 || x == 1.0 {
                    x
                } else {
                    -2f32.powf(10.0 * x - 10.0) * ((x * 10.0 - 10.75) * ELASTIC_C4).sin()
                }
            }
            Self::OutElastic => {
                if x == 0.0 || x == 1.0 {
                    x
                } else {
                    2f32.powf(-10.0 * x) * ((x * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
                }
            }
            Self::InOutElastic => {
                if x == 0.0 || x == 1.0 {
                    x
                } else if x < 0.5 {
                    -(2f32.powf(20.0 * x - 10.0) * ((20.0 * x - 11.125) * ELASTIC_C5).sin()) / 2.0
                } else {
                    (2f32.powf(-20.0 * x + 10.0) * ((20.0 * x - 11.125) * ELASTIC_C5).sin()) / 2.0
                        + 1.0
                }
            }
            Self::InBounce => 1.0 - out_bounce(1.0 - x),
            Self::OutBounce => out_bounce(x),
            Self::InOutBounce => {
                if x < 0.5 {
                    (1.0 - out_bounce(1.0 - 2.0 * x)) / 2.0
                } else {
                    (1.0 + out_bounce(2.0 * x - 1.0)) / 2.0
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::CatmullRom => "catmullrom",
            Self::Step => "step",
            Self::InSine => "ease_in_sine",
            Self::OutSine => "ease_out_sine",
            Self::InOutSine => "ease_in_out_sine",
            Self::InQuad => "ease_in_quad",
            Self::OutQuad => "ease_out_quad",
            Self::InOutQuad => "ease_in_out_quad",
            Self::InCubic => "ease_in_cubic",
            Self::OutCubic => "ease_out_cubic",
            Self::InOutCubic => "ease_in_out_cubic",
            Self::InQuart => "ease_in_quart",
            Self::OutQuart => "ease_out_quart",
            Self::InOutQuart => "ease_in_out_quart",
            Self::InQuint => "ease_in_quint",
            Self::OutQuint => "ease_out_quint",
            Self::InOutQuint => "ease_in_out_quint",
            Self::InExpo => "ease_in_expo",
            Self::OutExpo => "ease_out_expo",
            Self::InOutExpo => "ease_in_out_expo",
            Self::InCirc => "ease_in_circ",
            Self::OutCirc => "ease_out_circ",
            Self::InOutCirc => "ease_in_out_circ",
            Self::InBack => "ease_in_back",
            Self::OutBack => "ease_out_back",
            Self::InOutBack => "ease_in_out_back",
            Self::InElastic => "ease_in_elastic",
            Self::OutElastic => "ease_out_elastic",
            Self::InOutElastic => "ease_in_out_elastic",
            Self::InBounce => "ease_in_bounce",
            Self::OutBounce => "ease_out_bounce",
            Self::InOutBounce => "ease_in_out_bounce",
        }
    }
}

/// Symmetric polynomial ease: `scale * x^power` below the midpoint
fn in_out(x: f32, scale: f32, power: i32) -> f32 {
    if x < 0.5 {
        scale * x.powi(power)
    } else {
        1.0 - (-2.0 * x + 2.0).powi(power) / 2.0
    }
}

fn out_bounce(x: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if x < 1.0 / D1 {
        N1 * x * x
    } else if x < 2.0 / D1 {
        let x = x - 1.5 / D1;
        N1 * x * x + 0.75
    } else if x < 2.5 / D1 {
        let x = x - 2.25 / D1;
        N1 * x * x + 0.9375
    } else {
        let x = x - 2.625 / D1;
        N1 * x * x + 0.984_375
    }
}

impl FromStr for Easing {
    type Err = AnimationError;

    /// Accepts snake_case names with or without the `ease_` prefix;
    /// `catmull_rom` is accepted as an alias
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let normalized = match normalized.as_str() {
            "catmull_rom" => "catmullrom".to_string(),
            other if other.starts_with("in_") || other.starts_with("out_") => {
                format!("ease_{other}")
            }
            _ => normalized,
        };

        Self::ALL
            .into_iter()
            .find(|easing| easing.name() == normalized)
            .ok_or_else(|| AnimationError::UnknownEasing(s.to_string()))
    }
}

impl TryFrom<String> for Easing {
    type Error = AnimationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.name().to_string()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_endpoints() {
        for easing in Easing::ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing} at 1");
        }
        assert_eq!(Easing::Linear.apply(0.0), 0.0);
        assert_eq!(Easing::Linear.apply(1.0), 1.0);
    }

    #[test]
    fn test_output_is_clamped() {
        for easing in Easing::ALL {
            for i in 0..=100 {
                let y = easing.apply(i as f32 / 100.0);
                assert!((0.0..=1.0).contains(&y), "{easing} produced {y}");
            }
        }
    }

    #[test_case(Easing::Linear, 0.25, 0.25)]
    #[test_case(Easing::InQuad, 0.5, 0.25)]
    #[test_case(Easing::OutQuad, 0.5, 0.75)]
    #[test_case(Easing::InCubic, 0.5, 0.125)]
    #[test_case(Easing::InOutCubic, 0.25, 0.0625)]
    #[test_case(Easing::InOutSine, 0.5, 0.5)]
    #[test_case(Easing::OutBounce, 0.5, 0.765_625)]
    #[test_case(Easing::Step, 0.99, 0.0)]
    fn test_known_values(easing: Easing, x: f32, expected: f32) {
        assert!((easing.apply(x) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_back_overshoot_is_clamped() {
        // ease_in_back dips below zero early on
        assert_eq!(Easing::InBack.apply(0.2), 0.0);
        assert_eq!(Easing::OutBack.apply(0.8), 1.0);
    }

    #[test_case("linear", Easing::Linear)]
    #[test_case("catmullrom", Easing::CatmullRom)]
    #[test_case("catmull_rom", Easing::CatmullRom)]
    #[test_case("ease_in_out_elastic", Easing::InOutElastic)]
    #[test_case("out_bounce", Easing::OutBounce)]
    #[test_case("EASE_IN_SINE", Easing::InSine)]
    fn test_parse(name: &str, expected: Easing) {
        assert_eq!(name.parse::<Easing>(), Ok(expected));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "wobble".parse::<Easing>(),
            Err(AnimationError::UnknownEasing("wobble".to_string()))
        );
    }

    #[test]
    fn test_names_round_trip() {
        for easing in Easing::ALL {
            assert_eq!(easing.name().parse::<Easing>(), Ok(easing));
        }
    }
}
