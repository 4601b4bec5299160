//! Timing functions for turn animations.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

const NEWTON_ITERATIONS: usize = 4;
const NEWTON_MIN_SLOPE: f32 = 0.001;
const SUBDIVISION_PRECISION: f32 = 0.000_000_1;
const SUBDIVISION_MAX_ITERATIONS: usize = 10;

const SPLINE_TABLE_SIZE: usize = 11;
const SAMPLE_STEP_SIZE: f32 = 1.0 / (SPLINE_TABLE_SIZE - 1) as f32;

/// Remaps linear animation progress to eased progress.
///
/// Every variant maps 0 to 0 and 1 to 1. In between, a cubic bezier may leave
/// the range `[0, 1]`.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Cosine from 0 to PI.
    Cosine,
    /// CSS-style `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Default for Easing {
    /// Anticipates below 0 and overshoots past 1 before settling.
    fn default() -> Self {
        Easing::CubicBezier {
            x1: 0.675,
            y1: -0.155,
            x2: 0.53,
            y2: 1.195,
        }
    }
}

impl Easing {
    /// Returns eased progress for linear progress `t` in the range `[0, 1]`.
    ///
    /// This prepares the curve on every call; use [`Self::curve()`] to
    /// evaluate the same easing many times.
    pub fn ease(self, t: f32) -> f32 {
        self.curve().ease(t)
    }

    /// Prepares this easing for repeated evaluation.
    pub fn curve(self) -> Curve {
        match self {
            Easing::Linear => Curve::Linear,
            Easing::Cosine => Curve::Cosine,
            Easing::CubicBezier { x1, y1, x2, y2 } => {
                Curve::CubicBezier(CubicBezier::new(x1, y1, x2, y2))
            }
        }
    }
}

/// [`Easing`] with its lookup tables built.
#[derive(Debug, Clone)]
pub enum Curve {
    Linear,
    Cosine,
    CubicBezier(CubicBezier),
}

impl Curve {
    /// Returns eased progress for linear progress `t` in the range `[0, 1]`.
    pub fn ease(&self, t: f32) -> f32 {
        match self {
            Curve::Linear => t,
            Curve::Cosine => (1.0 - (t * PI).cos()) / 2.0,
            Curve::CubicBezier(curve) => curve.ease(t),
        }
    }
}

/// Cubic bezier through `(0, 0)` and `(1, 1)` with two free control points,
/// evaluated as a function of x.
#[derive(Debug, Clone)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    samples: [f32; SPLINE_TABLE_SIZE],
}

impl CubicBezier {
    /// Constructs a curve. The x coordinates are clamped to `[0, 1]` so that
    /// x is monotonic in the curve parameter.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let x1 = x1.clamp(0.0, 1.0);
        let x2 = x2.clamp(0.0, 1.0);
        let samples = std::array::from_fn(|i| bezier(i as f32 * SAMPLE_STEP_SIZE, x1, x2));
        Self {
            x1,
            y1,
            x2,
            y2,
            samples,
        }
    }

    /// Returns the y coordinate of the curve at `x`.
    pub fn ease(&self, x: f32) -> f32 {
        if self.x1 == self.y1 && self.x2 == self.y2 {
            return x;
        }
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        bezier(self.t_for_x(x), self.y1, self.y2)
    }

    fn t_for_x(&self, x: f32) -> f32 {
        let last_sample = SPLINE_TABLE_SIZE - 1;

        let mut interval_start = 0.0;
        let mut current_sample = 1;
        while current_sample != last_sample && self.samples[current_sample] <= x {
            interval_start += SAMPLE_STEP_SIZE;
            current_sample += 1;
        }
        current_sample -= 1;

        // Interpolate linearly inside the sample interval for a first guess.
        let dist = (x - self.samples[current_sample])
            / (self.samples[current_sample + 1] - self.samples[current_sample]);
        let guess = interval_start + dist * SAMPLE_STEP_SIZE;

        let initial_slope = slope(guess, self.x1, self.x2);
        if initial_slope >= NEWTON_MIN_SLOPE {
            self.newton_raphson(x, guess)
        } else if initial_slope == 0.0 {
            guess
        } else {
            self.binary_subdivide(x, interval_start, interval_start + SAMPLE_STEP_SIZE)
        }
    }

    fn newton_raphson(&self, x: f32, mut guess: f32) -> f32 {
        for _ in 0..NEWTON_ITERATIONS {
            let s = slope(guess, self.x1, self.x2);
            if s == 0.0 {
                return guess;
            }
            guess -= (bezier(guess, self.x1, self.x2) - x) / s;
        }
        guess
    }

    fn binary_subdivide(&self, x: f32, mut a: f32, mut b: f32) -> f32 {
        let mut t = a;
        for _ in 0..SUBDIVISION_MAX_ITERATIONS {
            t = a + (b - a) / 2.0;
            let error = bezier(t, self.x1, self.x2) - x;
            if error > 0.0 {
                b = t;
            } else {
                a = t;
            }
            if error.abs() <= SUBDIVISION_PRECISION {
                break;
            }
        }
        t
    }
}

/// One coordinate of the curve at parameter `t`, given that coordinate of
/// both control points.
fn bezier(t: f32, p1: f32, p2: f32) -> f32 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// Derivative of [`bezier()`] with respect to `t`.
fn slope(t: f32, p1: f32, p2: f32) -> f32 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    3.0 * a * t * t + 2.0 * b * t + c
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in [Easing::Linear, Easing::Cosine, Easing::default()] {
            assert_abs_diff_eq!(easing.ease(0.0), 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(easing.ease(1.0), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_default_curve_overshoots() {
        let easing = Easing::default();
        assert!(easing.ease(0.1) < 0.0);
        assert!(easing.ease(0.9) > 1.0);
        assert_abs_diff_eq!(easing.ease(0.5), 0.3229, epsilon = 1e-3);
        assert_abs_diff_eq!(easing.ease(0.7), 0.8320, epsilon = 1e-3);
    }

    #[test]
    fn test_linear_bezier_is_identity() {
        let curve = CubicBezier::new(0.25, 0.25, 0.75, 0.75);
        for i in 0..=10 {
            let x = i as f32 / 10.0;
            assert_eq!(x, curve.ease(x));
        }
    }

    #[test]
    fn test_prepared_curve_matches_easing() {
        let easings = [
            Easing::Linear,
            Easing::Cosine,
            Easing::default(),
            Easing::CubicBezier {
                x1: 0.42,
                y1: 0.0,
                x2: 0.58,
                y2: 1.0,
            },
        ];
        for easing in easings {
            let curve = easing.curve();
            for i in 0..=50 {
                let t = i as f32 / 50.0;
                assert_eq!(easing.ease(t), curve.ease(t), "{easing:?} at {t}");
            }
        }
    }

    proptest! {
        #[test]
        fn proptest_bezier_matches_parametric_form(t in 0.0_f32..=1.0) {
            let curve = CubicBezier::new(0.675, -0.155, 0.53, 1.195);
            let x = bezier(t, 0.675, 0.53);
            let y = bezier(t, -0.155, 1.195);
            prop_assert!((curve.ease(x) - y).abs() < 1e-3);
        }
    }
}
