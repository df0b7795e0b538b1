#![forbid(unsafe_code)]

//! Damped harmonic oscillator driving the wheel.
//!
//! The wheel position is a scalar pulled toward a target by a spring:
//!
//!   a = -ω² × (position - target) - 2ζω × velocity
//!
//! # Parameters
//!
//! - **angular frequency** (ω): how fast the spring responds. Default 100.
//! - **damping ratio** (ζ): velocity drag relative to critical damping.
//!   - Under-damped (ζ < 1): oscillates past the target before settling
//!   - Critically damped (ζ = 1): fastest convergence without overshoot
//!   - Over-damped (ζ > 1): slow tail, no overshoot. The default of 50 gives
//!     the long deceleration the wheel relies on.
//! - **tick**: the fixed step length, `1s / fps`.
//!
//! # Integration
//!
//! The step is exact for a fixed tick: the closed-form solution of the spring
//! ODE over one tick reduces to four coefficients that map the old
//! (displacement, velocity) pair to the new one. They are computed once in
//! [`SpinSpring::new`], so [`SpinSpring::update`] is two multiply-adds per
//! component. Explicit Euler stepping is unstable here: at the default
//! constants `2ζω × tick` is about 167.
//!
//! # Invariants
//!
//! 1. `update` is a pure function of its inputs and the constants.
//! 2. Starting from rest with ζ ≥ 1 the position never overshoots the target.
//! 3. Frequency and damping are never negative (clamped on construction).
//! 4. ω below `f64::EPSILON` makes `update` the identity.

use std::time::Duration;

/// Default step rate for the spin ticker.
pub const DEFAULT_FPS: u32 = 60;

/// Default angular frequency (ω).
pub const DEFAULT_ANGULAR_FREQUENCY: f64 = 100.0;

/// Default damping ratio (ζ).
pub const DEFAULT_DAMPING_RATIO: f64 = 50.0;

/// Tick interval for a given frame rate. `fps` of zero is treated as one.
#[must_use]
pub fn fps(n: u32) -> Duration {
    Duration::from_secs(1) / n.max(1)
}

/// A precomputed spring step for a fixed tick length.
///
/// # Example
///
/// ```
/// use roulette_core::spring::{SpinSpring, fps};
///
/// let spring = SpinSpring::new(fps(60), 6.0, 1.0);
/// let (mut pos, mut vel) = (0.0, 0.0);
/// for _ in 0..240 {
///     (pos, vel) = spring.update(pos, vel, 10.0);
/// }
/// assert!((pos - 10.0).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinSpring {
    tick: Duration,
    angular_frequency: f64,
    damping_ratio: f64,
    pos_pos: f64,
    pos_vel: f64,
    vel_pos: f64,
    vel_vel: f64,
}

impl Default for SpinSpring {
    fn default() -> Self {
        Self::new(
            fps(DEFAULT_FPS),
            DEFAULT_ANGULAR_FREQUENCY,
            DEFAULT_DAMPING_RATIO,
        )
    }
}

impl SpinSpring {
    /// Build a spring stepping by `tick`.
    ///
    /// Negative frequency or damping is clamped to zero.
    #[must_use]
    pub fn new(tick: Duration, angular_frequency: f64, damping_ratio: f64) -> Self {
        let omega = angular_frequency.max(0.0);
        let zeta = damping_ratio.max(0.0);
        let dt = tick.as_secs_f64();

        let mut spring = Self {
            tick,
            angular_frequency: omega,
            damping_ratio: zeta,
            pos_pos: 1.0,
            pos_vel: 0.0,
            vel_pos: 0.0,
            vel_vel: 1.0,
        };

        if omega < f64::EPSILON {
            return spring;
        }

        if zeta > 1.0 + f64::EPSILON {
            // Over-damped: two real roots z1 < z2 < 0.
            let za = -omega * zeta;
            let zb = omega * (zeta * zeta - 1.0).sqrt();
            let z1 = za - zb;
            let z2 = za + zb;

            let e1 = (z1 * dt).exp();
            let e2 = (z2 * dt).exp();
            let inv_two_zb = 1.0 / (2.0 * zb);

            let e1_over = e1 * inv_two_zb;
            let e2_over = e2 * inv_two_zb;
            let z1e1_over = z1 * e1_over;
            let z2e2_over = z2 * e2_over;

            spring.pos_pos = e1_over * z2 - z2e2_over + e2;
            spring.pos_vel = -e1_over + e2_over;
            spring.vel_pos = (z1e1_over - z2e2_over + e2) * z2;
            spring.vel_vel = -z1e1_over + z2e2_over;
        } else if zeta < 1.0 - f64::EPSILON {
            // Under-damped: complex roots.
            let omega_zeta = omega * zeta;
            let alpha = omega * (1.0 - zeta * zeta).sqrt();

            let exp_term = (-omega_zeta * dt).exp();
            let cos_term = (alpha * dt).cos();
            let sin_term = (alpha * dt).sin();
            let inv_alpha = 1.0 / alpha;

            let exp_sin = exp_term * sin_term;
            let exp_cos = exp_term * cos_term;
            let exp_omega_zeta_sin_over_alpha = exp_term * omega_zeta * sin_term * inv_alpha;

            spring.pos_pos = exp_cos + exp_omega_zeta_sin_over_alpha;
            spring.pos_vel = exp_sin * inv_alpha;
            spring.vel_pos = -exp_sin * alpha - omega_zeta * exp_omega_zeta_sin_over_alpha;
            spring.vel_vel = exp_cos - exp_omega_zeta_sin_over_alpha;
        } else {
            // Critically damped: repeated root.
            let exp_term = (-omega * dt).exp();
            let time_exp = dt * exp_term;
            let time_exp_freq = time_exp * omega;

            spring.pos_pos = time_exp_freq + exp_term;
            spring.pos_vel = time_exp;
            spring.vel_pos = -omega * time_exp_freq;
            spring.vel_vel = -time_exp_freq + exp_term;
        }

        spring
    }

    /// Advance one tick toward `target`, returning the new position and velocity.
    #[inline]
    #[must_use]
    pub fn update(&self, position: f64, velocity: f64, target: f64) -> (f64, f64) {
        let displacement = position - target;
        let new_position = displacement * self.pos_pos + velocity * self.pos_vel + target;
        let new_velocity = displacement * self.vel_pos + velocity * self.vel_vel;
        (new_position, new_velocity)
    }

    /// Tick length this spring was built for.
    #[inline]
    #[must_use]
    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Angular frequency (ω), after clamping.
    #[inline]
    #[must_use]
    pub fn angular_frequency(&self) -> f64 {
        self.angular_frequency
    }

    /// Damping ratio (ζ), after clamping.
    #[inline]
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(spring: &SpinSpring, target: f64, ticks: usize) -> Vec<f64> {
        let (mut pos, mut vel) = (0.0, 0.0);
        let mut positions = Vec::with_capacity(ticks);
        for _ in 0..ticks {
            (pos, vel) = spring.update(pos, vel, target);
            positions.push(pos);
        }
        positions
    }

    #[test]
    fn fps_interval() {
        assert_eq!(fps(60), Duration::from_secs(1) / 60);
        assert_eq!(fps(4), Duration::from_millis(250));
        assert_eq!(fps(0), Duration::from_secs(1));
    }

    #[test]
    fn default_spring_reaches_target() {
        let spring = SpinSpring::default();
        let positions = run(&spring, 600.0, 1200);
        let last = *positions.last().unwrap();
        assert!((last - 600.0).abs() < 0.5, "position: {last}");
    }

    #[test]
    fn overdamped_never_overshoots() {
        let spring = SpinSpring::default();
        let positions = run(&spring, 300.0, 2000);
        let max = positions.iter().copied().fold(f64::MIN, f64::max);
        assert!(max <= 300.0 + 1e-9, "overshoot: {max}");
    }

    #[test]
    fn critical_damping_converges() {
        let spring = SpinSpring::new(fps(60), 10.0, 1.0);
        let positions = run(&spring, 1.0, 120);
        let last = *positions.last().unwrap();
        assert!((last - 1.0).abs() < 0.001, "position: {last}");
        assert!(positions.iter().all(|&p| p <= 1.0 + 1e-9));
    }

    #[test]
    fn underdamped_oscillates() {
        let spring = SpinSpring::new(fps(60), 10.0, 0.2);
        let positions = run(&spring, 1.0, 300);
        let max = positions.iter().copied().fold(f64::MIN, f64::max);
        assert!(max > 1.0, "bouncy spring should overshoot, max was {max}");
        let last = *positions.last().unwrap();
        assert!((last - 1.0).abs() < 0.01, "position: {last}");
    }

    #[test]
    fn zero_frequency_is_identity() {
        let spring = SpinSpring::new(fps(60), 0.0, 50.0);
        assert_eq!(spring.update(3.5, 2.0, 100.0), (3.5, 2.0));
    }

    #[test]
    fn negative_constants_clamped() {
        let spring = SpinSpring::new(fps(60), -5.0, -1.0);
        assert!(spring.angular_frequency() >= 0.0);
        assert!(spring.damping_ratio() >= 0.0);
    }

    #[test]
    fn at_target_and_at_rest_stays() {
        let spring = SpinSpring::default();
        let (pos, vel) = spring.update(42.0, 0.0, 42.0);
        assert!((pos - 42.0).abs() < f64::EPSILON);
        assert!(vel.abs() < f64::EPSILON);
    }

    #[test]
    fn deterministic_across_runs() {
        let spring = SpinSpring::default();
        assert_eq!(run(&spring, 612.0, 500), run(&spring, 612.0, 500));
    }

    #[test]
    fn debug_format() {
        let dbg = format!("{:?}", SpinSpring::default());
        assert!(dbg.contains("SpinSpring"));
        assert!(dbg.contains("angular_frequency"));
    }
}
