//! Damped spring that drives the rope's wave when a hook lands.

/// Longest single integration step, in seconds.
pub const MAX_STEP: f32 = 1.0 / 60.0;

/// Most sub-steps taken for one frame.
pub const MAX_SUBSTEPS: u32 = 16;

/// A one-dimensional spring-damper pulled toward `target`.
///
/// Stepped with semi-implicit Euler: velocity first, then position from
/// the new velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spring {
    value: f32,
    velocity: f32,
    target: f32,
    damper: f32,
    strength: f32,
}

impl Spring {
    pub fn new(damper: f32, strength: f32) -> Self {
        Self {
            damper,
            strength,
            ..Default::default()
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn set_damper(&mut self, damper: f32) {
        self.damper = damper;
    }

    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength;
    }

    /// Kick the spring, e.g. when a rope snaps tight.
    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    /// Back to rest at zero. Target, damper and strength are kept.
    pub fn reset(&mut self) {
        self.value = 0.0;
        self.velocity = 0.0;
    }

    /// Advance by `dt` seconds in sub-steps of at most [`MAX_STEP`].
    ///
    /// Long frames are cut up so a stiff spring stays stable; frames longer
    /// than [`MAX_SUBSTEPS`] sub-steps only advance that far.
    pub fn update(&mut self, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }
        let dt = dt.min(MAX_STEP * MAX_SUBSTEPS as f32);
        let steps = ((dt / MAX_STEP).ceil() as u32).clamp(1, MAX_SUBSTEPS);
        let step = dt / steps as f32;
        for _ in 0..steps {
            self.step(step);
        }
    }

    fn step(&mut self, dt: f32) {
        let offset = self.target - self.value;
        let direction = if offset >= 0.0 { 1.0 } else { -1.0 };
        let force = offset.abs() * self.strength;

        self.velocity += (force * direction - self.velocity * self.damper) * dt;
        self.value += self.velocity * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_rest_on_target_stays_put() {
        let mut spring = Spring::new(12.0, 800.0);
        for _ in 0..100 {
            spring.update(1.0 / 60.0);
        }
        assert_eq!(spring.value(), 0.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn kicked_spring_settles_back_to_target() {
        let mut spring = Spring::new(12.0, 800.0);
        spring.set_velocity(12.0);

        spring.update(1.0 / 60.0);
        assert!(spring.value() > 0.0, "kick should move the value first");

        for _ in 0..600 {
            spring.update(1.0 / 60.0);
        }
        assert!(spring.value().abs() < 1e-3);
        assert!(spring.velocity().abs() < 1e-2);
    }

    #[test]
    fn moves_toward_new_target() {
        let mut spring = Spring::new(12.0, 800.0);
        spring.set_target(2.0);
        for _ in 0..600 {
            spring.update(1.0 / 60.0);
        }
        assert!((spring.value() - 2.0).abs() < 1e-3);
    }

    #[test]
    fn zero_dt_changes_nothing() {
        let mut spring = Spring::new(12.0, 800.0);
        spring.set_velocity(5.0);
        let before = spring;
        spring.update(0.0);
        assert_eq!(spring, before);
    }

    #[test]
    fn slow_frames_still_settle() {
        for dt in [0.1, 0.25] {
            let mut spring = Spring::new(12.0, 800.0);
            spring.set_velocity(12.0);
            for _ in 0..40 {
                spring.update(dt);
                assert!(spring.value().is_finite(), "dt = {dt}");
            }
            assert!(spring.value().abs() < 1e-3, "dt = {dt}: {}", spring.value());
        }
    }

    #[test]
    fn non_finite_dt_is_ignored() {
        let mut spring = Spring::new(12.0, 800.0);
        spring.set_velocity(5.0);
        let before = spring;
        spring.update(f32::NAN);
        spring.update(f32::INFINITY);
        spring.update(-1.0);
        assert_eq!(spring, before);
    }

    #[test]
    fn reset_keeps_tuning() {
        let mut spring = Spring::new(3.0, 40.0);
        spring.set_target(1.0);
        spring.set_velocity(4.0);
        spring.update(0.1);
        spring.reset();

        assert_eq!(spring.value(), 0.0);
        assert_eq!(spring.velocity(), 0.0);
        assert_eq!(spring, Spring { target: 1.0, ..Spring::new(3.0, 40.0) });
    }
}
