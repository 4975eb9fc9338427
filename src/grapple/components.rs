//! Grapple state, rope bookkeeping and marker components.

use bevy::prelude::*;

use super::spring::Spring;
use crate::core::RopeType;

/// Marker for the fixed body at the first end of a rope.
#[derive(Component)]
pub struct HookAnchor;

/// Marker for the second end of a rope.
#[derive(Component)]
pub struct LatchAnchor;

/// Marker for the small models drawn at rope ends.
#[derive(Component)]
pub struct HookModel;

/// Walkable plank spawned along a rope between two static points.
#[derive(Component)]
pub struct RopePlank;

/// Sensor along a latched rope that the cut ray can hit.
#[derive(Component, Default)]
pub struct RopeCollider {
    /// Length the collider shape was last built for
    pub length: f32,
}

/// Which stage a rope is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RopePhase {
    /// Player is hanging from the hook
    Swing,
    /// Rope runs from the hook to a latch point; the player is free
    Latched,
}

/// A dynamic body held at the latched end of a rope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tether {
    pub body: Entity,
    /// Latch point in the body's local space
    pub local_anchor: Vec3,
}

/// One rope and every entity it owns.
#[derive(Debug, Clone)]
pub struct Rope {
    /// Which button fired it (Left or Right)
    pub hand: RopeType,
    pub phase: RopePhase,
    pub hook: Entity,
    /// World position of the hook anchor
    pub hook_point: Vec3,
    /// Model at the hand while swinging
    pub hand_model: Option<Entity>,
    pub latch: Option<Entity>,
    pub collider: Entity,
    pub plank: Option<Entity>,
    pub tether: Option<Tether>,
    /// Number of points drawn: `segments + 1` while waving, 2 once straight
    pub points: usize,
    pub min_distance: f32,
    pub max_distance: f32,
    pub retracting: bool,
}

impl Rope {
    /// All entities that must be despawned with this rope.
    pub fn owned_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        [Some(self.hook), self.hand_model, self.latch, Some(self.collider), self.plank]
            .into_iter()
            .flatten()
    }

    /// Whether a `DestroyRopesEvent` for `rope_type` covers this rope.
    pub fn matches(&self, rope_type: RopeType) -> bool {
        rope_type == RopeType::Both || rope_type == self.hand
    }
}

/// Distance limits of the player's swing joint for a hook `distance` away.
///
/// Left ropes hold the player at the hooked distance. Right ropes are
/// loose, allowing `slack` times the distance but resisting being pulled
/// much closer.
pub fn swing_limits(hand: RopeType, distance: f32, slack: f32) -> (f32, f32) {
    match hand {
        RopeType::Right => (distance * 0.95, distance * slack),
        _ => (distance * 0.025, distance),
    }
}

/// Hook input and every live rope.
#[derive(Resource, Debug, Default)]
pub struct GrappleState {
    pub ropes: Vec<Rope>,
    /// The newest rope is in its swing phase
    pub hooked: bool,
    /// A swing was let go and the swing rope should be dropped
    pub hook_release: bool,
    /// Button held long enough to swing
    pub execute_swing: bool,
    pub mouse_down_timer: f32,
    /// Seconds until latched ropes are drawn straight
    pub optimize_timer: Option<f32>,
    pub spring: Spring,
}

impl GrappleState {
    pub fn new(spring: Spring) -> Self {
        Self {
            spring,
            ..default()
        }
    }

    /// A hook button went down.
    pub fn press(&mut self) {
        self.mouse_down_timer = 0.0;
        self.hook_release = false;
        self.execute_swing = false;
    }

    /// A hook button is held for another `dt` seconds.
    pub fn hold(&mut self, dt: f32, hold_delay: f32) {
        self.mouse_down_timer += dt;
        if self.hooked && self.mouse_down_timer >= hold_delay && !self.execute_swing {
            self.execute_swing = true;
        }
    }

    /// A hook button came up. Returns true when this ends a swing, in which
    /// case the player gets a release impulse.
    pub fn release(&mut self, hold_delay: f32) -> bool {
        if self.mouse_down_timer >= hold_delay && self.execute_swing {
            self.execute_swing = false;
            self.hook_release = true;
            true
        } else {
            false
        }
    }

    /// Consume a pending swing release, if the player is still hooked.
    pub fn take_release(&mut self) -> bool {
        if self.hook_release && self.hooked {
            self.hook_release = false;
            true
        } else {
            false
        }
    }

    pub fn swing_rope(&self) -> Option<&Rope> {
        self.ropes.last().filter(|rope| rope.phase == RopePhase::Swing)
    }

    pub fn swing_rope_mut(&mut self) -> Option<&mut Rope> {
        self.ropes.last_mut().filter(|rope| rope.phase == RopePhase::Swing)
    }

    /// Add a freshly fired rope; older ropes stop waving.
    pub fn push_rope(&mut self, rope: Rope) {
        if let Some(previous) = self.ropes.last_mut() {
            previous.points = previous.points.min(2);
        }
        self.ropes.push(rope);
        self.hooked = true;
    }

    /// Index of the rope whose cut collider is `collider`.
    pub fn index_of_collider(&self, collider: Entity) -> Option<usize> {
        self.ropes.iter().position(|rope| rope.collider == collider)
    }

    /// Remove one rope.
    pub fn remove(&mut self, index: usize) -> Option<Rope> {
        if index >= self.ropes.len() {
            return None;
        }
        let rope = self.ropes.remove(index);
        if rope.phase == RopePhase::Swing || self.ropes.is_empty() {
            self.hooked = false;
        }
        Some(rope)
    }

    /// Remove the newest rope and clear the hooked flags.
    pub fn remove_last(&mut self) -> Option<Rope> {
        let rope = self.ropes.pop();
        self.hooked = false;
        self.hook_release = false;
        rope
    }

    /// Remove every rope matching `rope_type` (`None` removes all).
    pub fn drain_matching(&mut self, rope_type: Option<RopeType>) -> Vec<Rope> {
        let rope_type = rope_type.unwrap_or(RopeType::Both);
        let (removed, kept): (Vec<Rope>, Vec<Rope>) = std::mem::take(&mut self.ropes)
            .into_iter()
            .partition(|rope| rope.matches(rope_type));
        self.ropes = kept;

        if self.swing_rope().is_none() {
            self.hooked = false;
            self.hook_release = false;
        }
        removed
    }

    /// Count down the straightening timer. Returns true on the frame it expires.
    pub fn tick_optimizer(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.optimize_timer.as_mut() else {
            return false;
        };
        *remaining -= dt;
        if *remaining > 0.0 {
            return false;
        }
        self.optimize_timer = None;
        for rope in self.ropes.iter_mut().filter(|rope| rope.phase == RopePhase::Latched) {
            rope.points = 2;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rope(hand: RopeType, phase: RopePhase, id: u32) -> Rope {
        Rope {
            hand,
            phase,
            hook: Entity::from_raw(id * 10),
            hook_point: Vec3::ZERO,
            hand_model: None,
            latch: None,
            collider: Entity::from_raw(id * 10 + 1),
            plank: None,
            tether: None,
            points: 51,
            min_distance: 0.0,
            max_distance: 10.0,
            retracting: false,
        }
    }

    #[test]
    fn tap_does_not_swing() {
        let mut state = GrappleState::default();
        state.hooked = true;
        state.press();
        state.hold(0.1, 0.2);
        assert!(!state.execute_swing);
        assert!(!state.release(0.2));
        assert!(!state.hook_release);
    }

    #[test]
    fn hold_then_release_ends_swing() {
        let mut state = GrappleState::default();
        state.hooked = true;
        state.press();
        state.hold(0.15, 0.2);
        state.hold(0.15, 0.2);
        assert!(state.execute_swing);

        assert!(state.release(0.2));
        assert!(!state.execute_swing);
        assert!(state.take_release());
        assert!(!state.take_release(), "release is consumed once");
    }

    #[test]
    fn holding_without_a_hook_never_swings() {
        let mut state = GrappleState::default();
        state.press();
        state.hold(1.0, 0.2);
        assert!(!state.execute_swing);
        assert!(!state.release(0.2));
    }

    #[test]
    fn new_rope_straightens_the_previous_one() {
        let mut state = GrappleState::default();
        state.push_rope(rope(RopeType::Left, RopePhase::Latched, 1));
        state.push_rope(rope(RopeType::Right, RopePhase::Swing, 2));

        assert!(state.hooked);
        assert_eq!(state.ropes[0].points, 2);
        assert_eq!(state.ropes[1].points, 51);
        assert!(state.swing_rope().is_some());
    }

    #[test]
    fn drain_by_type_keeps_the_other_hand() {
        let mut state = GrappleState::default();
        state.push_rope(rope(RopeType::Left, RopePhase::Latched, 1));
        state.push_rope(rope(RopeType::Right, RopePhase::Latched, 2));
        state.push_rope(rope(RopeType::Left, RopePhase::Swing, 3));

        let removed = state.drain_matching(Some(RopeType::Left));
        assert_eq!(removed.len(), 2);
        assert_eq!(state.ropes.len(), 1);
        assert_eq!(state.ropes[0].hand, RopeType::Right);
        assert!(!state.hooked, "the swing rope went with the left ropes");
    }

    #[test]
    fn drain_all() {
        let mut state = GrappleState::default();
        state.push_rope(rope(RopeType::Left, RopePhase::Latched, 1));
        state.push_rope(rope(RopeType::Right, RopePhase::Swing, 2));

        assert_eq!(state.drain_matching(None).len(), 2);
        assert!(state.ropes.is_empty());
        assert!(!state.hooked);
    }

    #[test]
    fn collider_lookup_and_remove() {
        let mut state = GrappleState::default();
        state.push_rope(rope(RopeType::Left, RopePhase::Latched, 1));
        state.push_rope(rope(RopeType::Right, RopePhase::Latched, 2));
        state.hooked = false;

        let index = state.index_of_collider(Entity::from_raw(21)).unwrap();
        assert_eq!(index, 1);
        let removed = state.remove(index).unwrap();
        assert_eq!(removed.hand, RopeType::Right);
        assert!(state.index_of_collider(Entity::from_raw(21)).is_none());
        assert!(state.remove(5).is_none());
    }

    #[test]
    fn owned_entities_skip_missing_parts() {
        let mut r = rope(RopeType::Left, RopePhase::Latched, 1);
        assert_eq!(r.owned_entities().count(), 2);
        r.latch = Some(Entity::from_raw(99));
        r.plank = Some(Entity::from_raw(98));
        assert_eq!(r.owned_entities().count(), 4);
    }

    #[test]
    fn optimizer_straightens_latched_ropes_once() {
        let mut state = GrappleState::default();
        state.push_rope(rope(RopeType::Left, RopePhase::Latched, 1));
        state.hooked = false;
        state.optimize_timer = Some(1.0);

        assert!(!state.tick_optimizer(0.5));
        assert_eq!(state.ropes[0].points, 51);
        assert!(state.tick_optimizer(0.6));
        assert_eq!(state.ropes[0].points, 2);
        assert!(!state.tick_optimizer(1.0));
    }

    #[test]
    fn swing_limits_per_hand() {
        assert_eq!(swing_limits(RopeType::Left, 10.0, 3.0), (0.25, 10.0));
        let (min, max) = swing_limits(RopeType::Right, 10.0, 3.0);
        assert!((min - 9.5).abs() < 1e-5);
        assert_eq!(max, 30.0);
    }
}
