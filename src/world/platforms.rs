//! Moving platforms: eased ping-pong motion and a looped sound that
//! follows their speed.

use bevy::math::curve::{Curve, EaseFunction, EasingCurve};
use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioControl, AudioInstance, AudioTween};
use bevy_rapier3d::prelude::*;
use serde::Deserialize;

use super::builder::LevelEntity;
use super::data::PlatformDef;
use super::materials::MaterialRegistry;
use crate::audio::SoundLibrary;
use crate::player::PlayerCamera;

/// Platform sounds fade out linearly up to this distance.
const SOUND_MAX_DISTANCE: f32 = 120.0;
const MIN_PLATFORM_VOLUME: f32 = 0.3;

/// Easing applied to each leg of a platform's trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PlatformEase {
    Linear,
    InOutSine,
    InOutQuad,
    InOutCubic,
    #[default]
    InOutExpo,
}

impl PlatformEase {
    pub fn function(self) -> EaseFunction {
        match self {
            PlatformEase::Linear => EaseFunction::Linear,
            PlatformEase::InOutSine => EaseFunction::SineInOut,
            PlatformEase::InOutQuad => EaseFunction::QuadraticInOut,
            PlatformEase::InOutCubic => EaseFunction::CubicInOut,
            PlatformEase::InOutExpo => EaseFunction::ExponentialInOut,
        }
    }

    /// Eased progress for linear progress `t` in 0..=1.
    pub fn apply(self, t: f32) -> f32 {
        EasingCurve::new(0.0, 1.0, self.function()).sample_clamped(t)
    }
}

#[derive(Component, Debug, Clone)]
pub struct MovingPlatform {
    pub start: Vec3,
    pub local_move: Vec3,
    /// Seconds for one leg
    pub duration: f32,
    pub ease: PlatformEase,
    pub max_volume: f32,
    pub elapsed: f32,
    /// Velocity over the last frame, in units per second
    pub velocity: Vec3,
}

impl MovingPlatform {
    pub fn new(start: Vec3, local_move: Vec3, duration: f32, ease: PlatformEase, max_volume: f32) -> Self {
        Self {
            start,
            local_move,
            duration: duration.max(f32::EPSILON),
            ease,
            max_volume,
            elapsed: 0.0,
            velocity: Vec3::ZERO,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Average speed over a leg.
    pub fn max_speed(&self) -> f32 {
        self.local_move.length() / self.duration
    }

    /// Position `elapsed` seconds after the platform started out.
    pub fn position_at(&self, elapsed: f32) -> Vec3 {
        let cycle = elapsed.rem_euclid(self.duration * 2.0) / self.duration;
        let leg = if cycle <= 1.0 { cycle } else { 2.0 - cycle };
        self.start + self.local_move * self.ease.apply(leg)
    }
}

/// Loop volume and playback rate for a platform moving at `speed`.
pub fn sound_levels(speed: f32, max_speed: f32, max_volume: f32) -> (f32, f32) {
    if max_speed <= 0.0 {
        return (MIN_PLATFORM_VOLUME.min(max_volume), 0.0);
    }
    let ratio = speed / max_speed;
    let volume = ratio.clamp(MIN_PLATFORM_VOLUME, max_volume.max(MIN_PLATFORM_VOLUME));
    let pitch = ratio.clamp(0.0, 1.0);
    (volume, pitch)
}

/// Linear rolloff from full volume at the source to silence at the max distance.
pub fn distance_attenuation(distance: f32) -> f32 {
    (1.0 - distance / SOUND_MAX_DISTANCE).clamp(0.0, 1.0)
}

/// The platform's looped sound.
#[derive(Component)]
pub struct PlatformSound(pub Handle<AudioInstance>);

pub fn spawn_platform(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    mat_registry: &MaterialRegistry,
    def: &PlatformDef,
) {
    let start = Vec3::from(def.position);
    let size = Vec3::from(def.size);

    commands.spawn((
        Name::new("MovingPlatform"),
        MovingPlatform::new(start, Vec3::from(def.local_move), def.duration, def.ease, def.max_volume),
        Mesh3d(meshes.add(Cuboid::from_size(size))),
        MeshMaterial3d(mat_registry.get("metal")),
        Transform::from_translation(start),
        RigidBody::KinematicPositionBased,
        Collider::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0),
        LevelEntity,
    ));
}

pub fn move_platforms(time: Res<Time>, mut platforms: Query<(&mut MovingPlatform, &mut Transform)>) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for (mut platform, mut transform) in platforms.iter_mut() {
        platform.elapsed += dt;
        let next = platform.position_at(platform.elapsed);
        platform.velocity = (next - transform.translation) / dt;
        transform.translation = next;
    }
}

/// Start the loop for platforms that don't have one yet.
pub fn start_platform_sounds(
    mut commands: Commands,
    audio: Res<Audio>,
    library: Option<Res<SoundLibrary>>,
    platforms: Query<Entity, (With<MovingPlatform>, Without<PlatformSound>)>,
) {
    let Some(library) = library else {
        return;
    };

    for entity in platforms.iter() {
        let instance = audio
            .play(library.platform_loop.clone())
            .looped()
            .with_volume(0.0)
            .handle();
        commands.entity(entity).insert(PlatformSound(instance));
    }
}

pub fn update_platform_sounds(
    platforms: Query<(&MovingPlatform, &GlobalTransform, &PlatformSound)>,
    listener: Query<&GlobalTransform, With<PlayerCamera>>,
    mut instances: ResMut<Assets<AudioInstance>>,
) {
    let listener = listener.get_single().map(|t| t.translation()).ok();

    for (platform, transform, sound) in platforms.iter() {
        let Some(instance) = instances.get_mut(&sound.0) else {
            continue;
        };
        let (volume, pitch) = sound_levels(platform.speed(), platform.max_speed(), platform.max_volume);
        let attenuation = listener
            .map(|position| distance_attenuation(position.distance(transform.translation())))
            .unwrap_or(1.0);

        instance.set_volume((volume * attenuation) as f64, AudioTween::default());
        instance.set_playback_rate(pitch as f64, AudioTween::default());
    }
}

/// Platform loops are not tied to the entity, so stop them with the level.
pub fn stop_platform_sounds(sounds: Query<&PlatformSound>, mut instances: ResMut<Assets<AudioInstance>>) {
    for sound in sounds.iter() {
        if let Some(instance) = instances.get_mut(&sound.0) {
            instance.stop(AudioTween::default());
        }
    }
}
