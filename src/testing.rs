//! Headless app running Rapier, for system tests that need ray casts and
//! joints.

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::transform::TransformPlugin;
use bevy_rapier3d::prelude::*;

/// App with Rapier and no window or renderer.
///
/// Rapier's collider setup reads `Assets<Mesh>` and the scene spawner, so
/// both are registered. Spawned colliders become visible to ray casts after
/// one `app.update()`.
pub fn physics_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        TransformPlugin,
        AssetPlugin::default(),
        ScenePlugin,
        RapierPhysicsPlugin::<NoUserData>::default(),
    ))
    .init_asset::<Mesh>();
    app
}
