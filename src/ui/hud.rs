//! In-game HUD - aim dot and inspect icon.

use bevy::prelude::*;

use crate::core::GameState;
use crate::inspect::AimIndicator;

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct AimDot;

/// Shown instead of the aim dot over inspectable objects.
#[derive(Component)]
pub struct InspectIcon;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            Update,
            update_aim_indicator.run_if(in_state(GameState::InGame)),
        );
}

/// Spawn the crosshair layer.
fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Px(4.0),
                    height: Val::Px(4.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.6)),
                AimDot,
            ));

            // Hollow square
            parent.spawn((
                Node {
                    width: Val::Px(18.0),
                    height: Val::Px(18.0),
                    border: UiRect::all(Val::Px(2.0)),
                    position_type: PositionType::Absolute,
                    ..default()
                },
                BorderColor(Color::srgba(1.0, 0.85, 0.3, 0.9)),
                BorderRadius::all(Val::Px(4.0)),
                Visibility::Hidden,
                InspectIcon,
            ));
        });
}

/// Visibility of (aim dot, inspect icon) for an indicator.
pub fn crosshair_visibility(indicator: AimIndicator) -> (Visibility, Visibility) {
    match indicator {
        AimIndicator::Dot => (Visibility::Inherited, Visibility::Hidden),
        AimIndicator::Inspect => (Visibility::Hidden, Visibility::Inherited),
        AimIndicator::Hidden => (Visibility::Hidden, Visibility::Hidden),
    }
}

fn update_aim_indicator(
    indicator: Res<AimIndicator>,
    mut dot_query: Query<&mut Visibility, (With<AimDot>, Without<InspectIcon>)>,
    mut icon_query: Query<&mut Visibility, (With<InspectIcon>, Without<AimDot>)>,
) {
    if !indicator.is_changed() {
        return;
    }
    let (dot, icon) = crosshair_visibility(*indicator);
    for mut visibility in dot_query.iter_mut() {
        *visibility = dot;
    }
    for mut visibility in icon_query.iter_mut() {
        *visibility = icon;
    }
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_crosshair_at_a_time() {
        for indicator in [AimIndicator::Dot, AimIndicator::Inspect, AimIndicator::Hidden] {
            let (dot, icon) = crosshair_visibility(indicator);
            assert!(dot == Visibility::Hidden || icon == Visibility::Hidden);
        }
        assert_eq!(
            crosshair_visibility(AimIndicator::Inspect),
            (Visibility::Hidden, Visibility::Inherited)
        );
    }
}
