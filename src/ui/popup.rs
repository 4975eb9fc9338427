//! Info popups and scratchpad notices that fade out.

use bevy::prelude::*;

use crate::core::{GameSettings, GameState, PopupEvent};
use crate::scratchpad::ScratchpadNoticeEvent;

/// Text that fades after being shown.
#[derive(Component, Debug, Default)]
pub struct FadingText {
    pub remaining: f32,
    pub duration: f32,
}

impl FadingText {
    pub fn show(&mut self, duration: f32) {
        self.duration = duration.max(f32::EPSILON);
        self.remaining = self.duration;
    }

    /// Opacity for the time left.
    pub fn alpha(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.duration).clamp(0.0, 1.0)
    }
}

/// The centred popup.
#[derive(Component)]
pub struct PopupText;

/// The notice under the scratchpad hint.
#[derive(Component)]
pub struct NoticeText;

#[derive(Component)]
struct PopupRoot;

pub fn setup_popup_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_popups)
        .add_systems(OnExit(GameState::InGame), cleanup_popups)
        .add_systems(
            Update,
            (show_popups, show_notices, fade_texts)
                .chain()
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_popups(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            PopupRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.0)),
                Node {
                    margin: UiRect::top(Val::Px(120.0)),
                    ..default()
                },
                FadingText::default(),
                PopupText,
            ));
        });

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(20.0),
                bottom: Val::Px(20.0),
                ..default()
            },
            PopupRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgba(0.9, 0.9, 0.6, 0.0)),
                FadingText::default(),
                NoticeText,
            ));
        });
}

/// A newer popup replaces the current one.
fn show_popups(
    mut events: EventReader<PopupEvent>,
    settings: Res<GameSettings>,
    mut query: Query<(&mut Text, &mut FadingText), With<PopupText>>,
) {
    let Some(PopupEvent(message)) = events.read().last() else {
        return;
    };
    let Ok((mut text, mut fading)) = query.get_single_mut() else {
        return;
    };
    text.0 = message.clone();
    fading.show(settings.popup_duration);
    info!("Popup: {}", message);
}

fn show_notices(
    mut events: EventReader<ScratchpadNoticeEvent>,
    settings: Res<GameSettings>,
    mut query: Query<(&mut Text, &mut FadingText), (With<NoticeText>, Without<PopupText>)>,
) {
    let Some(ScratchpadNoticeEvent(message)) = events.read().last() else {
        return;
    };
    let Ok((mut text, mut fading)) = query.get_single_mut() else {
        return;
    };
    text.0 = message.clone();
    fading.show(settings.popup_duration);
}

/// Fade on real time so popups still clear while the game is paused.
fn fade_texts(time: Res<Time<Real>>, mut query: Query<(&mut FadingText, &mut TextColor)>) {
    for (mut fading, mut color) in query.iter_mut() {
        if fading.remaining <= 0.0 {
            continue;
        }
        fading.remaining -= time.delta_secs();
        color.0.set_alpha(fading.alpha());
    }
}

fn cleanup_popups(mut commands: Commands, query: Query<Entity, With<PopupRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
