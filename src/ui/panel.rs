//! Scratchpad overlay listing collected nodes.

use bevy::prelude::*;

use crate::core::GameState;
use crate::scratchpad::{NodeData, Scratchpad};

#[derive(Component)]
pub struct ScratchpadPanel;

/// Parent of the node entries.
#[derive(Component)]
pub struct NodeList;

#[derive(Component)]
pub struct NodeEntry;

pub fn setup_panel_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_panel)
        .add_systems(OnExit(GameState::InGame), cleanup_panel)
        .add_systems(
            Update,
            (sync_node_list, sync_panel_visibility).run_if(in_state(GameState::InGame)),
        );
}

fn spawn_panel(mut commands: Commands) {
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
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            Visibility::Hidden,
            ScratchpadPanel,
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        width: Val::Px(520.0),
                        min_height: Val::Px(300.0),
                        flex_direction: FlexDirection::Column,
                        padding: UiRect::all(Val::Px(24.0)),
                        row_gap: Val::Px(10.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.93, 0.91, 0.84)),
                    BorderRadius::all(Val::Px(6.0)),
                ))
                .with_children(|paper| {
                    paper.spawn((
                        Text::new("Scratchpad"),
                        TextFont {
                            font_size: 32.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.15, 0.15, 0.2)),
                        Node {
                            margin: UiRect::bottom(Val::Px(12.0)),
                            ..default()
                        },
                    ));
                    paper.spawn((
                        Node {
                            flex_direction: FlexDirection::Column,
                            row_gap: Val::Px(8.0),
                            ..default()
                        },
                        NodeList,
                    ));
                });
        });
}

fn spawn_entry(parent: &mut ChildBuilder, node: &NodeData) {
    parent
        .spawn((
            Node {
                flex_direction: FlexDirection::Column,
                ..default()
            },
            NodeEntry,
        ))
        .with_children(|entry| {
            entry.spawn((
                Text::new(format!("{}  [{}]", node.title, node.id)),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(0.1, 0.1, 0.15)),
            ));
            if !node.description.is_empty() {
                entry.spawn((
                    Text::new(node.description.clone()),
                    TextFont {
                        font_size: 15.0,
                        ..default()
                    },
                    TextColor(Color::srgb(0.3, 0.3, 0.35)),
                ));
            }
        });
}

/// Add entries for nodes collected since the last frame.
fn sync_node_list(
    mut commands: Commands,
    scratchpad: Res<Scratchpad>,
    list_query: Query<(Entity, Option<&Children>), With<NodeList>>,
    entries: Query<(), With<NodeEntry>>,
) {
    if !scratchpad.is_changed() {
        return;
    }
    let Ok((list, children)) = list_query.get_single() else {
        return;
    };

    let shown = children
        .map(|children| children.iter().filter(|child| entries.contains(**child)).count())
        .unwrap_or(0);

    // Level restarts clear the scratchpad, so rebuild when it shrank
    if shown > scratchpad.nodes.len() {
        commands.entity(list).despawn_descendants();
        commands.entity(list).with_children(|parent| {
            for node in &scratchpad.nodes {
                spawn_entry(parent, node);
            }
        });
        return;
    }

    commands.entity(list).with_children(|parent| {
        for node in &scratchpad.nodes[shown..] {
            spawn_entry(parent, node);
        }
    });
}

fn sync_panel_visibility(scratchpad: Res<Scratchpad>, mut panel_query: Query<&mut Visibility, With<ScratchpadPanel>>) {
    if !scratchpad.is_changed() {
        return;
    }
    for mut visibility in panel_query.iter_mut() {
        *visibility = if scratchpad.open {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

fn cleanup_panel(mut commands: Commands, query: Query<Entity, With<ScratchpadPanel>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> NodeData {
        NodeData {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: "found it".to_string(),
            unique: false,
        }
    }

    #[test]
    fn entries_follow_the_scratchpad() {
        let mut app = App::new();
        app.init_resource::<Scratchpad>()
            .add_systems(Update, (sync_node_list, sync_panel_visibility));
        let list = app.world_mut().spawn(NodeList).id();
        let panel = app.world_mut().spawn((ScratchpadPanel, Visibility::Hidden)).id();

        {
            let mut scratchpad = app.world_mut().resource_mut::<Scratchpad>();
            scratchpad.add_node(node("a"));
            scratchpad.add_node(node("b"));
            scratchpad.open = true;
        }
        app.update();

        let count = |app: &App| app.world().get::<Children>(list).map_or(0, |c| c.len());
        assert_eq!(count(&app), 2);
        assert_eq!(app.world().get::<Visibility>(panel), Some(&Visibility::Inherited));

        app.world_mut().resource_mut::<Scratchpad>().add_node(node("c"));
        app.update();
        assert_eq!(count(&app), 3);

        app.world_mut().resource_mut::<Scratchpad>().nodes.truncate(1);
        app.update();
        assert_eq!(count(&app), 1);
    }
}
