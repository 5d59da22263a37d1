use crate::engine::core::app_state::{FpsText, StatusText};
use crate::tools::gesture::effects::StatusLine;
use bevy::prelude::*;

pub fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                StatusText,
            ));
        });
}

pub fn status_text_update_system(
    status: Res<StatusLine>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    if !status.is_changed() {
        return;
    }
    for mut text in &mut query {
        text.0.clone_from(&status.text);
    }
}
