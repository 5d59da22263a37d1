use crate::engine::animation::clock::SceneClock;
use crate::engine::assets::field_config::FieldConfig;
use crate::engine::camera::control_gate::CameraControlGate;
use crate::engine::loading::catalog_loader::ReloadCatalogEvent;
use crate::engine::scene::node_field::{RebuildFieldEvent, RebuildReason};
use crate::tools::gesture::machine;
use crate::tools::gesture::state::{DragOverrides, GestureEffect, InteractionState};
use bevy::prelude::*;

/// Keyboard shortcuts for the running field.
pub fn handle_field_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    clock: Res<SceneClock>,
    mut config: ResMut<FieldConfig>,
    mut state: ResMut<InteractionState>,
    mut overrides: ResMut<DragOverrides>,
    mut gate: ResMut<CameraControlGate>,
    mut rebuilds: EventWriter<RebuildFieldEvent>,
    mut reloads: EventWriter<ReloadCatalogEvent>,
    mut effects: EventWriter<GestureEffect>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        effects.write_batch(machine::reset(&mut state, &mut overrides));
        gate.enabled = state.camera_control_enabled;
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        let mut cleared = Vec::new();
        machine::clear_selection(&mut state, &mut cleared);
        effects.write_batch(cleared);
    }

    if keyboard.just_pressed(KeyCode::Space) {
        effects.write(GestureEffect::AnimationPlayback {
            playing: !clock.playing,
        });
    }

    let density_steps = i32::from(keyboard.just_pressed(KeyCode::BracketRight))
        - i32::from(keyboard.just_pressed(KeyCode::BracketLeft));
    if density_steps != 0 && config.step_density(density_steps) {
        info!("Density set to {:.0}%", config.density * 100.0);
        rebuilds.write(RebuildFieldEvent {
            reason: RebuildReason::Density,
        });
    }

    if keyboard.just_pressed(KeyCode::KeyV) {
        config.include_aliases = !config.include_aliases;
        info!(
            "Aliases {}",
            if config.include_aliases { "shown" } else { "hidden" }
        );
        rebuilds.write(RebuildFieldEvent {
            reason: RebuildReason::Aliases,
        });
    }

    if keyboard.just_pressed(KeyCode::KeyL) {
        reloads.write(ReloadCatalogEvent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<SceneClock>()
            .init_resource::<FieldConfig>()
            .init_resource::<InteractionState>()
            .init_resource::<DragOverrides>()
            .init_resource::<CameraControlGate>()
            .add_event::<RebuildFieldEvent>()
            .add_event::<ReloadCatalogEvent>()
            .add_event::<GestureEffect>()
            .add_systems(Update, handle_field_controls);
        app
    }

    fn press(app: &mut App, key: KeyCode) {
        let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keyboard.reset_all();
        keyboard.press(key);
    }

    fn sent<E: Event + Clone>(app: &App) -> Vec<E> {
        let events = app.world().resource::<Events<E>>();
        let mut cursor = events.get_cursor();
        cursor.read(events).cloned().collect()
    }

    #[test]
    fn reset_key_clears_overrides() {
        let mut app = app();
        {
            let mut overrides = app.world_mut().resource_mut::<DragOverrides>();
            overrides.insert(1, Vec3::ONE);
            overrides.insert(4, Vec3::NEG_ONE);
        }
        press(&mut app, KeyCode::KeyR);
        app.update();

        assert!(app.world().resource::<DragOverrides>().is_empty());
        assert!(app.world().resource::<CameraControlGate>().enabled);
        assert!(sent::<GestureEffect>(&app).contains(&GestureEffect::OverridesReset { cleared: 2 }));
    }

    #[test]
    fn density_keys_request_rebuilds_within_bounds() {
        let mut app = app();
        press(&mut app, KeyCode::BracketRight);
        app.update();
        // Already at full density.
        assert!(sent::<RebuildFieldEvent>(&app).is_empty());

        press(&mut app, KeyCode::BracketLeft);
        app.update();
        assert!((app.world().resource::<FieldConfig>().density - 0.9).abs() < 1e-5);
        assert_eq!(
            sent::<RebuildFieldEvent>(&app),
            vec![RebuildFieldEvent {
                reason: RebuildReason::Density
            }]
        );
    }

    #[test]
    fn alias_key_toggles_and_rebuilds() {
        let mut app = app();
        press(&mut app, KeyCode::KeyV);
        app.update();
        assert!(!app.world().resource::<FieldConfig>().include_aliases);
        assert_eq!(sent::<RebuildFieldEvent>(&app).len(), 1);
    }

    #[test]
    fn space_toggles_playback_through_effects() {
        let mut app = app();
        press(&mut app, KeyCode::Space);
        app.update();
        assert_eq!(
            sent::<GestureEffect>(&app),
            vec![GestureEffect::AnimationPlayback { playing: false }]
        );
    }
}
