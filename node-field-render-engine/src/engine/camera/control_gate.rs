use crate::engine::scene::node_field::NodeFieldRoot;
use crate::tools::gesture::machine;
use crate::tools::gesture::state::{GestureEffect, InteractionState};
use bevy::prelude::*;

/// Shared flag between the gesture layer and the camera controller.
///
/// Only the gesture systems turn it off, and only for the length of a drag.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraControlGate {
    pub enabled: bool,
}

impl Default for CameraControlGate {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn release(
    reason: &str,
    gate: &mut CameraControlGate,
    state: &mut InteractionState,
    effects: &mut EventWriter<GestureEffect>,
) {
    let was_enabled = gate.enabled;
    effects.write_batch(machine::teardown(state));
    gate.enabled = true;
    if !was_enabled {
        info!("Camera control re-enabled on {reason}");
    }
}

/// The field root going away ends any gesture in flight.
pub fn release_camera_on_field_teardown(
    mut removed: RemovedComponents<NodeFieldRoot>,
    mut gate: ResMut<CameraControlGate>,
    mut state: ResMut<InteractionState>,
    mut effects: EventWriter<GestureEffect>,
) {
    if removed.read().count() == 0 {
        return;
    }
    release("field teardown", &mut gate, &mut state, &mut effects);
}

pub fn release_camera_on_state_exit(
    mut gate: ResMut<CameraControlGate>,
    mut state: ResMut<InteractionState>,
    mut effects: EventWriter<GestureEffect>,
) {
    release("leaving the running state", &mut gate, &mut state, &mut effects);
}

pub fn release_camera_on_app_exit(
    mut exits: EventReader<AppExit>,
    mut gate: ResMut<CameraControlGate>,
    mut state: ResMut<InteractionState>,
    mut effects: EventWriter<GestureEffect>,
) {
    if exits.read().count() == 0 {
        return;
    }
    release("exit", &mut gate, &mut state, &mut effects);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::gesture::state::DragState;

    fn dragging_state() -> InteractionState {
        InteractionState {
            drag: DragState {
                is_dragging: true,
                dragged_index: Some(4),
                ..default()
            },
            camera_control_enabled: false,
            ..default()
        }
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<GestureEffect>()
            .add_event::<AppExit>()
            .insert_resource(CameraControlGate { enabled: false })
            .insert_resource(dragging_state())
            .add_systems(
                Update,
                (release_camera_on_field_teardown, release_camera_on_app_exit),
            );
        app
    }

    #[test]
    fn despawning_the_field_mid_drag_reenables_camera() {
        let mut app = app();
        let root = app.world_mut().spawn(NodeFieldRoot).id();
        app.update();
        assert!(!app.world().resource::<CameraControlGate>().enabled);

        app.world_mut().despawn(root);
        app.update();

        assert!(app.world().resource::<CameraControlGate>().enabled);
        let state = app.world().resource::<InteractionState>();
        assert!(!state.drag.is_dragging);
        assert!(state.camera_control_enabled);

        let events = app.world().resource::<Events<GestureEffect>>();
        let mut cursor = events.get_cursor();
        let sent: Vec<_> = cursor.read(events).cloned().collect();
        assert!(sent.contains(&GestureEffect::DragCancelled { index: 4 }));
        assert!(sent.contains(&GestureEffect::CameraControl { enabled: true }));
    }

    #[test]
    fn app_exit_reenables_camera() {
        let mut app = app();
        app.world_mut().send_event(AppExit::Success);
        app.update();
        assert!(app.world().resource::<CameraControlGate>().enabled);
    }
}
