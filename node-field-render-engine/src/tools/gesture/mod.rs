//! Pointer gestures over the node field.
//!
//! Window pointer events are normalised into [`state::PointerEvent`]s and fed
//! one at a time through a pure state machine. The machine returns
//! [`state::GestureEffect`]s, which the surrounding systems apply.
//!
//! ```text
//!            move (no button)            down on hit
//!   Idle <──────────────────> Hovering ──────────────> PressPending
//!    ^                                                   │       │
//!    │                          up on same index (click) │       │ held >= long_press_ms,
//!    │<──────────────────────────────────────────────────┘       │ then move
//!    │                                                           v
//!    │<──────────── up / leave / projection error ────────── Dragging
//! ```
//!
//! Camera control is disabled only while `Dragging` and every exit from it
//! re-enables the camera in the same step.

use crate::engine::camera::control_gate::CameraControlGate;
use crate::engine::core::app_state::{AppState, NodeFieldSet};
use bevy::prelude::*;

/// Applies gesture effects: playback, detail navigation and the status line.
pub mod effects;

/// Pure gesture transitions and the collaborator traits they consult.
pub mod machine;

/// Window event adapter feeding the machine with live hit tests.
pub mod pointer;

/// Camera-relative drag projection with an ordered fallback list.
pub mod projection;

/// Interaction state, drag overrides, pointer events and effects.
pub mod state;

pub struct GesturePlugin;

impl Plugin for GesturePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<state::InteractionState>()
            .init_resource::<state::DragOverrides>()
            .init_resource::<pointer::PointerTracker>()
            .init_resource::<CameraControlGate>()
            .init_resource::<effects::DetailViewNavigator>()
            .init_resource::<effects::StatusLine>()
            .add_event::<state::GestureEffect>()
            .add_systems(
                Update,
                (
                    pointer::handle_pointer_events.in_set(NodeFieldSet::Input),
                    effects::apply_gesture_effects.in_set(NodeFieldSet::Effects),
                )
                    .run_if(in_state(AppState::Running)),
            );
    }
}
