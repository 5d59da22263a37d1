use crate::engine::picking::hit_test::PickVolume;
use crate::tools::gesture::projection::ProjectionError;
use bevy::prelude::*;
use constants::interaction::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Gesture thresholds, all overridable from the field config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub long_press_ms: f64,
    pub double_click_ms: f64,
    pub max_drag_radius: f32,
    pub hit_threshold: f32,
    pub hover_poll_interval: u32,
    pub click_move_tolerance_px: f32,
    pub pick_volume: PickVolume,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            long_press_ms: LONG_PRESS_MS,
            double_click_ms: DOUBLE_CLICK_MS,
            max_drag_radius: MAX_DRAG_RADIUS,
            hit_threshold: HIT_THRESHOLD,
            hover_poll_interval: HOVER_POLL_INTERVAL,
            click_move_tolerance_px: CLICK_MOVE_TOLERANCE_PX,
            pick_volume: PickVolume::Sphere,
        }
    }
}

/// Sparse per-index position overrides written while dragging.
///
/// Entries outlive the drag that wrote them and are only dropped by an
/// explicit reset or a field rebuild.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct DragOverrides {
    positions: HashMap<usize, Vec3>,
}

impl DragOverrides {
    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.positions.get(&index).copied()
    }

    pub fn insert(&mut self, index: usize, position: Vec3) {
        self.positions.insert(index, position);
    }

    /// Drops every override, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let cleared = self.positions.len();
        self.positions.clear();
        cleared
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.positions.contains_key(&index)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    pub is_dragging: bool,
    pub dragged_index: Option<usize>,
    /// Pointer position of the press that started the drag.
    pub drag_start_mouse: Vec2,
    pub drag_start_position: Vec3,
    pub drag_current_position: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Hovering,
    PressPending,
    Dragging,
}

/// Single-writer interaction state for the node field.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct InteractionState {
    pub hovered_index: Option<usize>,
    pub selected_index: Option<usize>,
    pub long_press_index: Option<usize>,
    pub long_press_start_time: Option<f64>,
    pub last_click_index: Option<usize>,
    /// Release time of the last single click.
    pub last_click_time: Option<f64>,
    /// Instance under the pointer at press time, kept until release.
    pub pressed_index: Option<usize>,
    pub press_position: Option<Vec2>,
    pub drag: DragState,
    pub camera_control_enabled: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            hovered_index: None,
            selected_index: None,
            long_press_index: None,
            long_press_start_time: None,
            last_click_index: None,
            last_click_time: None,
            pressed_index: None,
            press_position: None,
            drag: DragState::default(),
            camera_control_enabled: true,
        }
    }
}

impl InteractionState {
    pub fn phase(&self) -> GesturePhase {
        if self.drag.is_dragging {
            GesturePhase::Dragging
        } else if self.long_press_index.is_some() {
            GesturePhase::PressPending
        } else if self.hovered_index.is_some() {
            GesturePhase::Hovering
        } else {
            GesturePhase::Idle
        }
    }

    pub(crate) fn clear_press(&mut self) {
        self.long_press_index = None;
        self.long_press_start_time = None;
        self.pressed_index = None;
        self.press_position = None;
    }
}

/// Pointer input normalised from window events. Positions are logical window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move {
        position: Vec2,
        button_held: bool,
        time_ms: f64,
    },
    Down {
        position: Vec2,
        time_ms: f64,
    },
    Up {
        position: Vec2,
        time_ms: f64,
    },
    Leave {
        time_ms: f64,
    },
}

/// Outputs of the gesture machine, applied by the surrounding systems.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum GestureEffect {
    HoverChanged {
        previous: Option<usize>,
        current: Option<usize>,
    },
    SelectionChanged {
        previous: Option<usize>,
        current: Option<usize>,
    },
    AnimationPlayback {
        playing: bool,
    },
    DoubleActivate {
        index: usize,
    },
    LongPressPending {
        index: usize,
    },
    DragStarted {
        index: usize,
        start_position: Vec3,
    },
    DragMoved {
        index: usize,
        position: Vec3,
    },
    DragEnded {
        index: usize,
        position: Vec3,
    },
    DragAborted {
        index: usize,
        error: ProjectionError,
    },
    DragCancelled {
        index: usize,
    },
    OverridesReset {
        cleared: usize,
    },
    CameraControl {
        enabled: bool,
    },
}
