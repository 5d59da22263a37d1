use super::machine::{AnchorSource, GestureContext, InstancePicker, step};
use super::projection::ViewProjector;
use super::state::{DragOverrides, GestureEffect, InteractionState, PointerEvent};
use crate::engine::animation::clock::SceneClock;
use crate::engine::animation::offsets::AnimationFrame;
use crate::engine::assets::field_config::FieldConfig;
use crate::engine::camera::control_gate::CameraControlGate;
use crate::engine::camera::viewport_camera::NodeFieldCamera;
use crate::engine::picking::hit_test::{PickVolume, hit_test};
use crate::engine::picking::ray::ViewSnapshot;
use crate::engine::render::render_state::RenderState;
use crate::engine::scene::node_field::{NodeField, NodeFieldRoot};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::WindowEvent;

/// Last known pointer state plus the passive hover poll counter.
#[derive(Resource, Debug, Default)]
pub struct PointerTracker {
    pub position: Option<Vec2>,
    pub button_held: bool,
    frame: u32,
}

impl PointerTracker {
    /// Advances the frame counter and reports whether this frame polls hover.
    fn next_frame(&mut self, interval: u32) -> bool {
        let poll = self.frame % interval.max(1) == 0;
        self.frame = self.frame.wrapping_add(1);
        poll
    }
}

/// Hit-tests against the instance transforms written last frame.
struct BatchPicker<'a> {
    view: Option<&'a ViewSnapshot>,
    batch: Option<&'a RenderState>,
    volume: PickVolume,
    threshold: f32,
}

impl InstancePicker for BatchPicker<'_> {
    fn pick(&self, pointer: Vec2) -> Option<usize> {
        let (view, batch) = (self.view?, self.batch?);
        let ndc = view.viewport_to_ndc(pointer)?;
        hit_test(ndc, view, batch, self.volume, self.threshold)
    }
}

/// Orbiting anchors of the current layout at the scene clock.
struct FieldAnchors<'a> {
    field: &'a NodeField,
    frame: AnimationFrame<'a>,
}

impl AnchorSource for FieldAnchors<'_> {
    fn anchor(&self, index: usize) -> Option<Vec3> {
        self.field
            .points
            .get(index)
            .map(|point| self.frame.anchor(point))
    }
}

fn now_ms(time: &Time<Real>) -> f64 {
    time.elapsed_secs_f64() * 1000.0
}

/// Feeds window pointer events through the gesture machine in arrival order.
///
/// The camera is sampled once per frame, before any event is handled, so
/// every hit test in the frame sees the same view.
pub fn handle_pointer_events(
    mut window_events: EventReader<WindowEvent>,
    time: Res<Time<Real>>,
    cameras: Query<(&Camera, &GlobalTransform, &Projection), With<NodeFieldCamera>>,
    batches: Query<&RenderState, With<NodeFieldRoot>>,
    field: Res<NodeField>,
    clock: Res<SceneClock>,
    config: Res<FieldConfig>,
    mut tracker: ResMut<PointerTracker>,
    mut state: ResMut<InteractionState>,
    mut overrides: ResMut<DragOverrides>,
    mut gate: ResMut<CameraControlGate>,
    mut effects: EventWriter<GestureEffect>,
) {
    let settings = &config.interaction;
    let view = cameras
        .single()
        .ok()
        .and_then(|(camera, transform, projection)| {
            ViewSnapshot::from_camera(camera, transform, projection)
        });
    let picker = BatchPicker {
        view: view.as_ref(),
        batch: batches.single().ok(),
        volume: settings.pick_volume,
        threshold: settings.hit_threshold,
    };
    let anchors = FieldAnchors {
        field: &field,
        frame: AnimationFrame::new(clock.elapsed, &config.animation),
    };
    let projector = ViewProjector { view };
    let ctx = GestureContext {
        picker: &picker,
        anchors: &anchors,
        projector: &projector,
        settings,
        poll_hover: tracker.next_frame(settings.hover_poll_interval),
    };
    let time_ms = now_ms(&time);

    let mut pointer_events = Vec::new();
    for event in window_events.read() {
        match event {
            WindowEvent::CursorMoved(moved) => {
                tracker.position = Some(moved.position);
                pointer_events.push(PointerEvent::Move {
                    position: moved.position,
                    button_held: tracker.button_held,
                    time_ms,
                });
            }
            WindowEvent::MouseButtonInput(input) if input.button == MouseButton::Left => {
                let Some(position) = tracker.position else {
                    continue;
                };
                match input.state {
                    ButtonState::Pressed => {
                        tracker.button_held = true;
                        pointer_events.push(PointerEvent::Down { position, time_ms });
                    }
                    ButtonState::Released => {
                        tracker.button_held = false;
                        pointer_events.push(PointerEvent::Up { position, time_ms });
                    }
                }
            }
            WindowEvent::CursorLeft(_) => {
                tracker.position = None;
                tracker.button_held = false;
                pointer_events.push(PointerEvent::Leave { time_ms });
            }
            _ => {}
        }
    }

    // Ambient hover: instances move under a still pointer.
    if pointer_events.is_empty() && ctx.poll_hover && !tracker.button_held {
        if let Some(position) = tracker.position {
            pointer_events.push(PointerEvent::Move {
                position,
                button_held: false,
                time_ms,
            });
        }
    }

    for event in pointer_events {
        let produced = step(&mut state, event, &ctx, &mut overrides);
        gate.enabled = state.camera_control_enabled;
        for effect in &produced {
            debug!("gesture {event:?} -> {effect:?}");
        }
        effects.write_batch(produced);
    }
}
