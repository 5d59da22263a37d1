use super::projection::{DragRequest, ProjectionError, clamp_drag_position};
use super::state::{
    DragOverrides, DragState, GestureEffect, InteractionSettings, InteractionState, PointerEvent,
};
use bevy::prelude::*;

/// Instance under a window-space pointer position.
pub trait InstancePicker {
    fn pick(&self, pointer: Vec2) -> Option<usize>;
}

/// Current animated anchor of an instance, used when a drag begins without an override.
pub trait AnchorSource {
    fn anchor(&self, index: usize) -> Option<Vec3>;
}

/// Maps a pointer delta to a world position for the dragged instance.
pub trait DragProjector {
    fn project(&self, request: &DragRequest) -> Result<Vec3, ProjectionError>;
}

/// Everything the machine reads but does not own, captured for one event.
pub struct GestureContext<'a> {
    pub picker: &'a dyn InstancePicker,
    pub anchors: &'a dyn AnchorSource,
    pub projector: &'a dyn DragProjector,
    pub settings: &'a InteractionSettings,
    /// Passive hover hit-tests run only when set. Presses and releases always hit-test.
    pub poll_hover: bool,
}

/// Advances the gesture machine by one pointer event.
///
/// All writes to `state` and `overrides` happen here; the returned effects are
/// applied by the surrounding systems.
pub fn step(
    state: &mut InteractionState,
    event: PointerEvent,
    ctx: &GestureContext,
    overrides: &mut DragOverrides,
) -> Vec<GestureEffect> {
    let mut effects = Vec::new();
    match event {
        PointerEvent::Move {
            position,
            button_held,
            time_ms,
        } => {
            if state.drag.is_dragging {
                drag_to(state, position, ctx, overrides, &mut effects);
            } else if let (Some(index), Some(start), true) =
                (state.long_press_index, state.long_press_start_time, button_held)
            {
                if time_ms - start >= ctx.settings.long_press_ms {
                    begin_drag(state, index, ctx, overrides, &mut effects);
                    drag_to(state, position, ctx, overrides, &mut effects);
                }
            } else {
                if !button_held && state.pressed_index.is_some() {
                    // Release happened outside the window.
                    state.clear_press();
                }
                if ctx.poll_hover && !button_held {
                    set_hover(state, ctx.picker.pick(position), &mut effects);
                }
            }
        }
        PointerEvent::Down { position, time_ms } => {
            if state.drag.is_dragging {
                end_drag(state, &mut effects);
            }
            let hit = ctx.picker.pick(position);
            state.press_position = Some(position);
            state.pressed_index = hit;
            if let Some(index) = hit {
                state.long_press_index = Some(index);
                state.long_press_start_time = Some(time_ms);
                effects.push(GestureEffect::LongPressPending { index });
            }
            set_hover(state, hit, &mut effects);
        }
        PointerEvent::Up { position, time_ms } => {
            if state.drag.is_dragging {
                end_drag(state, &mut effects);
            } else {
                let released = ctx.picker.pick(position);
                match (state.pressed_index, released) {
                    (Some(pressed), Some(released)) if pressed == released => {
                        let press_time = state.long_press_start_time.unwrap_or(time_ms);
                        click(state, released, press_time, time_ms, ctx.settings, &mut effects);
                    }
                    (None, None) => {
                        let stayed = state.press_position.is_some_and(|press| {
                            press.distance(position) <= ctx.settings.click_move_tolerance_px
                        });
                        if stayed {
                            clear_selection(state, &mut effects);
                        }
                    }
                    _ => {}
                }
                set_hover(state, released, &mut effects);
            }
            state.clear_press();
            set_camera(state, true, &mut effects);
        }
        PointerEvent::Leave { .. } => {
            if state.drag.is_dragging {
                end_drag(state, &mut effects);
            }
            set_hover(state, None, &mut effects);
            state.clear_press();
            state.camera_control_enabled = true;
            effects.push(GestureEffect::CameraControl { enabled: true });
        }
    }
    effects
}

/// Drops every drag override and cancels an in-flight drag.
pub fn reset(state: &mut InteractionState, overrides: &mut DragOverrides) -> Vec<GestureEffect> {
    let mut effects = Vec::new();
    if let Some(index) = state.drag.dragged_index.filter(|_| state.drag.is_dragging) {
        effects.push(GestureEffect::DragCancelled { index });
    }
    state.drag = DragState::default();
    state.clear_press();
    let cleared = overrides.clear();
    effects.push(GestureEffect::OverridesReset { cleared });
    set_camera(state, true, &mut effects);
    effects
}

/// Returns the machine to its initial value. Always re-enables the camera.
pub fn teardown(state: &mut InteractionState) -> Vec<GestureEffect> {
    let mut effects = Vec::new();
    if let Some(index) = state.drag.dragged_index.filter(|_| state.drag.is_dragging) {
        effects.push(GestureEffect::DragCancelled { index });
    }
    *state = InteractionState::default();
    effects.push(GestureEffect::CameraControl { enabled: true });
    effects
}

pub fn clear_selection(state: &mut InteractionState, effects: &mut Vec<GestureEffect>) {
    if let Some(previous) = state.selected_index.take() {
        effects.push(GestureEffect::SelectionChanged {
            previous: Some(previous),
            current: None,
        });
        effects.push(GestureEffect::AnimationPlayback { playing: true });
    }
}

fn click(
    state: &mut InteractionState,
    index: usize,
    press_time: f64,
    release_time: f64,
    settings: &InteractionSettings,
    effects: &mut Vec<GestureEffect>,
) {
    let repeat = state.last_click_index == Some(index)
        && state
            .last_click_time
            .is_some_and(|last| press_time - last < settings.double_click_ms);

    if repeat {
        debug!("double activate on instance {index}");
        effects.push(GestureEffect::DoubleActivate { index });
        state.last_click_index = None;
        state.last_click_time = None;
        return;
    }

    let previous = state.selected_index;
    let current = if previous == Some(index) { None } else { Some(index) };
    state.selected_index = current;
    effects.push(GestureEffect::SelectionChanged { previous, current });
    effects.push(GestureEffect::AnimationPlayback {
        playing: current.is_none(),
    });
    state.last_click_index = Some(index);
    state.last_click_time = Some(release_time);
}

fn begin_drag(
    state: &mut InteractionState,
    index: usize,
    ctx: &GestureContext,
    overrides: &DragOverrides,
    effects: &mut Vec<GestureEffect>,
) {
    let start_position = overrides
        .get(index)
        .or_else(|| ctx.anchors.anchor(index))
        .unwrap_or(Vec3::ZERO);
    let start_mouse = state.press_position.unwrap_or_default();

    state.long_press_index = None;
    state.long_press_start_time = None;
    state.drag = DragState {
        is_dragging: true,
        dragged_index: Some(index),
        drag_start_mouse: start_mouse,
        drag_start_position: start_position,
        drag_current_position: start_position,
    };
    debug!("drag started on instance {index} at {start_position}");
    effects.push(GestureEffect::DragStarted {
        index,
        start_position,
    });
    set_camera(state, false, effects);
}

fn drag_to(
    state: &mut InteractionState,
    pointer: Vec2,
    ctx: &GestureContext,
    overrides: &mut DragOverrides,
    effects: &mut Vec<GestureEffect>,
) {
    let Some(index) = state.drag.dragged_index else {
        abort_drag(state, None, ProjectionError::NoStrategy, overrides, effects);
        return;
    };
    let request = DragRequest {
        start_position: state.drag.drag_start_position,
        start_pointer: state.drag.drag_start_mouse,
        current_pointer: pointer,
    };
    let projected = ctx
        .projector
        .project(&request)
        .and_then(|position| clamp_drag_position(position, ctx.settings.max_drag_radius));

    match projected {
        Ok(position) => {
            overrides.insert(index, position);
            state.drag.drag_current_position = position;
            effects.push(GestureEffect::DragMoved { index, position });
        }
        Err(error) => abort_drag(state, Some(index), error, overrides, effects),
    }
}

fn abort_drag(
    state: &mut InteractionState,
    index: Option<usize>,
    error: ProjectionError,
    overrides: &mut DragOverrides,
    effects: &mut Vec<GestureEffect>,
) {
    warn!("Drag aborted: {error}");
    if let Some(index) = index {
        overrides.insert(index, state.drag.drag_start_position);
        effects.push(GestureEffect::DragAborted { index, error });
    }
    state.drag = DragState::default();
    state.clear_press();
    set_camera(state, true, effects);
}

fn end_drag(state: &mut InteractionState, effects: &mut Vec<GestureEffect>) {
    if let Some(index) = state.drag.dragged_index {
        effects.push(GestureEffect::DragEnded {
            index,
            position: state.drag.drag_current_position,
        });
    }
    state.drag = DragState::default();
    set_camera(state, true, effects);
}

fn set_hover(state: &mut InteractionState, hovered: Option<usize>, effects: &mut Vec<GestureEffect>) {
    if state.hovered_index != hovered {
        effects.push(GestureEffect::HoverChanged {
            previous: state.hovered_index,
            current: hovered,
        });
        state.hovered_index = hovered;
    }
}

fn set_camera(state: &mut InteractionState, enabled: bool, effects: &mut Vec<GestureEffect>) {
    if state.camera_control_enabled != enabled {
        state.camera_control_enabled = enabled;
        effects.push(GestureEffect::CameraControl { enabled });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::gesture::state::GesturePhase;
    use std::cell::Cell;

    /// Instances hit by x-coordinate bucket: pointer x in [100*i, 100*i + 50) hits i.
    struct StripPicker;

    impl InstancePicker for StripPicker {
        fn pick(&self, pointer: Vec2) -> Option<usize> {
            let bucket = (pointer.x / 100.0).floor();
            (bucket >= 0.0 && pointer.x - bucket * 100.0 < 50.0).then_some(bucket as usize)
        }
    }

    struct IndexAnchors;

    impl AnchorSource for IndexAnchors {
        fn anchor(&self, index: usize) -> Option<Vec3> {
            Some(Vec3::new(index as f32, 0.0, 0.0))
        }
    }

    /// One world unit per ten pixels along x.
    struct LinearProjector;

    impl DragProjector for LinearProjector {
        fn project(&self, request: &DragRequest) -> Result<Vec3, ProjectionError> {
            let delta = request.current_pointer - request.start_pointer;
            Ok(request.start_position + Vec3::new(delta.x / 10.0, -delta.y / 10.0, 0.0))
        }
    }

    struct FailingProjector {
        calls: Cell<u32>,
    }

    impl DragProjector for FailingProjector {
        fn project(&self, _: &DragRequest) -> Result<Vec3, ProjectionError> {
            self.calls.set(self.calls.get() + 1);
            Err(ProjectionError::ParallelPlane)
        }
    }

    struct NanProjector;

    impl DragProjector for NanProjector {
        fn project(&self, _: &DragRequest) -> Result<Vec3, ProjectionError> {
            Ok(Vec3::splat(f32::NAN))
        }
    }

    struct Harness {
        state: InteractionState,
        overrides: DragOverrides,
        settings: InteractionSettings,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                state: InteractionState::default(),
                overrides: DragOverrides::default(),
                settings: InteractionSettings::default(),
            }
        }

        fn send_with(&mut self, projector: &dyn DragProjector, event: PointerEvent) -> Vec<GestureEffect> {
            let ctx = GestureContext {
                picker: &StripPicker,
                anchors: &IndexAnchors,
                projector,
                settings: &self.settings,
                poll_hover: true,
            };
            step(&mut self.state, event, &ctx, &mut self.overrides)
        }

        fn send(&mut self, event: PointerEvent) -> Vec<GestureEffect> {
            self.send_with(&LinearProjector, event)
        }

        fn down(&mut self, x: f32, time_ms: f64) -> Vec<GestureEffect> {
            self.send(PointerEvent::Down {
                position: Vec2::new(x, 10.0),
                time_ms,
            })
        }

        fn up(&mut self, x: f32, time_ms: f64) -> Vec<GestureEffect> {
            self.send(PointerEvent::Up {
                position: Vec2::new(x, 10.0),
                time_ms,
            })
        }

        fn held_move(&mut self, x: f32, time_ms: f64) -> Vec<GestureEffect> {
            self.send(PointerEvent::Move {
                position: Vec2::new(x, 10.0),
                button_held: true,
                time_ms,
            })
        }
    }

    fn count(effects: &[GestureEffect], predicate: impl Fn(&GestureEffect) -> bool) -> usize {
        effects.iter().filter(|effect| predicate(effect)).count()
    }

    #[test]
    fn hover_follows_pointer_without_button() {
        let mut h = Harness::new();
        let effects = h.send(PointerEvent::Move {
            position: Vec2::new(210.0, 0.0),
            button_held: false,
            time_ms: 0.0,
        });
        assert_eq!(
            effects,
            vec![GestureEffect::HoverChanged {
                previous: None,
                current: Some(2)
            }]
        );
        assert_eq!(h.state.phase(), GesturePhase::Hovering);

        let effects = h.send(PointerEvent::Move {
            position: Vec2::new(260.0, 0.0),
            button_held: false,
            time_ms: 16.0,
        });
        assert_eq!(h.state.hovered_index, None);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn quick_press_release_selects_without_override() {
        let mut h = Harness::new();
        h.down(110.0, 0.0);
        h.held_move(130.0, 120.0);
        let effects = h.up(130.0, 150.0);

        assert!(h.overrides.is_empty());
        assert_eq!(h.state.selected_index, Some(1));
        assert!(effects.contains(&GestureEffect::AnimationPlayback { playing: false }));
        assert!(h.state.camera_control_enabled);
    }

    #[test]
    fn long_press_then_move_overrides_only_pressed_index() {
        let mut h = Harness::new();
        h.down(310.0, 0.0);
        assert!(h.held_move(315.0, 100.0).is_empty());

        let effects = h.held_move(340.0, 320.0);
        assert_eq!(
            count(&effects, |e| matches!(e, GestureEffect::DragStarted { index: 3, .. })),
            1
        );
        assert!(!h.state.camera_control_enabled);
        assert!(h.state.long_press_index.is_none());

        h.held_move(360.0, 340.0);
        assert_eq!(h.overrides.len(), 1);
        assert_eq!(h.overrides.get(3), Some(Vec3::new(8.0, 0.0, 0.0)));

        let effects = h.up(360.0, 400.0);
        assert!(effects.contains(&GestureEffect::CameraControl { enabled: true }));
        assert!(h.state.selected_index.is_none());
        // Displacement survives the release.
        assert_eq!(h.overrides.get(3), Some(Vec3::new(8.0, 0.0, 0.0)));
    }

    #[test]
    fn drag_is_clamped_to_max_radius() {
        let mut h = Harness::new();
        h.settings.max_drag_radius = 5.0;
        h.down(10.0, 0.0);
        h.held_move(2010.0, 400.0);
        let position = h.overrides.get(0).unwrap();
        assert!((position.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn successive_drags_compose_from_existing_override() {
        let mut h = Harness::new();
        h.down(10.0, 0.0);
        h.held_move(30.0, 310.0);
        h.up(30.0, 320.0);
        assert_eq!(h.overrides.get(0), Some(Vec3::new(2.0, 0.0, 0.0)));

        h.down(10.0, 1000.0);
        let effects = h.held_move(40.0, 1310.0);
        assert!(effects.contains(&GestureEffect::DragStarted {
            index: 0,
            start_position: Vec3::new(2.0, 0.0, 0.0)
        }));
        assert_eq!(h.overrides.get(0), Some(Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn projection_failure_never_locks_camera() {
        let mut h = Harness::new();
        let failing = FailingProjector { calls: Cell::new(0) };
        h.down(110.0, 0.0);
        let effects = h.send_with(
            &failing,
            PointerEvent::Move {
                position: Vec2::new(150.0, 10.0),
                button_held: true,
                time_ms: 400.0,
            },
        );

        assert_eq!(failing.calls.get(), 1);
        assert!(h.state.camera_control_enabled);
        assert!(!h.state.drag.is_dragging);
        assert_eq!(h.overrides.get(1), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert!(effects.contains(&GestureEffect::DragAborted {
            index: 1,
            error: ProjectionError::ParallelPlane
        }));
        assert_eq!(effects.last(), Some(&GestureEffect::CameraControl { enabled: true }));
    }

    #[test]
    fn non_finite_projection_falls_back_to_start_position() {
        let mut h = Harness::new();
        h.down(210.0, 0.0);
        h.send_with(
            &NanProjector,
            PointerEvent::Move {
                position: Vec2::new(250.0, 10.0),
                button_held: true,
                time_ms: 400.0,
            },
        );
        let position = h.overrides.get(2).unwrap();
        assert!(position.is_finite());
        assert_eq!(position, Vec3::new(2.0, 0.0, 0.0));
        assert!(h.state.camera_control_enabled);
    }

    #[test]
    fn fast_second_click_double_activates_once() {
        let mut h = Harness::new();
        h.down(10.0, 0.0);
        h.up(10.0, 50.0);
        h.down(10.0, 200.0);
        let effects = h.up(10.0, 240.0);

        assert_eq!(
            count(&effects, |e| matches!(e, GestureEffect::DoubleActivate { index: 0 })),
            1
        );
        assert!(!effects.iter().any(|e| matches!(e, GestureEffect::SelectionChanged { .. })));
        assert_eq!(h.state.selected_index, Some(0));
    }

    #[test]
    fn slow_second_click_toggles_twice() {
        let mut h = Harness::new();
        h.down(10.0, 0.0);
        let first = h.up(10.0, 50.0);
        h.down(10.0, 350.0);
        let second = h.up(10.0, 400.0);

        let all: Vec<_> = first.iter().chain(second.iter()).collect();
        assert!(!all.iter().any(|e| matches!(e, GestureEffect::DoubleActivate { .. })));
        assert!(second.contains(&GestureEffect::SelectionChanged {
            previous: Some(0),
            current: None
        }));
        assert!(second.contains(&GestureEffect::AnimationPlayback { playing: true }));
        assert_eq!(h.state.selected_index, None);
    }

    #[test]
    fn background_click_clears_selection() {
        let mut h = Harness::new();
        h.down(10.0, 0.0);
        h.up(10.0, 40.0);
        assert_eq!(h.state.selected_index, Some(0));

        h.down(70.0, 1000.0);
        let effects = h.up(72.0, 1040.0);
        assert_eq!(h.state.selected_index, None);
        assert!(effects.contains(&GestureEffect::AnimationPlayback { playing: true }));

        // Pan gesture on background keeps the selection.
        h.down(10.0, 2000.0);
        h.up(10.0, 2040.0);
        h.down(70.0, 3000.0);
        h.up(90.0, 3100.0);
        assert_eq!(h.state.selected_index, Some(0));
    }

    #[test]
    fn leave_ends_drag_and_enables_camera() {
        let mut h = Harness::new();
        h.down(10.0, 0.0);
        h.held_move(30.0, 310.0);
        assert!(!h.state.camera_control_enabled);

        let effects = h.send(PointerEvent::Leave { time_ms: 320.0 });
        assert!(h.state.camera_control_enabled);
        assert!(!h.state.drag.is_dragging);
        assert!(effects.contains(&GestureEffect::CameraControl { enabled: true }));
        assert!(h.overrides.contains(0));
    }

    #[test]
    fn reset_clears_overrides_and_cancels_drag() {
        let mut h = Harness::new();
        h.down(10.0, 0.0);
        h.held_move(30.0, 310.0);
        h.down(110.0, 0.0);
        h.held_move(150.0, 310.0);
        assert_eq!(h.overrides.len(), 2);
        assert!(h.state.drag.is_dragging);

        let effects = reset(&mut h.state, &mut h.overrides);
        assert!(h.overrides.is_empty());
        assert!(h.state.camera_control_enabled);
        assert!(effects.contains(&GestureEffect::DragCancelled { index: 1 }));
        assert!(effects.contains(&GestureEffect::OverridesReset { cleared: 2 }));
    }

    #[test]
    fn teardown_always_reenables_camera() {
        let mut h = Harness::new();
        h.down(10.0, 0.0);
        h.held_move(30.0, 310.0);
        let effects = teardown(&mut h.state);
        assert_eq!(h.state, InteractionState::default());
        assert_eq!(effects.last(), Some(&GestureEffect::CameraControl { enabled: true }));
    }

    #[test]
    fn throttled_hover_skips_passive_hit_tests() {
        let mut h = Harness::new();
        let ctx = GestureContext {
            picker: &StripPicker,
            anchors: &IndexAnchors,
            projector: &LinearProjector,
            settings: &h.settings,
            poll_hover: false,
        };
        let effects = step(
            &mut h.state,
            PointerEvent::Move {
                position: Vec2::new(10.0, 0.0),
                button_held: false,
                time_ms: 0.0,
            },
            &ctx,
            &mut h.overrides,
        );
        assert!(effects.is_empty());

        // Presses are never throttled.
        let effects = step(
            &mut h.state,
            PointerEvent::Down {
                position: Vec2::new(10.0, 0.0),
                time_ms: 5.0,
            },
            &ctx,
            &mut h.overrides,
        );
        assert!(effects.contains(&GestureEffect::LongPressPending { index: 0 }));
    }
}
