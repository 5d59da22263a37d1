use super::state::GestureEffect;
use crate::engine::animation::clock::SceneClock;
use crate::engine::assets::entity_catalog::EntityRecord;
use crate::engine::camera::control_gate::CameraControlGate;
use crate::engine::scene::node_field::NodeField;
use bevy::prelude::*;

type NavigateFn = Box<dyn Fn(&EntityRecord) + Send + Sync>;

/// Receives the full record of a double-activated entity.
#[derive(Resource)]
pub struct DetailViewNavigator {
    navigate: NavigateFn,
}

impl DetailViewNavigator {
    pub fn new(navigate: impl Fn(&EntityRecord) + Send + Sync + 'static) -> Self {
        Self {
            navigate: Box::new(navigate),
        }
    }

    pub fn open(&self, entity: &EntityRecord) {
        (self.navigate)(entity);
    }
}

impl Default for DetailViewNavigator {
    fn default() -> Self {
        Self::new(|entity| {
            info!(
                "Open detail view for {} ({}, {:?})",
                entity.name, entity.id, entity.category
            )
        })
    }
}

/// One-line description of the current interaction, shown in the overlay.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
}

fn entity_name(field: &NodeField, index: usize) -> &str {
    field.entity(index).map_or("unknown", |entity| entity.name.as_str())
}

pub fn apply_gesture_effects(
    mut effects: EventReader<GestureEffect>,
    field: Res<NodeField>,
    navigator: Res<DetailViewNavigator>,
    mut clock: ResMut<SceneClock>,
    mut status: ResMut<StatusLine>,
    mut gate: ResMut<CameraControlGate>,
) {
    for effect in effects.read() {
        match effect {
            GestureEffect::HoverChanged { current, .. } => {
                status.text = current
                    .map(|index| entity_name(&field, index).to_string())
                    .unwrap_or_default();
            }
            GestureEffect::SelectionChanged { current, .. } => {
                if let Some(entity) = current.and_then(|index| field.entity(index)) {
                    info!("Selected {} ({})", entity.name, entity.id);
                }
            }
            GestureEffect::AnimationPlayback { playing } => clock.set_playing(*playing),
            GestureEffect::DoubleActivate { index } => match field.entity(*index) {
                Some(entity) => navigator.open(entity),
                None => warn!("Double activate on unknown instance {index}"),
            },
            GestureEffect::DragStarted { index, .. } => {
                status.text = format!("Dragging {}", entity_name(&field, *index));
            }
            GestureEffect::DragEnded { .. }
            | GestureEffect::DragAborted { .. }
            | GestureEffect::DragCancelled { .. } => status.text.clear(),
            GestureEffect::OverridesReset { cleared } => {
                info!("Reset {cleared} dragged nodes to their layout positions");
            }
            GestureEffect::CameraControl { enabled } => gate.enabled = *enabled,
            GestureEffect::LongPressPending { .. } | GestureEffect::DragMoved { .. } => {}
        }
    }
}
