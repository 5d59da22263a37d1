use crate::engine::assets::entity_catalog::{EntityCatalog, EntityRecord};
use crate::engine::assets::field_config::FieldConfig;
use crate::engine::camera::control_gate::CameraControlGate;
use crate::engine::camera::viewport_camera::ViewportCamera;
use crate::engine::layout::{LayoutError, LayoutPoint, generate};
use crate::engine::loading::catalog_loader::FieldLoader;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::render::instanced_render_plugin::NodeBatch;
use crate::engine::render::render_state::RenderState;
use crate::tools::gesture::machine;
use crate::tools::gesture::state::{DragOverrides, GestureEffect, InteractionState};
use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use constants::render_settings::NODE_MESH_RADIUS;

/// Entities currently laid out, index-aligned with their layout points.
#[derive(Resource, Debug, Clone, Default)]
pub struct NodeField {
    pub entities: Vec<EntityRecord>,
    pub points: Vec<LayoutPoint>,
}

impl NodeField {
    /// Lays out the catalog's visible records under `config`.
    pub fn build(catalog: &EntityCatalog, config: &FieldConfig) -> Result<Self, LayoutError> {
        let entities = catalog.visible_entities(config.density, config.include_aliases);
        let points = generate(&entities, &config.layout)?;
        Ok(Self { entities, points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn entity(&self, index: usize) -> Option<&EntityRecord> {
        self.entities.get(index)
    }
}

/// The single entity carrying the instanced batch.
#[derive(Component, Default)]
pub struct NodeFieldRoot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildReason {
    Density,
    Aliases,
    CatalogReloaded,
}

/// Requests a new layout from the current config and catalog.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildFieldEvent {
    pub reason: RebuildReason,
}

pub fn create_node_field_when_ready(
    mut loading_progress: ResMut<LoadingProgress>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    loader: Res<FieldLoader>,
    catalogs: Res<Assets<EntityCatalog>>,
    config: Option<Res<FieldConfig>>,
) {
    if loading_progress.field_built || !loading_progress.catalog_loaded {
        return;
    }
    let (Some(config), Some(catalog)) = (config, loader.catalog(&catalogs)) else {
        return;
    };

    match NodeField::build(catalog, &config) {
        Ok(field) => {
            info!(
                "Node field laid out: {} instances ({:?})",
                field.len(),
                config.layout.law
            );
            spawn_node_field_root(&mut commands, &mut meshes, field.len());
            commands.insert_resource(ViewportCamera::framing(config.layout.max_radius));
            commands.insert_resource(field);
            loading_progress.field_built = true;
        }
        Err(err) => {
            error!("Node field layout failed: {err}");
            loading_progress.fail(format!("layout rejected: {err}"));
        }
    }
}

fn spawn_node_field_root(commands: &mut Commands, meshes: &mut Assets<Mesh>, count: usize) {
    let mesh = Sphere::new(NODE_MESH_RADIUS).mesh().uv(24, 16);

    commands.spawn((
        // No material: the instanced pipeline draws this mesh once per node.
        Mesh3d(meshes.add(mesh)),
        Transform::default(),
        Visibility::Visible,
        NodeFieldRoot,
        NodeBatch,
        RenderState::with_capacity(count),
        // Instances spread far beyond the unit sphere's bounds.
        NoFrustumCulling,
        Name::new("Node Field"),
    ));
}

/// Relays out the field. A failed layout keeps the previous field.
pub fn rebuild_node_field(
    mut events: EventReader<RebuildFieldEvent>,
    loader: Res<FieldLoader>,
    catalogs: Res<Assets<EntityCatalog>>,
    config: Res<FieldConfig>,
    mut field: ResMut<NodeField>,
    mut batches: Query<&mut RenderState, With<NodeFieldRoot>>,
    mut overrides: ResMut<DragOverrides>,
    mut interaction: ResMut<InteractionState>,
    mut gate: ResMut<CameraControlGate>,
    mut effects: EventWriter<GestureEffect>,
) {
    let Some(last) = events.read().last().copied() else {
        return;
    };
    let Some(catalog) = loader.catalog(&catalogs) else {
        warn!("Rebuild requested ({:?}) before the catalog is available", last.reason);
        return;
    };

    let rebuilt = match NodeField::build(catalog, &config) {
        Ok(rebuilt) => rebuilt,
        Err(err) => {
            error!("Node field rebuild ({:?}) failed, keeping previous layout: {err}", last.reason);
            return;
        }
    };

    let resumes_animation = interaction.selected_index.is_some();
    effects.write_batch(machine::reset(&mut interaction, &mut overrides));
    effects.write_batch(machine::teardown(&mut interaction));
    // A drag cut short by the rebuild must not leave the camera locked.
    gate.enabled = interaction.camera_control_enabled;
    if resumes_animation {
        effects.write(GestureEffect::AnimationPlayback { playing: true });
    }

    if let Ok(mut render_state) = batches.single_mut() {
        if render_state.len() != rebuilt.len() {
            render_state.allocate(rebuilt.len());
        }
    }

    info!(
        "Node field rebuilt ({:?}): {} -> {} instances",
        last.reason,
        field.len(),
        rebuilt.len()
    );
    *field = rebuilt;
}
