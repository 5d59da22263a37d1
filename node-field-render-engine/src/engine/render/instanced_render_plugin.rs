use super::render_state::{InstanceColor, InstanceTransform, RenderState};
use bevy::{
    core_pipeline::core_3d::Transparent3d,
    ecs::system::{SystemParamItem, lifetimeless::*},
    pbr::{
        MeshPipeline, MeshPipelineKey, RenderMeshInstances, SetMeshBindGroup, SetMeshViewBindGroup,
    },
    prelude::*,
    render::{
        Extract, ExtractSchedule, Render, RenderApp, RenderSet,
        extract_component::{ExtractComponent, ExtractComponentPlugin},
        mesh::{
            MeshVertexBufferLayoutRef, RenderMesh, RenderMeshBufferInfo, allocator::MeshAllocator,
        },
        render_asset::RenderAssets,
        render_phase::{
            AddRenderCommand, DrawFunctions, PhaseItem, PhaseItemExtraIndex, RenderCommand,
            RenderCommandResult, SetItemPipeline, TrackedRenderPass, ViewSortedRenderPhases,
        },
        render_resource::*,
        renderer::{RenderDevice, RenderQueue},
        sync_world::{MainEntity, RenderEntity},
        view::ExtractedView,
    },
};
use std::mem::size_of;

const NODE_INSTANCE_SHADER_PATH: &str = "shaders/node_instances.wgsl";

pub struct NodeInstanceRenderPlugin;

impl Plugin for NodeInstanceRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ExtractComponentPlugin::<NodeBatch>::default());

        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app
            .add_render_command::<Transparent3d, DrawNodeInstances>()
            .init_resource::<SpecializedMeshPipelines<NodeInstancePipeline>>()
            .add_systems(ExtractSchedule, extract_node_instances)
            .add_systems(
                Render,
                (
                    prepare_node_instance_buffers.in_set(RenderSet::PrepareResources),
                    queue_node_instances.in_set(RenderSet::QueueMeshes),
                ),
            );
    }

    fn finish(&self, app: &mut App) {
        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };
        render_app.init_resource::<NodeInstancePipeline>();
    }
}

/// Marks the entity whose mesh is drawn once per node instance.
#[derive(Component, Clone, Copy, Default, ExtractComponent)]
pub struct NodeBatch;

/// Render-world copy of a batch's [`RenderState`], refreshed only on new revisions.
#[derive(Component, Default)]
pub struct ExtractedNodeInstances {
    transforms: Vec<InstanceTransform>,
    colors: Vec<InstanceColor>,
    transform_revision: u64,
    color_revision: u64,
    generation: u64,
}

/// GPU buffers for one batch, reused until the instance count or generation changes.
#[derive(Component)]
pub struct NodeInstanceBuffers {
    transforms: Buffer,
    colors: Buffer,
    length: usize,
    generation: u64,
    transform_revision: u64,
    color_revision: u64,
}

fn extract_node_instances(
    mut commands: Commands,
    batches: Extract<Query<(&RenderEntity, &RenderState), With<NodeBatch>>>,
    mut extracted: Query<&mut ExtractedNodeInstances>,
) {
    for (render_entity, state) in &batches {
        match extracted.get_mut(render_entity.id()) {
            Ok(mut copy) => {
                if copy.generation != state.generation()
                    || copy.transform_revision != state.transform_revision()
                {
                    copy_into(&mut copy.transforms, state.transforms());
                    copy.transform_revision = state.transform_revision();
                }
                if copy.generation != state.generation()
                    || copy.color_revision != state.color_revision()
                {
                    copy_into(&mut copy.colors, state.colors());
                    copy.color_revision = state.color_revision();
                }
                copy.generation = state.generation();
            }
            Err(_) => {
                commands
                    .entity(render_entity.id())
                    .insert(ExtractedNodeInstances {
                        transforms: state.transforms().to_vec(),
                        colors: state.colors().to_vec(),
                        transform_revision: state.transform_revision(),
                        color_revision: state.color_revision(),
                        generation: state.generation(),
                    });
            }
        }
    }
}

fn copy_into<T: Copy>(target: &mut Vec<T>, source: &[T]) {
    if target.len() == source.len() {
        target.copy_from_slice(source);
    } else {
        target.clear();
        target.extend_from_slice(source);
    }
}

fn prepare_node_instance_buffers(
    mut commands: Commands,
    mut query: Query<(
        Entity,
        &ExtractedNodeInstances,
        Option<&mut NodeInstanceBuffers>,
    )>,
    render_device: Res<RenderDevice>,
    render_queue: Res<RenderQueue>,
) {
    for (entity, instances, buffers) in &mut query {
        let length = instances.transforms.len();
        if length == 0 || instances.colors.len() != length {
            if buffers.is_some() {
                commands.entity(entity).remove::<NodeInstanceBuffers>();
            }
            continue;
        }

        match buffers {
            Some(mut buffers)
                if buffers.length == length && buffers.generation == instances.generation =>
            {
                if buffers.transform_revision != instances.transform_revision {
                    render_queue.write_buffer(
                        &buffers.transforms,
                        0,
                        bytemuck::cast_slice(&instances.transforms),
                    );
                    buffers.transform_revision = instances.transform_revision;
                }
                if buffers.color_revision != instances.color_revision {
                    render_queue.write_buffer(
                        &buffers.colors,
                        0,
                        bytemuck::cast_slice(&instances.colors),
                    );
                    buffers.color_revision = instances.color_revision;
                }
            }
            _ => {
                let transforms = render_device.create_buffer_with_data(&BufferInitDescriptor {
                    label: Some("node_instance_transform_buffer"),
                    contents: bytemuck::cast_slice(&instances.transforms),
                    usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
                });
                let colors = render_device.create_buffer_with_data(&BufferInitDescriptor {
                    label: Some("node_instance_color_buffer"),
                    contents: bytemuck::cast_slice(&instances.colors),
                    usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
                });
                commands.entity(entity).insert(NodeInstanceBuffers {
                    transforms,
                    colors,
                    length,
                    generation: instances.generation,
                    transform_revision: instances.transform_revision,
                    color_revision: instances.color_revision,
                });
            }
        }
    }
}

#[derive(Resource)]
struct NodeInstancePipeline {
    shader: Handle<Shader>,
    mesh_pipeline: MeshPipeline,
}

impl FromWorld for NodeInstancePipeline {
    fn from_world(world: &mut World) -> Self {
        let mesh_pipeline = world.resource::<MeshPipeline>().clone();
        Self {
            shader: world.load_asset(NODE_INSTANCE_SHADER_PATH),
            mesh_pipeline,
        }
    }
}

impl SpecializedMeshPipeline for NodeInstancePipeline {
    type Key = MeshPipelineKey;

    fn specialize(
        &self,
        key: Self::Key,
        layout: &MeshVertexBufferLayoutRef,
    ) -> Result<RenderPipelineDescriptor, SpecializedMeshPipelineError> {
        let mut descriptor = self.mesh_pipeline.specialize(key, layout)?;
        descriptor.label = Some("node_instance_pipeline".into());
        descriptor.vertex.shader = self.shader.clone();

        // Model matrix columns
        descriptor.vertex.buffers.push(VertexBufferLayout {
            array_stride: size_of::<InstanceTransform>() as u64,
            step_mode: VertexStepMode::Instance,
            attributes: (0..4u32)
                .map(|column| VertexAttribute {
                    format: VertexFormat::Float32x4,
                    offset: u64::from(column) * 16,
                    shader_location: 3 + column,
                })
                .collect(),
        });
        // Linear RGBA
        descriptor.vertex.buffers.push(VertexBufferLayout {
            array_stride: size_of::<InstanceColor>() as u64,
            step_mode: VertexStepMode::Instance,
            attributes: vec![VertexAttribute {
                format: VertexFormat::Float32x4,
                offset: 0,
                shader_location: 7,
            }],
        });

        if let Some(fragment) = descriptor.fragment.as_mut() {
            fragment.shader = self.shader.clone();
        }

        Ok(descriptor)
    }
}

fn queue_node_instances(
    transparent_3d_draw_functions: Res<DrawFunctions<Transparent3d>>,
    node_instance_pipeline: Res<NodeInstancePipeline>,
    mut pipelines: ResMut<SpecializedMeshPipelines<NodeInstancePipeline>>,
    pipeline_cache: Res<PipelineCache>,
    meshes: Res<RenderAssets<RenderMesh>>,
    render_mesh_instances: Res<RenderMeshInstances>,
    batches: Query<(Entity, &MainEntity), With<ExtractedNodeInstances>>,
    mut transparent_render_phases: ResMut<ViewSortedRenderPhases<Transparent3d>>,
    views: Query<(&ExtractedView, &Msaa)>,
) {
    let draw_node_instances = transparent_3d_draw_functions
        .read()
        .id::<DrawNodeInstances>();

    for (view, msaa) in &views {
        let Some(transparent_phase) = transparent_render_phases.get_mut(&view.retained_view_entity)
        else {
            continue;
        };

        let msaa_key = MeshPipelineKey::from_msaa_samples(msaa.samples());
        let view_key = msaa_key | MeshPipelineKey::from_hdr(view.hdr);
        let rangefinder = view.rangefinder3d();

        for (entity, main_entity) in &batches {
            let Some(mesh_instance) = render_mesh_instances.render_mesh_queue_data(*main_entity)
            else {
                continue;
            };
            let Some(mesh) = meshes.get(mesh_instance.mesh_asset_id) else {
                continue;
            };

            let key =
                view_key | MeshPipelineKey::from_primitive_topology(mesh.primitive_topology());
            let pipeline = match pipelines.specialize(
                &pipeline_cache,
                &node_instance_pipeline,
                key,
                &mesh.layout,
            ) {
                Ok(pipeline) => pipeline,
                Err(err) => {
                    error!("Failed to specialize node instance pipeline: {err}");
                    continue;
                }
            };

            transparent_phase.add(Transparent3d {
                entity: (entity, *main_entity),
                pipeline,
                draw_function: draw_node_instances,
                distance: rangefinder.distance_translation(&mesh_instance.translation),
                batch_range: 0..1,
                extra_index: PhaseItemExtraIndex::None,
                indexed: true,
            });
        }
    }
}

type DrawNodeInstances = (
    SetItemPipeline,
    SetMeshViewBindGroup<0>,
    SetMeshBindGroup<1>,
    DrawNodeInstanceBuffers,
);

struct DrawNodeInstanceBuffers;

impl<P: PhaseItem> RenderCommand<P> for DrawNodeInstanceBuffers {
    type Param = (
        SRes<RenderAssets<RenderMesh>>,
        SRes<RenderMeshInstances>,
        SRes<MeshAllocator>,
    );
    type ViewQuery = ();
    type ItemQuery = Read<NodeInstanceBuffers>;

    #[inline]
    fn render<'w>(
        item: &P,
        _view: (),
        instance_buffers: Option<&'w NodeInstanceBuffers>,
        (meshes, render_mesh_instances, mesh_allocator): SystemParamItem<'w, '_, Self::Param>,
        pass: &mut TrackedRenderPass<'w>,
    ) -> RenderCommandResult {
        let mesh_allocator = mesh_allocator.into_inner();

        let Some(mesh_instance) = render_mesh_instances.render_mesh_queue_data(item.main_entity())
        else {
            return RenderCommandResult::Skip;
        };
        let Some(gpu_mesh) = meshes.into_inner().get(mesh_instance.mesh_asset_id) else {
            return RenderCommandResult::Skip;
        };
        // Empty batches have no buffers.
        let Some(instance_buffers) = instance_buffers else {
            return RenderCommandResult::Skip;
        };
        let Some(vertex_buffer_slice) =
            mesh_allocator.mesh_vertex_slice(&mesh_instance.mesh_asset_id)
        else {
            return RenderCommandResult::Skip;
        };

        let instances = 0..instance_buffers.length as u32;
        pass.set_vertex_buffer(0, vertex_buffer_slice.buffer.slice(..));
        pass.set_vertex_buffer(1, instance_buffers.transforms.slice(..));
        pass.set_vertex_buffer(2, instance_buffers.colors.slice(..));

        match &gpu_mesh.buffer_info {
            RenderMeshBufferInfo::Indexed {
                index_format,
                count,
            } => {
                let Some(index_buffer_slice) =
                    mesh_allocator.mesh_index_slice(&mesh_instance.mesh_asset_id)
                else {
                    return RenderCommandResult::Skip;
                };

                pass.set_index_buffer(index_buffer_slice.buffer.slice(..), 0, *index_format);
                pass.draw_indexed(
                    index_buffer_slice.range.start..(index_buffer_slice.range.start + count),
                    vertex_buffer_slice.range.start as i32,
                    instances,
                );
            }
            RenderMeshBufferInfo::NonIndexed => {
                pass.draw(vertex_buffer_slice.range, instances);
            }
        }
        RenderCommandResult::Success
    }
}
