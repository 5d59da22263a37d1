use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
// Crate engine modules
use crate::engine::animation::clock::{SceneClock, advance_scene_clock, start_scene_clock};
use crate::engine::assets::entity_catalog::EntityCatalog;
use crate::engine::assets::field_config::{DEFAULT_CONFIG_PATH, FieldConfig};
use crate::engine::camera::control_gate::{
    release_camera_on_app_exit, release_camera_on_field_teardown, release_camera_on_state_exit,
};
use crate::engine::camera::viewport_camera::{NodeFieldCamera, ViewportCamera, camera_controller};
use crate::engine::core::app_state::{
    AppState, NodeFieldSet, transition_on_failure, transition_to_running,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::catalog_loader::{
    FieldLoader, ReloadCatalogEvent, check_catalog_loading, detect_load_failures,
    load_config_system, rebuild_on_catalog_change, reload_catalog_on_request, start_loading,
};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::render::instanced_render_plugin::NodeInstanceRenderPlugin;
use crate::engine::render::render_state::sync_node_instances;
use crate::engine::scene::node_field::{
    RebuildFieldEvent, create_node_field_when_ready, rebuild_node_field,
};
// Crate tools modules
use crate::tools::field_controls::handle_field_controls;
use crate::tools::gesture::GesturePlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::{
    fps_tracking::fps_text_update_system,
    overlay::{create_native_overlays, status_text_update_system},
};

/// Builds the app. The first command line argument overrides the field config path.
pub fn create_app() -> App {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(NodeInstanceRenderPlugin)
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Field configs and entity catalogs are both JSON, told apart by suffix.
        .add_plugins(JsonAssetPlugin::<FieldConfig>::new(&["field.json"]))
        .add_plugins(JsonAssetPlugin::<EntityCatalog>::new(&["entities.json"]))
        .add_plugins(GesturePlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .insert_resource(FieldLoader::new(config_path))
        .init_resource::<SceneClock>()
        .init_resource::<ViewportCamera>()
        .add_event::<RebuildFieldEvent>()
        .add_event::<ReloadCatalogEvent>();

    app.configure_sets(
        Update,
        (
            NodeFieldSet::Input,
            NodeFieldSet::Effects,
            NodeFieldSet::Animate,
            NodeFieldSet::Sync,
        )
            .chain(),
    )
    .configure_sets(
        Update,
        NodeFieldSet::Camera
            .after(NodeFieldSet::Input)
            .before(NodeFieldSet::Sync),
    );

    // State-based system scheduling
    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (
                // Loading phase systems
                load_config_system,
                check_catalog_loading,
                detect_load_failures,
                create_node_field_when_ready,
                transition_to_running,
                transition_on_failure,
            )
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(OnEnter(AppState::Running), start_scene_clock)
        .add_systems(OnExit(AppState::Running), release_camera_on_state_exit);

    // Runtime systems - only run once the field is laid out
    app.add_systems(
        Update,
        (
            handle_field_controls.in_set(NodeFieldSet::Input),
            camera_controller.in_set(NodeFieldSet::Camera),
            advance_scene_clock.in_set(NodeFieldSet::Animate),
            // Rebuilds land before the buffers are written for this frame.
            (reload_catalog_on_request, rebuild_on_catalog_change, rebuild_node_field)
                .chain()
                .after(NodeFieldSet::Effects)
                .before(NodeFieldSet::Sync),
            sync_node_instances.in_set(NodeFieldSet::Sync),
        )
            .run_if(in_state(AppState::Running)),
    );

    // Teardown paths must re-enable the camera in any state.
    app.add_systems(
        Update,
        (release_camera_on_field_teardown, release_camera_on_app_exit),
    );

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, (fps_text_update_system, status_text_update_system));
    }

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            illuminance: 6_000.0,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_field_camera(commands: &mut Commands, viewport_camera: &ViewportCamera) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.01, 0.01, 0.03)),
            ..default()
        },
        viewport_camera.target_transform(),
        NodeFieldCamera,
    ));
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands, viewport_camera: Res<ViewportCamera>) {
    spawn_lighting(&mut commands);
    spawn_field_camera(&mut commands, &viewport_camera);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
