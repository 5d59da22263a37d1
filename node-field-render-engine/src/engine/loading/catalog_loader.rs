use crate::engine::assets::entity_catalog::EntityCatalog;
use crate::engine::assets::field_config::FieldConfig;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::node_field::{RebuildFieldEvent, RebuildReason};
use bevy::asset::{LoadState, UntypedAssetId};
use bevy::prelude::*;

/// Handles for the field config and the catalog it points at.
#[derive(Resource, Debug, Default)]
pub struct FieldLoader {
    pub config_path: String,
    config: Option<Handle<FieldConfig>>,
    catalog: Option<Handle<EntityCatalog>>,
}

impl FieldLoader {
    pub fn new(config_path: impl Into<String>) -> Self {
        Self {
            config_path: config_path.into(),
            ..default()
        }
    }

    #[cfg(test)]
    pub(crate) fn with_catalog(catalog: Handle<EntityCatalog>) -> Self {
        Self {
            catalog: Some(catalog),
            ..default()
        }
    }

    pub fn catalog<'a>(&self, catalogs: &'a Assets<EntityCatalog>) -> Option<&'a EntityCatalog> {
        catalogs.get(self.catalog.as_ref()?)
    }

    fn is_catalog(&self, id: AssetId<EntityCatalog>) -> bool {
        self.catalog.as_ref().is_some_and(|handle| handle.id() == id)
    }
}

// Start the loading process
pub fn start_loading(mut loader: ResMut<FieldLoader>, asset_server: Res<AssetServer>) {
    info!("Loading field config from {}", loader.config_path);
    loader.config = Some(asset_server.load(loader.config_path.clone()));
}

// Insert the config as a resource and start loading its catalog
pub fn load_config_system(
    mut loading_progress: ResMut<LoadingProgress>,
    mut loader: ResMut<FieldLoader>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<FieldConfig>>,
) {
    if loading_progress.config_loaded {
        return;
    }
    let Some(config) = loader.config.as_ref().and_then(|handle| configs.get(handle)) else {
        return;
    };

    info!(
        "✓ Field config loaded, catalog at {} ({:?} layout)",
        config.catalog_path, config.layout.law
    );
    let catalog_path = config.catalog_path.clone();
    commands.insert_resource(config.clone());
    loader.catalog = Some(asset_server.load(catalog_path));
    loading_progress.config_loaded = true;
}

pub fn check_catalog_loading(
    mut loading_progress: ResMut<LoadingProgress>,
    loader: Res<FieldLoader>,
    catalogs: Res<Assets<EntityCatalog>>,
) {
    if loading_progress.catalog_loaded {
        return;
    }
    if let Some(catalog) = loader.catalog(&catalogs) {
        info!("✓ Entity catalog loaded: {} records", catalog.entities.len());
        loading_progress.catalog_loaded = true;
    }
}

/// Surfaces asset load failures to the loading state machine.
pub fn detect_load_failures(
    mut loading_progress: ResMut<LoadingProgress>,
    loader: Res<FieldLoader>,
    asset_server: Res<AssetServer>,
) {
    if loading_progress.failure.is_some() {
        return;
    }
    let failed = |id: UntypedAssetId| {
        matches!(asset_server.get_load_state(id), Some(LoadState::Failed(_)))
    };

    if let Some(handle) = loader.config.as_ref().filter(|h| failed(h.id().untyped())) {
        error!("Field config {:?} failed to load", handle.path());
        loading_progress.fail(format!("config {} failed to load", loader.config_path));
    }
    if let Some(handle) = loader.catalog.as_ref().filter(|h| failed(h.id().untyped())) {
        error!("Entity catalog {:?} failed to load", handle.path());
        loading_progress.fail("entity catalog failed to load");
    }
}

/// Asks for the catalog to be fetched again.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ReloadCatalogEvent;

/// Re-fetches the catalog from disk. The rebuild follows once the asset changes.
pub fn reload_catalog_on_request(
    mut requests: EventReader<ReloadCatalogEvent>,
    loader: Res<FieldLoader>,
    asset_server: Res<AssetServer>,
) {
    if requests.read().count() == 0 {
        return;
    }
    match loader.catalog.as_ref().and_then(|handle| handle.path()) {
        Some(path) => {
            info!("Reloading entity catalog {path}");
            asset_server.reload(path.clone());
        }
        None => warn!("No entity catalog to reload"),
    }
}

pub fn rebuild_on_catalog_change(
    mut asset_events: EventReader<AssetEvent<EntityCatalog>>,
    loader: Res<FieldLoader>,
    mut rebuilds: EventWriter<RebuildFieldEvent>,
) {
    let modified = asset_events
        .read()
        .filter(|event| matches!(event, AssetEvent::Modified { id } if loader.is_catalog(*id)))
        .count();
    if modified > 0 {
        rebuilds.write(RebuildFieldEvent {
            reason: RebuildReason::CatalogReloaded,
        });
    }
}
