use crate::engine::loading::progress::LoadingProgress;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
    /// Config, catalog or first layout rejected. Nothing is drawn.
    Failed,
}

/// Per-frame ordering of the node field systems.
///
/// Pointer handling and keyboard controls run first, their effects are applied
/// next, then the scene clock advances and the instance buffers are written.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeFieldSet {
    Input,
    Effects,
    Camera,
    Animate,
    Sync,
}

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct StatusText;

// Final transition once the first layout is on screen
pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.field_built {
        info!("→ Node field ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

pub fn transition_on_failure(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if let Some(reason) = &loading_progress.failure {
        error!("→ Loading failed ({reason}), transitioning to Failed state");
        next_state.set(AppState::Failed);
    }
}
