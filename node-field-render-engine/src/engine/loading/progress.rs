use bevy::prelude::*;

#[derive(Resource, Debug, Default)]
pub struct LoadingProgress {
    pub config_loaded: bool,
    pub catalog_loaded: bool,
    pub field_built: bool,
    /// Set when an asset fails to load or the first layout is rejected.
    pub failure: Option<String>,
}

impl LoadingProgress {
    pub fn fail(&mut self, reason: impl Into<String>) {
        if self.failure.is_none() {
            self.failure = Some(reason.into());
        }
    }
}
