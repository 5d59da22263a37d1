use bevy::prelude::*;
use bevy::window::PresentMode;

const WINDOW_TITLE: &str = "Node Field";

/// Primary window. On the web it binds to the `#bevy` canvas and leaves
/// browser shortcuts alone.
pub fn create_window_config() -> Window {
    let base = Window {
        title: WINDOW_TITLE.into(),
        present_mode: PresentMode::AutoVsync,
        ..default()
    };

    #[cfg(target_arch = "wasm32")]
    let window = Window {
        canvas: Some("#bevy".into()),
        fit_canvas_to_parent: true,
        prevent_default_event_handling: false,
        ..base
    };

    #[cfg(not(target_arch = "wasm32"))]
    let window = Window {
        resolution: bevy::window::WindowResolution::new(1600.0, 900.0),
        ..base
    };

    window
}
