use crate::engine::assets::field_config::FieldConfig;
use bevy::prelude::*;
use constants::layout::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub float_amplitude: f32,
    pub float_speed: f32,
    pub pulse_intensity: f32,
    pub pulse_speed: f32,
    pub orbit_speed: f32,
    /// Share of the float offset kept on dragged entities.
    pub override_damping: f32,
    pub play_on_start: bool,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            float_amplitude: DEFAULT_FLOAT_AMPLITUDE,
            float_speed: DEFAULT_FLOAT_SPEED,
            pulse_intensity: DEFAULT_PULSE_INTENSITY,
            pulse_speed: DEFAULT_PULSE_SPEED,
            orbit_speed: DEFAULT_ORBIT_SPEED,
            override_damping: DEFAULT_OVERRIDE_DAMPING,
            play_on_start: true,
        }
    }
}

/// Session animation time. Frozen while paused.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SceneClock {
    pub elapsed: f32,
    pub playing: bool,
}

impl Default for SceneClock {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            playing: true,
        }
    }
}

impl SceneClock {
    pub fn tick(&mut self, delta_secs: f32) {
        if self.playing {
            self.elapsed += delta_secs;
        }
    }

    pub fn set_playing(&mut self, playing: bool) {
        if self.playing != playing {
            info!(
                "Scene animation {}",
                if playing { "resumed" } else { "paused" }
            );
        }
        self.playing = playing;
    }
}

pub fn advance_scene_clock(time: Res<Time>, mut clock: ResMut<SceneClock>) {
    clock.tick(time.delta_secs());
}

/// Applies the configured start-up playback once the field is on screen.
pub fn start_scene_clock(config: Res<FieldConfig>, mut clock: ResMut<SceneClock>) {
    clock.elapsed = 0.0;
    clock.set_playing(config.animation.play_on_start);
}
