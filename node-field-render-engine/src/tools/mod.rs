//! Interactive tools for the node field.
//!
//! Pointer gestures (hover, click, double-activate, long-press drag) and the
//! keyboard field controls. Both write the same interaction resources and
//! emit [`gesture::state::GestureEffect`]s for the effect systems to apply.
//!
//! ## Keyboard controls
//!
//! | Key       | Action                                    |
//! |-----------|-------------------------------------------|
//! | `R`       | Return every dragged node to its layout   |
//! | `[` / `]` | Decrease / increase density               |
//! | `V`       | Toggle alias visibility                   |
//! | `Space`   | Toggle animation playback                 |
//! | `L`       | Re-fetch the entity catalog               |
//! | `Escape`  | Clear the selection                       |

/// Keyboard shortcuts for reset, density, aliases, playback and reload.
pub mod field_controls;

/// Pointer gesture state machine and its Bevy adapters.
pub mod gesture;
