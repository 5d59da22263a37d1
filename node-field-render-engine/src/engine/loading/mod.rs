//! Asset loading for the node field.
//!
//! Loads the field config first, then the catalog it names, then lays out
//! the field. Progress is tracked in [`progress::LoadingProgress`] and drives
//! the `Loading -> Running | Failed` transition.

/// Field config and entity catalog loading, failure detection and reload.
pub mod catalog_loader;

/// Loading progress tracking resource for state transitions.
pub mod progress;
