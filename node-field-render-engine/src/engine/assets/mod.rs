//! JSON assets for the node field.
//!
//! Entity catalogs supply the records to lay out, field configs supply every
//! tunable parameter. Both load through `bevy_common_assets` and double as
//! resources once resolved.

/// Entity records and the catalog asset wrapping them.
pub mod entity_catalog;

/// Field configuration asset aggregating layout, animation, interaction and highlight settings.
pub mod field_config;
