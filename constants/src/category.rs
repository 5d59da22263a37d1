use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

pub struct CategoryInfo {
    pub name: &'static str,
    /// Base angle on the field in radians. `None` falls back to arm placement.
    pub base_angle: Option<f32>,
    /// sRGB colour as 0xRRGGBB.
    pub color: u32,
}

pub const CATEGORY_MAP: &[CategoryInfo] = &[
    CategoryInfo {
        name: "protagonist",
        base_angle: Some(0.0),
        color: 0xFFD700,
    },
    CategoryInfo {
        name: "deity",
        base_angle: Some(2.0 * PI / 3.0),
        color: 0x87CEEB,
    },
    CategoryInfo {
        name: "demon",
        base_angle: Some(4.0 * PI / 3.0),
        color: 0xFF6347,
    },
    CategoryInfo {
        name: "dragon",
        base_angle: Some(FRAC_PI_2),
        color: 0x00CED1,
    },
    CategoryInfo {
        name: "buddhist",
        base_angle: Some(PI),
        color: 0xDDA0DD,
    },
    CategoryInfo {
        name: "celestial",
        base_angle: Some(FRAC_PI_4),
        color: 0xF0E68C,
    },
    CategoryInfo {
        name: "underworld",
        base_angle: Some(3.0 * FRAC_PI_2),
        color: 0x696969,
    },
    CategoryInfo {
        name: "human",
        base_angle: Some(5.0 * FRAC_PI_4),
        color: 0xFFA500,
    },
    CategoryInfo {
        name: "immortal",
        base_angle: None,
        color: 0x98FB98,
    },
    CategoryInfo {
        name: "antagonist",
        base_angle: None,
        color: 0xDC143C,
    },
];

/// Colour used for categories missing from the table.
pub const DEFAULT_CATEGORY_COLOR: u32 = 0xFFFFFF;

/// Three-stop gradient for ordered sequences, keyed by progress 0..1.
pub const JOURNEY_GRADIENT: [u32; 3] = [0x1E40AF, 0x7C3AED, 0xF59E0B];

pub fn get_category_color(name: &str) -> u32 {
    CATEGORY_MAP
        .iter()
        .find(|c| c.name == name)
        .map_or(DEFAULT_CATEGORY_COLOR, |c| c.color)
}

pub fn get_category_angle(name: &str) -> Option<f32> {
    CATEGORY_MAP
        .iter()
        .find(|c| c.name == name)
        .and_then(|c| c.base_angle)
}
