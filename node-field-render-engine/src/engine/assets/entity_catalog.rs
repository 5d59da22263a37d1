use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Domain tag carried by every entity. Unknown tags deserialize to `Other`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    Protagonist,
    Deity,
    Demon,
    Dragon,
    Buddhist,
    Celestial,
    Underworld,
    Human,
    Immortal,
    Antagonist,
    #[default]
    #[serde(other)]
    Other,
}

impl EntityCategory {
    pub const ALL: [Self; 11] = [
        Self::Protagonist,
        Self::Deity,
        Self::Demon,
        Self::Dragon,
        Self::Buddhist,
        Self::Celestial,
        Self::Underworld,
        Self::Human,
        Self::Immortal,
        Self::Antagonist,
        Self::Other,
    ];

    /// Name used by the shared category tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Protagonist => "protagonist",
            Self::Deity => "deity",
            Self::Demon => "demon",
            Self::Dragon => "dragon",
            Self::Buddhist => "buddhist",
            Self::Celestial => "celestial",
            Self::Underworld => "underworld",
            Self::Human => "human",
            Self::Immortal => "immortal",
            Self::Antagonist => "antagonist",
            Self::Other => "other",
        }
    }
}

/// Optional per-record visual override. Missing fields fall back to category defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityVisual {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<f32>,
    #[serde(default)]
    pub glow_intensity: Option<f32>,
}

/// Immutable entity record as supplied by the data collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: EntityCategory,
    /// 1..N, lower sits closer to the centre.
    pub rank: u32,
    /// 0..100
    pub power: f32,
    /// 0..100
    pub influence: f32,
    #[serde(default)]
    pub visual: Option<EntityVisual>,
    #[serde(default)]
    pub is_alias: bool,
    #[serde(default)]
    pub alias_of: Option<String>,
}

/// Catalog asset loaded from `*.entities.json`.
#[derive(Asset, TypePath, Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityCatalog {
    pub entities: Vec<EntityRecord>,
}

impl EntityCatalog {
    /// Records shown at the given density, originals ordered by rank then id.
    ///
    /// Density keeps the most central share of the originals. Aliases follow
    /// their original in and out of the visible set.
    pub fn visible_entities(&self, density: f32, include_aliases: bool) -> Vec<EntityRecord> {
        let mut originals: Vec<&EntityRecord> =
            self.entities.iter().filter(|e| !e.is_alias).collect();
        originals.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.id.cmp(&b.id)));

        let keep = ((originals.len() as f32) * density.clamp(0.0, 1.0)).round() as usize;
        let kept: Vec<&EntityRecord> = originals.into_iter().take(keep).collect();

        let mut visible: Vec<EntityRecord> = kept.iter().map(|e| (*e).clone()).collect();
        if include_aliases {
            visible.extend(
                self.entities
                    .iter()
                    .filter(|e| e.is_alias)
                    .filter(|alias| match &alias.alias_of {
                        Some(original) => kept.iter().any(|e| &e.id == original),
                        None => false,
                    })
                    .cloned(),
            );
        }
        visible
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn catalog_parses_camel_case_records() {
        let json = r##"{
            "entities": [
                {"id": "sun", "name": "Sun", "category": "protagonist", "rank": 1,
                 "power": 95, "influence": 90,
                 "visual": {"color": "#FFD700", "size": 2.0, "glowIntensity": 0.9}},
                {"id": "sun-alias", "name": "Monkey King", "category": "mystery", "rank": 1,
                 "power": 95, "influence": 90, "isAlias": true, "aliasOf": "sun"}
            ]
        }"##;

        let catalog: EntityCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.entities.len(), 2);
        assert_eq!(catalog.entities[0].category, EntityCategory::Protagonist);
        assert_eq!(
            catalog.entities[0].visual.as_ref().and_then(|v| v.glow_intensity),
            Some(0.9)
        );
        assert_eq!(catalog.entities[1].category, EntityCategory::Other);
        assert!(catalog.entities[1].is_alias);
        assert_eq!(catalog.entities[1].alias_of.as_deref(), Some("sun"));
    }

    #[test]
    fn density_keeps_most_central_originals_and_their_aliases() {
        let mut entities = field(10);
        let alias_of_first = alias("a0", &entities[0]);
        let alias_of_last = alias("a9", &entities[9]);
        entities.push(alias_of_first);
        entities.push(alias_of_last);
        let catalog = EntityCatalog { entities };

        let half = catalog.visible_entities(0.5, true);
        let ids: Vec<&str> = half.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e000", "e001", "e002", "e003", "e004", "a0"]);

        let without_aliases = catalog.visible_entities(1.0, false);
        assert_eq!(without_aliases.len(), 10);
        assert!(without_aliases.iter().all(|e| !e.is_alias));

        assert_eq!(catalog.visible_entities(1.0, true).len(), 12);
    }
}
