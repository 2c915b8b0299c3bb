//! Arena environments. Pure presentation data: the simulation only
//! validates the id and forwards the palette in snapshots.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Lighting and palette of an arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub id: String,
    pub name: String,
    pub sky_color: u32,
    pub ground_color: u32,
    pub fog_color: u32,
    pub fog_density: f32,
    pub ambient_light: u32,
    pub directional_light_color: u32,
    pub directional_light_intensity: f32,
}

/// All selectable arenas.
pub fn environments() -> Vec<EnvironmentConfig> {
    vec![
        EnvironmentConfig {
            id: "rooftop".into(),
            name: "Urban Rooftop".into(),
            sky_color: 0x87ceeb,
            ground_color: 0x555555,
            fog_color: 0xa0a0a0,
            fog_density: 0.02,
            ambient_light: 0x404040,
            directional_light_color: 0xffffff,
            directional_light_intensity: 1.0,
        },
        EnvironmentConfig {
            id: "desert".into(),
            name: "Desert Range".into(),
            sky_color: 0xffd700,
            ground_color: 0xdaa520,
            fog_color: 0xffebcd,
            fog_density: 0.015,
            ambient_light: 0x606060,
            directional_light_color: 0xfff8dc,
            directional_light_intensity: 1.2,
        },
        EnvironmentConfig {
            id: "industrial".into(),
            name: "Industrial Complex".into(),
            sky_color: 0x2f4f4f,
            ground_color: 0x3a3a3a,
            fog_color: 0x696969,
            fog_density: 0.025,
            ambient_light: 0x303030,
            directional_light_color: 0xccccff,
            directional_light_intensity: 0.8,
        },
    ]
}

/// Look up an arena by id.
pub fn environment(id: &str) -> Result<EnvironmentConfig, CatalogError> {
    environments()
        .into_iter()
        .find(|e| e.id == id)
        .ok_or_else(|| CatalogError::UnknownEnvironment(id.to_string()))
}
