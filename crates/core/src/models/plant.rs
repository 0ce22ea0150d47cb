use serde::{Deserialize, Serialize};

use crate::record::Record;

fn default_watering_interval() -> i32 {
    7
}

/// A plant from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub plant_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub grow_zone_number: i32,
    /// How often the plant should be watered, in days.
    #[serde(default = "default_watering_interval")]
    pub watering_interval: i32,
    #[serde(default)]
    pub image_url: String,
}

impl Plant {
    /// Creates a plant with empty description and image.
    pub fn new(plant_id: impl Into<String>, name: impl Into<String>, grow_zone: i32) -> Self {
        Self {
            plant_id: plant_id.into(),
            name: name.into(),
            description: String::new(),
            grow_zone_number: grow_zone,
            watering_interval: default_watering_interval(),
            image_url: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn grow_zone(&self) -> GrowZone {
        GrowZone(self.grow_zone_number)
    }
}

impl Record for Plant {
    type Key = String;
    const COLLECTION: &'static str = "plants";

    fn key(&self) -> String {
        self.plant_id.clone()
    }

    fn group(&self) -> Option<String> {
        Some(GrowZone(self.grow_zone_number).group())
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

/// USDA hardiness zone used to filter plants. "No grow zone" is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrowZone(pub i32);

impl GrowZone {
    /// The record group name for this zone.
    pub fn group(&self) -> String {
        self.0.to_string()
    }
}

impl std::fmt::Display for GrowZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "zone {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plant_group_is_grow_zone() {
        let plant = Plant::new("rosa", "Rose", 9);
        assert_eq!(plant.group(), Some("9".to_string()));
        assert_eq!(plant.grow_zone(), GrowZone(9));
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let json = r#"{"plantId":"ficus","name":"Fig","growZoneNumber":7}"#;
        let plant: Plant = serde_json::from_str(json).unwrap();

        assert_eq!(plant.plant_id, "ficus");
        assert_eq!(plant.watering_interval, 7);
        assert!(plant.description.is_empty());
    }

    #[test]
    fn test_display_name_is_plant_name() {
        assert_eq!(Plant::new("x", "Tomato", 4).display_name(), "Tomato");
    }
}
