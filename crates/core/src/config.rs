use serde::{Deserialize, Serialize};

/// Tunables for one game session. Recorded sequences only reproduce under
/// the config they were recorded with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rings each influence map may advance per turn; `None` converges every turn.
    pub path_distance_budget: Option<u32>,
    pub egg_hatch_turns: u32,
    pub queen_spawn_interval: u32,
    pub tar_growth_interval: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path_distance_budget: None,
            egg_hatch_turns: 4,
            queen_spawn_interval: 30,
            tar_growth_interval: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "path_distance_budget": 3 }"#).expect("config");
        assert_eq!(config.path_distance_budget, Some(3));
        assert_eq!(config.egg_hatch_turns, 4);
        assert_eq!(config.queen_spawn_interval, 30);
    }
}
