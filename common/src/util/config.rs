use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct SteinerConfig {
    #[serde(default = "default_via_cost")]
    pub via_cost: i64,
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
    #[serde(default = "default_validate_trees")]
    pub validate_trees: bool,
}

impl Default for SteinerConfig {
    fn default() -> Self {
        Self {
            via_cost: default_via_cost(),
            initial_capacity: default_initial_capacity(),
            validate_trees: default_validate_trees(),
        }
    }
}

fn default_via_cost() -> i64 {
    10
}

fn default_initial_capacity() -> usize {
    64
}

fn default_validate_trees() -> bool {
    false
}
