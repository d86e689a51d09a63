use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Entries a leaf holds before it splits into four children.
    pub node_capacity: usize,
    /// Leaves at this depth never split; extra entries pile up in place.
    pub max_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            node_capacity: 4,
            // A 20,000 unit root reaches sub-unit cells well before depth 16.
            max_depth: 16,
        }
    }
}
