//! General application configuration.

use serde::{Deserialize, Serialize};

fn default_data_root() -> String {
    String::from("data")
}

fn default_sectors() -> Vec<String> {
    ["Desk", "Bed", "Closet", "North Wall"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Root directory under which `<period>/<sector>.jpg` files live.
    #[serde(default = "default_data_root")]
    pub data_root: String,

    /// Sectors offered for capture.
    #[serde(default = "default_sectors")]
    pub sectors: Vec<String>,

    /// Refuse to start a capture when no baseline exists for the comparison period.
    #[serde(default)]
    pub require_baseline: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            sectors: default_sectors(),
            require_baseline: false,
        }
    }
}
