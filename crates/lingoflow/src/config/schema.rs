use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    pub bureau: BureauConfig,
    pub numbering: NumberingConfig,
    pub languages: Vec<String>,
    #[serde(default = "default_deadline_days")]
    pub default_deadline_days: u32,
}

fn default_deadline_days() -> u32 {
    14
}

/// Connection settings for the translation bureau endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BureauConfig {
    pub endpoint: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Settings governing how request identifiers are built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberingConfig {
    pub code: String,
    #[serde(default = "default_product")]
    pub product: String,
    #[serde(default = "default_start")]
    pub start: i64,
    /// When a request number has no recorded parts, assume part 0 was
    /// handed out instead of refusing to allocate.
    #[serde(default = "default_true")]
    pub assume_zero_on_missing_history: bool,
}

fn default_product() -> String {
    "translation".to_string()
}

fn default_start() -> i64 {
    1
}

fn default_true() -> bool {
    true
}
