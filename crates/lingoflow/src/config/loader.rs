use std::path::Path;

use crate::config::schema::Config;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

const CODE_PATTERN: &str = "^[A-Z][A-Z0-9]{1,7}$";

// Ten years; date arithmetic on the deadline must stay in range.
const MAX_DEADLINE_DAYS: u32 = 3650;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let compiled = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = compiled
        .iter_errors(json_value)
        .map(|e| format!("{} at {}", e, e.instance_path()))
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Validate version
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    // Validate the request code (it is embedded verbatim in every identifier)
    let code_re = regex::Regex::new(CODE_PATTERN).map_err(|e| ConfigError::Validation {
        message: format!("Invalid embedded code pattern: {}", e),
    })?;
    if !code_re.is_match(&config.numbering.code) {
        return Err(ConfigError::InvalidField {
            field: "numbering.code".to_string(),
            reason: format!(
                "'{}' must match {} (uppercase letters and digits, starting with a letter)",
                config.numbering.code, CODE_PATTERN
            ),
        });
    }

    if config.numbering.product.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            field: "numbering.product".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    if config.numbering.start < 1 {
        return Err(ConfigError::InvalidField {
            field: "numbering.start".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    if config.bureau.endpoint.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            field: "bureau.endpoint".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    // Validate languages
    if config.languages.is_empty() {
        return Err(ConfigError::InvalidField {
            field: "languages".to_string(),
            reason: "at least one target language is required".to_string(),
        });
    }
    let mut seen = std::collections::HashSet::new();
    for language in &config.languages {
        if language.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "languages".to_string(),
                reason: "language tags must not be empty".to_string(),
            });
        }
        if !seen.insert(language) {
            return Err(ConfigError::InvalidField {
                field: "languages".to_string(),
                reason: format!("duplicate language tag '{}'", language),
            });
        }
    }

    if config.default_deadline_days < 1 || config.default_deadline_days > MAX_DEADLINE_DAYS {
        return Err(ConfigError::InvalidField {
            field: "default_deadline_days".to_string(),
            reason: format!("must be between 1 and {}", MAX_DEADLINE_DAYS),
        });
    }

    Ok(())
}
