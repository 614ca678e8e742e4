use crate::conf::validation::validate;
use crate::conf::{AnalyzerConfig, ConfigError, ConfigOverrides, ValidationReport};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Reads, parses and validates a config file.
pub fn load_config(path: &Path) -> Result<AnalyzerConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let cfg = parse_config(path, &contents)?;

    let report = validate_config(&cfg)?;
    for issue in &report.warnings {
        warn!(field = %issue.field, message = %issue.message, "config warning");
    }

    debug!(path = %path.display(), format = %cfg.format, "config loaded");
    Ok(cfg)
}

pub fn parse_config(path: &Path, contents: &str) -> Result<AnalyzerConfig, ConfigError> {
    toml::from_str(contents).map_err(|e| ConfigError::parse(path, e))
}

/// Returns the report when it holds warnings only.
pub fn validate_config(cfg: &AnalyzerConfig) -> Result<ValidationReport, ConfigError> {
    let report = validate(cfg);
    if report.has_errors() {
        return Err(ConfigError::Validation { report });
    }
    Ok(report)
}

/// File (or defaults) first, then command-line overrides, then one more validation pass.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<AnalyzerConfig, ConfigError> {
    let mut cfg = match path {
        Some(path) => load_config(path)?,
        None => AnalyzerConfig::default(),
    };

    cfg.apply(overrides);
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn default_config_toml() -> String {
    let cfg = AnalyzerConfig::default();

    // Serializing a plain struct of scalars and strings cannot fail.
    let body = toml::to_string_pretty(&cfg).unwrap_or_default();

    format!(
        "# ngxstat configuration\n\
         #\n\
         # format: common | combined | upstream\n\
         # out_of_range_status: tally | reject\n\
         \n\
         {body}"
    )
}
