mod error;
mod loader;
mod types;
mod validation;

pub use error::ConfigError;
pub use loader::{default_config_toml, load_config, parse_config, resolve_config, validate_config};
pub use types::{AnalyzerConfig, ConfigOverrides};
pub use validation::{Severity, ValidationIssue, ValidationReport};
