use crate::cli::ExitStatus;
use crate::cli::args::print_report;
use crate::conf::{AnalyzerConfig, ConfigError, default_config_toml, load_config};
use anyhow::{Context, Result, bail};
use clap::Subcommand;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "ngxstat.toml";

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate a configuration file and exit
    Check {
        #[arg(default_value = DEFAULT_CONFIG_PATH)]
        path: PathBuf,
    },

    /// Print the configuration with every default filled in, as JSON
    Dump {
        #[arg(default_value = DEFAULT_CONFIG_PATH)]
        path: PathBuf,

        /// Output as YAML instead
        #[arg(long)]
        yaml: bool,
    },

    /// Write a configuration file holding the defaults
    Init {
        #[arg(default_value = DEFAULT_CONFIG_PATH)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run_config(cmd: ConfigCmd) -> Result<ExitStatus> {
    match cmd {
        ConfigCmd::Check { path } => check(&path),
        ConfigCmd::Dump { path, yaml } => dump(&path, yaml),
        ConfigCmd::Init { path, force } => init(&path, force),
    }
}

pub fn check(path: &Path) -> Result<ExitStatus> {
    let cfg = match load(path)? {
        Some(cfg) => cfg,
        None => return Ok(ExitStatus::Failure),
    };

    println!("✔ Config loaded successfully");
    println!("✔ format: {}", cfg.format);
    println!("✔ {} timestamp pattern(s)", cfg.timestamp_formats.len());
    println!(
        "✔ top {} of {} tracked, {}s buckets",
        cfg.top_k,
        cfg.top_k_capacity(),
        cfg.bucket_secs()
    );
    if cfg.strict {
        println!("✔ strict mode");
    }

    Ok(ExitStatus::Success)
}

pub fn dump(path: &Path, yaml: bool) -> Result<ExitStatus> {
    let cfg = match load(path)? {
        Some(cfg) => cfg,
        None => return Ok(ExitStatus::Failure),
    };

    println!("{}", render_dump(&cfg, yaml)?);

    Ok(ExitStatus::Success)
}

/// Pretty JSON, or YAML when asked for.
pub fn render_dump(cfg: &AnalyzerConfig, yaml: bool) -> Result<String> {
    if yaml {
        Ok(serde_yaml::to_string(cfg)?)
    } else {
        Ok(serde_json::to_string_pretty(cfg)?)
    }
}

pub fn init(path: &Path, force: bool) -> Result<ExitStatus> {
    if path.is_dir() {
        bail!("{} is a directory", path.display());
    }
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    fs::write(path, default_config_toml())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("✔ Wrote {}", path.display());

    Ok(ExitStatus::Success)
}

fn load(path: &Path) -> Result<Option<AnalyzerConfig>> {
    match load_config(path) {
        Ok(cfg) => Ok(Some(cfg)),
        Err(ConfigError::Validation { report }) => {
            print_report(&report);
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
