use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use shopping_list_core::config::{ExportConfig, PdfConfig, DEFAULT_FONT_PATH};
use shopping_list_core::contract::ArtifactFormat;
use shopping_list_core::render::layout::PageLayout;
use tracing::{error, info};

/// Overrides `pdf.font_path`.
pub const FONT_ENV: &str = "SHOPPING_LIST_FONT";
/// Overrides `export.format`.
pub const FORMAT_ENV: &str = "SHOPPING_LIST_FORMAT";

/// Fully merged configuration for one CLI run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub export: ExportConfig,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            export: ExportConfig::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Deserialize, Default)]
struct StaticConfig {
    #[serde(default)]
    export: ExportSection,
    #[serde(default)]
    pdf: PdfSection,
}

#[derive(Deserialize, Default)]
struct ExportSection {
    #[serde(default)]
    format: Option<ArtifactFormat>,
    #[serde(default)]
    output_dir: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
struct PdfSection {
    #[serde(default)]
    font_path: Option<PathBuf>,
    #[serde(default)]
    layout: Option<PageLayout>,
}

/// Loads a YAML config file and applies environment overrides on top.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = fs::read_to_string(path_ref).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
        anyhow::anyhow!("Failed to read config file {:?}: {}", path_ref, e)
    })?;

    let static_conf: StaticConfig = serde_yaml::from_str(&config_content).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
        anyhow::anyhow!("Failed to parse config YAML: {e}")
    })?;
    info!(config_path = ?path_ref, "Parsed config YAML successfully");

    merge(static_conf)
}

/// Configuration used when no file is given: defaults plus environment overrides.
pub fn default_config() -> Result<AppConfig> {
    info!("No config file given, using defaults");
    merge(StaticConfig::default())
}

fn merge(static_conf: StaticConfig) -> Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut format = static_conf.export.format.unwrap_or(defaults.export.format);
    if let Ok(value) = std::env::var(FORMAT_ENV) {
        format = value.parse::<ArtifactFormat>().map_err(|e| {
            error!(var = FORMAT_ENV, value = %value, error = %e, "Invalid format override");
            anyhow::Error::new(e).context(format!("{FORMAT_ENV} must be 'text' or 'pdf'"))
        })?;
        info!(%format, "Format overridden from environment");
    }

    let mut font_path = static_conf
        .pdf
        .font_path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FONT_PATH));
    if let Ok(value) = std::env::var(FONT_ENV) {
        info!(font_path = %value, "Font path overridden from environment");
        font_path = PathBuf::from(value);
    }

    let export = ExportConfig {
        format,
        pdf: PdfConfig {
            font_path,
            layout: static_conf.pdf.layout.unwrap_or_default(),
        },
    };
    export
        .pdf
        .layout
        .validate()
        .context("Invalid pdf.layout in config")?;
    export.trace_loaded();

    let output_dir = static_conf.export.output_dir.unwrap_or(defaults.output_dir);
    info!(output_dir = %output_dir.display(), "Config loaded and merged successfully");

    Ok(AppConfig { export, output_dir })
}
