use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

use crate::contract::ArtifactFormat;
use crate::render::layout::PageLayout;

/// Font used when no font path is configured. Must cover Cyrillic.
pub const DEFAULT_FONT_PATH: &str = "data/arial.ttf";

/// Configuration values that cannot be used for an export.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown artifact format '{0}', expected one of: text, pdf")]
    UnknownFormat(String),

    #[error("invalid page layout: {0}")]
    InvalidLayout(String),
}

/// Everything an export needs besides the cart itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub format: ArtifactFormat,
    #[serde(default)]
    pub pdf: PdfConfig,
}

impl ExportConfig {
    pub fn trace_loaded(&self) {
        info!(
            format = %self.format,
            font_path = %self.pdf.font_path.display(),
            "Loaded ExportConfig"
        );
        debug!(?self, "ExportConfig loaded (full debug)");
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfConfig {
    pub font_path: PathBuf,
    #[serde(default)]
    pub layout: PageLayout,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            layout: PageLayout::default(),
        }
    }
}
