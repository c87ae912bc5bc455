//! Turns aggregated lines into a downloadable [`Artifact`].
//!
//! Two formats are supported: a plain-text list ([`text`]) and a paginated PDF
//! ([`pdf`]) whose page breaking is computed up front by [`layout::paginate`].

pub mod layout;
pub mod pdf;
pub mod text;

use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, info};

use crate::config::{ConfigError, ExportConfig};
use crate::contract::{AggregatedLine, Artifact, ArtifactFormat};

/// Header line of the plain-text list.
pub const TEXT_HEADER: &str = "Купить в магазине:";
/// Title drawn at the top of the first PDF page.
pub const PDF_TITLE: &str = "Список покупок";

/// Rendering only fails on resource faults or an unusable page layout.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("font file {path:?} could not be read: {source}")]
    FontMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font file {0:?} is not a usable TrueType/OpenType font")]
    FontInvalid(PathBuf),

    #[error(transparent)]
    Layout(#[from] ConfigError),
}

/// A rendered artifact together with the number of pages it spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub artifact: Artifact,
    /// Always 1 for plain text.
    pub pages: usize,
}

/// Render `lines` in the format selected by `config`.
pub fn render(
    lines: &[AggregatedLine],
    config: &ExportConfig,
) -> Result<RenderedDocument, RenderError> {
    info!(format = %config.format, lines = lines.len(), "Rendering shopping list");
    let result = match config.format {
        ArtifactFormat::Text => Ok(RenderedDocument {
            artifact: text::render_text(lines),
            pages: 1,
        }),
        ArtifactFormat::Pdf => pdf::render_pdf(lines, &config.pdf),
    };
    match &result {
        Ok(rendered) => info!(
            filename = %rendered.artifact.filename,
            size = rendered.artifact.content.len(),
            pages = rendered.pages,
            "Rendered shopping list"
        ),
        Err(e) => error!(error = %e, "Rendering failed"),
    }
    result
}
