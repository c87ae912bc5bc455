//! High-level pipeline: cart source → aggregation → rendering.
//!
//! # Responsibilities
//! - Fetch the user's cart lines from a [`CartSource`] (the only I/O step)
//! - Merge them with [`aggregate`] and render the result in the configured format
//! - Return the artifact with a few counts for logging and reporting
//!
//! Each export is self-contained: nothing is cached or shared between calls.
//!
//! # Error Handling
//! A failing step returns immediately; cart errors and render errors are kept
//! apart so a caller can map them to client and server errors respectively.

use thiserror::Error;
use tracing::{error, info};

use crate::aggregate::aggregate;
use crate::config::ExportConfig;
use crate::contract::{Artifact, CartError, CartSource};
use crate::render::{render, RenderError};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to load cart: {0}")]
    Cart(#[from] CartError),

    #[error("failed to render shopping list: {0}")]
    Render(#[from] RenderError),
}

#[derive(Debug)]
pub struct ExportReport {
    pub user: String,
    pub input_lines: usize,
    pub distinct_lines: usize,
    pub pages: usize,
    pub artifact: Artifact,
}

pub async fn export<S>(
    config: &ExportConfig,
    source: &S,
    user: &str,
) -> Result<ExportReport, ExportError>
where
    S: CartSource + ?Sized,
{
    info!(user, format = %config.format, "[EXPORT] Starting shopping list export");

    let lines = match source.cart_lines(user).await {
        Ok(lines) => lines,
        Err(e) => {
            error!(user, error = %e, "[EXPORT][ERROR] Loading cart failed");
            return Err(e.into());
        }
    };
    let input_lines = lines.len();

    let aggregated = aggregate(lines);
    info!(
        input_lines,
        distinct_lines = aggregated.len(),
        "[EXPORT] Aggregated cart"
    );

    let rendered = render(&aggregated, config).map_err(|e| {
        error!(user, error = %e, "[EXPORT][ERROR] Rendering failed");
        ExportError::from(e)
    })?;

    info!(
        user,
        filename = %rendered.artifact.filename,
        pages = rendered.pages,
        "[EXPORT] Export complete"
    );
    Ok(ExportReport {
        user: user.to_string(),
        input_lines,
        distinct_lines: aggregated.len(),
        pages: rendered.pages,
        artifact: rendered.artifact,
    })
}
