use std::fs;

use printpdf::font::ParsedFont;
use printpdf::{FontId, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Pt, TextItem, TextMatrix};
use tracing::{debug, error, info, warn};

use crate::config::PdfConfig;
use crate::contract::{AggregatedLine, Artifact, ArtifactFormat};
use crate::render::layout::{paginate, PagePlan};
use crate::render::{RenderError, RenderedDocument, PDF_TITLE};

/// Render the shopping list as a paginated PDF using the font at `config.font_path`.
pub fn render_pdf(
    lines: &[AggregatedLine],
    config: &PdfConfig,
) -> Result<RenderedDocument, RenderError> {
    let layout = &config.layout;
    let pages = paginate(lines, layout)?;
    debug!(
        pages = pages.len(),
        lines_per_page = layout.lines_per_page(),
        "Paginated shopping list"
    );

    let font_bytes = fs::read(&config.font_path).map_err(|e| {
        error!(path = %config.font_path.display(), error = ?e, "Failed to read font file");
        RenderError::FontMissing {
            path: config.font_path.clone(),
            source: e,
        }
    })?;

    let mut doc = PdfDocument::new(PDF_TITLE);
    let mut warnings = Vec::new();
    let font = ParsedFont::from_bytes(&font_bytes, 0, &mut warnings).ok_or_else(|| {
        error!(path = %config.font_path.display(), "Failed to parse font file");
        RenderError::FontInvalid(config.font_path.clone())
    })?;
    let font_id = doc.add_font(&font);

    for page in &pages {
        let ops = page_ops(page, &font_id, layout.font_size);
        doc.pages.push(PdfPage::new(
            Mm(layout.page_width_mm),
            Mm(layout.page_height_mm),
            ops,
        ));
    }

    let page_count = doc.pages.len();
    let content = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        warn!(count = warnings.len(), "PDF generation produced warnings");
        debug!(?warnings, "PDF generation warnings (full debug)");
    }

    info!(
        pages = page_count,
        size = content.len(),
        "Generated shopping list PDF"
    );
    Ok(RenderedDocument {
        artifact: Artifact::new(ArtifactFormat::Pdf, content),
        pages: page_count,
    })
}

fn page_ops(page: &PagePlan, font: &FontId, font_size: f32) -> Vec<Op> {
    let mut ops = Vec::with_capacity(page.texts.len() * 2 + 3);
    ops.push(Op::StartTextSection);
    ops.push(Op::SetFontSize {
        size: Pt(font_size),
        font: font.clone(),
    });
    for placed in &page.texts {
        ops.push(Op::SetTextMatrix {
            matrix: TextMatrix::Translate(Pt(placed.x), Pt(placed.y)),
        });
        ops.push(Op::WriteText {
            items: vec![TextItem::Text(placed.text.clone())],
            font: font.clone(),
        });
    }
    ops.push(Op::EndTextSection);
    ops
}
