//! Page layout for the PDF shopping list.
//!
//! Coordinates are PDF points with the origin in the bottom-left corner of the page.
//! Items are placed top-down: the first item of every page sits at `line_start_y`
//! and each following item `line_step` lower. An item whose baseline would fall
//! below `bottom_margin` goes to the top of a new page instead.

use serde::{Deserialize, Serialize};

use crate::contract::AggregatedLine;
use crate::config::ConfigError;
use crate::render::{RenderError, PDF_TITLE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub font_size: f32,
    pub title_x: f32,
    pub title_y: f32,
    pub line_x: f32,
    pub line_start_y: f32,
    pub line_step: f32,
    pub bottom_margin: f32,
}

impl Default for PageLayout {
    /// A4 portrait, 14pt text, 26 items per page.
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            font_size: 14.0,
            title_x: 100.0,
            title_y: 750.0,
            line_x: 80.0,
            line_start_y: 700.0,
            line_step: 25.0,
            bottom_margin: 75.0,
        }
    }
}

impl PageLayout {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let coordinates = [
            ("title_x", self.title_x),
            ("title_y", self.title_y),
            ("line_x", self.line_x),
            ("line_start_y", self.line_start_y),
            ("bottom_margin", self.bottom_margin),
        ];
        for (field, value) in coordinates {
            if !value.is_finite() {
                return Err(invalid(format!("{field} must be a finite number, got {value}")));
            }
        }
        if !positive(self.line_step) {
            return Err(invalid(format!(
                "line_step must be positive, got {}",
                self.line_step
            )));
        }
        if !positive(self.font_size) {
            return Err(invalid(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        if !positive(self.page_width_mm) || !positive(self.page_height_mm) {
            return Err(invalid(format!(
                "page size must be positive, got {}x{} mm",
                self.page_width_mm, self.page_height_mm
            )));
        }
        if self.line_start_y < self.bottom_margin {
            return Err(invalid(format!(
                "line_start_y ({}) is below bottom_margin ({}), no item would fit on a page",
                self.line_start_y, self.bottom_margin
            )));
        }
        // f32 spacing is widest at the end of the range with the largest magnitude.
        if self.line_start_y - self.line_step >= self.line_start_y
            || self.bottom_margin - self.line_step >= self.bottom_margin
        {
            return Err(invalid(format!(
                "line_step ({}) is too small to move between lines",
                self.line_step
            )));
        }
        Ok(())
    }

    /// Number of items that fit on one page. Assumes a validated layout.
    pub fn lines_per_page(&self) -> usize {
        let extra = ((self.line_start_y - self.bottom_margin) / self.line_step).floor() as usize;
        extra.saturating_add(1)
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(reason: String) -> ConfigError {
    ConfigError::InvalidLayout(reason)
}

/// A single string drawn at a fixed baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePlan {
    pub texts: Vec<PlacedText>,
}

/// `"{index}. {name} – {amount} {unit}"`, index is 1-based.
pub fn format_item(index: usize, line: &AggregatedLine) -> String {
    format!(
        "{}. {} \u{2013} {} {}",
        index, line.ingredient_name, line.total_amount, line.unit
    )
}

/// Place the title and every item, breaking to a new page when the bottom margin is reached.
///
/// Always yields at least one page; with no lines that page holds only the title.
/// The title is drawn on the first page only.
pub fn paginate(
    lines: &[AggregatedLine],
    layout: &PageLayout,
) -> Result<Vec<PagePlan>, RenderError> {
    layout.validate()?;

    let mut pages = Vec::new();
    let mut current = PagePlan {
        texts: vec![PlacedText {
            x: layout.title_x,
            y: layout.title_y,
            text: PDF_TITLE.to_string(),
        }],
    };
    let mut y = layout.line_start_y;

    for (i, line) in lines.iter().enumerate() {
        if y < layout.bottom_margin {
            pages.push(std::mem::take(&mut current));
            y = layout.line_start_y;
        }
        current.texts.push(PlacedText {
            x: layout.line_x,
            y,
            text: format_item(i + 1, line),
        });
        y -= layout.line_step;
    }
    pages.push(current);

    Ok(pages)
}
