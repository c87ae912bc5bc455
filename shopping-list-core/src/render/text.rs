use crate::contract::{AggregatedLine, Artifact, ArtifactFormat};
use crate::render::TEXT_HEADER;

/// `"{name} ({unit}) - {amount}"` lines under the header, newline separated, no trailing newline.
pub fn format_text(lines: &[AggregatedLine]) -> String {
    let mut out = String::from(TEXT_HEADER);
    for line in lines {
        out.push('\n');
        out.push_str(&format!(
            "{} ({}) - {}",
            line.ingredient_name, line.unit, line.total_amount
        ));
    }
    out
}

pub fn render_text(lines: &[AggregatedLine]) -> Artifact {
    Artifact::new(ArtifactFormat::Text, format_text(lines).into_bytes())
}
