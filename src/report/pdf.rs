//! Five-page A4 PDF, one chart per page.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use printpdf::image_crate;
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};
use strum::IntoEnumIterator;

use crate::classify::Taxonomy;

use super::RenderedChart;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const TITLE_SIZE: f32 = 16.0;
const IMAGE_WIDTH_MM: f32 = 180.0;

/// Helvetica-Bold advance widths in 1/1000 em (AFM metrics).
fn helvetica_bold_width(c: char) -> u32 {
    match c {
        ' ' => 278,
        'I' => 278,
        '-' => 333,
        'J' | '0'..='9' => 556,
        'F' | 'L' | 'T' | 'Z' => 611,
        'E' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667,
        'G' | 'O' | 'Q' => 778,
        'M' => 833,
        'W' => 944,
        // Remaining capitals are 722; lower case averages close to it
        _ => 722,
    }
}

/// Width of `text` set in Helvetica-Bold at `size` points.
fn title_width_mm(text: &str, size: f32) -> f32 {
    let em: u32 = text.chars().map(helvetica_bold_width).sum();
    em as f32 / 1000.0 * size * 25.4 / 72.0
}

/// Left edge that centres `text` on the page.
fn centered_x(text: &str, size: f32) -> f32 {
    ((PAGE_WIDTH_MM - title_width_mm(text, size)) / 2.0).max(MARGIN_MM)
}

/// Resolution at which `px_width` pixels span `IMAGE_WIDTH_MM`.
fn fit_dpi(px_width: u32) -> f32 {
    px_width as f32 * 25.4 / IMAGE_WIDTH_MM
}

/// Writes one page per taxonomy, with a centred upper-case title and its
/// chart below. Returns the page count.
///
/// A missing chart leaves its page with the title only.
pub fn write_pdf(path: &Path, title: &str, charts: &[RenderedChart]) -> Result<usize> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("Failed to load PDF font: {e}"))?;
    let body_font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("Failed to load PDF font: {e}"))?;

    let mut pages = 0usize;
    for taxonomy in Taxonomy::iter() {
        let (page, layer) = if pages == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
        };
        let layer = doc.get_page(page).get_layer(layer);
        pages += 1;

        let page_title = taxonomy.title().to_uppercase();
        layer.use_text(
            page_title.as_str(),
            TITLE_SIZE,
            Mm(centered_x(&page_title, TITLE_SIZE)),
            Mm(PAGE_HEIGHT_MM - 15.0),
            &font,
        );

        let Some(chart) = charts.iter().find(|c| c.taxonomy == taxonomy) else {
            log::warn!("PDF page '{}' has no chart", taxonomy.title());
            layer.use_text(
                "Chart unavailable",
                11.0,
                Mm(MARGIN_MM),
                Mm(PAGE_HEIGHT_MM - 30.0),
                &body_font,
            );
            continue;
        };

        let decoded = image_crate::load_from_memory(&chart.png)
            .with_context(|| format!("Failed to decode chart {}", chart.path.display()))?;
        let dpi = fit_dpi(decoded.width());
        let height_mm = decoded.height() as f32 * 25.4 / dpi;
        Image::from_dynamic_image(&decoded).add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(MARGIN_MM)),
                translate_y: Some(Mm(PAGE_HEIGHT_MM - 30.0 - height_mm)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create PDF {}", path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| anyhow!("Failed to save PDF {}: {e}", path.display()))?;
    log::info!("PDF report saved to {} ({} pages)", path.display(), pages);
    Ok(pages)
}
