//! Pie chart rendering.
//!
//! Charts are drawn into an in-memory RGB buffer with plotters, framed with a
//! 6 px black border and encoded as PNG. Text uses an embedded copy of
//! DejaVu Sans, so output does not depend on the host's fonts.

use std::f64::consts::PI;
use std::io::Cursor;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::classify::Bucket;

/// Plot area inside the border.
const PLOT_WIDTH: u32 = 488;
const PLOT_HEIGHT: u32 = 388;
const BORDER: u32 = 6;

/// Degrees, counter-clockwise from three o'clock.
const START_ANGLE: f64 = 140.0;
const CENTER: (i32, i32) = (244, 160);
const RADIUS: f64 = 110.0;
const LEGEND_TOP: i32 = 292;
const LEGEND_ROW: i32 = 22;

const PALETTE: [RGBColor; 5] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
];

/// Registered as plotters' `sans-serif` family.
static CHART_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const FONT_FAMILY: &str = "sans-serif";
static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

/// Final image size including the border.
pub const CHART_SIZE: (u32, u32) = (PLOT_WIDTH + 2 * BORDER, PLOT_HEIGHT + 2 * BORDER);

/// Slice caption, e.g. `Third Party SPF (3 / 10 - 30.0%)`.
pub fn slice_label(bucket: &Bucket, total: usize) -> String {
    let pct = if total > 0 {
        bucket.count as f64 * 100.0 / total as f64
    } else {
        0.0
    };
    format!("{} ({} / {} - {:.1}%)", bucket.label, bucket.count, total, pct)
}

/// Polygon approximating the slice between two angles (degrees).
fn wedge(start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = (sweep.abs().ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(CENTER);
    for i in 0..=steps {
        let angle = (start + sweep * i as f64 / steps as f64) * PI / 180.0;
        // Screen y grows downwards
        points.push((
            CENTER.0 + (RADIUS * angle.cos()).round() as i32,
            CENTER.1 - (RADIUS * angle.sin()).round() as i32,
        ));
    }
    points
}

fn ensure_font() -> Result<()> {
    let registered = *FONT_REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, CHART_FONT).is_ok());
    if registered {
        Ok(())
    } else {
        Err(anyhow!("Embedded chart font could not be loaded"))
    }
}

fn draw_plot(buf: &mut [u8], title: &str, buckets: &[Bucket]) -> Result<()> {
    let root = BitMapBackend::with_buffer(buf, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow!("Failed to clear chart canvas: {e}"))?;

    let draw_text = |text: &str, pos: (i32, i32), style: TextStyle| -> Result<()> {
        root.draw(&Text::new(text.to_string(), pos, style))
            .map_err(|e| anyhow!("Failed to draw text '{text}': {e}"))
    };

    draw_text(
        title,
        (PLOT_WIDTH as i32 / 2, 10),
        TextStyle::from((FONT_FAMILY, 22).into_font()).pos(Pos::new(HPos::Center, VPos::Top)),
    )?;

    let total: usize = buckets.iter().map(|b| b.count).sum();
    if total == 0 {
        root.draw(&Circle::new(
            CENTER,
            RADIUS as i32,
            RGBColor(0xcc, 0xcc, 0xcc).filled(),
        ))
        .map_err(|e| anyhow!("Failed to draw empty chart: {e}"))?;
        draw_text(
            "No data",
            CENTER,
            TextStyle::from((FONT_FAMILY, 16).into_font())
                .pos(Pos::new(HPos::Center, VPos::Center)),
        )?;
    }

    let mut angle = START_ANGLE;
    for (i, bucket) in buckets.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        if bucket.count > 0 {
            let sweep = 360.0 * bucket.count as f64 / total as f64;
            root.draw(&Polygon::new(wedge(angle, sweep), color.filled()))
                .map_err(|e| anyhow!("Failed to draw slice '{}': {e}", bucket.label))?;
            angle += sweep;
        }

        // Every bucket gets a legend row, empty ones included
        let y = LEGEND_TOP + i as i32 * LEGEND_ROW;
        root.draw(&Rectangle::new([(24, y + 2), (38, y + 16)], color.filled()))
            .map_err(|e| anyhow!("Failed to draw legend: {e}"))?;
        draw_text(
            &slice_label(bucket, total),
            (46, y),
            TextStyle::from((FONT_FAMILY, 15).into_font()),
        )?;
    }

    root.present()
        .map_err(|e| anyhow!("Failed to finish chart: {e}"))?;
    Ok(())
}

/// Renders a titled pie chart with a black border.
pub fn render_pie_chart(title: &str, buckets: &[Bucket]) -> Result<RgbImage> {
    ensure_font()?;
    let mut buf = vec![0u8; (PLOT_WIDTH * PLOT_HEIGHT * 3) as usize];
    draw_plot(&mut buf, title, buckets)?;

    let plot = RgbImage::from_raw(PLOT_WIDTH, PLOT_HEIGHT, buf)
        .ok_or_else(|| anyhow!("Chart buffer has the wrong size"))?;
    let mut framed = RgbImage::from_pixel(CHART_SIZE.0, CHART_SIZE.1, Rgb([0, 0, 0]));
    image::imageops::overlay(&mut framed, &plot, BORDER as i64, BORDER as i64);
    Ok(framed)
}

/// PNG-encodes a chart and writes it to `path`. Returns the encoded bytes.
pub fn save_png(chart: RgbImage, path: &Path) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    DynamicImage::ImageRgb8(chart)
        .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
        .context("Failed to encode chart as PNG")?;
    std::fs::write(path, &png)
        .with_context(|| format!("Failed to write chart {}", path.display()))?;
    Ok(png)
}
