//! PNG bar charts.
//!
//! Bars are drawn without text so rendering needs no system fonts. What the
//! chart shows is stored in the PNG `Title` text chunk and listed in the
//! report.

use std::path::Path;

use plotters::prelude::{
    BLACK, BitMapBackend, ChartBuilder, Color, IntoDrawingArea, PathElement, RGBColor, Rectangle,
    WHITE,
};

use crate::error::{ReportError, Result};

pub const CHART_SIZE: (u32, u32) = (800, 600);

const BAR_COLOR: RGBColor = RGBColor(66, 135, 245);
const BAR_WIDTH: f64 = 0.7;

/// Keyword of the PNG text chunk holding the chart title.
pub const TITLE_KEYWORD: &str = "Title";

/// Draw one bar per value on a `0..y_max` axis and encode it as PNG.
///
/// `None` leaves a gap. `path` is only used in error messages.
pub fn bar_chart(path: &Path, title: &str, values: &[Option<f64>], y_max: f64) -> Result<Vec<u8>> {
    let chart_error = |message: String| ReportError::Chart {
        path: path.to_path_buf(),
        message,
    };
    let (width, height) = CHART_SIZE;
    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    draw_bars(&mut pixels, values, y_max).map_err(chart_error)?;

    let mut bytes = Vec::new();
    let mut encoder = png::Encoder::new(&mut bytes, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder
        .add_text_chunk(TITLE_KEYWORD.to_string(), latin1(title))
        .map_err(|e| chart_error(e.to_string()))?;
    let mut writer = encoder
        .write_header()
        .map_err(|e| chart_error(e.to_string()))?;
    writer
        .write_image_data(&pixels)
        .map_err(|e| chart_error(e.to_string()))?;
    writer.finish().map_err(|e| chart_error(e.to_string()))?;
    Ok(bytes)
}

fn draw_bars(pixels: &mut [u8], values: &[Option<f64>], y_max: f64) -> std::result::Result<(), String> {
    let y_max = if y_max.is_finite() && y_max > 0.0 {
        y_max
    } else {
        1.0
    };
    let x_max = values.len().max(1) as f64;

    let root = BitMapBackend::with_buffer(pixels, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        .map_err(|e| e.to_string())?;

    let gap = (1.0 - BAR_WIDTH) / 2.0;
    let bars = values.iter().enumerate().filter_map(|(idx, value)| {
        let height = value.filter(|v| v.is_finite())?.clamp(0.0, y_max);
        let left = idx as f64 + gap;
        Some(Rectangle::new(
            [(left, 0.0), (left + BAR_WIDTH, height)],
            BAR_COLOR.filled(),
        ))
    });
    chart.draw_series(bars).map_err(|e| e.to_string())?;

    let axes = [
        vec![(0.0, 0.0), (x_max, 0.0)],
        vec![(0.0, 0.0), (0.0, y_max)],
    ];
    chart
        .draw_series(
            axes.into_iter()
                .map(|points| PathElement::new(points, BLACK.stroke_width(2))),
        )
        .map_err(|e| e.to_string())?;

    root.present().map_err(|e| e.to_string())
}

/// `tEXt` chunks are Latin-1; anything else becomes `?`.
fn latin1(text: &str) -> String {
    text.chars()
        .map(|ch| {
            if (ch as u32) <= 0xFF && !ch.is_control() {
                ch
            } else {
                '?'
            }
        })
        .collect()
}
