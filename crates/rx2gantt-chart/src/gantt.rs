//! Gantt chart layout and rasterization.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::rect::Rect;
use thiserror::Error;

use rx2gantt_core::MedicationRecord;

use crate::font::load_font;
use crate::palette::palette_color;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const MAJOR_GRID: Rgb<u8> = Rgb([70, 70, 70]);
const MINOR_GRID: Rgb<u8> = Rgb([200, 200, 200]);

/// Chart rendering failure.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The record set was empty after validation; nothing to render.
    /// Reported as a distinct condition so callers never get a zero-size
    /// or malformed image file.
    #[error("nothing to render: no valid records")]
    NoRecords,

    /// The raster could not be encoded or written.
    #[error("failed to write chart image: {0}")]
    Image(#[from] image::ImageError),
}

/// Gantt rendering options.
///
/// Canvas width scales linearly with the timeline span in days and height
/// with the record count, so labels stay legible regardless of document
/// size.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Horizontal pixels per day of timeline span.
    pub px_per_day: u32,
    /// Vertical pixels per subject row.
    pub row_height: u32,
    /// Height of each record bar.
    pub bar_height: u32,
    /// Label font scale in pixels.
    pub font_scale: f32,
    /// Explicit label font; falls back to common system fonts when `None`.
    pub font_path: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            px_per_day: 200,
            row_height: 40,
            bar_height: 18,
            font_scale: 13.0,
            font_path: None,
        }
    }
}

/// Render the validated records as a Gantt PNG at `path`.
///
/// Records sort stably by issue time; the y axis lists distinct generic
/// names in first-appearance order with the earliest subject on the top
/// row. Each record draws one bar spanning `[start, stop]` on its
/// subject's row, annotated with `dose / frequency / route` at the bar
/// midpoint. Overlapping bars for one subject render as-is, neither merged
/// nor deduplicated.
///
/// # Errors
///
/// [`ChartError::NoRecords`] when `records` is empty;
/// [`ChartError::Image`] when the raster cannot be written.
pub fn render_gantt(
    records: &[MedicationRecord],
    options: &RenderOptions,
    path: &Path,
) -> Result<(), ChartError> {
    if records.is_empty() {
        return Err(ChartError::NoRecords);
    }

    let mut sorted: Vec<&MedicationRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.start);

    let subjects = subject_order(&sorted);
    let row_of: HashMap<&str, usize> = subjects
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let (t0, t1) = day_bounds(&sorted);
    let span_days = (t1 - t0).num_days().max(1) as u32;

    // Margins: the left gutter fits the longest subject name, the top band
    // fits the two-line major tick labels.
    let longest = subjects.iter().map(String::len).max().unwrap_or(0) as u32;
    let left = (longest * 7 + 16).clamp(90, 280);
    let (top, right, bottom) = (46u32, 30u32, 18u32);

    let plot_h = (subjects.len() as u32 * options.row_height)
        .max(records.len() as u32 * 24)
        .max(options.row_height);
    let width = left + span_days * options.px_per_day + right;
    let height = top + plot_h + bottom;

    let mut img = RgbImage::from_pixel(width, height, WHITE);
    let font = load_font(options.font_path.as_deref());
    if font.is_none() {
        log::warn!("no label font found; rendering chart without text labels");
    }
    let scale = PxScale::from(options.font_scale);

    let x_of = |t: NaiveDateTime| -> f32 {
        left as f32 + (t - t0).num_seconds() as f32 / 86_400.0 * options.px_per_day as f32
    };

    draw_time_grid(&mut img, t0, t1, top, plot_h, &x_of, font.as_ref(), scale);

    // Bars, in issue-time order.
    let row_space = plot_h as f32 / subjects.len() as f32;
    for record in &sorted {
        let row = row_of[record.generic_name.as_str()];
        let color = palette_color(row, subjects.len());
        let center_y = top as f32 + row_space * (row as f32 + 0.5);

        let x_start = x_of(record.start);
        let bar_w = ((x_of(record.stop) - x_start) as u32).max(1);
        let bar_x = x_start as i32;
        let bar_y = (center_y - options.bar_height as f32 / 2.0) as i32;

        let bar = Rect::at(bar_x, bar_y).of_size(bar_w, options.bar_height);
        draw_filled_rect_mut(&mut img, bar, color);
        draw_hollow_rect_mut(&mut img, bar, BLACK);

        if let Some(font) = font.as_ref() {
            let label = format!("{} / {} / {}", record.dose, record.frequency, record.route);
            draw_boxed_label(
                &mut img,
                &label,
                bar_x + bar_w as i32 / 2,
                center_y as i32,
                font,
                scale,
            );
        }
    }

    // Subject names in the left gutter, one per row, top row first.
    if let Some(font) = font.as_ref() {
        for (row, name) in subjects.iter().enumerate() {
            let y = top as f32 + row_space * (row as f32 + 0.5) - options.font_scale / 2.0;
            draw_text_mut(&mut img, BLACK, 6, y as i32, scale, font, name);
        }
    }

    img.save(path)?;
    log::info!("gantt chart saved to {}", path.display());
    Ok(())
}

/// Distinct generic names in first-appearance order of the issue-time
/// sorted records. The first subject lands on the top chart row.
fn subject_order(sorted: &[&MedicationRecord]) -> Vec<String> {
    let mut subjects = Vec::new();
    for record in sorted {
        if !subjects.contains(&record.generic_name) {
            subjects.push(record.generic_name.clone());
        }
    }
    subjects
}

/// Time axis bounds: minimum issue time floored to its day, maximum stop
/// time ceiled to the next day boundary.
fn day_bounds(sorted: &[&MedicationRecord]) -> (NaiveDateTime, NaiveDateTime) {
    let min_start = sorted.iter().map(|r| r.start).min().unwrap_or_default();
    let max_stop = sorted.iter().map(|r| r.stop).max().unwrap_or_default();
    (floor_day(min_start), ceil_day(max_stop))
}

fn floor_day(t: NaiveDateTime) -> NaiveDateTime {
    t.date().and_time(NaiveTime::MIN)
}

fn ceil_day(t: NaiveDateTime) -> NaiveDateTime {
    let floored = floor_day(t);
    if floored == t {
        t
    } else {
        floored + Duration::days(1)
    }
}

/// Vertical gridlines: minor every 6 hours (unlabeled), major every 24
/// hours, labeled at the top edge with the date and weekday abbreviation.
#[allow(clippy::too_many_arguments)]
fn draw_time_grid(
    img: &mut RgbImage,
    t0: NaiveDateTime,
    t1: NaiveDateTime,
    top: u32,
    plot_h: u32,
    x_of: &dyn Fn(NaiveDateTime) -> f32,
    font: Option<&FontVec>,
    scale: PxScale,
) {
    let mut tick = t0;
    while tick <= t1 {
        let x = x_of(tick);
        let major = tick.hour() == 0;
        let color = if major { MAJOR_GRID } else { MINOR_GRID };
        draw_line_segment_mut(img, (x, top as f32), (x, (top + plot_h) as f32), color);

        if major {
            if let Some(font) = font {
                let date = tick.format("%Y-%m-%d").to_string();
                let weekday = tick.format("%a").to_string();
                draw_text_mut(img, BLACK, x as i32 + 3, 4, scale, font, &date);
                draw_text_mut(img, BLACK, x as i32 + 3, 22, scale, font, &weekday);
            }
        }
        tick += Duration::hours(6);
    }
}

/// Record annotation: white box with a black border, centered on the bar
/// midpoint.
fn draw_boxed_label(
    img: &mut RgbImage,
    label: &str,
    center_x: i32,
    center_y: i32,
    font: &FontVec,
    scale: PxScale,
) {
    // Estimated extent; accurate shaping is not worth the dependency.
    let box_w = label.len() as u32 * 7 + 6;
    let box_h = 16u32;
    let x = center_x - box_w as i32 / 2;
    let y = center_y - box_h as i32 / 2;

    let rect = Rect::at(x, y).of_size(box_w, box_h);
    draw_filled_rect_mut(img, rect, WHITE);
    draw_hollow_rect_mut(img, rect, BLACK);
    draw_text_mut(img, BLACK, x + 3, y + 2, scale, font, label);
}
