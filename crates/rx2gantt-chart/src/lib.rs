//! Time-scaled Gantt rendering for rx2gantt.
//!
//! Lays out one horizontal interval per medication record on a category
//! axis grouped by generic name, against a 6-hour / 24-hour time grid, and
//! writes the result as a PNG raster. Rendering is pure geometry over
//! validated records; it performs no document or network I/O.

mod font;
mod gantt;
mod palette;

pub use font::load_font;
pub use gantt::{render_gantt, ChartError, RenderOptions};
pub use palette::{palette_color, PASTEL1};
